use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://emotion-classifier-frontend.onrender.com";

#[derive(Debug, Clone, Parser)]
#[command(name = "emotion-backend", about = "Facial emotion classification over HTTP")]
pub struct Config {
    #[arg(long, env = "EMOTION_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "EMOTION_PORT", default_value_t = 8000)]
    pub port: u16,

    /// ONNX model loaded once at startup
    #[arg(long, env = "EMOTION_MODEL_PATH", default_value = "model.onnx")]
    pub model_path: PathBuf,

    /// The only origin allowed to call the API from a browser
    #[arg(long, env = "EMOTION_ALLOWED_ORIGIN", default_value = DEFAULT_ALLOWED_ORIGIN)]
    pub allowed_origin: String,

    #[arg(long, env = "EMOTION_MAX_UPLOAD_BYTES", default_value_t = 10 * 1024 * 1024)]
    pub max_upload_bytes: usize,

    #[arg(long, env = "EMOTION_WORKERS")]
    pub workers: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_arguments() {
        let config = Config::try_parse_from(["emotion-backend"]).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.model_path, PathBuf::from("model.onnx"));
        assert_eq!(config.allowed_origin, DEFAULT_ALLOWED_ORIGIN);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert!(config.workers.is_none());
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "emotion-backend",
            "--port",
            "9090",
            "--model-path",
            "/srv/models/fer.onnx",
            "--allowed-origin",
            "http://localhost:5173",
        ])
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.model_path, PathBuf::from("/srv/models/fer.onnx"));
        assert_eq!(config.allowed_origin, "http://localhost:5173");
    }
}
