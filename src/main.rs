mod config;
mod errors;
mod handlers;
mod inference;
mod labels;
mod models;
mod preprocess;

use actix_web::{middleware, web, App, HttpServer};
use clap::Parser;
use std::io::Write;
use std::sync::Arc;

use config::Config;
use handlers::AppState;
use inference::{OnnxClassifier, Predictor};

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_logging();

    log::info!("Loading model from {}", config.model_path.display());
    let classifier = OnnxClassifier::load(&config.model_path)?;
    log::info!("Model loaded successfully");

    let state = web::Data::new(AppState {
        predictor: Predictor::new(Arc::new(classifier)),
        max_upload_bytes: config.max_upload_bytes,
    });

    log::info!(
        "Server running at http://{}:{} (allowed origin: {})",
        config.host,
        config.port,
        config.allowed_origin
    );

    let allowed_origin = config.allowed_origin.clone();
    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(handlers::cors(&allowed_origin))
            .wrap(middleware::Logger::default())
            .configure(handlers::routes(state.clone()))
    });
    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }

    server.bind((config.host.as_str(), config.port))?.run().await?;

    Ok(())
}
