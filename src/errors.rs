use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::path::PathBuf;
use thiserror::Error;

use crate::models::ErrorResponse;

/// Failures that end a single request. None of them take the process down.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid image: {0}")]
    Decode(String),

    #[error("invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("invalid JSON body: {0}")]
    InvalidJson(String),

    #[error("malformed multipart payload: {0}")]
    Multipart(#[from] actix_multipart::MultipartError),

    #[error("no `file` field in upload")]
    MissingFile,

    #[error("upload exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("inference worker unavailable")]
    Blocking(#[from] actix_web::error::BlockingError),
}

impl From<image::ImageError> for ServiceError {
    fn from(err: image::ImageError) -> Self {
        ServiceError::Decode(err.to_string())
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Decode(_)
            | ServiceError::InvalidBase64(_)
            | ServiceError::InvalidJson(_)
            | ServiceError::Multipart(_) => StatusCode::BAD_REQUEST,
            ServiceError::MissingFile => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ServiceError::ShapeMismatch { .. }
            | ServiceError::Inference(_)
            | ServiceError::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

/// Startup failure. The server is never bound when this is returned.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("model file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to load model from {}: {reason}", .path.display())]
    Runtime { path: PathBuf, reason: String },

    #[error("model produces {actual} scores, label table has {expected}")]
    OutputArity { expected: usize, actual: usize },
}
