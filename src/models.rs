use serde::{Deserialize, Serialize};

use crate::labels::Emotion;

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub label: Emotion,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct Base64ImageRequest {
    pub image_base64: String,
}
