use actix_cors::Cors;
use actix_multipart::Multipart;
use actix_web::error::JsonPayloadError;
use actix_web::{web, HttpRequest, HttpResponse};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures_util::TryStreamExt;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::inference::Predictor;
use crate::models::{Base64ImageRequest, HealthResponse, PredictionResponse};

pub struct AppState {
    pub predictor: Predictor,
    pub max_upload_bytes: usize,
}

pub fn routes(state: web::Data<AppState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let limit = json_limit(state.max_upload_bytes);
        let json_config = web::JsonConfig::default()
            .limit(limit)
            .error_handler(move |err, req| json_error(err, req, limit));
        cfg.app_data(state)
            .app_data(json_config)
            .route("/health", web::get().to(health))
            .service(
                web::resource(["/predict", "/predict-file"]).route(web::post().to(predict)),
            )
            .route("/predict-base64", web::post().to(predict_base64));
    }
}

/// base64 inflates the payload by 4/3, plus room for the JSON envelope.
fn json_limit(max_upload_bytes: usize) -> usize {
    (max_upload_bytes / 3)
        .saturating_mul(4)
        .saturating_add(1024)
}

fn json_error(err: JsonPayloadError, req: &HttpRequest, limit: usize) -> actix_web::Error {
    log::warn!("rejected JSON body on {}: {}", req.path(), err);
    match err {
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            ServiceError::PayloadTooLarge { limit }.into()
        }
        other => ServiceError::InvalidJson(other.to_string()).into(),
    }
}

pub fn cors(allowed_origin: &str) -> Cors {
    Cors::default()
        .allowed_origin(allowed_origin)
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
        .max_age(3600)
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse { status: "ok" })
}

pub async fn predict(
    mut payload: Multipart,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ServiceError> {
    let request_id = Uuid::new_v4();

    let upload = read_file_field(&mut payload, state.max_upload_bytes)
        .await
        .map_err(|e| {
            log::warn!("[{}] rejected upload: {}", request_id, e);
            e
        })?;

    classify(state, upload, request_id).await
}

pub async fn predict_base64(
    body: web::Json<Base64ImageRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ServiceError> {
    let request_id = Uuid::new_v4();

    let encoded = strip_data_url(body.image_base64.trim());
    let upload = STANDARD.decode(encoded).map_err(|e| {
        log::warn!("[{}] rejected base64 payload: {}", request_id, e);
        ServiceError::from(e)
    })?;
    if upload.len() > state.max_upload_bytes {
        return Err(ServiceError::PayloadTooLarge {
            limit: state.max_upload_bytes,
        });
    }

    classify(state, upload, request_id).await
}

/// Runs preprocessing and inference off the async workers.
async fn classify(
    state: web::Data<AppState>,
    upload: Vec<u8>,
    request_id: Uuid,
) -> Result<HttpResponse, ServiceError> {
    let size = upload.len();
    let outcome = web::block(move || state.predictor.predict_bytes(&upload)).await?;

    match outcome {
        Ok(label) => {
            log::info!("[{}] predicted {} ({} bytes)", request_id, label, size);
            Ok(HttpResponse::Ok().json(PredictionResponse { label }))
        }
        Err(e) => {
            log::warn!("[{}] prediction failed: {}", request_id, e);
            Err(e)
        }
    }
}

async fn read_file_field(payload: &mut Multipart, limit: usize) -> Result<Vec<u8>, ServiceError> {
    let mut upload = None;

    while let Some(mut field) = payload.try_next().await? {
        let is_file = field.content_disposition().get_name() == Some("file");
        if !is_file || upload.is_some() {
            while field.try_next().await?.is_some() {}
            continue;
        }

        let mut data = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            if data.len() + chunk.len() > limit {
                return Err(ServiceError::PayloadTooLarge { limit });
            }
            data.extend_from_slice(&chunk);
        }
        upload = Some(data);
    }

    upload.ok_or(ServiceError::MissingFile)
}

fn strip_data_url(encoded: &str) -> &str {
    match encoded.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => encoded,
    }
}
