pub mod routes;

use std::sync::Arc;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::wled::ValidationError;
use crate::wled::client::WledClient;

/// Shared by every handler. The client holds no per-call state, so one
/// instance serves concurrent requests.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<WledClient>,
}

impl AppState {
    pub fn new(client: WledClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    Unavailable(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

// Numeric fields are signed so out-of-range input gets a 400 with a range
// message instead of a deserialization rejection.

#[derive(Debug, Deserialize)]
pub struct BrightnessRequest {
    pub brightness: i64,
}

#[derive(Debug, Deserialize)]
pub struct ColorRequest {
    pub red: i64,
    pub green: i64,
    pub blue: i64,
    #[serde(default)]
    pub white: i64,
}

#[derive(Debug, Deserialize)]
pub struct EffectRequest {
    pub effect_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct SpeedRequest {
    pub speed: i64,
}

#[derive(Debug, Deserialize)]
pub struct IntensityRequest {
    pub intensity: i64,
}
