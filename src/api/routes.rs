use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use crate::wled::{Command, effect_catalog};

use super::{
    ApiError, AppState, BrightnessRequest, ColorRequest, EffectRequest, IntensityRequest,
    SpeedRequest,
};

const INDEX_HTML: &str = include_str!("../../static/index.html");
const APP_JS: &str = include_str!("../../static/app.js");

type ApiResult = Result<Json<Value>, ApiError>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/static/app.js", get(app_js))
        .route("/api/state", get(get_state))
        .route("/api/effects", get(get_effects))
        .route("/api/power", post(toggle_power))
        .route("/api/power/on", post(turn_on))
        .route("/api/power/off", post(turn_off))
        .route("/api/brightness", post(set_brightness))
        .route("/api/color", post(set_color))
        .route("/api/effect", post(set_effect))
        .route("/api/effect/speed", post(set_effect_speed))
        .route("/api/effect/intensity", post(set_effect_intensity))
        .route("/api/health", get(health))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn app_js() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/javascript")], APP_JS)
}

fn success(ok: bool, failure: &'static str) -> ApiResult {
    if ok {
        Ok(Json(json!({ "success": true })))
    } else {
        Err(ApiError::Unavailable(failure))
    }
}

async fn get_state(State(state): State<AppState>) -> ApiResult {
    state
        .client
        .get_state()
        .await
        .map(Json)
        .ok_or(ApiError::Unavailable("WLED device not reachable"))
}

async fn get_effects(State(state): State<AppState>) -> ApiResult {
    let effects = state
        .client
        .get_effects()
        .await
        .ok_or(ApiError::Unavailable("WLED device not reachable"))?;
    Ok(Json(json!({ "effects": effect_catalog(effects) })))
}

async fn toggle_power(State(state): State<AppState>) -> ApiResult {
    success(state.client.toggle().await, "Failed to toggle power")
}

async fn turn_on(State(state): State<AppState>) -> ApiResult {
    success(state.client.turn_on().await, "Failed to turn on")
}

async fn turn_off(State(state): State<AppState>) -> ApiResult {
    success(state.client.turn_off().await, "Failed to turn off")
}

async fn set_brightness(
    State(state): State<AppState>,
    Json(req): Json<BrightnessRequest>,
) -> ApiResult {
    Command::Brightness(req.brightness).validate()?;
    success(
        state.client.set_brightness(req.brightness).await,
        "Failed to set brightness",
    )
}

async fn set_color(State(state): State<AppState>, Json(req): Json<ColorRequest>) -> ApiResult {
    Command::Color {
        red: req.red,
        green: req.green,
        blue: req.blue,
        white: req.white,
    }
    .validate()?;
    success(
        state
            .client
            .set_color(req.red, req.green, req.blue, req.white)
            .await,
        "Failed to set color",
    )
}

async fn set_effect(State(state): State<AppState>, Json(req): Json<EffectRequest>) -> ApiResult {
    Command::Effect(req.effect_id).validate()?;
    success(
        state.client.set_effect(req.effect_id).await,
        "Failed to set effect",
    )
}

async fn set_effect_speed(
    State(state): State<AppState>,
    Json(req): Json<SpeedRequest>,
) -> ApiResult {
    Command::EffectSpeed(req.speed).validate()?;
    success(
        state.client.set_effect_speed(req.speed).await,
        "Failed to set speed",
    )
}

async fn set_effect_intensity(
    State(state): State<AppState>,
    Json(req): Json<IntensityRequest>,
) -> ApiResult {
    Command::EffectIntensity(req.intensity).validate()?;
    success(
        state.client.set_effect_intensity(req.intensity).await,
        "Failed to set intensity",
    )
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let connected = state.client.is_connected().await;
    Json(json!({
        "status": if connected { "healthy" } else { "unhealthy" },
        "connected": connected,
        "host": state.client.host(),
    }))
}
