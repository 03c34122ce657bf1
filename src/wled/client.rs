use std::time::Duration;

use reqwest::Method;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::config::normalize_host;

use super::{Command, DeviceError, EFFECTS_PATH, STATE_PATH, parse_effects};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP client for a single WLED device.
///
/// Every operation reports failure as a value (`None` or `false`) after
/// logging it; nothing here returns an error to the caller. Out-of-range
/// arguments are rejected before any request is made.
pub struct WledClient {
    http: reqwest::Client,
    host: String,
    timeout: Duration,
}

impl WledClient {
    pub fn new(host: &str, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            host: normalize_host(host),
            timeout,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    async fn try_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, DeviceError> {
        let url = format!("{}{}", self.host, path);
        debug!("{} {}", method, url);

        let mut request = self.http.request(method, &url).timeout(self.timeout);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DeviceError::Status(status));
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// The only place that talks to the network. Failures are logged and become `None`.
    pub async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Option<Value> {
        match self.try_request(method.clone(), path, body).await {
            Ok(value) => Some(value),
            Err(e) => {
                error!("Request {} {} failed: {}", method, path, e);
                None
            }
        }
    }

    /// Validate `command` and post it to `/json/state`.
    pub async fn send(&self, command: Command) -> bool {
        let patch = match command.to_patch() {
            Ok(patch) => patch,
            Err(e) => {
                warn!("Rejected {:?}: {} (got {})", command, e, e.value);
                return false;
            }
        };
        let body = match serde_json::to_value(&patch) {
            Ok(body) => body,
            Err(e) => {
                error!("Failed to encode {:?}: {}", command, e);
                return false;
            }
        };
        self.request(Method::POST, STATE_PATH, Some(&body))
            .await
            .is_some()
    }

    pub async fn get_state(&self) -> Option<Value> {
        self.request(Method::GET, STATE_PATH, None).await
    }

    pub async fn get_effects(&self) -> Option<Vec<String>> {
        let response = self.request(Method::GET, EFFECTS_PATH, None).await?;
        match parse_effects(response) {
            Ok(effects) => Some(effects),
            Err(e) => {
                warn!("GET {} returned {}", EFFECTS_PATH, e);
                None
            }
        }
    }

    pub async fn turn_on(&self) -> bool {
        self.send(Command::Power(true)).await
    }

    pub async fn turn_off(&self) -> bool {
        self.send(Command::Power(false)).await
    }

    /// Read the current power flag and write its inverse.
    ///
    /// Not atomic: a change made by someone else between the read and the
    /// write is overwritten.
    pub async fn toggle(&self) -> bool {
        let Some(state) = self.get_state().await else {
            return false;
        };
        let on = state.get("on").and_then(Value::as_bool).unwrap_or(false);
        self.send(Command::Power(!on)).await
    }

    pub async fn set_brightness(&self, brightness: i64) -> bool {
        self.send(Command::Brightness(brightness)).await
    }

    pub async fn set_color(&self, red: i64, green: i64, blue: i64, white: i64) -> bool {
        self.send(Command::Color {
            red,
            green,
            blue,
            white,
        })
        .await
    }

    pub async fn set_effect(&self, effect_id: i64) -> bool {
        self.send(Command::Effect(effect_id)).await
    }

    pub async fn set_effect_speed(&self, speed: i64) -> bool {
        self.send(Command::EffectSpeed(speed)).await
    }

    pub async fn set_effect_intensity(&self, intensity: i64) -> bool {
        self.send(Command::EffectIntensity(intensity)).await
    }

    pub async fn is_connected(&self) -> bool {
        self.get_state().await.is_some()
    }
}
