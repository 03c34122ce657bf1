pub mod client;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const STATE_PATH: &str = "/json/state";
pub const EFFECTS_PATH: &str = "/json/effects";

/// Highest value accepted for brightness, color channels, speed and intensity.
pub const MAX_LEVEL: i64 = 255;
/// Highest addressable effect id.
pub const MAX_EFFECT_ID: i64 = 101;

/// A numeric argument outside its inclusive range. Raised before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} must be {min}-{max}")]
pub struct ValidationError {
    pub field: &'static str,
    pub value: i64,
    pub min: i64,
    pub max: i64,
}

/// Everything that can go wrong talking to the device once a request is on the wire.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("device returned status {0}")]
    Status(StatusCode),
    #[error("invalid JSON response: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("unexpected response shape: {0}")]
    ProtocolMismatch(&'static str),
}

fn check_range(field: &'static str, value: i64, max: i64) -> Result<u8, ValidationError> {
    if (0..=max).contains(&value) {
        // max never exceeds 255
        Ok(value as u8)
    } else {
        Err(ValidationError {
            field,
            value,
            min: 0,
            max,
        })
    }
}

/// A high-level state change, validated before it is turned into a state patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Power(bool),
    Brightness(i64),
    Color {
        red: i64,
        green: i64,
        blue: i64,
        white: i64,
    },
    Effect(i64),
    EffectSpeed(i64),
    EffectIntensity(i64),
}

impl Command {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.to_patch().map(|_| ())
    }

    /// Build the `/json/state` body for this command. Fails on the first
    /// out-of-range component, so a partial color is never produced.
    pub fn to_patch(&self) -> Result<StatePatch, ValidationError> {
        let patch = match *self {
            Command::Power(on) => StatePatch {
                on: Some(on),
                ..Default::default()
            },
            Command::Brightness(v) => StatePatch {
                bri: Some(check_range("Brightness", v, MAX_LEVEL)?),
                ..Default::default()
            },
            Command::Color {
                red,
                green,
                blue,
                white,
            } => {
                let col = [
                    check_range("Red", red, MAX_LEVEL)?,
                    check_range("Green", green, MAX_LEVEL)?,
                    check_range("Blue", blue, MAX_LEVEL)?,
                    check_range("White", white, MAX_LEVEL)?,
                ];
                StatePatch::segment(SegmentPatch {
                    col: Some(vec![col]),
                    ..Default::default()
                })
            }
            Command::Effect(id) => StatePatch::segment(SegmentPatch {
                fx: Some(check_range("Effect ID", id, MAX_EFFECT_ID)?),
                ..Default::default()
            }),
            Command::EffectSpeed(v) => StatePatch::segment(SegmentPatch {
                sx: Some(check_range("Speed", v, MAX_LEVEL)?),
                ..Default::default()
            }),
            Command::EffectIntensity(v) => StatePatch::segment(SegmentPatch {
                ix: Some(check_range("Intensity", v, MAX_LEVEL)?),
                ..Default::default()
            }),
        };
        Ok(patch)
    }
}

/// Body of `POST /json/state`. Only the fields that are set get serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bri: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seg: Option<Vec<SegmentPatch>>,
}

impl StatePatch {
    /// Patch addressing only the first segment.
    fn segment(seg: SegmentPatch) -> Self {
        Self {
            seg: Some(vec![seg]),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SegmentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col: Option<Vec<[u8; 4]>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fx: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sx: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ix: Option<u8>,
}

// Firmware versions disagree on whether the effect list is wrapped.
#[derive(Deserialize)]
#[serde(untagged)]
enum EffectsResponse {
    Bare(Vec<String>),
    Wrapped { effects: Vec<String> },
}

/// Accept either `["Solid", ...]` or `{"effects": ["Solid", ...]}`.
pub fn parse_effects(value: serde_json::Value) -> Result<Vec<String>, DeviceError> {
    match serde_json::from_value(value) {
        Ok(EffectsResponse::Bare(effects)) | Ok(EffectsResponse::Wrapped { effects }) => {
            Ok(effects)
        }
        Err(_) => Err(DeviceError::ProtocolMismatch(
            "effects response is neither an array nor an object with an effects field",
        )),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectEntry {
    pub id: u8,
    pub name: String,
}

/// Keep the addressable effects (ids 0-101) and sort them by name.
/// Each entry keeps its position in the device list as its id.
pub fn effect_catalog(names: Vec<String>) -> Vec<EffectEntry> {
    let mut catalog: Vec<EffectEntry> = names
        .into_iter()
        .enumerate()
        .take(MAX_EFFECT_ID as usize + 1)
        .map(|(id, name)| EffectEntry {
            id: id as u8,
            name,
        })
        .collect();
    catalog.sort_by(|a, b| a.name.cmp(&b.name));
    catalog
}
