use serde_json::Value;
use thiserror::Error;

/// Why a gateway call failed. Every variant renders as one human-readable
/// line; nothing is retried.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The service answered with a non-success status. `detail` is the
    /// response's `detail` field, shown to the user as is.
    #[error("{detail}")]
    Api { status: u16, detail: String },
    #[error("could not reach the design service: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response from the design service: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("design has not been created on the server yet")]
    NotCreated,
}

impl GatewayError {
    pub fn api(status: u16, detail: impl Into<String>) -> Self {
        Self::Api {
            status,
            detail: detail.into(),
        }
    }

    pub fn not_found(design_id: &str) -> Self {
        Self::api(404, format!("Design {design_id} not found"))
    }

    /// Build an `Api` error from a raw error body. The `detail` field may be
    /// a string or any JSON value; anything else falls back to the body text.
    pub fn from_body(status: u16, body: &str) -> Self {
        let detail = match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(mut map)) => match map.remove("detail") {
                Some(Value::String(s)) => s,
                Some(other) => other.to_string(),
                None => body.to_string(),
            },
            _ if body.trim().is_empty() => format!("request failed with status {status}"),
            _ => body.to_string(),
        };
        Self::Api { status, detail }
    }

    /// HTTP status for `Api` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            Self::Decode(_) | Self::NotCreated => None,
        }
    }
}
