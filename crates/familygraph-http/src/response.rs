//! Response envelope

use axum::Json;
use serde::{Deserialize, Serialize};

pub const CODE_OK: i32 = 0;
pub const CODE_ERROR: i32 = -1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: CODE_OK,
            message: "ok".to_string(),
            data: Some(data),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: CODE_ERROR,
            message: message.into(),
            data: None,
        }
    }
}

/// Wrap `data` in a success envelope
pub fn ok<T>(data: T) -> Json<Envelope<T>> {
    Json(Envelope::ok(data))
}
