//! Uniform JSON response envelope
//!
//! `{ timestamp, status, payload?, error?, message? }` for successes and
//! failures alike.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{SecondsFormat, Utc};
use serde::{Serialize, Serializer};

#[derive(Debug, Serialize)]
pub struct Envelope<T = ()> {
    /// ISO-8601 UTC with millisecond precision
    pub timestamp: String,
    #[serde(serialize_with = "serialize_status")]
    pub status: StatusCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<T>,
    /// HTTP reason phrase, set on errors only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn serialize_status<S: Serializer>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u16(status.as_u16())
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl<T: Serialize> Envelope<T> {
    /// 200 with a payload
    pub fn ok(payload: T) -> Self {
        Self {
            timestamp: now(),
            status: StatusCode::OK,
            payload: Some(payload),
            error: None,
            message: None,
        }
    }
}

impl Envelope {
    /// 200 without a payload
    pub fn empty() -> Self {
        Self {
            timestamp: now(),
            status: StatusCode::OK,
            payload: None,
            error: None,
            message: None,
        }
    }

    pub fn error(status: StatusCode, message: Option<String>) -> Self {
        Self {
            timestamp: now(),
            status,
            payload: None,
            error: status.canonical_reason().map(str::to_string),
            message,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
