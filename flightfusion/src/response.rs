//! Standard response envelope.
//!
//! Every result handed to a client has the same shape:
//!
//! ```json
//! {
//!   "success": true,
//!   "data": { ... } | null,
//!   "error": { "code": "BAD_REQUEST", "message": "..." } | null,
//!   "meta": { "timestamp": "2024-03-01T12:00:00.000Z", ... }
//! }
//! ```

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::orchestrator::{FetchError, FlightSnapshot};
use crate::report::AircraftReport;

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    Conflict,
    RateLimitExceeded,
    InternalError,
    ServiceUnavailable,
}

impl ErrorCode {
    /// HTTP status conventionally paired with this code.
    pub fn status_code(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::Conflict => 409,
            Self::RateLimitExceeded => 429,
            Self::InternalError => 500,
            Self::ServiceUnavailable => 503,
        }
    }
}

/// Error body of a failed response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

/// The envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
    pub meta: Map<String, Value>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful response. `meta` entries are merged after `timestamp`.
    pub fn success(data: T, meta: Map<String, Value>) -> Self {
        let mut merged = timestamp_meta();
        merged.extend(meta);
        Self {
            success: true,
            data: Some(data),
            error: None,
            meta: merged,
        }
    }

    /// Failed response.
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
            meta: timestamp_meta(),
        }
    }

    /// HTTP status for this response.
    pub fn status_code(&self) -> u16 {
        self.error.as_ref().map_or(200, |e| e.code.status_code())
    }
}

/// `data` of a flights response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightsData {
    pub flights: Vec<AircraftReport>,
}

impl From<FlightSnapshot> for ApiResponse<FlightsData> {
    fn from(snapshot: FlightSnapshot) -> Self {
        let meta = match serde_json::to_value(&snapshot.meta) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        Self::success(
            FlightsData {
                flights: snapshot.flights,
            },
            meta,
        )
    }
}

impl<T: Serialize> From<&FetchError> for ApiResponse<T> {
    fn from(err: &FetchError) -> Self {
        match err {
            FetchError::Disabled(reason) => Self::error(
                ErrorCode::ServiceUnavailable,
                format!("Flight data temporarily disabled ({})", reason),
            ),
            FetchError::Provider { .. } | FetchError::FallbackFailed { .. } => {
                Self::error(ErrorCode::InternalError, "Failed to fetch flight data")
            }
        }
    }
}

fn timestamp_meta() -> Map<String, Value> {
    let mut meta = Map::new();
    meta.insert(
        "timestamp".to_string(),
        Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    meta
}
