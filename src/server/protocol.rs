//! Response bodies of the HTTP API
//!
//! Successful calls return the pipeline result as JSON. Every failure is a
//! single body of the form `{"error": {"code": "...", "message": "..."}}`
//! with the status given by [`GatewayError::http_status`].

use crate::error::{ErrorCode, GatewayError};
use crate::platform::Platform;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

// =============================================================================
// Error Types
// =============================================================================

/// Error data structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorData {
    /// Error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

impl ErrorData {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Envelope wrapping [`ErrorData`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorData,
}

impl From<&GatewayError> for ErrorBody {
    fn from(err: &GatewayError) -> Self {
        Self {
            error: ErrorData::new(err.code(), err.to_string()),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::warn!("request failed with {}: {}", status, self);
        } else {
            tracing::debug!("request rejected with {}: {}", status, self);
        }

        (status, Json(ErrorBody::from(&self))).into_response()
    }
}

// =============================================================================
// System Info Types
// =============================================================================

/// One registered match route
#[derive(Debug, Clone, Serialize)]
pub struct EndpointInfo {
    /// Endpoint name, e.g. `match.get-match`
    pub name: &'static str,

    /// Full route in axum path syntax
    pub path: String,
}

/// System information response
#[derive(Debug, Clone, Serialize)]
pub struct SystemInfo {
    /// Server version
    pub server_version: String,

    /// Build information
    pub build: BuildInfo,

    /// Platform used when requests carry none
    pub default_platform: Option<Platform>,

    /// Registered match routes
    pub endpoints: Vec<EndpointInfo>,
}

/// Build information
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    /// Git commit SHA
    pub git_sha: String,

    /// Build timestamp
    pub timestamp: String,
}

impl SystemInfo {
    pub fn new(default_platform: Option<Platform>, endpoints: Vec<EndpointInfo>) -> Self {
        Self {
            server_version: env!("CARGO_PKG_VERSION").to_string(),
            build: BuildInfo {
                git_sha: option_env!("GIT_SHA").unwrap_or("unknown").to_string(),
                timestamp: option_env!("BUILD_TIMESTAMP")
                    .unwrap_or("unknown")
                    .to_string(),
            },
            default_platform,
            endpoints,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
