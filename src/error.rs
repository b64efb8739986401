//! Gateway error taxonomy
//!
//! Every failure surfaced by the gateway is a single [`GatewayError`] with a
//! stable [`ErrorCode`] class. Client errors (bad platform, missing or
//! malformed parameters) are raised before the retrieval pipeline is touched;
//! pipeline failures are carried through unchanged.

use crate::pipeline::PipelineError;
use crate::query::QueryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Error classes exposed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown platform tag, or no tag and no default platform
    InvalidPlatform,
    /// A required field was blank at descriptor build time
    MissingRequiredField,
    /// A path or query parameter could not be parsed
    InvalidParameter,
    /// Upstream has no such resource
    NotFound,
    /// Upstream rejected the request for rate limiting
    RateLimited,
    /// Upstream did not answer in time
    Timeout,
    /// Retrieval was cancelled before it completed
    Cancelled,
    /// Upstream answered with an unexpected status or payload
    UpstreamError,
    /// Unexpected server error
    InternalError,
}

/// Gateway-level errors
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{}", invalid_platform_message(.tag))]
    InvalidPlatform { tag: Option<String> },

    #[error("required field '{0}' is missing")]
    MissingRequiredField(&'static str),

    #[error("invalid value '{value}' for parameter '{name}'")]
    InvalidParameter { name: String, value: String },

    #[error("query contract violated: {0}")]
    Contract(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

fn invalid_platform_message(tag: &Option<String>) -> String {
    match tag {
        Some(tag) => format!("{} is not a valid platform!", tag),
        None => "no platform was given and no default platform is configured".to_string(),
    }
}

impl GatewayError {
    pub fn invalid_parameter(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Error class of this failure
    pub fn code(&self) -> ErrorCode {
        match self {
            GatewayError::InvalidPlatform { .. } => ErrorCode::InvalidPlatform,
            GatewayError::MissingRequiredField(_) => ErrorCode::MissingRequiredField,
            GatewayError::InvalidParameter { .. } => ErrorCode::InvalidParameter,
            GatewayError::Contract(_) => ErrorCode::InternalError,
            GatewayError::Pipeline(e) => e.code(),
        }
    }

    /// HTTP status matching the error class
    pub fn http_status(&self) -> u16 {
        match self.code() {
            ErrorCode::InvalidPlatform
            | ErrorCode::MissingRequiredField
            | ErrorCode::InvalidParameter => 400,
            ErrorCode::NotFound => 404,
            ErrorCode::RateLimited => 429,
            ErrorCode::UpstreamError => 502,
            ErrorCode::Cancelled => 503,
            ErrorCode::Timeout => 504,
            ErrorCode::InternalError => 500,
        }
    }

    /// Whether the caller is at fault
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.http_status()) && !matches!(self, GatewayError::Pipeline(_))
    }
}

impl From<QueryError> for GatewayError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::MissingRequiredField(name) => GatewayError::MissingRequiredField(name),
            QueryError::DuplicateField(_) => GatewayError::Contract(err.to_string()),
        }
    }
}
