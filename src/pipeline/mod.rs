//! Retrieval pipeline seam
//!
//! The gateway never performs I/O itself. It hands a [`ResultKind`] and a
//! [`QueryDescriptor`] to a [`RetrievalPipeline`], which owns transport,
//! caching and rate limiting. Failures come back as a classified
//! [`PipelineError`] that the gateway propagates without reinterpretation.
//!
//! # Implementations
//!
//! - [`upstream::UpstreamPipeline`] (feature `upstream`): one HTTPS request per
//!   fetch against the platform's API host.
//! - Tests use small in-memory pipelines that record what they were asked for.

#[cfg(test)]
pub(crate) mod testing;
#[cfg(feature = "upstream")]
pub mod upstream;

use crate::error::ErrorCode;
use crate::query::QueryDescriptor;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

// =============================================================================
// Result kinds
// =============================================================================

/// The closed set of results the pipeline can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultKind {
    Match,
    Matchlist,
    MatchTimeline,
    TournamentMatches,
}

impl ResultKind {
    pub fn name(&self) -> &'static str {
        match self {
            ResultKind::Match => "Match",
            ResultKind::Matchlist => "Matchlist",
            ResultKind::MatchTimeline => "MatchTimeline",
            ResultKind::TournamentMatches => "TournamentMatches",
        }
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A typed pipeline result, statically bound to one [`ResultKind`]
pub trait PipelineResult: DeserializeOwned + Serialize + Send + 'static {
    const KIND: ResultKind;
}

// =============================================================================
// Errors
// =============================================================================

/// Classified pipeline failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("request timed out")]
    Timeout,

    #[error("request was cancelled")]
    Cancelled,

    #[error("upstream returned status {status}")]
    Upstream { status: u16 },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to decode result: {0}")]
    Decode(String),

    #[error("query cannot be served: {0}")]
    InvalidQuery(String),
}

impl PipelineError {
    pub fn code(&self) -> ErrorCode {
        match self {
            PipelineError::NotFound(_) => ErrorCode::NotFound,
            PipelineError::RateLimited => ErrorCode::RateLimited,
            PipelineError::Timeout => ErrorCode::Timeout,
            PipelineError::Cancelled => ErrorCode::Cancelled,
            PipelineError::Upstream { .. }
            | PipelineError::Transport(_)
            | PipelineError::Decode(_) => ErrorCode::UpstreamError,
            PipelineError::InvalidQuery(_) => ErrorCode::InternalError,
        }
    }
}

// =============================================================================
// Pipeline trait
// =============================================================================

/// Performs the actual retrieval for a (kind, descriptor) pair
#[async_trait]
pub trait RetrievalPipeline: Send + Sync {
    /// Fetch the raw result of `kind` described by `query`
    async fn fetch(&self, kind: ResultKind, query: &QueryDescriptor)
        -> Result<Value, PipelineError>;
}

/// Fetch `T::KIND` and decode it into `T`
pub async fn get<T: PipelineResult>(
    pipeline: &dyn RetrievalPipeline,
    query: &QueryDescriptor,
) -> Result<T, PipelineError> {
    let raw = pipeline.fetch(T::KIND, query).await?;
    serde_json::from_value(raw).map_err(|e| PipelineError::Decode(e.to_string()))
}

// =============================================================================
// Tests
// =============================================================================
