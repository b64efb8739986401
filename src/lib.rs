#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! Matchgate - a gateway for match-v4 endpoints
//!
//! Matchgate validates the caller's platform, turns endpoint parameters into a
//! [`QueryDescriptor`] and asks a [`RetrievalPipeline`] for one statically
//! typed result. It can be used as a library, as an HTTP server, or from the
//! command line.
//!
//! # Feature Flags
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | (core) | Platform resolver, descriptor builder, gateway | `serde`, `thiserror` |
//! | `upstream` | HTTPS pipeline against the platform API hosts | `ureq`, `url` |
//! | `server` | axum routes for the match endpoints | `axum`, `tower-http` |
//! | `cli` | `matchgate` binary with server and upstream support | All above + `clap` |
//!
//! ```toml
//! # Core only - bring your own retrieval pipeline
//! matchgate = { version = "0.1", default-features = false }
//!
//! # Default (CLI binary)
//! matchgate = "0.1"
//! ```
//!
//! # Architecture
//!
//! - **[`platform`]**: platform tags and the resolver used by every endpoint
//! - **[`query`]**: ordered, immutable query descriptors built from field specs
//! - **[`pipeline`]**: the retrieval seam and its typed result kinds
//! - **[`gateway`]**: endpoint definitions and the dispatching [`MatchGateway`]
//! - **[`error`]**: the [`GatewayError`] taxonomy
//! - **[`config`]**: configuration management
//! - **`server`**: HTTP routes (requires `server`)
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use matchgate::{MatchGateway, MatchlistParams, StaticPlatformRegistry, Platform};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(StaticPlatformRegistry::with_default(Platform::NorthAmerica));
//! let gateway = MatchGateway::new(registry, Arc::new(my_pipeline));
//!
//! let params = MatchlistParams::new("ABC").with_queues([400, 420]).with_platform("EUW1");
//! let matchlist = gateway.get_matchlist(params).await?;
//! println!("{} games", matchlist.matches().len());
//! ```

pub mod config;
pub mod error;
pub mod gateway;
pub mod pipeline;
pub mod platform;
pub mod query;

// Server module - requires server feature
#[cfg(feature = "server")]
pub mod server;

// =============================================================================
// Configuration (always available)
// =============================================================================

pub use config::MatchgateConfig;

// =============================================================================
// Core types
// =============================================================================

pub use error::{ErrorCode, GatewayError, GatewayResult};
pub use platform::{resolve_platform, Platform, PlatformRegistry, StaticPlatformRegistry};
pub use query::{FieldSpec, QueryDescriptor, QueryValue};

pub use pipeline::{PipelineError, PipelineResult, ResultKind, RetrievalPipeline};

pub use gateway::{
    Endpoint, Match, MatchGateway, MatchParams, MatchReference, MatchTimeline, Matchlist,
    MatchlistParams, TournamentCodeParams, TournamentMatchParams, TournamentMatches,
};

// =============================================================================
// Server Module - requires "server" feature
// =============================================================================

#[cfg(feature = "server")]
pub use server::{create_axum_router, start_server, ServerConfig, ServerState};
