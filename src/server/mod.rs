//! HTTP server module for matchgate
//!
//! This module serves the match endpoints over HTTP with axum.
//!
//! # Architecture
//!
//! The server is organized into several submodules:
//!
//! - `protocol` - Response bodies (error envelope, system info)
//! - `query` - Raw path and query string parsing
//! - `handlers` - Route handler implementations
//!
//! Each [`Endpoint`] is registered once through [`MatchRoutes::register`],
//! which mounts the generic handler at `/match/v4` + `E::PATH`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use matchgate::server::{start_server, ServerConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! let config = ServerConfig::default().with_port(9000);
//! start_server(gateway, config, CancellationToken::new()).await?;
//! ```

pub mod handlers;
pub mod protocol;
pub mod query;

pub use handlers::HttpParams;
pub use protocol::{EndpointInfo, ErrorBody, ErrorData, SystemInfo};

use crate::config::MatchgateConfig;
use crate::gateway::{
    Endpoint, GetMatch, GetMatchByTournamentCode, GetMatchIdsByTournamentCode, GetMatchTimeline,
    GetMatchlist, MatchGateway,
};
use axum::body::Body;
use axum::http::Request;
use axum::{routing::get, Router as AxumRouter};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// Prefix shared by all match routes
pub const API_PREFIX: &str = "/match/v4";

// =============================================================================
// Server Configuration
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub address: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Take address and port from the loaded configuration
    pub fn from_config(config: &MatchgateConfig) -> Self {
        Self {
            address: config.address.clone(),
            port: config.port,
        }
    }

    /// Set the address
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Get the full bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

// =============================================================================
// Server State
// =============================================================================

/// Shared server state
#[derive(Clone)]
pub struct ServerState {
    /// Gateway serving every match route
    pub gateway: Arc<MatchGateway>,

    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl ServerState {
    pub fn new(gateway: MatchGateway, config: ServerConfig) -> Self {
        Self {
            gateway: Arc::new(gateway),
            config: Arc::new(config),
        }
    }
}

// =============================================================================
// Route Registration
// =============================================================================

/// Match routes under construction, plus what was registered
pub struct MatchRoutes {
    router: AxumRouter<ServerState>,
    endpoints: Vec<EndpointInfo>,
}

impl Default for MatchRoutes {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchRoutes {
    pub fn new() -> Self {
        Self {
            router: AxumRouter::new(),
            endpoints: Vec::new(),
        }
    }

    /// Mount the handler for endpoint `E`
    pub fn register<E>(mut self) -> Self
    where
        E: Endpoint,
        E::Params: HttpParams,
    {
        let path = format!("{}{}", API_PREFIX, E::PATH);
        self.router = self.router.route(&path, get(handlers::handle::<E>));
        self.endpoints.push(EndpointInfo {
            name: E::NAME,
            path,
        });
        self
    }

    pub fn endpoints(&self) -> &[EndpointInfo] {
        &self.endpoints
    }

    pub fn into_parts(self) -> (AxumRouter<ServerState>, Vec<EndpointInfo>) {
        (self.router, self.endpoints)
    }
}

/// Create the route table with every match endpoint registered
pub fn create_routes() -> MatchRoutes {
    MatchRoutes::new()
        .register::<GetMatch>()
        .register::<GetMatchByTournamentCode>()
        .register::<GetMatchIdsByTournamentCode>()
        .register::<GetMatchlist>()
        .register::<GetMatchTimeline>()
}

// =============================================================================
// Axum Router Creation
// =============================================================================

/// Create the Axum router for the HTTP server
pub fn create_axum_router(state: ServerState) -> AxumRouter {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        tracing::info_span!(
            "request",
            id = %Uuid::new_v4(),
            method = %request.method(),
            uri = %request.uri(),
        )
    });

    let (routes, endpoints) = create_routes().into_parts();
    let info = Arc::new(SystemInfo::new(
        state.gateway.registry().default_platform(),
        endpoints,
    ));

    routes
        .route("/health", get(handlers::health))
        .route(
            "/system/info",
            get(move || handlers::system_info(info.clone())),
        )
        .layer(trace)
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Server Startup
// =============================================================================

/// Start the HTTP server; returns once `shutdown` is cancelled and in-flight
/// requests have finished
pub async fn start_server(
    gateway: MatchGateway,
    config: ServerConfig,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let state = ServerState::new(gateway, config.clone());
    let app = create_axum_router(state);

    let bind_address = config.bind_address();
    tracing::info!("Starting HTTP server on {}", bind_address);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("HTTP server on {} stopped", bind_address);
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
