//! System handlers
//!
//! `/health` for liveness checks and `/system/info` so clients can discover
//! the server version, default platform and registered routes.

use crate::server::protocol::SystemInfo;
use axum::Json;
use std::sync::Arc;

/// Health check handler
pub async fn health() -> &'static str {
    "OK"
}

/// System info handler
pub async fn system_info(info: Arc<SystemInfo>) -> Json<SystemInfo> {
    Json(info.as_ref().clone())
}
