//! HTTP route handlers
//!
//! - `matches` - the generic match endpoint handler and request parsing
//! - `system` - health check and system info

pub mod matches;
pub mod system;

pub use matches::{handle, HttpParams};
pub use system::{health, system_info};
