//! AirWatch API server library.
//!
//! Exposes config, state, error handling, auth, rendering and routes so the
//! binaries and the integration tests share one router.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod render;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
