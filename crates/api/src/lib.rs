//! Persistence bridge server library.
//!
//! Exposes config, state, error handling, handlers and routes so the
//! binary entrypoint and integration tests build the exact same app.

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
