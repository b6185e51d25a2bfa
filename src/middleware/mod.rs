//! Middleware del sistema
//!
//! Sesión por request y CORS.

pub mod auth;
pub mod cors;

pub use auth::session_middleware;
pub use cors::cors_layer;
