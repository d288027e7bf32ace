//! Relay HTTP layer.
//!
//! Exposes the analysis pipeline to the dashboard. Routes are nested
//! under `/api/` with permissive CORS, since the dashboard is served
//! from a different origin.
//!
//! The router is composable: `relay_router()` returns a `Router` that
//! can be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use router::relay_router;
pub use server::serve;
pub use types::ApiContext;
