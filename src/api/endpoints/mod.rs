//! Endpoint handlers for the relay API.

pub mod analysis;
pub mod health;
