//! Baseline Relay, a thin server between the dashboard and the
//! assistant service.
//!
//! The dashboard posts its health and calendar data; the relay turns
//! it into a text briefing, drives an assistant run over it, and maps
//! the reply onto the fixed dashboard contract. When anything goes
//! wrong it serves a deterministic cached result instead of an error.

pub mod analysis;
pub mod api;
pub mod assistant;
pub mod briefing;
pub mod config;
pub mod dashboard;
pub mod reply;
