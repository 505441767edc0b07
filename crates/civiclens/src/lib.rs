//! CivicLens core engine.
//!
//! Maps a citizen's administrative location (county, constituency, ward) to
//! the leaders whose jurisdiction covers it, aggregates one-per-citizen
//! ratings, and manages moderated two-level discussion threads. The engine is
//! transport-agnostic; the axum router in [`civics::router`] is a thin shell
//! over the same service calls.

pub mod civics;
pub mod config;
pub mod error;
pub mod telemetry;
