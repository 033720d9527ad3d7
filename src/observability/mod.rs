//! # Observability
//!
//! Structured logging via the `tracing` ecosystem. Library code only emits
//! events; installing a subscriber is left to the embedding process.

pub mod logging;

pub use logging::init_logging;
