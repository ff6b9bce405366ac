//! # Banker Telemetry
//!
//! Crate for logging and metrics around request evaluations.

pub mod logging;
pub mod metrics;

pub use logging::EventLogger;
pub use metrics::MetricsRecorder;
