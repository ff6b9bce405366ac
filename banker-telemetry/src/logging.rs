//! ## banker-telemetry::logging
//! **Structured logging with tracing**
//!
//! Log lines go to stderr; stdout carries only the evaluation report.

use opentelemetry::KeyValue;
use tracing::info_span;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global subscriber. `RUST_LOG` wins over `default_level`.
    /// Calling this twice is harmless; the second call is ignored.
    pub fn init(default_level: &str) {
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new(default_level)),
            )
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE)
            .try_init();
    }

    /// Emits one structured event inside an `evaluation_event` span.
    pub fn log_event(event_type: &str, metadata: Vec<KeyValue>) {
        let span = info_span!(
            "evaluation_event",
            event_type = event_type,
            otel.kind = "INTERNAL"
        );
        let _entered = span.enter();
        tracing::info!(metadata = ?metadata, "Evaluation event recorded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn test_logging() {
        EventLogger::log_event("evaluation_complete", vec![KeyValue::new("decision", "granted")]);
        assert!(logs_contain("Evaluation event recorded"));
        assert!(logs_contain("granted"));
    }
}
