//! ## banker-telemetry::metrics
//! **Prometheus counters for evaluations**

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry};

use banker_core::Decision;

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub evaluations: IntCounter,
    pub decisions: IntCounterVec,
    pub safety_check_latency: Histogram,
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRecorder {
    pub fn new() -> Self {
        let registry = Registry::new();
        let evaluations = IntCounter::new("banker_evaluations_total", "Total request evaluations")
            .expect("static metric definition");

        let decisions = IntCounterVec::new(
            Opts::new("banker_decisions_total", "Evaluations by decision"),
            &["decision"],
        )
        .expect("static metric definition");

        let safety_check_latency = Histogram::with_opts(
            HistogramOpts::new(
                "banker_safety_check_duration_ns",
                "Time spent evaluating one request",
            )
            .buckets(vec![1_000.0, 10_000.0, 100_000.0, 1_000_000.0, 10_000_000.0]),
        )
        .expect("static metric definition");

        registry
            .register(Box::new(evaluations.clone()))
            .expect("fresh registry");
        registry
            .register(Box::new(decisions.clone()))
            .expect("fresh registry");
        registry
            .register(Box::new(safety_check_latency.clone()))
            .expect("fresh registry");

        // Pre-create every label so the exposition lists zeros too.
        for decision in Decision::ALL {
            decisions.with_label_values(&[decision.as_str()]);
        }

        Self {
            registry,
            evaluations,
            decisions,
            safety_check_latency,
        }
    }

    pub fn record_decision(&self, decision: Decision, elapsed_ns: f64) {
        self.evaluations.inc();
        self.decisions.with_label_values(&[decision.as_str()]).inc();
        self.safety_check_latency.observe(elapsed_ns);
    }

    pub fn decision_count(&self, decision: Decision) -> u64 {
        self.decisions.with_label_values(&[decision.as_str()]).get()
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
