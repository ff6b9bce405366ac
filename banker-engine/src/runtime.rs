// banker-engine/src/runtime.rs

/*!
# Runtime Engine

Entry points shared by every frontend.

The canonical `ResourceState` is owned by the run that parsed it. It changes
only when the configuration asks for grants to be committed and the decision is
`Granted`; otherwise the report describes a state that is left exactly as it
was read.
*/

use std::path::Path;
use std::time::Instant;

use opentelemetry::KeyValue;
use tracing::{error, info, instrument, warn};

use banker_config::{BankerConfig, EvaluatorConfig};
use banker_core::{derive_need, Decision, Request, RequestEvaluator, ResourceState, SafetyChecker};
use banker_protocol::{parse_input, render_committed, render_report, ParseOptions};
use banker_simulator::{Scenario, StateGenerator};
use banker_telemetry::{EventLogger, MetricsRecorder};

use crate::error::EngineError;

/// Result of one evaluation run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// The full text report, ready for stdout.
    pub output: String,
    pub decision: Decision,
    /// The canonical state after the run.
    pub canonical: ResourceState,
    pub committed: bool,
    /// BLAKE3 digest of `canonical`, hex encoded.
    pub state_hash: String,
}

/// Decision tallies from a fuzz run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FuzzSummary {
    pub iterations: usize,
    pub unsafe_current_state: usize,
    pub exceeds_limits: usize,
    pub would_be_unsafe: usize,
    pub granted: usize,
}

impl FuzzSummary {
    fn record(&mut self, decision: Decision) {
        self.iterations += 1;
        match decision {
            Decision::UnsafeCurrentState => self.unsafe_current_state += 1,
            Decision::ExceedsLimits => self.exceeds_limits += 1,
            Decision::WouldBeUnsafe => self.would_be_unsafe += 1,
            Decision::Granted => self.granted += 1,
        }
    }
}

fn parse_options(config: &EvaluatorConfig) -> ParseOptions {
    ParseOptions {
        process_prefix: config.process_prefix.clone(),
        max_processes: config.max_processes,
        max_resources: config.max_resources,
    }
}

/// Evaluates the request contained in `input` text.
///
/// Nothing is written anywhere; on error the caller gets no partial report.
#[instrument(level = "info", name = "run_evaluation", skip_all)]
pub fn run_evaluation(
    input: &str,
    config: &BankerConfig,
    metrics: &MetricsRecorder,
) -> Result<RunReport, EngineError> {
    let parsed = parse_input(input, &parse_options(&config.evaluator))?;
    evaluate_and_render(
        parsed.state,
        &parsed.process_label,
        &parsed.request,
        config,
        metrics,
    )
}

/// Evaluates a YAML scenario and checks its `expect` decision, if any.
#[instrument(level = "info", name = "run_scenario", skip(config, metrics))]
pub fn run_scenario<P: AsRef<Path> + std::fmt::Debug>(
    path: P,
    config: &BankerConfig,
    metrics: &MetricsRecorder,
) -> Result<RunReport, EngineError> {
    let scenario = Scenario::load_from_file(&path)?;
    let state = scenario.state()?;
    let label = format!(
        "{}{}",
        config.evaluator.process_prefix, scenario.request.process
    );

    let report = evaluate_and_render(state, &label, &scenario.request, config, metrics)?;

    if let Some(expected) = scenario.expect {
        if expected != report.decision {
            warn!(%expected, actual = %report.decision, "scenario expectation not met");
            return Err(EngineError::UnexpectedDecision {
                expected,
                actual: report.decision,
            });
        }
    }
    Ok(report)
}

fn evaluate_and_render(
    mut canonical: ResourceState,
    label: &str,
    request: &Request,
    config: &BankerConfig,
    metrics: &MetricsRecorder,
) -> Result<RunReport, EngineError> {
    let started = Instant::now();
    let evaluation = RequestEvaluator::new().evaluate(&canonical, request)?;
    metrics.record_decision(evaluation.decision, started.elapsed().as_nanos() as f64);

    let decision = evaluation.decision;
    let mut output = render_report(&canonical, label, request, &evaluation);

    let committed = config.evaluator.commit_on_grant && evaluation.commit(&mut canonical);
    if committed {
        info!(process = request.process, "grant committed to canonical state");
        render_committed(&mut output, &canonical);
    }

    let state_hash = state_hash(&canonical);
    EventLogger::log_event(
        "evaluation_complete",
        vec![
            KeyValue::new("process", label.to_string()),
            KeyValue::new("decision", decision.as_str()),
            KeyValue::new("committed", committed),
            KeyValue::new("state_hash", state_hash.clone()),
        ],
    );

    Ok(RunReport {
        output,
        decision,
        canonical,
        committed,
        state_hash,
    })
}

/// BLAKE3 digest over the dimensions, Available, Max and Allocation.
pub fn state_hash(state: &ResourceState) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&(state.resources() as u64).to_le_bytes());
    hasher.update(&(state.processes() as u64).to_le_bytes());
    for units in state.available().iter() {
        hasher.update(&units.to_le_bytes());
    }
    for matrix in [state.max(), state.allocation()] {
        for row in matrix.rows() {
            for units in row.iter() {
                hasher.update(&units.to_le_bytes());
            }
        }
    }
    hex::encode(hasher.finalize().as_bytes())
}

/// Compares a run's final state hash against a recorded one.
pub fn verify_state_hash(report: &RunReport, expected: &str) -> Result<(), EngineError> {
    if report.state_hash.eq_ignore_ascii_case(expected) {
        Ok(())
    } else {
        error!(expected, actual = %report.state_hash, "state hash mismatch");
        Err(EngineError::HashMismatch {
            expected: expected.to_string(),
            actual: report.state_hash.clone(),
        })
    }
}

/// Evaluates `iterations` generated snapshots, cross-checking that the safety
/// answer does not depend on scan order, that evaluation leaves its input
/// untouched, and that every hypothetical state has a consistent Need.
///
/// Iteration `i` uses seed `seed + i`, so any failure can be replayed alone.
#[instrument(level = "info", name = "run_fuzz_mode", skip(metrics))]
pub fn run_fuzz_mode(
    seed: u64,
    iterations: usize,
    processes: usize,
    resources: usize,
    metrics: &MetricsRecorder,
) -> Result<FuzzSummary, EngineError> {
    if processes == 0 {
        return Err(EngineError::InvalidArgument(
            "fuzzing needs at least one process".into(),
        ));
    }

    let evaluator = RequestEvaluator::new();
    let mut summary = FuzzSummary::default();

    for i in 0..iterations {
        let iteration_seed = seed.wrapping_add(i as u64);
        let mut generator = StateGenerator::new(iteration_seed);
        let state = generator.state(processes, resources);
        let request = generator.request(&state);
        let fail = |detail: String| {
            let scenario = Scenario::from_parts(&state, request.clone())
                .to_yaml()
                .unwrap_or_default();
            error!(seed = iteration_seed, %detail, %scenario, "fuzz iteration failed");
            EngineError::Determinism {
                seed: iteration_seed,
                detail,
            }
        };

        let checker = SafetyChecker::new(state.max());
        let ascending = checker.is_safe(state.available(), state.allocation());
        let reversed: Vec<usize> = (0..processes).rev().collect();
        let shuffled = generator.scan_order(processes);
        for order in [reversed, shuffled] {
            let permuted = checker
                .safe_sequence_in_order(state.available(), state.allocation(), &order)
                .is_some();
            if permuted != ascending {
                return Err(fail(format!(
                    "scan order {order:?} says safe={permuted}, ascending says safe={ascending}"
                )));
            }
        }

        let before = state.clone();
        let started = Instant::now();
        let evaluation = evaluator.evaluate(&state, &request)?;
        metrics.record_decision(evaluation.decision, started.elapsed().as_nanos() as f64);
        if state != before {
            return Err(fail("evaluation modified its input state".into()));
        }

        let expect_pre_check = if ascending {
            evaluation.decision != Decision::UnsafeCurrentState
        } else {
            evaluation.decision == Decision::UnsafeCurrentState
        };
        if !expect_pre_check {
            return Err(fail(format!(
                "pre-check disagrees with the safety checker: {}",
                evaluation.decision
            )));
        }

        if let Some(hypothetical) = &evaluation.hypothetical {
            let need = derive_need(hypothetical.max(), hypothetical.allocation())?;
            if &need != hypothetical.need() {
                return Err(fail("hypothetical need is not max minus allocation".into()));
            }
        }

        summary.record(evaluation.decision);
    }

    info!(
        iterations = summary.iterations,
        granted = summary.granted,
        would_be_unsafe = summary.would_be_unsafe,
        exceeds_limits = summary.exceeds_limits,
        unsafe_current_state = summary.unsafe_current_state,
        "fuzzing complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn state_hash_tracks_allocation() {
        let a = StateGenerator::new(1).state(4, 3);
        let b = a.clone();
        assert_eq!(state_hash(&a), state_hash(&b));
        assert_eq!(state_hash(&a).len(), 64);

        let c = StateGenerator::new(2).state(4, 3);
        if c != a {
            assert_ne!(state_hash(&a), state_hash(&c));
        }
    }

    #[traced_test]
    #[test]
    fn fuzz_mode_sees_every_kind_of_decision() {
        let metrics = MetricsRecorder::new();
        let summary = run_fuzz_mode(0, 300, 5, 3, &metrics).unwrap();

        assert_eq!(summary.iterations, 300);
        assert_eq!(metrics.evaluations.get(), 300);
        assert!(summary.granted > 0);
        assert!(summary.exceeds_limits > 0);
        assert!(summary.unsafe_current_state > 0);
        assert!(logs_contain("fuzzing complete"));
    }

    #[test]
    fn fuzz_mode_needs_processes() {
        let metrics = MetricsRecorder::new();
        assert!(matches!(
            run_fuzz_mode(0, 1, 0, 3, &metrics),
            Err(EngineError::InvalidArgument(_))
        ));
    }
}
