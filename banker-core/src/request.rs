//! ## banker-core::request
//! **Resource-request algorithm**
//!
//! One evaluation runs four steps in a fixed order: pre-check the current
//! state, check the request against Need and Available, build the hypothetical
//! post-grant state, post-check it. Nothing here mutates the caller's state; a
//! grant only becomes canonical through [`Evaluation::commit`].

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::StateError;
use crate::safety::SafetyChecker;
use crate::state::ResourceState;
use crate::vector::ResourceVector;

/// A pending request for additional units from one process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub process: usize,
    pub units: ResourceVector,
}

impl Request {
    pub fn new(process: usize, units: ResourceVector) -> Self {
        Self { process, units }
    }

    /// Input validation that must pass before the request algorithm runs.
    pub fn validate(&self, state: &ResourceState) -> Result<(), StateError> {
        if self.process >= state.processes() {
            return Err(StateError::InvalidProcessId {
                index: self.process,
                processes: state.processes(),
            });
        }
        self.units.expect_len("request vector", state.resources())
    }
}

/// Outcome of one request evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// The state before the request is already unsafe; the request was not examined.
    UnsafeCurrentState,
    /// The request asks for more than the process's remaining need or more than is available.
    ExceedsLimits,
    /// Granting would leave the system in an unsafe state.
    WouldBeUnsafe,
    /// Granting keeps the system safe.
    Granted,
}

impl Decision {
    pub const ALL: [Decision; 4] = [
        Decision::UnsafeCurrentState,
        Decision::ExceedsLimits,
        Decision::WouldBeUnsafe,
        Decision::Granted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::UnsafeCurrentState => "unsafe_current_state",
            Decision::ExceedsLimits => "exceeds_limits",
            Decision::WouldBeUnsafe => "would_be_unsafe",
            Decision::Granted => "granted",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which bounds a request violated. Both are always computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LimitCheck {
    pub exceeds_need: bool,
    pub exceeds_available: bool,
}

impl LimitCheck {
    pub fn of(state: &ResourceState, request: &Request) -> Self {
        Self {
            exceeds_need: !request.units.fits_within(&state.need()[request.process]),
            exceeds_available: !request.units.fits_within(state.available()),
        }
    }

    pub fn passed(&self) -> bool {
        !self.exceeds_need && !self.exceeds_available
    }
}

/// Everything one evaluation found out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub decision: Decision,
    /// `None` when the pre-check failed and the bounds were never examined.
    pub limits: Option<LimitCheck>,
    /// Completion order proving the current state safe.
    pub current_sequence: Option<Vec<usize>>,
    /// The post-grant state; present for `Granted` and `WouldBeUnsafe`.
    pub hypothetical: Option<ResourceState>,
    /// Completion order proving the post-grant state safe; present for `Granted`.
    pub hypothetical_sequence: Option<Vec<usize>>,
}

impl Evaluation {
    pub fn is_granted(&self) -> bool {
        self.decision == Decision::Granted
    }

    /// Replaces `canonical` with the post-grant state if the request was
    /// granted. Returns whether anything changed.
    pub fn commit(self, canonical: &mut ResourceState) -> bool {
        match (self.decision, self.hypothetical) {
            (Decision::Granted, Some(granted)) => {
                *canonical = granted;
                true
            }
            _ => false,
        }
    }
}

/// Runs the request algorithm against a borrowed state.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestEvaluator;

impl RequestEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluates `request` against `state`.
    ///
    /// The only errors are validation failures (bad process index, wrong
    /// request length). Past validation the algorithm is total.
    pub fn evaluate(
        &self,
        state: &ResourceState,
        request: &Request,
    ) -> Result<Evaluation, StateError> {
        request.validate(state)?;
        let checker = SafetyChecker::new(state.max());

        let Some(current_sequence) = checker.safe_sequence(state.available(), state.allocation())
        else {
            info!(process = request.process, "current state is unsafe");
            return Ok(Evaluation {
                decision: Decision::UnsafeCurrentState,
                limits: None,
                current_sequence: None,
                hypothetical: None,
                hypothetical_sequence: None,
            });
        };

        let limits = LimitCheck::of(state, request);
        if !limits.passed() {
            info!(
                process = request.process,
                exceeds_need = limits.exceeds_need,
                exceeds_available = limits.exceeds_available,
                "request exceeds limits"
            );
            return Ok(Evaluation {
                decision: Decision::ExceedsLimits,
                limits: Some(limits),
                current_sequence: Some(current_sequence),
                hypothetical: None,
                hypothetical_sequence: None,
            });
        }

        // Bounds passed, so this cannot fail.
        let hypothetical = state.with_request(request.process, &request.units)?;
        debug!(
            process = request.process,
            available = %hypothetical.available(),
            "built hypothetical state"
        );

        let hypothetical_sequence =
            checker.safe_sequence(hypothetical.available(), hypothetical.allocation());
        let decision = if hypothetical_sequence.is_some() {
            Decision::Granted
        } else {
            Decision::WouldBeUnsafe
        };
        info!(process = request.process, %decision, "request evaluated");

        Ok(Evaluation {
            decision,
            limits: Some(limits),
            current_sequence: Some(current_sequence),
            hypothetical: Some(hypothetical),
            hypothetical_sequence,
        })
    }
}
