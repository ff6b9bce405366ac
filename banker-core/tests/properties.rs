use proptest::prelude::*;

use banker_core::{Decision, Request, RequestEvaluator, ResourceState, ResourceVector, SafetyChecker};

/// Well-formed states: allocation never exceeds max.
fn state_strategy() -> impl Strategy<Value = ResourceState> {
    (0usize..7, 1usize..5).prop_flat_map(|(processes, resources)| {
        let available = prop::collection::vec(0u64..8, resources);
        let rows = prop::collection::vec(
            prop::collection::vec((0u64..8, 0u64..8), resources),
            processes,
        );
        (available, rows).prop_map(|(available, rows)| {
            let (max, allocation): (Vec<_>, Vec<_>) = rows
                .into_iter()
                .map(|row| {
                    let max: Vec<u64> = row.iter().map(|(a, b)| a.max(b)).copied().collect();
                    let alloc: Vec<u64> = row.iter().map(|(a, b)| a.min(b)).copied().collect();
                    (ResourceVector::new(max), ResourceVector::new(alloc))
                })
                .unzip();
            ResourceState::new(ResourceVector::new(available), max, allocation).unwrap()
        })
    })
}

fn state_with_order() -> impl Strategy<Value = (ResourceState, Vec<usize>)> {
    state_strategy().prop_flat_map(|state| {
        let order = Just((0..state.processes()).collect::<Vec<_>>()).prop_shuffle();
        (Just(state), order)
    })
}

fn state_with_request() -> impl Strategy<Value = (ResourceState, Request)> {
    state_strategy()
        .prop_filter("needs at least one process", |s| s.processes() > 0)
        .prop_flat_map(|state| {
            let process = 0..state.processes();
            let units = prop::collection::vec(0u64..10, state.resources());
            (Just(state), process, units).prop_map(|(state, process, units)| {
                (state, Request::new(process, ResourceVector::new(units)))
            })
        })
}

proptest! {
    #[test]
    fn need_is_always_max_minus_allocation(state in state_strategy()) {
        for i in 0..state.processes() {
            for j in 0..state.resources() {
                prop_assert_eq!(state.need()[i][j], state.max()[i][j] - state.allocation()[i][j]);
            }
        }
    }

    #[test]
    fn safety_does_not_depend_on_scan_order((state, order) in state_with_order()) {
        let checker = SafetyChecker::new(state.max());
        let ascending = checker.is_safe(state.available(), state.allocation());
        let permuted = checker
            .safe_sequence_in_order(state.available(), state.allocation(), &order)
            .is_some();
        prop_assert_eq!(ascending, permuted);
    }

    #[test]
    fn safety_check_is_idempotent(state in state_strategy()) {
        let work = state.available().clone();
        let allocation = state.allocation().clone();
        let checker = SafetyChecker::new(state.max());
        let first = checker.safe_sequence(&work, &allocation);
        let second = checker.safe_sequence(&work, &allocation);
        prop_assert_eq!(first, second);
        prop_assert_eq!(&work, state.available());
        prop_assert_eq!(&allocation, state.allocation());
    }

    #[test]
    fn more_work_never_makes_a_safe_state_unsafe(
        state in state_strategy(),
        extra in prop::collection::vec(0u64..4, 4),
    ) {
        let checker = SafetyChecker::new(state.max());
        let mut richer = state.available().clone();
        let extra = ResourceVector::new(extra[..state.resources()].to_vec());
        richer.saturating_add_assign(&extra);

        if checker.is_safe(state.available(), state.allocation()) {
            prop_assert!(checker.is_safe(&richer, state.allocation()));
        }
        for i in 0..state.processes() {
            if state.need()[i].fits_within(state.available()) {
                prop_assert!(state.need()[i].fits_within(&richer));
            }
        }
    }

    #[test]
    fn unsafe_current_state_gates_every_request((state, request) in state_with_request()) {
        let checker = SafetyChecker::new(state.max());
        let evaluation = RequestEvaluator::new().evaluate(&state, &request).unwrap();
        if !checker.is_safe(state.available(), state.allocation()) {
            prop_assert_eq!(evaluation.decision, Decision::UnsafeCurrentState);
            let zero = Request::new(request.process, ResourceVector::zeros(state.resources()));
            let evaluation = RequestEvaluator::new().evaluate(&state, &zero).unwrap();
            prop_assert_eq!(evaluation.decision, Decision::UnsafeCurrentState);
        }
    }

    #[test]
    fn requests_over_need_or_available_are_rejected((state, request) in state_with_request()) {
        let evaluation = RequestEvaluator::new().evaluate(&state, &request).unwrap();
        if evaluation.decision == Decision::UnsafeCurrentState {
            return Ok(());
        }
        let over_need = !request.units.fits_within(&state.need()[request.process]);
        let over_available = !request.units.fits_within(state.available());
        if over_need || over_available {
            prop_assert_eq!(evaluation.decision, Decision::ExceedsLimits);
            let limits = evaluation.limits.unwrap();
            prop_assert_eq!(limits.exceeds_need, over_need);
            prop_assert_eq!(limits.exceeds_available, over_available);
        } else {
            prop_assert_ne!(evaluation.decision, Decision::ExceedsLimits);
        }
    }

    #[test]
    fn hypothetical_state_keeps_need_consistent((state, request) in state_with_request()) {
        let original = state.clone();
        let evaluation = RequestEvaluator::new().evaluate(&state, &request).unwrap();
        prop_assert_eq!(&state, &original);

        if let Some(hypothetical) = evaluation.hypothetical {
            for i in 0..hypothetical.processes() {
                for j in 0..hypothetical.resources() {
                    prop_assert_eq!(
                        hypothetical.need()[i][j],
                        hypothetical.max()[i][j] - hypothetical.allocation()[i][j]
                    );
                }
            }
            for j in 0..state.resources() {
                prop_assert_eq!(
                    hypothetical.available()[j] + request.units[j],
                    state.available()[j]
                );
            }
        }
    }
}
