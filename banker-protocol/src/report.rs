//! Report Renderer
//!
//! Formats the echoed snapshot, the echoed request and the decision messages.
//! The layout is fixed line for line: vectors are space separated with no
//! trailing space and each matrix row sits on its own line.

use std::fmt::Write;

use banker_core::{Decision, Evaluation, Request, ResourceState};

/// Echo of R, P, Available, Max and Allocation.
pub fn render_state(output: &mut String, state: &ResourceState) {
    let _ = writeln!(output, "R {}", state.resources());
    let _ = writeln!(output, "P {}", state.processes());
    let _ = writeln!(output, "Available");
    let _ = writeln!(output, "{}", state.available());
    let _ = writeln!(output, "Max");
    let _ = write!(output, "{}", state.max());
    let _ = writeln!(output, "Allocation");
    let _ = write!(output, "{}", state.allocation());
}

/// `<label> <unit> <unit> ...`
pub fn render_request(output: &mut String, label: &str, request: &Request) {
    output.push_str(label);
    for units in request.units.iter() {
        let _ = write!(output, " {units}");
    }
    output.push('\n');
}

/// The decision messages for one evaluation.
pub fn render_outcome(output: &mut String, label: &str, evaluation: &Evaluation) {
    if evaluation.decision == Decision::UnsafeCurrentState {
        let _ = writeln!(output, "The current system is in unsafe state.");
        return;
    }

    let _ = writeln!(
        output,
        "Before granting the request of {label}, the system is in safe state."
    );

    if evaluation.decision == Decision::ExceedsLimits {
        let _ = writeln!(output, "{label}'s request cannot be granted.");
        return;
    }

    let _ = writeln!(output, "Simulating granting {label}'s request.");
    let _ = writeln!(output, "New Need");
    if let Some(hypothetical) = &evaluation.hypothetical {
        let _ = write!(output, "{}", hypothetical.need());
    }

    if evaluation.decision == Decision::Granted {
        let _ = writeln!(
            output,
            "{label}'s request can be granted. The system will be in safe state."
        );
    } else {
        let _ = writeln!(
            output,
            "{label}'s request cannot be granted. The system will be in unsafe state."
        );
    }
}

/// Trailer printed after a grant has been committed.
pub fn render_committed(output: &mut String, state: &ResourceState) {
    let _ = writeln!(output, "Committed State");
    let _ = writeln!(output, "Available");
    let _ = writeln!(output, "{}", state.available());
    let _ = writeln!(output, "Allocation");
    let _ = write!(output, "{}", state.allocation());
}

/// The full report: state echo, request echo, decision messages.
pub fn render_report(
    state: &ResourceState,
    label: &str,
    request: &Request,
    evaluation: &Evaluation,
) -> String {
    let mut output = String::new();
    render_state(&mut output, state);
    render_request(&mut output, label, request);
    render_outcome(&mut output, label, evaluation);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::tests::TEXTBOOK;
    use crate::input::{parse_input, ParseOptions};
    use banker_core::RequestEvaluator;

    const ECHO: &str = "R 3\nP 5\nAvailable\n3 3 2\nMax\n7 5 3\n3 2 2\n9 0 2\n2 2 2\n4 3 3\nAllocation\n0 1 0\n2 0 0\n3 0 2\n2 1 1\n0 0 2\n";

    fn report_for(source: &str) -> String {
        let parsed = parse_input(source, &ParseOptions::default()).unwrap();
        let evaluation = RequestEvaluator::new()
            .evaluate(&parsed.state, &parsed.request)
            .unwrap();
        render_report(
            &parsed.state,
            &parsed.process_label,
            &parsed.request,
            &evaluation,
        )
    }

    #[test]
    fn granted_report_matches_expected_text() {
        let expected = format!(
            "{ECHO}P1 1 0 2\n\
             Before granting the request of P1, the system is in safe state.\n\
             Simulating granting P1's request.\n\
             New Need\n\
             7 4 3\n0 2 0\n6 0 0\n0 1 1\n4 3 1\n\
             P1's request can be granted. The system will be in safe state.\n"
        );
        assert_eq!(report_for(TEXTBOOK), expected);
    }

    #[test]
    fn would_be_unsafe_report_shows_new_need() {
        let report = report_for(&TEXTBOOK.replace("P1 1 0 2", "P0 1 0 2"));
        assert!(report.ends_with(
            "New Need\n6 4 1\n1 2 2\n6 0 0\n0 1 1\n4 3 1\n\
             P0's request cannot be granted. The system will be in unsafe state.\n"
        ));
    }

    #[test]
    fn exceeds_limits_report_stops_after_rejection() {
        let report = report_for(&TEXTBOOK.replace("P1 1 0 2", "P3 0 2 0"));
        assert!(report.ends_with(
            "P3 0 2 0\n\
             Before granting the request of P3, the system is in safe state.\n\
             P3's request cannot be granted.\n"
        ));
        assert!(!report.contains("New Need"));
    }

    #[test]
    fn unsafe_current_state_report() {
        let source = "R 2 P 2 Available 1 0 Max 3 1 2 2 Allocation 1 0 0 1 P0 0 0";
        let report = report_for(source);
        assert_eq!(
            report,
            "R 2\nP 2\nAvailable\n1 0\nMax\n3 1\n2 2\nAllocation\n1 0\n0 1\nP0 0 0\n\
             The current system is in unsafe state.\n"
        );
    }

    #[test]
    fn committed_trailer_lists_available_and_allocation() {
        let parsed = parse_input(TEXTBOOK, &ParseOptions::default()).unwrap();
        let mut canonical = parsed.state.clone();
        let evaluation = RequestEvaluator::new()
            .evaluate(&canonical, &parsed.request)
            .unwrap();
        assert!(evaluation.commit(&mut canonical));

        let mut output = String::new();
        render_committed(&mut output, &canonical);
        assert_eq!(
            output,
            "Committed State\nAvailable\n2 3 0\nAllocation\n0 1 0\n3 0 2\n3 0 2\n2 1 1\n0 0 2\n"
        );
    }
}
