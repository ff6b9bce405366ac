//! Banker Protocol
//!
//! The text collaborators around the core: `input` turns the token stream into
//! a snapshot and a request, `report` turns an evaluation back into text.

pub mod input;
pub mod report;

pub use input::{decode_process_id, parse_input, InputError, ParseOptions, ParsedInput};
pub use report::{render_committed, render_outcome, render_report, render_request, render_state};
