//! Input Parser
//!
//! Reads one snapshot and one request from a whitespace separated token
//! stream:
//!
//!   R <resources>
//!   P <processes>
//!   Available <resources numbers>
//!   Max <processes * resources numbers, row-major>
//!   Allocation <processes * resources numbers, row-major>
//!   <process id> <resources numbers>
//!
//! Labels match case-insensitively. Every number is an unsigned decimal. A
//! process id is the configured prefix followed by a decimal index (`P12`), or
//! a bare index (`12`).
//!
//! This parser uses nom version 8; each token is parsed by a small combinator
//! and a failure is reported with the byte offset where it happened.

use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while1},
    character::complete::{digit1, multispace0, multispace1},
    combinator::{eof, map_res, peek},
    sequence::{delimited, preceded, terminated},
    IResult, Parser,
};
use thiserror::Error;
use tracing::debug;

use banker_core::{Request, ResourceState, ResourceVector, StateError};

/// Errors raised while turning input text into a snapshot and a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("malformed input at byte {offset}: expected {expected}, found {found}")]
    Malformed {
        offset: usize,
        expected: String,
        found: String,
    },

    #[error("{what} of {value} exceeds the configured limit of {limit}")]
    DimensionLimit {
        what: &'static str,
        value: usize,
        limit: usize,
    },

    #[error(transparent)]
    State(#[from] StateError),
}

/// Knobs for the parser that come from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Alphabetic prefix of process identifiers. Empty means bare indices only.
    pub process_prefix: String,
    pub max_processes: usize,
    pub max_resources: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            process_prefix: "P".into(),
            max_processes: 1024,
            max_resources: 1024,
        }
    }
}

/// A parsed snapshot plus the request to evaluate against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInput {
    pub state: ResourceState,
    pub request: Request,
    /// The identifier exactly as written, echoed back in the report.
    pub process_label: String,
}

/// Parses a complete input document.
pub fn parse_input(source: &str, options: &ParseOptions) -> Result<ParsedInput, InputError> {
    let mut cursor = Cursor::new(source);

    cursor.label("R")?;
    let resources = cursor.dimension("resource count", options.max_resources)?;
    cursor.label("P")?;
    let processes = cursor.dimension("process count", options.max_processes)?;
    debug!(resources, processes, "parsed dimensions");

    cursor.label("Available")?;
    let available = cursor.vector(resources, "available units")?;
    cursor.label("Max")?;
    let max = cursor.matrix(processes, resources, "max units")?;
    cursor.label("Allocation")?;
    let allocation = cursor.matrix(processes, resources, "allocated units")?;

    let state = ResourceState::new(available, max, allocation)?;

    let id_offset = cursor.offset();
    let process_label = cursor.run("process identifier", token)?.to_string();
    let process = decode_process_id(&process_label, &options.process_prefix).ok_or_else(|| {
        InputError::Malformed {
            offset: id_offset,
            expected: format!("process identifier like {}0", options.process_prefix),
            found: format!("{process_label:?}"),
        }
    })?;
    let units = cursor.vector(resources, "requested units")?;
    cursor.run("end of input", end)?;

    let request = Request::new(process, units);
    request.validate(&state)?;
    debug!(process, label = %process_label, "parsed request");

    Ok(ParsedInput {
        state,
        request,
        process_label,
    })
}

/// Decodes `<prefix><index>` or a bare `<index>`. The prefix matches
/// case-insensitively; the index may have any number of digits.
pub fn decode_process_id(token: &str, prefix: &str) -> Option<usize> {
    let digits = match token.get(..prefix.len()) {
        Some(head) if !prefix.is_empty() && head.eq_ignore_ascii_case(prefix) => {
            &token[prefix.len()..]
        }
        _ => token,
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn label<'a>(name: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    move |input| delimited(multispace0, tag_no_case(name), multispace1).parse(input)
}

/// Digits must run up to whitespace or end of input, so `2Max` is one bad
/// token rather than a number followed by a label.
fn number(input: &str) -> IResult<&str, u64> {
    preceded(
        multispace0,
        terminated(
            map_res(digit1, |s: &str| s.parse::<u64>()),
            peek(alt((multispace1, eof))),
        ),
    )
    .parse(input)
}

fn token(input: &str) -> IResult<&str, &str> {
    preceded(multispace0, take_while1(|c: char| !c.is_whitespace())).parse(input)
}

fn end(input: &str) -> IResult<&str, &str> {
    preceded(multispace0, eof).parse(input)
}

struct Cursor<'a> {
    source: &'a str,
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            rest: source,
        }
    }

    /// Byte offset of the next token.
    fn offset(&self) -> usize {
        self.source.len() - self.rest.trim_start().len()
    }

    fn run<O>(
        &mut self,
        expected: &str,
        mut parser: impl FnMut(&'a str) -> IResult<&'a str, O>,
    ) -> Result<O, InputError> {
        match parser(self.rest) {
            Ok((rest, out)) => {
                self.rest = rest;
                Ok(out)
            }
            Err(_) => Err(self.malformed(expected)),
        }
    }

    fn malformed(&self, expected: &str) -> InputError {
        let found = self
            .rest
            .split_whitespace()
            .next()
            .map(|t| format!("{t:?}"))
            .unwrap_or_else(|| "end of input".into());
        InputError::Malformed {
            offset: self.offset(),
            expected: expected.into(),
            found,
        }
    }

    fn label(&mut self, name: &'static str) -> Result<(), InputError> {
        self.run(&format!("label {name:?}"), label(name)).map(|_| ())
    }

    fn number(&mut self, what: &str) -> Result<u64, InputError> {
        self.run(what, number)
    }

    fn dimension(&mut self, what: &'static str, limit: usize) -> Result<usize, InputError> {
        let offset = self.offset();
        let value = self.number(what)?;
        let value = usize::try_from(value).map_err(|_| InputError::Malformed {
            offset,
            expected: what.into(),
            found: format!("\"{value}\""),
        })?;
        if value > limit {
            return Err(InputError::DimensionLimit { what, value, limit });
        }
        Ok(value)
    }

    fn vector(&mut self, len: usize, what: &str) -> Result<ResourceVector, InputError> {
        (0..len)
            .map(|_| self.number(what))
            .collect::<Result<Vec<_>, _>>()
            .map(ResourceVector::new)
    }

    fn matrix(
        &mut self,
        rows: usize,
        width: usize,
        what: &str,
    ) -> Result<Vec<ResourceVector>, InputError> {
        (0..rows).map(|_| self.vector(width, what)).collect()
    }
}
