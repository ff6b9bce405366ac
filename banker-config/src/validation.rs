//! Custom validation functions for configuration.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    static ref PROCESS_PREFIX: Regex = Regex::new("^[A-Za-z]+$").expect("static regex");
}

/// Process identifiers are `<prefix><index>`; the prefix must be alphabetic so
/// the index boundary is unambiguous.
pub fn validate_process_prefix(prefix: &str) -> Result<(), ValidationError> {
    if PROCESS_PREFIX.is_match(prefix) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_process_prefix"))
    }
}

/// Validate a `tracing` level name.
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid = ["trace", "debug", "info", "warn", "error"]
        .contains(&level.to_lowercase().as_str());
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_level"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes() {
        assert!(validate_process_prefix("P").is_ok());
        assert!(validate_process_prefix("Proc").is_ok());
        assert!(validate_process_prefix("").is_err());
        assert!(validate_process_prefix("P1").is_err());
        assert!(validate_process_prefix("P_").is_err());
    }

    #[test]
    fn log_levels() {
        assert!(validate_log_level("warn").is_ok());
        assert!(validate_log_level("DEBUG").is_ok());
        assert!(validate_log_level("verbose").is_err());
    }
}
