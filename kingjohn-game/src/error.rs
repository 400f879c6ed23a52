//! Error taxonomy for the kingdom engine.
use thiserror::Error;

/// Errors raised when an engine operation cannot complete.
///
/// Every variant is local to the call that produced it: the state the call
/// was operating on is left exactly as it was before the call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid date: month {month}, day {day}")]
    InvalidDate { month: i64, day: i64 },
    #[error("malformed consequence: {0}")]
    MalformedConsequence(String),
    #[error("snapshot is missing required field `{0}`")]
    MissingField(&'static str),
    #[error("snapshot field `{field}` is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let err = EngineError::InvalidDate { month: 2, day: 29 };
        assert_eq!(err.to_string(), "invalid date: month 2, day 29");

        let err = EngineError::MissingField("barons");
        assert!(err.to_string().contains("`barons`"));
    }
}
