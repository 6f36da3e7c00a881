//! Structured errors
//!
//! Every failure in the engine is returned as a value the caller can inspect,
//! show to the user verbatim, and recover from by fixing the input.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const SYNTAX_ERROR: &str = "SYNTAX_ERROR";
    pub const ARG_COUNT: &str = "ARG_COUNT";
    pub const UNDEFINED_VAR: &str = "UNDEFINED_VAR";
    pub const UNDEFINED_FUNC: &str = "UNDEFINED_FUNC";
    pub const DOMAIN_ERROR: &str = "DOMAIN_ERROR";
    pub const INVALID_INPUT: &str = "INVALID_INPUT";
    pub const UNSOLVABLE: &str = "UNSOLVABLE";
    pub const CONVERGENCE: &str = "CONVERGENCE";
    pub const NON_AMORTIZING: &str = "NON_AMORTIZING";
}

/// Category of failure. Callers branch on this, not on the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Malformed expression: unbalanced parens, unexpected token, bad arity
    Syntax,
    /// Identifier is neither a built-in constant nor a user variable
    UndefinedVariable,
    /// Identifier followed by `(` that names no known function
    UndefinedFunction,
    /// Mathematically invalid operation (factorial of -1, ...)
    Domain,
    /// Solver or schedule precondition violated
    InvalidInput,
    /// Closed-form solve has no real answer for these inputs
    Unsolvable,
    /// Iterative rate solve did not converge
    Convergence,
    /// Payment does not cover the first period's interest
    NonAmortizingLoan,
}

impl ErrorKind {
    /// Default code for this kind
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Syntax => codes::SYNTAX_ERROR,
            ErrorKind::UndefinedVariable => codes::UNDEFINED_VAR,
            ErrorKind::UndefinedFunction => codes::UNDEFINED_FUNC,
            ErrorKind::Domain => codes::DOMAIN_ERROR,
            ErrorKind::InvalidInput => codes::INVALID_INPUT,
            ErrorKind::Unsolvable => codes::UNSOLVABLE,
            ErrorKind::Convergence => codes::CONVERGENCE,
            ErrorKind::NonAmortizingLoan => codes::NON_AMORTIZING,
        }
    }
}

/// Structured error
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("[{code}] {message}")]
pub struct FincalcError {
    /// Error category
    pub kind: ErrorKind,

    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// Character offset into the expression source, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
}

impl FincalcError {
    /// Create a new error with the kind's default code
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: kind.code().to_string(),
            message: message.into(),
            suggestion: None,
            position: None,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: set source offset
    pub fn at(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    /// Builder: override the code while keeping the kind
    pub fn with_code(mut self, code: &str) -> Self {
        self.code = code.to_string();
        self
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }

    // ========== Common Error Constructors ==========

    pub fn syntax(details: impl Into<String>) -> Self {
        Self::new(ErrorKind::Syntax, format!("Syntax error: {}", details.into()))
            .with_suggestion("Check the expression syntax")
    }

    pub fn arg_count(func: &str, expected: &str, got: usize) -> Self {
        Self::new(
            ErrorKind::Syntax,
            format!("{}() expects {} arguments, got {}", func, expected, got),
        )
        .with_code(codes::ARG_COUNT)
    }

    pub fn undefined_var(name: &str) -> Self {
        Self::new(ErrorKind::UndefinedVariable, format!("Undefined variable: {}", name))
            .with_suggestion(format!("Define '{}' or check spelling", name))
    }

    pub fn undefined_func(name: &str) -> Self {
        Self::new(ErrorKind::UndefinedFunction, format!("Unknown function: {}", name))
    }

    pub fn domain_error(details: impl Into<String>) -> Self {
        Self::new(ErrorKind::Domain, format!("Domain error: {}", details.into()))
    }

    pub fn invalid_input(details: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, format!("Invalid input: {}", details.into()))
    }

    pub fn unsolvable(details: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unsolvable, format!("Unsolvable: {}", details.into()))
            .with_suggestion("Check the signs and magnitudes of the known values")
    }

    pub fn convergence(details: impl Into<String>) -> Self {
        Self::new(ErrorKind::Convergence, format!("Did not converge: {}", details.into()))
            .with_suggestion("Rate cannot be determined; try a different initial guess")
    }

    pub fn non_amortizing(interest: f64, payment: f64) -> Self {
        Self::new(
            ErrorKind::NonAmortizingLoan,
            format!(
                "Payment {:.2} does not cover first-period interest {:.2}",
                payment, interest
            ),
        )
        .with_suggestion("Raise the payment or shorten the term")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = FincalcError::undefined_var("rate");
        assert_eq!(err.to_string(), "[UNDEFINED_VAR] Undefined variable: rate");
    }

    #[test]
    fn test_arg_count_keeps_syntax_kind() {
        let err = FincalcError::arg_count("sqrt", "1", 2);
        assert!(err.is(ErrorKind::Syntax));
        assert_eq!(err.code, codes::ARG_COUNT);
    }

    #[test]
    fn test_position_builder() {
        let err = FincalcError::syntax("unexpected ')'").at(4);
        assert_eq!(err.position, Some(4));
    }

    #[test]
    fn test_serialize_skips_empty_fields() {
        let err = FincalcError::new(ErrorKind::Domain, "bad");
        let json = serde_json::to_string(&err).unwrap();
        assert!(!json.contains("suggestion"));
        assert!(!json.contains("position"));
        assert!(json.contains("\"Domain\""));
    }
}
