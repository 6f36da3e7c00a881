//! fincalc Core - Fundamental types
//!
//! This crate provides the core types used throughout fincalc:
//! - `FincalcError`: Structured errors with a typed `ErrorKind`
//! - `Variable`, `EquationLine`: serializable data objects
//! - `format_number`: display strings with the `"Error"` sentinel

mod error;
mod format;
mod variable;

pub use error::{codes, ErrorKind, FincalcError};
pub use format::{format_number, format_percent, ERROR_SENTINEL};
pub use variable::{EquationLine, Variable};

/// Result alias used across the workspace
pub type Result<T> = std::result::Result<T, FincalcError>;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::codes;
    pub use crate::{ErrorKind, FincalcError, Result, Variable};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_roundtrip_json() {
        let mut var = Variable::new("rate", 0.05);
        var.expression = Some("5/100".to_string());
        let json = serde_json::to_string(&var).unwrap();
        assert!(!json.contains("markup"));
        let back: Variable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, var);
    }

    #[test]
    fn test_equation_line_error_flag() {
        let line = EquationLine {
            source: "1+".to_string(),
            markup: "1+".to_string(),
            value: None,
            error: Some("Syntax error".to_string()),
            assigned_to: None,
        };
        assert!(line.is_error());
    }
}
