//! Function table entries
//!
//! A function is a row in a lookup table: name, accepted argument count, the
//! rule that computes it, and how it is typeset. New functions are added by
//! registering another `FunctionDef`, never by implementing a trait.

use fincalc_core::{FincalcError, Result};
use serde::Serialize;
use std::fmt;

/// Evaluation rule: receives already-evaluated arguments
pub type EvalFn = fn(&[f64]) -> Result<f64>;

/// Accepted argument count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Arity {
    Exact(usize),
    /// Inclusive bounds
    Range(usize, usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exact(n) => count == n,
            Arity::Range(lo, hi) => count >= lo && count <= hi,
            Arity::AtLeast(n) => count >= n,
        }
    }

    /// Human-readable form used in error messages ("2", "3 to 5", "at least 1")
    pub fn describe(&self) -> String {
        match *self {
            Arity::Exact(n) => n.to_string(),
            Arity::Range(lo, hi) => format!("{} to {}", lo, hi),
            Arity::AtLeast(n) => format!("at least {}", n),
        }
    }
}

/// How a call is typeset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarkupStyle {
    /// Built-in markup command such as `\sin`
    Command(&'static str),
    /// `\operatorname{name}`
    Operator,
    /// `\sqrt{x}`
    Radical,
    /// `\sqrt[3]{x}`
    CubeRoot,
    /// `\left|x\right|`
    Absolute,
    /// `\left\lfloor x \right\rfloor`
    Floor,
    /// `\left\lceil x \right\rceil`
    Ceil,
    /// `e^{x}`
    Exponential,
    /// `\log` with an optional base subscript
    Logarithm,
    /// `x!`
    Factorial,
}

/// Metadata and evaluation rule for one function
#[derive(Clone, Copy, Serialize)]
pub struct FunctionDef {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub category: &'static str,
    pub arity: Arity,
    pub markup: MarkupStyle,
    #[serde(skip)]
    pub eval: EvalFn,
}

impl FunctionDef {
    /// Check the argument count, then apply the rule
    pub fn call(&self, args: &[f64]) -> Result<f64> {
        if !self.arity.accepts(args.len()) {
            return Err(FincalcError::arg_count(self.name, &self.arity.describe(), args.len())
                .with_suggestion(format!("Usage: {}", self.usage)));
        }
        (self.eval)(args)
    }
}

impl fmt::Debug for FunctionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDef")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("arity", &self.arity)
            .field("markup", &self.markup)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fincalc_core::{codes, ErrorKind};

    fn double(args: &[f64]) -> Result<f64> {
        Ok(args[0] * 2.0)
    }

    fn def() -> FunctionDef {
        FunctionDef {
            name: "double",
            description: "Twice the value",
            usage: "double(x)",
            category: "test",
            arity: Arity::Exact(1),
            markup: MarkupStyle::Operator,
            eval: double,
        }
    }

    #[test]
    fn test_arity_accepts() {
        assert!(Arity::Range(3, 5).accepts(4));
        assert!(!Arity::Range(3, 5).accepts(6));
        assert!(Arity::AtLeast(1).accepts(10));
        assert!(!Arity::AtLeast(1).accepts(0));
    }

    #[test]
    fn test_call_checks_arity() {
        let err = def().call(&[1.0, 2.0]).unwrap_err();
        assert!(err.is(ErrorKind::Syntax));
        assert_eq!(err.code, codes::ARG_COUNT);
        assert_eq!(def().call(&[21.0]).unwrap(), 42.0);
    }
}
