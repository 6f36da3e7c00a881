//! Core math functions
//!
//! Out-of-domain arguments follow IEEE 754 (`sqrt(-1)` is NaN, `ln(0)` is
//! -inf). Only factorial rejects its input, because it has no float fallback.

use fincalc_plugin::prelude::*;

/// Largest n for which n! is finite in double precision
pub const MAX_FACTORIAL: f64 = 170.0;

/// n! for integral 0 <= n <= 170
pub fn factorial(n: f64) -> Result<f64> {
    if !n.is_finite() || n < 0.0 || n.fract() != 0.0 {
        return Err(FincalcError::domain_error(format!(
            "factorial is only defined for non-negative integers, got {}",
            n
        )));
    }
    if n > MAX_FACTORIAL {
        return Err(FincalcError::domain_error(format!(
            "factorial of {} exceeds the representable range (max {})",
            n, MAX_FACTORIAL
        )));
    }
    Ok((2..=n as u32).fold(1.0, |acc, k| acc * k as f64))
}

fn sqrt(args: &[f64]) -> Result<f64> {
    Ok(args[0].sqrt())
}

fn cbrt(args: &[f64]) -> Result<f64> {
    Ok(args[0].cbrt())
}

fn abs(args: &[f64]) -> Result<f64> {
    Ok(args[0].abs())
}

fn exp(args: &[f64]) -> Result<f64> {
    Ok(args[0].exp())
}

fn ln(args: &[f64]) -> Result<f64> {
    Ok(args[0].ln())
}

/// Base 10 unless a base is given
fn log(args: &[f64]) -> Result<f64> {
    match args {
        [x] => Ok(x.log10()),
        [x, base] => Ok(x.ln() / base.ln()),
        _ => Err(FincalcError::arg_count("log", "1 to 2", args.len())),
    }
}

fn pow(args: &[f64]) -> Result<f64> {
    Ok(args[0].powf(args[1]))
}

/// Half away from zero, optionally to a number of decimal places
fn round(args: &[f64]) -> Result<f64> {
    match args {
        [x] => Ok(x.round()),
        [x, digits] => {
            let scale = 10f64.powi(*digits as i32);
            Ok((x * scale).round() / scale)
        }
        _ => Err(FincalcError::arg_count("round", "1 to 2", args.len())),
    }
}

fn floor(args: &[f64]) -> Result<f64> {
    Ok(args[0].floor())
}

fn ceil(args: &[f64]) -> Result<f64> {
    Ok(args[0].ceil())
}

fn fact(args: &[f64]) -> Result<f64> {
    factorial(args[0])
}

pub const SQRT: FunctionDef = FunctionDef {
    name: "sqrt",
    description: "Square root",
    usage: "sqrt(x)",
    category: "math",
    arity: Arity::Exact(1),
    markup: MarkupStyle::Radical,
    eval: sqrt,
};

pub const CBRT: FunctionDef = FunctionDef {
    name: "cbrt",
    description: "Cube root",
    usage: "cbrt(x)",
    category: "math",
    arity: Arity::Exact(1),
    markup: MarkupStyle::CubeRoot,
    eval: cbrt,
};

pub const ABS: FunctionDef = FunctionDef {
    name: "abs",
    description: "Absolute value",
    usage: "abs(x)",
    category: "math",
    arity: Arity::Exact(1),
    markup: MarkupStyle::Absolute,
    eval: abs,
};

pub const EXP: FunctionDef = FunctionDef {
    name: "exp",
    description: "e raised to the power x",
    usage: "exp(x)",
    category: "math",
    arity: Arity::Exact(1),
    markup: MarkupStyle::Exponential,
    eval: exp,
};

pub const LN: FunctionDef = FunctionDef {
    name: "ln",
    description: "Natural logarithm",
    usage: "ln(x)",
    category: "math",
    arity: Arity::Exact(1),
    markup: MarkupStyle::Command("\\ln"),
    eval: ln,
};

pub const LOG: FunctionDef = FunctionDef {
    name: "log",
    description: "Logarithm, base 10 unless a base is given",
    usage: "log(x, [base])",
    category: "math",
    arity: Arity::Range(1, 2),
    markup: MarkupStyle::Logarithm,
    eval: log,
};

pub const POW: FunctionDef = FunctionDef {
    name: "pow",
    description: "base raised to exponent",
    usage: "pow(base, exponent)",
    category: "math",
    arity: Arity::Exact(2),
    markup: MarkupStyle::Operator,
    eval: pow,
};

pub const ROUND: FunctionDef = FunctionDef {
    name: "round",
    description: "Round half away from zero",
    usage: "round(x, [digits])",
    category: "math",
    arity: Arity::Range(1, 2),
    markup: MarkupStyle::Operator,
    eval: round,
};

pub const FLOOR: FunctionDef = FunctionDef {
    name: "floor",
    description: "Largest integer not greater than x",
    usage: "floor(x)",
    category: "math",
    arity: Arity::Exact(1),
    markup: MarkupStyle::Floor,
    eval: floor,
};

pub const CEIL: FunctionDef = FunctionDef {
    name: "ceil",
    description: "Smallest integer not less than x",
    usage: "ceil(x)",
    category: "math",
    arity: Arity::Exact(1),
    markup: MarkupStyle::Ceil,
    eval: ceil,
};

pub const FACT: FunctionDef = FunctionDef {
    name: "fact",
    description: "Factorial of a non-negative integer",
    usage: "fact(n)",
    category: "math",
    arity: Arity::Exact(1),
    markup: MarkupStyle::Factorial,
    eval: fact,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factorial() {
        assert_eq!(factorial(0.0).unwrap(), 1.0);
        assert_eq!(factorial(5.0).unwrap(), 120.0);
        assert!(factorial(170.0).unwrap().is_finite());
    }

    #[test]
    fn test_factorial_domain() {
        assert!(factorial(-1.0).unwrap_err().is(ErrorKind::Domain));
        assert!(factorial(2.5).unwrap_err().is(ErrorKind::Domain));
        assert!(factorial(171.0).unwrap_err().is(ErrorKind::Domain));
        assert!(factorial(f64::NAN).unwrap_err().is(ErrorKind::Domain));
    }

    #[test]
    fn test_log_bases() {
        assert!((LOG.call(&[1000.0]).unwrap() - 3.0).abs() < 1e-12);
        assert!((LOG.call(&[8.0, 2.0]).unwrap() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_ieee_domain_results() {
        assert!(SQRT.call(&[-1.0]).unwrap().is_nan());
        assert_eq!(LN.call(&[0.0]).unwrap(), f64::NEG_INFINITY);
        assert!(LOG.call(&[-5.0]).unwrap().is_nan());
    }

    #[test]
    fn test_round_digits() {
        assert_eq!(ROUND.call(&[2.5]).unwrap(), 3.0);
        assert_eq!(ROUND.call(&[1628.8946, 2.0]).unwrap(), 1628.89);
    }
}
