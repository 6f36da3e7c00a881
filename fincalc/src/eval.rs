//! Expression evaluator
//!
//! Arithmetic follows IEEE 754: `1/0` is infinity and `sqrt(-1)` is NaN
//! rather than an error. Lookup failures and factorial domain errors are
//! reported with the offset of the offending token.

use crate::ast::{BinOp, Node, UnaryOp};
use fincalc_core::{FincalcError, Result};
use fincalc_plugin::EvalContext;
use fincalc_std::functions::factorial;
use serde::{Deserialize, Serialize};

/// Sub-intervals used by `integral` (Simpson's rule, must be even)
pub const SIMPSON_INTERVALS: usize = 1000;

/// Name of the integration special form
pub const INTEGRAL: &str = "integral";

/// Value of an expression together with its typeset form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub value: f64,
    pub markup: String,
}

/// Attach `offset` unless the error already carries a position
fn locate(err: FincalcError, offset: usize) -> FincalcError {
    if err.position.is_some() {
        err
    } else {
        err.at(offset)
    }
}

/// True when `name(...)` should be treated as the integration special form
pub fn is_integral(name: &str, ctx: &EvalContext) -> bool {
    name.eq_ignore_ascii_case(INTEGRAL) && !ctx.registry.has_function(name)
}

#[derive(Debug, Default)]
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Self
    }

    pub fn eval(&self, node: &Node, ctx: &mut EvalContext) -> Result<f64> {
        match node {
            Node::Literal(value) => Ok(*value),

            Node::VariableRef { name, offset } => {
                ctx.get_var(name).map_err(|e| locate(e, *offset))
            }

            Node::UnaryOp(UnaryOp::Neg, operand) => Ok(-self.eval(operand, ctx)?),

            Node::UnaryOp(UnaryOp::Factorial { offset }, operand) => {
                let value = self.eval(operand, ctx)?;
                factorial(value).map_err(|e| locate(e, *offset))
            }

            Node::BinaryOp(op, left, right) => {
                let l = self.eval(left, ctx)?;
                let r = self.eval(right, ctx)?;
                Ok(match op {
                    BinOp::Add => l + r,
                    BinOp::Sub => l - r,
                    BinOp::Mul => l * r,
                    BinOp::Div => l / r,
                    BinOp::Pow => l.powf(r),
                })
            }

            Node::FunctionCall { name, args, offset } => {
                if is_integral(name, ctx) {
                    return self.eval_integral(args, *offset, ctx);
                }

                // Unknown names fail before their arguments are evaluated
                if !ctx.registry.has_function(name) {
                    return Err(ctx.registry.undefined_function(name).at(*offset));
                }

                let values = args
                    .iter()
                    .map(|arg| self.eval(arg, ctx))
                    .collect::<Result<Vec<f64>>>()?;
                ctx.call_function(name, &values)
                    .map_err(|e| locate(e, *offset))
            }
        }
    }

    /// `integral(body, var, lower, upper)` by composite Simpson's rule
    fn eval_integral(&self, args: &[Node], offset: usize, ctx: &mut EvalContext) -> Result<f64> {
        let [body, var, lower, upper] = args else {
            return Err(FincalcError::arg_count(INTEGRAL, "4", args.len())
                .with_suggestion("Usage: integral(expression, variable, lower, upper)")
                .at(offset));
        };
        let Node::VariableRef { name: var, .. } = var else {
            return Err(FincalcError::syntax(
                "integral() expects a variable name as its second argument",
            )
            .at(offset));
        };

        let lo = self.eval(lower, ctx)?;
        let hi = self.eval(upper, ctx)?;

        ctx.scope.bind(var, lo);
        let result = self.simpson(body, var, lo, hi, ctx);
        ctx.scope.unbind();
        result
    }

    fn simpson(
        &self,
        body: &Node,
        var: &str,
        lo: f64,
        hi: f64,
        ctx: &mut EvalContext,
    ) -> Result<f64> {
        let h = (hi - lo) / SIMPSON_INTERVALS as f64;
        let mut sum = 0.0;

        for i in 0..=SIMPSON_INTERVALS {
            ctx.scope.rebind(var, lo + h * i as f64);
            let weight = if i == 0 || i == SIMPSON_INTERVALS {
                1.0
            } else if i % 2 == 1 {
                4.0
            } else {
                2.0
            };
            sum += weight * self.eval(body, ctx)?;
        }

        Ok(sum * h / 3.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expr;
    use fincalc_core::{codes, ErrorKind};
    use fincalc_plugin::VariableStore;

    fn eval_with(source: &str, store: &VariableStore) -> Result<f64> {
        let registry = fincalc_std::standard_registry();
        let node = parse_expr(source)?;
        let mut ctx = EvalContext::new(&registry, store);
        Evaluator::new().eval(&node, &mut ctx)
    }

    fn eval(source: &str) -> Result<f64> {
        let registry = fincalc_std::standard_registry();
        let store = VariableStore::with_constants(&registry);
        eval_with(source, &store)
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval("2+2").unwrap(), 4.0);
        assert_eq!(eval("2 + 3 * 4").unwrap(), 14.0);
        assert_eq!(eval("(2 + 3) * 4").unwrap(), 20.0);
        assert_eq!(eval("2^3^2").unwrap(), 512.0);
        assert_eq!(eval("-2^2").unwrap(), 4.0);
        assert_eq!(eval("10 - 4 - 3").unwrap(), 3.0);
        assert_eq!(eval("3!").unwrap(), 6.0);
        assert_eq!(eval("3!!").unwrap(), 720.0);
    }

    #[test]
    fn test_ieee_semantics() {
        assert_eq!(eval("1/0").unwrap(), f64::INFINITY);
        assert_eq!(eval("-1/0").unwrap(), f64::NEG_INFINITY);
        assert!(eval("0/0").unwrap().is_nan());
        assert!(eval("log(-1)").unwrap().is_nan());
    }

    #[test]
    fn test_factorial_domain_error_has_offset() {
        let err = eval("2.5!").unwrap_err();
        assert!(err.is(ErrorKind::Domain));
        assert_eq!(err.position, Some(3));
        assert!(eval("171!").unwrap_err().is(ErrorKind::Domain));
    }

    #[test]
    fn test_undefined_variable() {
        let err = eval("1 + undefinedVar").unwrap_err();
        assert!(err.is(ErrorKind::UndefinedVariable));
        assert_eq!(err.position, Some(4));
    }

    #[test]
    fn test_function_errors() {
        let err = eval("sine(1)").unwrap_err();
        assert!(err.is(ErrorKind::UndefinedFunction));
        assert_eq!(err.position, Some(0));

        let err = eval("sqrt(1, 2)").unwrap_err();
        assert!(err.is(ErrorKind::Syntax));
        assert_eq!(err.code, codes::ARG_COUNT);
    }

    #[test]
    fn test_function_names_are_case_insensitive() {
        assert_eq!(eval("SQRT(16)").unwrap(), 4.0);
    }

    #[test]
    fn test_function_wins_over_variable_when_called() {
        let registry = fincalc_std::standard_registry();
        let mut store = VariableStore::with_constants(&registry);
        store.set_variable("sqrt", 3.0, None, None).unwrap();
        assert_eq!(eval_with("sqrt(16) + sqrt", &store).unwrap(), 7.0);
    }

    #[test]
    fn test_integral() {
        let value = eval("integral(x^2, x, 0, 3)").unwrap();
        assert!((value - 9.0).abs() < 1e-9, "got {}", value);

        let value = eval("integral(sin(t), t, 0, pi)").unwrap();
        assert!((value - 2.0).abs() < 1e-9, "got {}", value);
    }

    #[test]
    fn test_integral_binding_does_not_leak() {
        let registry = fincalc_std::standard_registry();
        let mut store = VariableStore::with_constants(&registry);
        store.set_variable("x", 100.0, None, None).unwrap();

        let node = parse_expr("integral(x, x, 0, 1) + x").unwrap();
        let mut ctx = EvalContext::new(&registry, &store);
        let value = Evaluator::new().eval(&node, &mut ctx).unwrap();
        assert!((value - 100.5).abs() < 1e-9);
        assert_eq!(ctx.scope.depth(), 0);
        assert_eq!(store.get_value("x").unwrap(), 100.0);
    }

    #[test]
    fn test_integral_errors() {
        let err = eval("integral(x, 2, 0, 1)").unwrap_err();
        assert!(err.is(ErrorKind::Syntax));
        let err = eval("integral(x, x, 0)").unwrap_err();
        assert_eq!(err.code, codes::ARG_COUNT);
    }

    #[test]
    fn test_deterministic() {
        let a = eval("sin(1.3) * exp(0.7) / sqrt(2) + 5!").unwrap();
        let b = eval("sin(1.3) * exp(0.7) / sqrt(2) + 5!").unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }
}
