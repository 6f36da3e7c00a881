//! fincalc - Expression and Financial-Math Engine
//!
//! Parses and evaluates calculator expressions against a variable store,
//! renders them as markup, and fronts the TVM solver and amortization
//! engine from `fincalc-finance`.

mod ast;
mod autocomplete;
mod eval;
mod lexer;
mod markup;
mod parser;

pub use ast::{BinOp, Node, UnaryOp};
pub use autocomplete::{suggestions, Suggestion};
pub use eval::{EvaluationResult, Evaluator, SIMPSON_INTERVALS};
pub use lexer::{tokenize, Token, TokenKind};
pub use markup::{escape_markup, MarkupRenderer};
pub use parser::{parse_expr, MAX_DEPTH};

pub use fincalc_core::{EquationLine, ErrorKind, FincalcError, Result, Variable};
pub use fincalc_finance::{
    AmortizationConfig, AmortizationEngine, AmortizationResult, AmortizationRow, Frequency,
    LoanDefinition, PaymentTiming, SolverConfig, TvmField, TvmInputs, TvmSolution, TvmSolver,
};
pub use fincalc_plugin::{ConstantDef, FunctionRegistry, VariableStore};

use fincalc_plugin::EvalContext;
use std::sync::Arc;
use tracing::debug;

/// Main fincalc engine
#[derive(Debug, Clone)]
pub struct Fincalc {
    registry: Arc<FunctionRegistry>,
    store: VariableStore,
    solver: TvmSolver,
    amortization: AmortizationEngine,
}

impl Fincalc {
    /// Engine over `registry`, with its constants seeded as built-in variables
    pub fn new(registry: FunctionRegistry) -> Self {
        let store = VariableStore::with_constants(&registry);
        Self {
            registry: Arc::new(registry),
            store,
            solver: TvmSolver::default(),
            amortization: AmortizationEngine::default(),
        }
    }

    /// Math and finance functions plus the standard constants
    pub fn with_standard_library() -> Self {
        let registry = fincalc_finance::load_finance_library(fincalc_std::standard_registry());
        Self::new(registry)
    }

    pub fn with_solver_config(mut self, config: SolverConfig) -> Self {
        self.solver = TvmSolver::new(config);
        self
    }

    pub fn with_amortization_config(mut self, config: AmortizationConfig) -> Self {
        self.amortization = AmortizationEngine::new(config);
        self
    }

    pub fn registry(&self) -> &Arc<FunctionRegistry> {
        &self.registry
    }

    pub fn parse(&self, source: &str) -> Result<Node> {
        parse_expr(source)
    }

    pub fn evaluate(&self, source: &str) -> Result<EvaluationResult> {
        debug!(source, "evaluating expression");
        let node = parse_expr(source)?;
        let mut ctx = EvalContext::new(&self.registry, &self.store);
        let value = Evaluator::new().eval(&node, &mut ctx)?;
        let markup = MarkupRenderer::new(&self.registry).render_display(&node);
        Ok(EvaluationResult { value, markup })
    }

    /// Display markup for `source`, or the source itself if it does not parse
    pub fn to_markup(&self, source: &str) -> String {
        MarkupRenderer::new(&self.registry).to_markup(source)
    }

    /// Evaluate `source` and store the result as user variable `name`
    pub fn define(&mut self, name: &str, source: &str) -> Result<EvaluationResult> {
        if !is_identifier(name) {
            return Err(FincalcError::invalid_input(format!(
                "'{}' is not a valid variable name",
                name
            )));
        }
        let result = self.evaluate(source)?;
        self.store.set_variable(
            name,
            result.value,
            Some(source.trim().to_string()),
            Some(result.markup.clone()),
        )?;
        debug!(name, value = result.value, "variable defined");
        Ok(result)
    }

    /// Evaluate one document line, optionally of the form `name = expr`
    ///
    /// Never fails: errors are reported in the returned line.
    pub fn evaluate_line(&mut self, line: &str) -> EquationLine {
        let assignment = split_assignment(line);
        let expr = assignment.map_or(line, |(_, expr)| expr);

        let renderer = MarkupRenderer::new(&self.registry);
        let markup = match (parse_expr(expr), assignment) {
            (Ok(node), Some((name, _))) => format!(
                "$${} = {}$$",
                renderer.render_name(name),
                renderer.render(&node)
            ),
            (Ok(node), None) => renderer.render_display(&node),
            (Err(_), _) => line.to_string(),
        };

        let outcome = match assignment {
            Some((name, expr)) => self.define(name, expr),
            None => self.evaluate(expr),
        };

        let (value, error) = match outcome {
            Ok(result) => (Some(result.value), None),
            Err(e) => (None, Some(e.to_string())),
        };

        EquationLine {
            source: line.to_string(),
            markup,
            value,
            error,
            assigned_to: assignment.map(|(name, _)| name.to_string()),
        }
    }

    pub fn variables(&self) -> &VariableStore {
        &self.store
    }

    pub fn variables_mut(&mut self) -> &mut VariableStore {
        &mut self.store
    }

    pub fn set_variable(&mut self, name: &str, value: f64) -> Result<()> {
        self.store.set_variable(name, value, None, None)
    }

    pub fn suggestions(&self, partial: &str, limit: usize) -> Vec<Suggestion> {
        suggestions(partial, limit)
    }

    pub fn solve_tvm(&self, inputs: &TvmInputs) -> Result<TvmSolution> {
        self.solver.solve(inputs)
    }

    pub fn amortize(&self, loan: &LoanDefinition) -> Result<AmortizationResult> {
        self.amortization.generate_schedule(loan)
    }

    pub fn list_functions(&self, category: Option<&str>) -> Vec<&'static str> {
        self.registry.function_names(category)
    }

    pub fn list_constants(&self) -> &[ConstantDef] {
        self.registry.constants()
    }
}

impl Default for Fincalc {
    fn default() -> Self {
        Self::with_standard_library()
    }
}

/// A single identifier token
fn is_identifier(name: &str) -> bool {
    matches!(
        tokenize(name).as_deref(),
        Ok([Token {
            kind: TokenKind::Identifier(_),
            ..
        }])
    )
}

/// `name = expr` split into its parts, if the left side is an identifier
fn split_assignment(line: &str) -> Option<(&str, &str)> {
    let (lhs, rhs) = line.split_once('=')?;
    let name = lhs.trim();
    if is_identifier(name) {
        Some((name, rhs))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_fincalc() -> Fincalc {
        Fincalc::with_standard_library()
    }

    #[test]
    fn test_simple_arithmetic() {
        let result = test_fincalc().evaluate("2+2").unwrap();
        assert_eq!(result.value, 4.0);
        assert_eq!(result.markup, "$$2 + 2$$");
    }

    #[test]
    fn test_division_by_zero_is_infinite() {
        assert_eq!(test_fincalc().evaluate("1/0").unwrap().value, f64::INFINITY);
    }

    #[test]
    fn test_undefined_variable_error() {
        let err = test_fincalc().evaluate("undefinedVar").unwrap_err();
        assert!(err.is(ErrorKind::UndefinedVariable));
    }

    #[test]
    fn test_unbalanced_parenthesis() {
        let err = test_fincalc().evaluate("(2+3").unwrap_err();
        assert!(err.is(ErrorKind::Syntax));
    }

    #[test]
    fn test_oversized_expressions_fail_cleanly() {
        let mut fincalc = test_fincalc();
        let chain = vec!["1"; 1000].join("+");
        assert!(fincalc.evaluate(&chain).unwrap_err().is(ErrorKind::Syntax));
        assert_eq!(fincalc.to_markup(&chain), chain);

        let nested = format!("{}1{}", "(".repeat(300), ")".repeat(300));
        let line = fincalc.evaluate_line(&format!("x = {}", nested));
        assert!(line.is_error());
        assert!(!fincalc.variables().has_variable("x"));

        let within = vec!["1"; 100].join("+");
        assert_eq!(fincalc.evaluate(&within).unwrap().value, 100.0);
    }

    #[test]
    fn test_repeated_evaluation_is_bit_identical() {
        let fincalc = test_fincalc();
        let source = "sqrt(2) * pi / 7 + ln(3)^2 - 4!";
        let first = fincalc.evaluate(source).unwrap().value;
        for _ in 0..10 {
            assert_eq!(fincalc.evaluate(source).unwrap().value.to_bits(), first.to_bits());
        }
    }

    #[test]
    fn test_unicode_constants() {
        let fincalc = test_fincalc();
        let pi = fincalc.evaluate("π * 2").unwrap().value;
        assert!((pi - std::f64::consts::TAU).abs() < 1e-12);
        let phi = fincalc.evaluate("φ").unwrap().value;
        assert!((phi * phi - phi - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_user_variables_shadow_builtins() {
        let mut fincalc = test_fincalc();
        fincalc.set_variable("e", 5.0).unwrap();
        assert_eq!(fincalc.evaluate("e * 2").unwrap().value, 10.0);
        fincalc.variables_mut().remove_variable("e");
        assert!((fincalc.evaluate("e").unwrap().value - std::f64::consts::E).abs() < 1e-15);
    }

    #[test]
    fn test_define_stores_expression_and_markup() {
        let mut fincalc = test_fincalc();
        fincalc.define("principal", "250000").unwrap();
        fincalc.define("payment", "-pmt(0.05/12, 360, principal)").unwrap();

        let payment = fincalc.variables().get_variable("payment").unwrap();
        assert!((payment.value - 1342.05).abs() < 1e-2);
        assert_eq!(
            payment.expression.as_deref(),
            Some("-pmt(0.05/12, 360, principal)")
        );
        assert!(payment.markup.as_deref().unwrap().contains("\\operatorname{pmt}"));

        let names: Vec<&str> = fincalc
            .variables()
            .list_user_variables()
            .into_iter()
            .map(|v| v.name.as_str())
            .collect();
        assert_eq!(names, vec!["payment", "principal"]);
    }

    #[test]
    fn test_define_rejects_bad_names() {
        let mut fincalc = test_fincalc();
        assert!(fincalc.define("2x", "1").unwrap_err().is(ErrorKind::InvalidInput));
        assert!(fincalc.define("", "1").unwrap_err().is(ErrorKind::InvalidInput));
    }

    #[test]
    fn test_failed_define_leaves_store_unchanged() {
        let mut fincalc = test_fincalc();
        fincalc.define("x", "1").unwrap();
        assert!(fincalc.define("x", "1 + nope").is_err());
        assert_eq!(fincalc.evaluate("x").unwrap().value, 1.0);
    }

    #[test]
    fn test_evaluate_line() {
        let mut fincalc = test_fincalc();

        let line = fincalc.evaluate_line("rate = 0.06 / 12");
        assert_eq!(line.assigned_to.as_deref(), Some("rate"));
        assert!((line.value.unwrap() - 0.005).abs() < 1e-15);
        assert_eq!(line.markup, "$$\\mathrm{rate} = \\frac{0.06}{12}$$");
        assert!(!line.is_error());

        let line = fincalc.evaluate_line("rate * 12");
        assert!((line.value.unwrap() - 0.06).abs() < 1e-15);
        assert_eq!(line.assigned_to, None);

        let line = fincalc.evaluate_line("(1 + ");
        assert!(line.is_error());
        assert_eq!(line.markup, "(1 + ");
        assert!(line.error.unwrap().contains("SYNTAX_ERROR"));
    }

    #[test]
    fn test_equation_line_serializes() {
        let mut fincalc = test_fincalc();
        let line = fincalc.evaluate_line("x = 3!");
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["assigned_to"], "x");
        assert_eq!(json["value"], 6.0);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_financial_functions_in_expressions() {
        let fincalc = test_fincalc();
        let fv = fincalc.evaluate("fv(0.05, 10, 0, 1000)").unwrap().value;
        assert!((fv - 1628.89).abs() < 1e-2);
        let rate = fincalc.evaluate("rate(10, 0, -1000, 2000) * 100").unwrap().value;
        assert!((rate - 7.177).abs() < 1e-3);
    }

    #[test]
    fn test_solve_tvm() {
        let fincalc = test_fincalc();
        let inputs = TvmInputs::solving_for(TvmField::FutureValue)
            .present_value(1000.0)
            .payment(0.0)
            .rate_per_period(0.05)
            .number_of_periods(10.0);
        let solution = fincalc.solve_tvm(&inputs).unwrap();
        assert!((solution.future_value - 1628.89).abs() < 1e-2);
    }

    #[test]
    fn test_amortize_with_custom_epsilon() {
        let fincalc = test_fincalc().with_amortization_config(AmortizationConfig { epsilon: 1.0 });
        let loan = LoanDefinition::new(10000.0, 0.06, 2.0).extra_payment(100.0);
        let result = fincalc.amortize(&loan).unwrap();
        assert!(result.final_balance() <= 1.0);
        assert!(result.terms_saved_by_extra_payment > 0);
    }

    #[test]
    fn test_suggestions() {
        let fincalc = test_fincalc();
        let found = fincalc.suggestions("pm", 5);
        assert_eq!(found[0].title, "pmt");
        assert!(fincalc.suggestions("", 5).is_empty());
    }

    #[test]
    fn test_to_markup() {
        let fincalc = test_fincalc();
        assert_eq!(fincalc.to_markup("sqrt(x)/2"), "$$\\frac{\\sqrt{x}}{2}$$");
        assert_eq!(fincalc.to_markup("sqrt(x"), "sqrt(x");
    }

    #[test]
    fn test_list_functions() {
        let fincalc = test_fincalc();
        assert!(fincalc.list_functions(Some("finance")).contains(&"pmt"));
        assert!(fincalc.list_functions(None).contains(&"sin"));
        assert!(fincalc.list_constants().iter().any(|c| c.name == "tau"));
    }
}
