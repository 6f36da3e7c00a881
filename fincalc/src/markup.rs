//! LaTeX-like markup renderer
//!
//! Renders a parsed expression for display: `sqrt(x)/2` becomes
//! `$$\frac{\sqrt{x}}{2}$$`. Names come out escaped so user identifiers
//! can never inject markup commands.

use crate::ast::{BinOp, Node, UnaryOp};
use crate::eval::INTEGRAL;
use crate::parser::parse_expr;
use fincalc_plugin::{FunctionRegistry, MarkupStyle};

/// Delimiter around display markup
pub const DISPLAY_DELIMITER: &str = "$$";

const GREEK: [&str; 33] = [
    "alpha", "beta", "gamma", "delta", "epsilon", "varepsilon", "zeta", "eta", "theta",
    "vartheta", "iota", "kappa", "lambda", "mu", "nu", "xi", "pi", "rho", "sigma", "tau",
    "upsilon", "phi", "varphi", "chi", "psi", "omega", "Gamma", "Delta", "Theta", "Lambda",
    "Sigma", "Phi", "Omega",
];

/// Escape characters that have meaning in markup
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\backslash "),
            '{' | '}' | '_' | '%' | '$' | '&' | '#' => {
                out.push('\\');
                out.push(c);
            }
            '^' => out.push_str("\\hat{}"),
            '~' => out.push_str("\\sim "),
            _ => out.push(c),
        }
    }
    out
}

fn format_literal(value: f64) -> String {
    format!("{}", value)
}

fn paren(inner: String) -> String {
    format!("\\left({}\\right)", inner)
}

fn is_additive(node: &Node) -> bool {
    matches!(node, Node::BinaryOp(BinOp::Add | BinOp::Sub, _, _))
}

fn is_negation(node: &Node) -> bool {
    matches!(node, Node::UnaryOp(UnaryOp::Neg, _))
}

/// Expression renderer, resolving function styles and constant symbols
/// through a registry
pub struct MarkupRenderer<'a> {
    registry: &'a FunctionRegistry,
}

impl<'a> MarkupRenderer<'a> {
    pub fn new(registry: &'a FunctionRegistry) -> Self {
        Self { registry }
    }

    /// Render `source` wrapped in `$$…$$`; echo it unchanged if it does not parse
    pub fn to_markup(&self, source: &str) -> String {
        match parse_expr(source) {
            Ok(node) => self.render_display(&node),
            Err(_) => source.to_string(),
        }
    }

    pub fn render_display(&self, node: &Node) -> String {
        format!("{0}{1}{0}", DISPLAY_DELIMITER, self.render(node))
    }

    /// Markup without the display delimiters
    pub fn render(&self, node: &Node) -> String {
        match node {
            Node::Literal(value) => format_literal(*value),
            Node::VariableRef { name, .. } => self.render_name(name),
            Node::UnaryOp(UnaryOp::Neg, operand) => {
                let inner = self.render(operand);
                if operand.is_atomic() {
                    format!("-{}", inner)
                } else {
                    format!("-{}", paren(inner))
                }
            }
            Node::UnaryOp(UnaryOp::Factorial { .. }, operand) => {
                format!("{}!", self.grouped(operand))
            }
            Node::BinaryOp(op, left, right) => self.render_binary(*op, left, right),
            Node::FunctionCall { name, args, .. } => self.render_call(name, args),
        }
    }

    /// Constant symbol, greek letter, or escaped identifier
    pub fn render_name(&self, name: &str) -> String {
        if let Some(markup) = self.registry.get_constant(name).and_then(|c| c.markup.clone()) {
            return markup;
        }
        if GREEK.contains(&name) {
            return format!("\\{}", name);
        }
        if name.chars().count() == 1 {
            escape_markup(name)
        } else {
            format!("\\mathrm{{{}}}", escape_markup(name))
        }
    }

    /// Operand wrapped in parentheses unless it is atomic
    fn grouped(&self, node: &Node) -> String {
        let inner = self.render(node);
        if node.is_atomic() {
            inner
        } else {
            paren(inner)
        }
    }

    fn render_binary(&self, op: BinOp, left: &Node, right: &Node) -> String {
        match op {
            BinOp::Add | BinOp::Sub => {
                let l = self.render(left);
                let r = self.render(right);
                let wrap_right = is_negation(right) || (op == BinOp::Sub && is_additive(right));
                let r = if wrap_right { paren(r) } else { r };
                let symbol = if op == BinOp::Add { '+' } else { '-' };
                format!("{} {} {}", l, symbol, r)
            }
            BinOp::Mul => {
                let l = self.render(left);
                let l = if is_additive(left) { paren(l) } else { l };
                let r = self.render(right);
                let r = if is_additive(right) || is_negation(right) {
                    paren(r)
                } else {
                    r
                };
                format!("{} \\cdot {}", l, r)
            }
            BinOp::Div => format!("\\frac{{{}}}{{{}}}", self.render(left), self.render(right)),
            BinOp::Pow => format!("{{{}}}^{{{}}}", self.grouped(left), self.render(right)),
        }
    }

    fn render_args(&self, args: &[Node]) -> String {
        args.iter()
            .map(|arg| self.render(arg))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn operator_form(&self, name: &str, args: &[Node]) -> String {
        format!(
            "\\operatorname{{{}}}{}",
            escape_markup(name),
            paren(self.render_args(args))
        )
    }

    fn render_call(&self, name: &str, args: &[Node]) -> String {
        let def = match self.registry.get_function(name) {
            Some(def) => def,
            None if name.eq_ignore_ascii_case(INTEGRAL) => return self.render_integral(name, args),
            None => return self.operator_form(name, args),
        };

        match (def.markup, args) {
            (MarkupStyle::Command(command), _) => {
                format!("{}{}", command, paren(self.render_args(args)))
            }
            (MarkupStyle::Radical, [x]) => format!("\\sqrt{{{}}}", self.render(x)),
            (MarkupStyle::CubeRoot, [x]) => format!("\\sqrt[3]{{{}}}", self.render(x)),
            (MarkupStyle::Absolute, [x]) => format!("\\left|{}\\right|", self.render(x)),
            (MarkupStyle::Floor, [x]) => {
                format!("\\left\\lfloor {}\\right\\rfloor", self.render(x))
            }
            (MarkupStyle::Ceil, [x]) => format!("\\left\\lceil {}\\right\\rceil", self.render(x)),
            (MarkupStyle::Exponential, [x]) => format!("e^{{{}}}", self.render(x)),
            (MarkupStyle::Logarithm, [x]) => format!("\\log{}", paren(self.render(x))),
            (MarkupStyle::Logarithm, [x, base]) => {
                format!("\\log_{{{}}}{}", self.render(base), paren(self.render(x)))
            }
            (MarkupStyle::Factorial, [x]) => format!("{}!", self.grouped(x)),
            // Operator style, or a shape the argument count does not fit
            _ => self.operator_form(def.name, args),
        }
    }

    fn render_integral(&self, name: &str, args: &[Node]) -> String {
        match args {
            [body, Node::VariableRef { name: var, .. }, lower, upper] => format!(
                "\\int_{{{}}}^{{{}}} {} \\, d{}",
                self.render(lower),
                self.render(upper),
                self.render(body),
                self.render_name(var)
            ),
            _ => self.operator_form(name, args),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markup(source: &str) -> String {
        let registry = fincalc_std::standard_registry();
        MarkupRenderer::new(&registry).to_markup(source)
    }

    #[test]
    fn test_basic_operators() {
        assert_eq!(markup("1 + 2 * 3"), "$$1 + 2 \\cdot 3$$");
        assert_eq!(markup("a/b"), "$$\\frac{a}{b}$$");
        assert_eq!(markup("a^b"), "$${a}^{b}$$");
        assert_eq!(markup("(a + b)^2"), "$${\\left(a + b\\right)}^{2}$$");
        assert_eq!(markup("a - (b - c)"), "$$a - \\left(b - c\\right)$$");
        assert_eq!(markup("(a + b) * c"), "$$\\left(a + b\\right) \\cdot c$$");
    }

    #[test]
    fn test_functions() {
        assert_eq!(markup("sqrt(x)"), "$$\\sqrt{x}$$");
        assert_eq!(markup("sin(x)"), "$$\\sin\\left(x\\right)$$");
        assert_eq!(markup("log(8, 2)"), "$$\\log_{2}\\left(8\\right)$$");
        assert_eq!(markup("abs(-x)"), "$$\\left|-x\\right|$$");
        assert_eq!(markup("sum(1, 2)"), "$$\\operatorname{sum}\\left(1, 2\\right)$$");
        assert_eq!(markup("SQRT(4)"), "$$\\sqrt{4}$$");
    }

    #[test]
    fn test_names() {
        assert_eq!(markup("pi * r^2"), "$$\\pi \\cdot {r}^{2}$$");
        assert_eq!(markup("π"), "$$\\pi$$");
        assert_eq!(markup("theta"), "$$\\theta$$");
        assert_eq!(markup("loan_amount"), "$$\\mathrm{loan\\_amount}$$");
    }

    #[test]
    fn test_unary() {
        assert_eq!(markup("-(a + b)"), "$$-\\left(a + b\\right)$$");
        assert_eq!(markup("(n + 1)!"), "$$\\left(n + 1\\right)!$$");
        assert_eq!(markup("2 * -3"), "$$2 \\cdot \\left(-3\\right)$$");
    }

    #[test]
    fn test_integral() {
        assert_eq!(
            markup("integral(x^2, x, 0, 1)"),
            "$$\\int_{0}^{1} {x}^{2} \\, dx$$"
        );
    }

    #[test]
    fn test_fallback_on_parse_error() {
        assert_eq!(markup("(2 + 3"), "(2 + 3");
        assert_eq!(markup("2 $ 3"), "2 $ 3");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape_markup("a_b{c}"), "a\\_b\\{c\\}");
    }
}
