//! Trigonometric functions (radians)

use fincalc_plugin::prelude::*;

fn sin(args: &[f64]) -> Result<f64> {
    Ok(args[0].sin())
}

fn cos(args: &[f64]) -> Result<f64> {
    Ok(args[0].cos())
}

fn tan(args: &[f64]) -> Result<f64> {
    Ok(args[0].tan())
}

fn asin(args: &[f64]) -> Result<f64> {
    Ok(args[0].asin())
}

fn acos(args: &[f64]) -> Result<f64> {
    Ok(args[0].acos())
}

fn atan(args: &[f64]) -> Result<f64> {
    Ok(args[0].atan())
}

pub const SIN: FunctionDef = FunctionDef {
    name: "sin",
    description: "Sine function",
    usage: "sin(x)",
    category: "trig",
    arity: Arity::Exact(1),
    markup: MarkupStyle::Command("\\sin"),
    eval: sin,
};

pub const COS: FunctionDef = FunctionDef {
    name: "cos",
    description: "Cosine function",
    usage: "cos(x)",
    category: "trig",
    arity: Arity::Exact(1),
    markup: MarkupStyle::Command("\\cos"),
    eval: cos,
};

pub const TAN: FunctionDef = FunctionDef {
    name: "tan",
    description: "Tangent function",
    usage: "tan(x)",
    category: "trig",
    arity: Arity::Exact(1),
    markup: MarkupStyle::Command("\\tan"),
    eval: tan,
};

pub const ASIN: FunctionDef = FunctionDef {
    name: "asin",
    description: "Inverse sine",
    usage: "asin(x)",
    category: "trig",
    arity: Arity::Exact(1),
    markup: MarkupStyle::Command("\\arcsin"),
    eval: asin,
};

pub const ACOS: FunctionDef = FunctionDef {
    name: "acos",
    description: "Inverse cosine",
    usage: "acos(x)",
    category: "trig",
    arity: Arity::Exact(1),
    markup: MarkupStyle::Command("\\arccos"),
    eval: acos,
};

pub const ATAN: FunctionDef = FunctionDef {
    name: "atan",
    description: "Inverse tangent",
    usage: "atan(x)",
    category: "trig",
    arity: Arity::Exact(1),
    markup: MarkupStyle::Command("\\arctan"),
    eval: atan,
};
