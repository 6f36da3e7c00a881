//! Abstract Syntax Tree
//!
//! Every node owns its children; trees are immutable once parsed.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Literal(f64),
    VariableRef {
        name: String,
        offset: usize,
    },
    UnaryOp(UnaryOp, Box<Node>),
    BinaryOp(BinOp, Box<Node>, Box<Node>),
    FunctionCall {
        name: String,
        args: Vec<Node>,
        offset: usize,
    },
}

impl Node {
    /// Renders without grouping in any operand position
    pub fn is_atomic(&self) -> bool {
        matches!(
            self,
            Node::Literal(_) | Node::VariableRef { .. } | Node::FunctionCall { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    /// Postfix `!`; offset of the `!` for error reporting
    Factorial { offset: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinOp {
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '+' => Some(BinOp::Add),
            '-' => Some(BinOp::Sub),
            '*' => Some(BinOp::Mul),
            '/' => Some(BinOp::Div),
            '^' => Some(BinOp::Pow),
            _ => None,
        }
    }
}
