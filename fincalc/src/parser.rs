//! Recursive descent expression parser
//!
//! ```text
//! expr    := term (('+'|'-') term)*
//! term    := factor (('*'|'/') factor)*
//! factor  := unary ('^' factor)?
//! unary   := '-'? postfix
//! postfix := primary '!'*
//! primary := number | identifier ('(' args ')')? | '(' expr ')'
//! args    := expr (',' expr)*
//! ```
//!
//! Unary minus binds tighter than `^`, so `-2^2` is `(-2)^2`.

use crate::ast::{BinOp, Node, UnaryOp};
use crate::lexer::{tokenize, Token, TokenKind};
use fincalc_core::{FincalcError, Result};

/// Deepest expression accepted, counting both tree height and nesting of
/// parentheses, calls and exponents. Evaluation and markup recurse over the
/// tree, so this also bounds their stack use. Long flat lists fit in `sum()`.
pub const MAX_DEPTH: usize = 128;

/// A subtree and its height
type Parsed = (Node, usize);

/// Parse expression source into a tree
pub fn parse_expr(source: &str) -> Result<Node> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(FincalcError::syntax("Empty expression").at(0));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        end: source.chars().count(),
        nesting: 0,
    };
    let (node, _) = parser.parse_additive()?;

    if let Some(token) = parser.peek() {
        let err = match token.kind {
            TokenKind::RightParen => FincalcError::syntax("Unmatched ')'"),
            _ => FincalcError::syntax(format!(
                "Unexpected {} after complete expression",
                token.describe()
            ))
            .with_suggestion("Use an explicit operator such as '*' between terms"),
        };
        return Err(err.at(token.offset));
    }

    Ok(node)
}

fn too_deep(offset: usize) -> FincalcError {
    FincalcError::syntax("expression too deeply nested")
        .with_suggestion(format!(
            "At most {} levels are allowed; use sum() for long lists of terms",
            MAX_DEPTH
        ))
        .at(offset)
}

/// Height of a node placed over a subtree of height `height`
fn grow(height: usize, offset: usize) -> Result<usize> {
    let height = height + 1;
    if height > MAX_DEPTH {
        return Err(too_deep(offset));
    }
    Ok(height)
}

fn binary(op: BinOp, left: Node, right: Node) -> Node {
    Node::BinaryOp(op, Box::new(left), Box::new(right))
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Character length of the source, reported for errors at end of input
    end: usize,
    /// Current recursion level through parentheses, calls and exponents
    nesting: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Consume the next token if it is one of `ops`, returning it with its offset
    fn eat_binary(&mut self, ops: &[BinOp]) -> Option<(BinOp, usize)> {
        let token = self.peek()?;
        let op = match token.kind {
            TokenKind::Operator(c) => BinOp::from_symbol(c)?,
            _ => return None,
        };
        if !ops.contains(&op) {
            return None;
        }
        let offset = token.offset;
        self.pos += 1;
        Some((op, offset))
    }

    /// Consume a leading `-`, returning its offset
    fn eat_minus(&mut self) -> Option<usize> {
        let offset = self.peek().filter(|t| t.is_operator('-'))?.offset;
        self.pos += 1;
        Some(offset)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek().map_or(false, |t| &t.kind == kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Run `parse` one recursion level down
    fn nested<T>(
        &mut self,
        offset: usize,
        parse: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        if self.nesting >= MAX_DEPTH {
            return Err(too_deep(offset));
        }
        self.nesting += 1;
        let result = parse(self);
        self.nesting -= 1;
        result
    }

    fn unexpected_end(&self) -> FincalcError {
        FincalcError::syntax("Unexpected end of expression").at(self.end)
    }

    /// Left-associative chain of `ops` over operands parsed by `operand`
    fn parse_chain(
        &mut self,
        ops: &[BinOp],
        operand: fn(&mut Self) -> Result<Parsed>,
    ) -> Result<Parsed> {
        let (mut left, mut height) = operand(self)?;
        while let Some((op, offset)) = self.eat_binary(ops) {
            let (right, right_height) = operand(self)?;
            height = grow(height.max(right_height), offset)?;
            left = binary(op, left, right);
        }
        Ok((left, height))
    }

    fn parse_additive(&mut self) -> Result<Parsed> {
        self.parse_chain(&[BinOp::Add, BinOp::Sub], Self::parse_multiplicative)
    }

    fn parse_multiplicative(&mut self) -> Result<Parsed> {
        self.parse_chain(&[BinOp::Mul, BinOp::Div], Self::parse_power)
    }

    /// Right-associative: `2^3^2` is `2^(3^2)`
    fn parse_power(&mut self) -> Result<Parsed> {
        let (base, base_height) = self.parse_unary()?;
        match self.eat_binary(&[BinOp::Pow]) {
            Some((op, offset)) => {
                let (exponent, exponent_height) = self.nested(offset, Self::parse_power)?;
                let height = grow(base_height.max(exponent_height), offset)?;
                Ok((binary(op, base, exponent), height))
            }
            None => Ok((base, base_height)),
        }
    }

    fn parse_unary(&mut self) -> Result<Parsed> {
        match self.eat_minus() {
            Some(offset) => {
                let (operand, height) = self.parse_postfix()?;
                let height = grow(height, offset)?;
                Ok((Node::UnaryOp(UnaryOp::Neg, Box::new(operand)), height))
            }
            None => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> Result<Parsed> {
        let (mut node, mut height) = self.parse_primary()?;
        while let Some(token) = self.peek() {
            if !token.is_operator('!') {
                break;
            }
            let offset = token.offset;
            self.pos += 1;
            height = grow(height, offset)?;
            node = Node::UnaryOp(UnaryOp::Factorial { offset }, Box::new(node));
        }
        Ok((node, height))
    }

    fn parse_primary(&mut self) -> Result<Parsed> {
        let token = self.next().ok_or_else(|| self.unexpected_end())?;
        let offset = token.offset;

        match token.kind {
            TokenKind::Number(value) => Ok((Node::Literal(value), 1)),
            TokenKind::Identifier(name) => {
                if self.eat(&TokenKind::LeftParen) {
                    let (args, args_height) =
                        self.nested(offset, |p| p.parse_args(offset))?;
                    let height = grow(args_height, offset)?;
                    Ok((Node::FunctionCall { name, args, offset }, height))
                } else {
                    Ok((Node::VariableRef { name, offset }, 1))
                }
            }
            TokenKind::LeftParen => {
                let inner = self.nested(offset, Self::parse_additive)?;
                if !self.eat(&TokenKind::RightParen) {
                    return Err(self.missing_paren(offset));
                }
                Ok(inner)
            }
            _ => Err(FincalcError::syntax(format!("Unexpected {}", token.describe()))
                .at(offset)),
        }
    }

    /// Arguments after an opening parenthesis, through the closing one,
    /// with the height of the tallest
    fn parse_args(&mut self, call_offset: usize) -> Result<(Vec<Node>, usize)> {
        let mut args = Vec::new();
        let mut height = 0;
        if self.eat(&TokenKind::RightParen) {
            return Ok((args, height));
        }

        loop {
            let (arg, arg_height) = self.parse_additive()?;
            args.push(arg);
            height = height.max(arg_height);
            if self.eat(&TokenKind::Comma) {
                continue;
            }
            if self.eat(&TokenKind::RightParen) {
                return Ok((args, height));
            }
            return Err(self.missing_paren(call_offset));
        }
    }

    fn missing_paren(&self, open_offset: usize) -> FincalcError {
        let at = self.peek().map_or(self.end, |t| t.offset);
        FincalcError::syntax(format!(
            "Missing ')' for the '(' opened at position {}",
            open_offset
        ))
        .at(at)
    }
}
