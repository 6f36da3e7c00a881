//! Expression tokenizer
//!
//! Offsets are character (not byte) positions so error markers line up with
//! what the user typed, including non-ASCII identifiers such as `π`.

use fincalc_core::{FincalcError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenKind {
    Number(f64),
    Identifier(String),
    /// One of `+ - * / ^ !`
    Operator(char),
    LeftParen,
    RightParen,
    Comma,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

impl Token {
    pub fn is_operator(&self, op: char) -> bool {
        self.kind == TokenKind::Operator(op)
    }

    /// Short description for error messages
    pub fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Number(n) => format!("number {}", n),
            TokenKind::Identifier(name) => format!("'{}'", name),
            TokenKind::Operator(op) => format!("'{}'", op),
            TokenKind::LeftParen => "'('".to_string(),
            TokenKind::RightParen => "')'".to_string(),
            TokenKind::Comma => "','".to_string(),
        }
    }
}

/// Map keypad glyphs onto their ASCII operators
fn normalize_operator(c: char) -> Option<char> {
    match c {
        '+' | '-' | '*' | '/' | '^' | '!' => Some(c),
        '×' | '·' => Some('*'),
        '÷' => Some('/'),
        '−' => Some('-'),
        _ => None,
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let offset = i;

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || (c == '.' && chars.get(i + 1).map_or(false, |d| d.is_ascii_digit())) {
            let end = scan_number(&chars, i);
            let text: String = chars[i..end].iter().collect();
            let value = text.parse::<f64>().map_err(|_| {
                FincalcError::syntax(format!("Invalid number '{}'", text)).at(offset)
            })?;
            tokens.push(Token {
                kind: TokenKind::Number(value),
                offset,
            });
            i = end;
            continue;
        }

        if is_identifier_start(c) {
            let mut end = i + 1;
            while end < chars.len() && is_identifier_continue(chars[end]) {
                end += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Identifier(chars[i..end].iter().collect()),
                offset,
            });
            i = end;
            continue;
        }

        let kind = match c {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            ',' => TokenKind::Comma,
            _ => match normalize_operator(c) {
                Some(op) => TokenKind::Operator(op),
                None => {
                    return Err(FincalcError::syntax(format!("Unexpected character '{}'", c))
                        .at(offset))
                }
            },
        };
        tokens.push(Token { kind, offset });
        i += 1;
    }

    Ok(tokens)
}

/// End of the numeric literal starting at `start`: digits, one optional
/// fraction, and an exponent only when digits follow the `e`
fn scan_number(chars: &[char], start: usize) -> usize {
    let digits = |mut i: usize| {
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = digits(start);
    if end < chars.len() && chars[end] == '.' {
        end = digits(end + 1);
    }
    if end < chars.len() && (chars[end] == 'e' || chars[end] == 'E') {
        let mut exp = end + 1;
        if exp < chars.len() && (chars[exp] == '+' || chars[exp] == '-') {
            exp += 1;
        }
        if exp < chars.len() && chars[exp].is_ascii_digit() {
            end = digits(exp);
        }
    }
    end
}
