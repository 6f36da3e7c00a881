//! Plain data objects an external document store can persist

use serde::{Deserialize, Serialize};

/// A named value, optionally remembering the expression that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup: Option<String>,
}

impl Variable {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            expression: None,
            markup: None,
        }
    }
}

/// One evaluated line of a calculation document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquationLine {
    /// Text as typed
    pub source: String,
    /// Typeset markup, or the raw source when it did not parse
    pub markup: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Human-readable error message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Variable the line assigned to (`name = expr`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

impl EquationLine {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
