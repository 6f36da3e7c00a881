//! Function and constant registry

use crate::FunctionDef;
use fincalc_core::{FincalcError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Definition of a built-in constant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantDef {
    pub name: String,
    pub value: f64,
    /// Typeset form, e.g. `\pi`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup: Option<String>,
    pub source: String,
    pub category: String,
}

/// Central lookup table for functions and constants
///
/// Function names are matched case-insensitively; constant names are
/// case-sensitive like every other variable name.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionDef>,
    constants: Vec<ConstantDef>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_function(mut self, def: FunctionDef) -> Self {
        self.functions.insert(def.name.to_lowercase(), def);
        self
    }

    /// Later definitions of the same name replace earlier ones
    pub fn with_constant(mut self, def: ConstantDef) -> Self {
        self.constants.retain(|c| c.name != def.name);
        self.constants.push(def);
        self
    }

    pub fn get_function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(&name.to_lowercase())
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.get_function(name).is_some()
    }

    pub fn get_constant(&self, name: &str) -> Option<&ConstantDef> {
        self.constants.iter().find(|c| c.name == name)
    }

    /// Constants in registration order
    pub fn constants(&self) -> &[ConstantDef] {
        &self.constants
    }

    /// Sorted function names, optionally restricted to one category
    pub fn function_names(&self, category: Option<&str>) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self
            .functions
            .values()
            .filter(|f| category.map_or(true, |c| f.category == c))
            .map(|f| f.name)
            .collect();
        names.sort_unstable();
        names
    }

    pub fn call_function(&self, name: &str, args: &[f64]) -> Result<f64> {
        match self.get_function(name) {
            Some(f) => f.call(args),
            None => Err(self.undefined_function(name)),
        }
    }

    /// Error for an unknown function, suggesting similar names
    pub fn undefined_function(&self, name: &str) -> FincalcError {
        let similar = self.find_similar_functions(name);
        let err = FincalcError::undefined_func(name);
        if similar.is_empty() {
            return err;
        }
        let suggestions: Vec<&str> = similar.iter().take(5).map(|s| s.as_str()).collect();
        err.with_suggestion(format!("Similar: {}", suggestions.join(", ")))
    }

    /// Find function names similar to the given name (for error suggestions)
    fn find_similar_functions(&self, name: &str) -> Vec<String> {
        let name_lower = name.to_lowercase();
        let mut matches: Vec<(String, usize)> = self
            .functions
            .keys()
            .filter_map(|func_name| {
                let score = Self::similarity_score(&name_lower, func_name);
                if score > 10 {
                    Some((func_name.clone(), score))
                } else {
                    None
                }
            })
            .collect();

        // Higher score first, then alphabetical so the message is stable
        matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        matches.into_iter().map(|(name, _)| name).collect()
    }

    /// Calculate similarity score between two strings
    fn similarity_score(query: &str, candidate: &str) -> usize {
        let mut score = 0;

        if candidate.starts_with(query) {
            score += 100;
        } else if candidate.contains(query) {
            score += 50;
        } else if query.contains(candidate) {
            score += 30;
        }

        let query_chars: HashSet<char> = query.chars().collect();
        let candidate_chars: HashSet<char> = candidate.chars().collect();
        score += query_chars.intersection(&candidate_chars).count() * 2;

        let len_diff = query.len().abs_diff(candidate.len());
        if len_diff < 5 && score > 0 {
            score += 5 - len_diff;
        }

        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Arity, MarkupStyle};
    use fincalc_core::ErrorKind;

    fn square(args: &[f64]) -> Result<f64> {
        Ok(args[0] * args[0])
    }

    fn registry() -> FunctionRegistry {
        FunctionRegistry::new()
            .with_function(FunctionDef {
                name: "square",
                description: "x squared",
                usage: "square(x)",
                category: "math",
                arity: Arity::Exact(1),
                markup: MarkupStyle::Operator,
                eval: square,
            })
            .with_constant(ConstantDef {
                name: "pi".to_string(),
                value: std::f64::consts::PI,
                markup: Some("\\pi".to_string()),
                source: "test".to_string(),
                category: "transcendental".to_string(),
            })
    }

    #[test]
    fn test_function_lookup_is_case_insensitive() {
        let reg = registry();
        assert_eq!(reg.call_function("SQUARE", &[3.0]).unwrap(), 9.0);
    }

    #[test]
    fn test_unknown_function_suggests_similar() {
        let err = registry().call_function("squar", &[3.0]).unwrap_err();
        assert!(err.is(ErrorKind::UndefinedFunction));
        assert!(err.suggestion.unwrap().contains("square"));
    }

    #[test]
    fn test_constants_are_case_sensitive() {
        let reg = registry();
        assert!(reg.get_constant("pi").is_some());
        assert!(reg.get_constant("PI").is_none());
    }

    #[test]
    fn test_constant_redefinition_replaces() {
        let reg = registry().with_constant(ConstantDef {
            name: "pi".to_string(),
            value: 3.0,
            markup: None,
            source: "override".to_string(),
            category: "test".to_string(),
        });
        assert_eq!(reg.constants().len(), 1);
        assert_eq!(reg.get_constant("pi").unwrap().value, 3.0);
    }

    #[test]
    fn test_function_names_by_category() {
        let reg = registry();
        assert_eq!(reg.function_names(Some("math")), vec!["square"]);
        assert!(reg.function_names(Some("finance")).is_empty());
    }
}
