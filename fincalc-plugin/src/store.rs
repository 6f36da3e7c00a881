//! Variable store and evaluation scopes

use crate::FunctionRegistry;
use fincalc_core::{FincalcError, Result, Variable};
use std::collections::{BTreeMap, HashMap};

/// Name → value mapping for one editing session
///
/// Built-in constants are seeded at creation. User variables shadow them
/// (last write wins) and are listed in name order.
#[derive(Debug, Clone, Default)]
pub struct VariableStore {
    builtins: HashMap<String, f64>,
    user: BTreeMap<String, Variable>,
}

impl VariableStore {
    /// Store without any built-ins
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the registry's constants
    pub fn with_constants(registry: &FunctionRegistry) -> Self {
        let builtins = registry
            .constants()
            .iter()
            .map(|c| (c.name.clone(), c.value))
            .collect();
        Self {
            builtins,
            user: BTreeMap::new(),
        }
    }

    /// Insert or overwrite a user variable
    pub fn set_variable(
        &mut self,
        name: &str,
        value: f64,
        expression: Option<String>,
        markup: Option<String>,
    ) -> Result<()> {
        if name.is_empty() {
            return Err(FincalcError::invalid_input("variable name must not be empty"));
        }
        self.user.insert(
            name.to_string(),
            Variable {
                name: name.to_string(),
                value,
                expression,
                markup,
            },
        );
        Ok(())
    }

    pub fn get_value(&self, name: &str) -> Result<f64> {
        if let Some(var) = self.user.get(name) {
            return Ok(var.value);
        }
        self.builtins
            .get(name)
            .copied()
            .ok_or_else(|| FincalcError::undefined_var(name))
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.user.contains_key(name) || self.builtins.contains_key(name)
    }

    pub fn get_variable(&self, name: &str) -> Option<&Variable> {
        self.user.get(name)
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.builtins.contains_key(name)
    }

    /// User variables sorted by name; built-ins excluded
    pub fn list_user_variables(&self) -> Vec<&Variable> {
        self.user.values().collect()
    }

    /// Remove a user variable. A shadowed built-in becomes visible again.
    pub fn remove_variable(&mut self, name: &str) -> Option<Variable> {
        self.user.remove(name)
    }

    pub fn clear_user_variables(&mut self) {
        self.user.clear();
    }

    pub fn builtin_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.builtins.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Transient bindings layered over a store
///
/// Used for variables that exist only while part of an expression is being
/// evaluated, such as the integration variable. Innermost binding wins.
#[derive(Debug)]
pub struct Scope<'a> {
    store: &'a VariableStore,
    locals: Vec<(String, f64)>,
}

impl<'a> Scope<'a> {
    pub fn new(store: &'a VariableStore) -> Self {
        Self {
            store,
            locals: Vec::new(),
        }
    }

    pub fn bind(&mut self, name: &str, value: f64) {
        self.locals.push((name.to_string(), value));
    }

    /// Rebind the innermost occurrence of `name`, or bind it if absent
    pub fn rebind(&mut self, name: &str, value: f64) {
        match self.locals.iter_mut().rev().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.bind(name, value),
        }
    }

    /// Drop the most recent binding
    pub fn unbind(&mut self) {
        self.locals.pop();
    }

    pub fn depth(&self) -> usize {
        self.locals.len()
    }

    pub fn get_value(&self, name: &str) -> Result<f64> {
        if let Some((_, value)) = self.locals.iter().rev().find(|(n, _)| n == name) {
            return Ok(*value);
        }
        self.store.get_value(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConstantDef;
    use fincalc_core::ErrorKind;

    fn seeded() -> VariableStore {
        let registry = FunctionRegistry::new().with_constant(ConstantDef {
            name: "pi".to_string(),
            value: std::f64::consts::PI,
            markup: None,
            source: "test".to_string(),
            category: "transcendental".to_string(),
        });
        VariableStore::with_constants(&registry)
    }

    #[test]
    fn test_builtins_seeded() {
        let store = seeded();
        assert!(store.has_variable("pi"));
        assert_eq!(store.get_value("pi").unwrap(), std::f64::consts::PI);
        assert!(store.list_user_variables().is_empty());
    }

    #[test]
    fn test_undefined_variable() {
        let err = seeded().get_value("rate").unwrap_err();
        assert!(err.is(ErrorKind::UndefinedVariable));
    }

    #[test]
    fn test_user_variable_shadows_builtin() {
        let mut store = seeded();
        store.set_variable("pi", 3.0, None, None).unwrap();
        assert_eq!(store.get_value("pi").unwrap(), 3.0);

        store.remove_variable("pi");
        assert_eq!(store.get_value("pi").unwrap(), std::f64::consts::PI);
    }

    #[test]
    fn test_redefinition_overwrites() {
        let mut store = VariableStore::new();
        store.set_variable("x", 1.0, Some("1".to_string()), None).unwrap();
        store.set_variable("x", 2.0, None, None).unwrap();
        assert_eq!(store.get_value("x").unwrap(), 2.0);
        assert_eq!(store.list_user_variables().len(), 1);
        assert!(store.get_variable("x").unwrap().expression.is_none());
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut store = VariableStore::new();
        let err = store.set_variable("", 1.0, None, None).unwrap_err();
        assert!(err.is(ErrorKind::InvalidInput));
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut store = VariableStore::new();
        store.set_variable("Rate", 0.05, None, None).unwrap();
        assert!(store.has_variable("Rate"));
        assert!(!store.has_variable("rate"));
    }

    #[test]
    fn test_list_sorted_by_name() {
        let mut store = seeded();
        store.set_variable("b", 2.0, None, None).unwrap();
        store.set_variable("a", 1.0, None, None).unwrap();
        let names: Vec<&str> = store
            .list_user_variables()
            .into_iter()
            .map(|v| v.name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_scope_bindings_do_not_leak() {
        let mut store = VariableStore::new();
        store.set_variable("x", 10.0, None, None).unwrap();
        {
            let mut scope = Scope::new(&store);
            scope.bind("x", 1.0);
            scope.bind("x", 2.0);
            assert_eq!(scope.get_value("x").unwrap(), 2.0);
            scope.unbind();
            assert_eq!(scope.get_value("x").unwrap(), 1.0);
            scope.rebind("x", 5.0);
            assert_eq!(scope.get_value("x").unwrap(), 5.0);
            scope.unbind();
            assert_eq!(scope.get_value("x").unwrap(), 10.0);
        }
        assert_eq!(store.get_value("x").unwrap(), 10.0);
    }
}
