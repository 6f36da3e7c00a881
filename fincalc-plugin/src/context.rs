//! Evaluation Context

use crate::{FunctionRegistry, Scope, VariableStore};
use fincalc_core::Result;

/// Everything an evaluation reads: the function table and the scoped variables
#[derive(Debug)]
pub struct EvalContext<'a> {
    pub registry: &'a FunctionRegistry,
    pub scope: Scope<'a>,
}

impl<'a> EvalContext<'a> {
    pub fn new(registry: &'a FunctionRegistry, store: &'a VariableStore) -> Self {
        Self {
            registry,
            scope: Scope::new(store),
        }
    }

    pub fn get_var(&self, name: &str) -> Result<f64> {
        self.scope.get_value(name)
    }

    pub fn call_function(&self, name: &str, args: &[f64]) -> Result<f64> {
        self.registry.call_function(name, args)
    }
}
