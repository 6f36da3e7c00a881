//! fincalc Plugin System
//!
//! Provides the extension points of the expression engine:
//! - Functions (lookup-table entries: arity, rule, markup style)
//! - Constants (seeded into every variable store)
//! - Variable store and evaluation scopes

mod context;
mod function;
mod registry;
mod store;

pub use context::EvalContext;
pub use function::{Arity, EvalFn, FunctionDef, MarkupStyle};
pub use registry::{ConstantDef, FunctionRegistry};
pub use store::{Scope, VariableStore};

/// Re-export core types for function authors
pub mod prelude {
    pub use crate::{
        Arity, ConstantDef, EvalContext, EvalFn, FunctionDef, FunctionRegistry, MarkupStyle,
        Scope, VariableStore,
    };
    pub use fincalc_core::prelude::*;
}
