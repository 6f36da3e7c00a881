//! fincalc Standard Library

pub mod constants;
pub mod functions;

use fincalc_plugin::FunctionRegistry;

/// Load standard library into registry
pub fn load_standard_library(registry: FunctionRegistry) -> FunctionRegistry {
    registry
        .with_function(functions::SQRT)
        .with_function(functions::CBRT)
        .with_function(functions::ABS)
        .with_function(functions::EXP)
        .with_function(functions::LN)
        .with_function(functions::LOG)
        .with_function(functions::POW)
        .with_function(functions::ROUND)
        .with_function(functions::FLOOR)
        .with_function(functions::CEIL)
        .with_function(functions::FACT)
        .with_function(functions::SIN)
        .with_function(functions::COS)
        .with_function(functions::TAN)
        .with_function(functions::ASIN)
        .with_function(functions::ACOS)
        .with_function(functions::ATAN)
        .with_function(functions::SUM)
        .with_function(functions::PRODUCT)
        .with_function(functions::MIN)
        .with_function(functions::MAX)
        .with_function(functions::AVG)
        // Mathematical constants
        .with_constant(constants::pi())
        .with_constant(constants::e())
        .with_constant(constants::tau())
        .with_constant(constants::phi())
        .with_constant(constants::sqrt2())
        .with_constant(constants::sqrt3())
        .with_constant(constants::ln2())
        .with_constant(constants::ln10())
        // Unicode aliases
        .with_constant(constants::pi_unicode())
        .with_constant(constants::phi_unicode())
}

/// Create registry with standard library
pub fn standard_registry() -> FunctionRegistry {
    load_standard_library(FunctionRegistry::new())
}
