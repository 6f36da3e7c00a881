//! fincalc Finance
//!
//! Time value of money, loan amortization, and the financial functions
//! exposed to expressions. All amounts are `f64`; rates are fractions
//! (0.05 = 5%).

mod frequency;
mod functions;
mod helpers;
mod loans;
mod tvm;

pub use frequency::Frequency;
pub use loans::{
    base_payment, generate_schedule, AmortizationConfig, AmortizationEngine, AmortizationResult,
    AmortizationRow, LoanDefinition, MAX_PERIODS,
};
pub use tvm::{
    future_value, number_of_periods, payment, present_value, solve, PaymentTiming, SolverConfig,
    TvmField, TvmInputs, TvmSolution, TvmSolver,
};

use fincalc_plugin::FunctionRegistry;

/// Load finance functions into registry
pub fn load_finance_library(registry: FunctionRegistry) -> FunctionRegistry {
    registry
        // TVM
        .with_function(functions::FV)
        .with_function(functions::PV)
        .with_function(functions::PMT)
        .with_function(functions::NPER)
        .with_function(functions::RATE)
        // Loans
        .with_function(functions::IPMT)
        .with_function(functions::PPMT)
        // Rate conversion
        .with_function(functions::EFFECT)
        .with_function(functions::NOMINAL)
}
