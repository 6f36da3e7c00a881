//! Time value of money solver
//!
//! Five quantities are tied together by
//!
//! ```text
//! FV = PV·(1+r)^n + PMT·((1+r)^n − 1)/r · t
//! ```
//!
//! where `t = 1 + r` when payments fall at the beginning of each period and
//! `1` otherwise. Given any four, the solver computes the fifth: closed forms
//! for future value, present value, payment and number of periods, and
//! Newton-Raphson (with a bisection fallback) for the periodic rate.

use crate::frequency::Frequency;
use crate::helpers::*;
use fincalc_core::{FincalcError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Rates scanned for a sign change when Newton-Raphson fails
const BRACKET_CANDIDATES: [f64; 18] = [
    -0.99, -0.9, -0.5, -0.2, -0.1, -0.05, -0.01, 0.0, 0.001, 0.01, 0.05, 0.1, 0.2, 0.5, 1.0, 2.0,
    5.0, 10.0,
];

const BISECTION_MAX_ITER: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TvmField {
    PresentValue,
    FutureValue,
    Payment,
    RatePerPeriod,
    NumberOfPeriods,
}

impl TvmField {
    pub const ALL: [TvmField; 5] = [
        TvmField::PresentValue,
        TvmField::FutureValue,
        TvmField::Payment,
        TvmField::RatePerPeriod,
        TvmField::NumberOfPeriods,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TvmField::PresentValue => "present value",
            TvmField::FutureValue => "future value",
            TvmField::Payment => "payment",
            TvmField::RatePerPeriod => "rate per period",
            TvmField::NumberOfPeriods => "number of periods",
        }
    }
}

/// When in each period payments are made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentTiming {
    /// Ordinary annuity
    #[default]
    End,
    /// Annuity due
    Beginning,
}

impl PaymentTiming {
    /// Spreadsheet-style `type` argument: 0 = end, anything else = beginning
    pub fn from_type_flag(flag: f64) -> Self {
        if flag == 0.0 {
            PaymentTiming::End
        } else {
            PaymentTiming::Beginning
        }
    }

    /// Multiplier applied to every payment term
    pub fn factor(self, rate: f64) -> f64 {
        match self {
            PaymentTiming::End => 1.0,
            PaymentTiming::Beginning => 1.0 + rate,
        }
    }
}

/// Four known values and the name of the unknown fifth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TvmInputs {
    pub present_value: Option<f64>,
    pub future_value: Option<f64>,
    pub payment: Option<f64>,
    pub rate_per_period: Option<f64>,
    pub number_of_periods: Option<f64>,
    pub solve_for: TvmField,
    #[serde(default)]
    pub timing: PaymentTiming,
    /// Used to annualize the solved rate
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: f64,
}

fn default_periods_per_year() -> f64 {
    1.0
}

impl TvmInputs {
    /// Empty inputs with `field` as the unknown
    pub fn solving_for(field: TvmField) -> Self {
        Self {
            present_value: None,
            future_value: None,
            payment: None,
            rate_per_period: None,
            number_of_periods: None,
            solve_for: field,
            timing: PaymentTiming::End,
            periods_per_year: default_periods_per_year(),
        }
    }

    pub fn present_value(mut self, value: f64) -> Self {
        self.present_value = Some(value);
        self
    }

    pub fn future_value(mut self, value: f64) -> Self {
        self.future_value = Some(value);
        self
    }

    pub fn payment(mut self, value: f64) -> Self {
        self.payment = Some(value);
        self
    }

    pub fn rate_per_period(mut self, value: f64) -> Self {
        self.rate_per_period = Some(value);
        self
    }

    pub fn number_of_periods(mut self, value: f64) -> Self {
        self.number_of_periods = Some(value);
        self
    }

    pub fn frequency(mut self, frequency: Frequency) -> Self {
        self.periods_per_year = frequency.periods_per_year() as f64;
        self
    }

    /// Nominal annual rate (0.06 = 6%) spread over the frequency's periods
    pub fn annual_rate(self, annual_rate: f64, frequency: Frequency) -> Self {
        let ppy = frequency.periods_per_year() as f64;
        self.frequency(frequency).rate_per_period(annual_rate / ppy)
    }

    /// Term in years converted to a period count
    pub fn term_years(self, years: f64, frequency: Frequency) -> Self {
        let ppy = frequency.periods_per_year() as f64;
        self.frequency(frequency).number_of_periods(years * ppy)
    }

    pub fn payments_at_beginning(mut self, beginning: bool) -> Self {
        self.timing = if beginning {
            PaymentTiming::Beginning
        } else {
            PaymentTiming::End
        };
        self
    }

    pub fn get(&self, field: TvmField) -> Option<f64> {
        match field {
            TvmField::PresentValue => self.present_value,
            TvmField::FutureValue => self.future_value,
            TvmField::Payment => self.payment,
            TvmField::RatePerPeriod => self.rate_per_period,
            TvmField::NumberOfPeriods => self.number_of_periods,
        }
    }

    /// Exactly four populated, finite values, and the unknown is the missing one
    pub fn validate(&self) -> Result<()> {
        let populated = TvmField::ALL
            .iter()
            .filter(|f| self.get(**f).is_some())
            .count();
        if populated != 4 {
            return Err(FincalcError::invalid_input(format!(
                "exactly four of the five values must be given, got {}",
                populated
            )));
        }
        if self.get(self.solve_for).is_some() {
            return Err(FincalcError::invalid_input(format!(
                "{} is given but was asked to be solved for",
                self.solve_for.name()
            )));
        }
        for field in TvmField::ALL {
            if let Some(value) = self.get(field) {
                validate_finite(value, field.name())?;
            }
        }
        if let Some(rate) = self.rate_per_period {
            validate_rate(rate, "tvm")?;
        }
        if !(self.periods_per_year.is_finite() && self.periods_per_year > 0.0) {
            return Err(FincalcError::invalid_input("periods per year must be positive"));
        }
        Ok(())
    }
}

/// All five values after solving
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TvmSolution {
    pub solved_for: TvmField,
    /// The solved value (also stored in its own field below)
    pub value: f64,
    pub present_value: f64,
    pub future_value: f64,
    pub payment: f64,
    pub rate_per_period: f64,
    pub number_of_periods: f64,
    pub periods_per_year: f64,
}

impl TvmSolution {
    /// Nominal annual rate as a percentage: 0.00598 monthly -> 7.177
    pub fn annual_rate_percent(&self) -> f64 {
        self.rate_per_period * self.periods_per_year * 100.0
    }
}

/// Tuning for the iterative rate solve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub initial_guess: f64,
    pub max_iterations: usize,
    /// Residual bound, scaled by the largest magnitude among the cash flows
    pub tolerance: f64,
    pub bisection_fallback: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            initial_guess: 0.1,
            max_iterations: 100,
            tolerance: 1e-9,
            bisection_fallback: true,
        }
    }
}

impl SolverConfig {
    pub fn with_initial_guess(mut self, guess: f64) -> Self {
        self.initial_guess = guess;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_bisection_fallback(mut self, enabled: bool) -> Self {
        self.bisection_fallback = enabled;
        self
    }
}

// ============ Closed forms ============

pub fn future_value(pv: f64, pmt: f64, rate: f64, nper: f64, timing: PaymentTiming) -> f64 {
    pv * compound_factor(rate, nper) + pmt * annuity_factor(rate, nper) * timing.factor(rate)
}

pub fn present_value(fv: f64, pmt: f64, rate: f64, nper: f64, timing: PaymentTiming) -> f64 {
    (fv - pmt * annuity_factor(rate, nper) * timing.factor(rate)) / compound_factor(rate, nper)
}

pub fn payment(pv: f64, fv: f64, rate: f64, nper: f64, timing: PaymentTiming) -> Result<f64> {
    let denominator = annuity_factor(rate, nper) * timing.factor(rate);
    if denominator == 0.0 || !denominator.is_finite() {
        return Err(FincalcError::unsolvable(
            "payment is undefined for zero periods",
        ));
    }
    Ok((fv - pv * compound_factor(rate, nper)) / denominator)
}

pub fn number_of_periods(
    pv: f64,
    fv: f64,
    pmt: f64,
    rate: f64,
    timing: PaymentTiming,
) -> Result<f64> {
    let n = if rate.abs() < RATE_EPSILON {
        if pmt == 0.0 {
            return Err(FincalcError::unsolvable(
                "with zero rate and zero payment the balance never changes",
            ));
        }
        (fv - pv) / pmt
    } else {
        if pmt == 0.0 && pv <= 0.0 {
            return Err(FincalcError::unsolvable(
                "present value must be positive when there are no payments",
            ));
        }
        // FV + k = (1+r)^n · (PV + k) with k = PMT·t / r
        let k = pmt * timing.factor(rate) / rate;
        let ratio = (fv + k) / (pv + k);
        if !(ratio.is_finite() && ratio > 0.0) {
            return Err(FincalcError::unsolvable(
                "the payment can never move the present value to the future value",
            ));
        }
        ratio.ln() / (1.0 + rate).ln()
    };

    if !n.is_finite() || n < 0.0 {
        return Err(FincalcError::unsolvable(format!(
            "number of periods would be {}",
            n
        )));
    }
    Ok(n)
}

// ============ Solver ============

#[derive(Debug, Clone, Default)]
pub struct TvmSolver {
    config: SolverConfig,
}

impl TvmSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Compute the missing value
    ///
    /// When both present and future value are given with opposite signs,
    /// the inputs are read as signed cash flows (money paid out negative)
    /// and present value and payment are negated into the balance form of
    /// the equation before solving. The solution is reported in the
    /// caller's signs.
    pub fn solve(&self, inputs: &TvmInputs) -> Result<TvmSolution> {
        inputs.validate()?;

        let sign = match (inputs.present_value, inputs.future_value) {
            (Some(pv), Some(fv)) if pv * fv < 0.0 => -1.0,
            _ => 1.0,
        };
        let timing = inputs.timing;

        let mut pv = inputs.present_value.unwrap_or(0.0) * sign;
        let mut fv = inputs.future_value.unwrap_or(0.0);
        let mut pmt = inputs.payment.unwrap_or(0.0) * sign;
        let mut rate = inputs.rate_per_period.unwrap_or(0.0);
        let mut nper = inputs.number_of_periods.unwrap_or(0.0);

        let value = match inputs.solve_for {
            TvmField::FutureValue => {
                fv = future_value(pv, pmt, rate, nper, timing);
                fv
            }
            TvmField::PresentValue => {
                pv = present_value(fv, pmt, rate, nper, timing);
                pv
            }
            TvmField::Payment => {
                pmt = payment(pv, fv, rate, nper, timing)?;
                pmt
            }
            TvmField::NumberOfPeriods => {
                nper = number_of_periods(pv, fv, pmt, rate, timing)?;
                nper
            }
            TvmField::RatePerPeriod => {
                rate = self.solve_rate(pv, fv, pmt, nper, timing)?;
                rate
            }
        };

        let value = match inputs.solve_for {
            TvmField::PresentValue | TvmField::Payment => value * sign,
            _ => value,
        };

        debug!(
            solve_for = inputs.solve_for.name(),
            value, "tvm solved"
        );

        Ok(TvmSolution {
            solved_for: inputs.solve_for,
            value,
            present_value: pv * sign,
            future_value: fv,
            payment: pmt * sign,
            rate_per_period: rate,
            number_of_periods: nper,
            periods_per_year: inputs.periods_per_year,
        })
    }

    /// Periodic rate by Newton-Raphson on
    /// `f(r) = PV(1+r)^n + PMT·a(r)·t(r) − FV`
    fn solve_rate(
        &self,
        pv: f64,
        fv: f64,
        pmt: f64,
        nper: f64,
        timing: PaymentTiming,
    ) -> Result<f64> {
        if nper <= 0.0 {
            return Err(FincalcError::unsolvable(
                "rate is undefined without at least one period",
            ));
        }

        let f = |r: f64| -> f64 {
            if r <= -1.0 {
                return f64::NAN;
            }
            residual(pv, fv, pmt, r, nper, timing)
        };
        let df = |r: f64| -> f64 {
            if r <= -1.0 {
                return f64::NAN;
            }
            let a = annuity_factor(r, nper);
            let da = annuity_factor_derivative(r, nper);
            let (t, dt) = match timing {
                PaymentTiming::End => (1.0, 0.0),
                PaymentTiming::Beginning => (1.0 + r, 1.0),
            };
            pv * nper * compound_factor(r, nper - 1.0) + pmt * (da * t + a * dt)
        };

        let scale = pv.abs().max(fv.abs()).max(pmt.abs()).max(1.0);
        let tol = self.config.tolerance * scale;

        if let Some(rate) = newton_raphson(
            self.config.initial_guess,
            f,
            df,
            self.config.max_iterations,
            tol,
        ) {
            if rate > -1.0 {
                return Ok(rate);
            }
        }

        if self.config.bisection_fallback {
            debug!("newton-raphson failed, falling back to bisection");
            if let Some((lo, hi)) = find_bracket(f, &BRACKET_CANDIDATES) {
                if let Some(rate) = bisection(f, lo, hi, BISECTION_MAX_ITER, tol) {
                    return Ok(rate);
                }
            }
        }

        Err(FincalcError::convergence(format!(
            "rate did not converge within {} iterations",
            self.config.max_iterations
        )))
    }
}

/// Left side minus right side of the TVM equation
pub fn residual(pv: f64, fv: f64, pmt: f64, rate: f64, nper: f64, timing: PaymentTiming) -> f64 {
    future_value(pv, pmt, rate, nper, timing) - fv
}

/// Solve with the default configuration
pub fn solve(inputs: &TvmInputs) -> Result<TvmSolution> {
    TvmSolver::default().solve(inputs)
}
