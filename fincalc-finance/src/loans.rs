//! Loan amortization schedules with optional extra payments

use crate::frequency::Frequency;
use crate::helpers::*;
use fincalc_core::{FincalcError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Longest schedule accepted, in payment periods
pub const MAX_PERIODS: usize = 10_000;

/// A fixed-rate loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanDefinition {
    pub principal: f64,
    /// Nominal annual rate as a fraction (0.06 = 6%)
    pub annual_rate: f64,
    pub term_years: f64,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub down_payment: f64,
    /// Added to every scheduled payment
    #[serde(default)]
    pub extra_payment: f64,
    /// Replaces the annuity payment when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_payment: Option<f64>,
}

impl LoanDefinition {
    pub fn new(principal: f64, annual_rate: f64, term_years: f64) -> Self {
        Self {
            principal,
            annual_rate,
            term_years,
            frequency: Frequency::default(),
            down_payment: 0.0,
            extra_payment: 0.0,
            scheduled_payment: None,
        }
    }

    pub fn frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn down_payment(mut self, amount: f64) -> Self {
        self.down_payment = amount;
        self
    }

    pub fn extra_payment(mut self, amount: f64) -> Self {
        self.extra_payment = amount;
        self
    }

    pub fn scheduled_payment(mut self, amount: f64) -> Self {
        self.scheduled_payment = Some(amount);
        self
    }

    pub fn financed_amount(&self) -> f64 {
        self.principal - self.down_payment
    }

    pub fn rate_per_period(&self) -> f64 {
        self.annual_rate / self.frequency.periods_per_year() as f64
    }

    /// Term rounded to whole periods, never less than one
    pub fn number_of_periods(&self) -> usize {
        let periods = (self.term_years * self.frequency.periods_per_year() as f64).round();
        (periods as usize).max(1)
    }

    pub fn validate(&self) -> Result<()> {
        validate_finite(self.principal, "principal")?;
        validate_finite(self.annual_rate, "annual rate")?;
        validate_finite(self.term_years, "term")?;
        validate_finite(self.down_payment, "down payment")?;
        validate_finite(self.extra_payment, "extra payment")?;

        if self.principal <= 0.0 {
            return Err(FincalcError::invalid_input("principal must be positive"));
        }
        if self.term_years <= 0.0 {
            return Err(FincalcError::invalid_input("term must be positive"));
        }
        let periods = (self.term_years * self.frequency.periods_per_year() as f64).round();
        if periods > MAX_PERIODS as f64 {
            return Err(FincalcError::invalid_input(format!(
                "term of {} {} payments exceeds the limit of {} periods",
                periods,
                self.frequency.name(),
                MAX_PERIODS
            )));
        }
        if self.annual_rate < 0.0 {
            return Err(FincalcError::invalid_input("annual rate cannot be negative"));
        }
        if self.down_payment < 0.0 {
            return Err(FincalcError::invalid_input("down payment cannot be negative"));
        }
        if self.down_payment >= self.principal {
            return Err(FincalcError::invalid_input(
                "down payment must be less than the principal",
            ));
        }
        if self.extra_payment < 0.0 {
            return Err(FincalcError::invalid_input("extra payment cannot be negative"));
        }
        if let Some(payment) = self.scheduled_payment {
            validate_finite(payment, "scheduled payment")?;
            if payment <= 0.0 {
                return Err(FincalcError::invalid_input(
                    "scheduled payment must be positive",
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// 1-based
    pub period_index: usize,
    pub payment_amount: f64,
    pub principal_portion: f64,
    pub interest_portion: f64,
    pub remaining_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationResult {
    pub rows: Vec<AmortizationRow>,
    /// Scheduled payment before any extra
    pub base_payment: f64,
    pub total_interest: f64,
    pub total_payments: f64,
    pub terms_saved_by_extra_payment: usize,
    pub interest_saved_by_extra_payment: f64,
}

impl AmortizationResult {
    pub fn number_of_payments(&self) -> usize {
        self.rows.len()
    }

    pub fn final_balance(&self) -> f64 {
        self.rows.last().map(|r| r.remaining_balance).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmortizationConfig {
    /// A balance at or below this counts as paid off
    pub epsilon: f64,
}

impl Default for AmortizationConfig {
    fn default() -> Self {
        Self { epsilon: 0.01 }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AmortizationEngine {
    config: AmortizationConfig,
}

impl AmortizationEngine {
    pub fn new(config: AmortizationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AmortizationConfig {
        &self.config
    }

    /// Full payment schedule, with savings measured against the same loan
    /// without extra payments
    pub fn generate_schedule(&self, loan: &LoanDefinition) -> Result<AmortizationResult> {
        loan.validate()?;

        let base_payment = base_payment(loan);
        let rate = loan.rate_per_period();
        let first_interest = loan.financed_amount() * rate;
        if first_interest >= base_payment + loan.extra_payment {
            return Err(FincalcError::non_amortizing(
                first_interest,
                base_payment + loan.extra_payment,
            ));
        }

        let mut result = self.run(loan, base_payment, loan.extra_payment);

        if loan.extra_payment > 0.0 {
            let baseline = self.run(loan, base_payment, 0.0);
            result.terms_saved_by_extra_payment =
                baseline.rows.len().saturating_sub(result.rows.len());
            result.interest_saved_by_extra_payment =
                baseline.total_interest - result.total_interest;
        }

        debug!(
            periods = result.rows.len(),
            base_payment,
            total_interest = result.total_interest,
            terms_saved = result.terms_saved_by_extra_payment,
            "amortization schedule generated"
        );

        Ok(result)
    }

    fn run(&self, loan: &LoanDefinition, base_payment: f64, extra: f64) -> AmortizationResult {
        let rate = loan.rate_per_period();
        let periods = loan.number_of_periods();
        let mut balance = loan.financed_amount();
        let mut rows = Vec::new();
        let mut total_interest = 0.0;
        let mut total_payments = 0.0;

        for period_index in 1..=periods {
            let interest = balance * rate;
            let principal = (base_payment + extra - interest).min(balance);
            balance -= principal;
            let payment_amount = principal + interest;

            total_interest += interest;
            total_payments += payment_amount;
            rows.push(AmortizationRow {
                period_index,
                payment_amount,
                principal_portion: principal,
                interest_portion: interest,
                remaining_balance: balance,
            });

            if balance <= self.config.epsilon {
                break;
            }
        }

        AmortizationResult {
            rows,
            base_payment,
            total_interest,
            total_payments,
            terms_saved_by_extra_payment: 0,
            interest_saved_by_extra_payment: 0.0,
        }
    }
}

/// Annuity payment on the financed amount, or the scheduled override
pub fn base_payment(loan: &LoanDefinition) -> f64 {
    if let Some(payment) = loan.scheduled_payment {
        return payment;
    }
    let financed = loan.financed_amount();
    let rate = loan.rate_per_period();
    let periods = loan.number_of_periods() as f64;
    if rate.abs() < RATE_EPSILON {
        financed / periods
    } else {
        financed * rate / (1.0 - compound_factor(rate, -periods))
    }
}

/// Schedule with the default configuration
pub fn generate_schedule(loan: &LoanDefinition) -> Result<AmortizationResult> {
    AmortizationEngine::default().generate_schedule(loan)
}
