//! Common financial utilities

use fincalc_core::{FincalcError, Result};
use tracing::trace;

/// Rates closer to zero than this use the zero-rate limit of the annuity
pub const RATE_EPSILON: f64 = 1e-12;

/// Validate that a rate is finite and > -1
pub fn validate_rate(rate: f64, what: &str) -> Result<()> {
    if !rate.is_finite() || rate <= -1.0 {
        return Err(FincalcError::invalid_input(format!(
            "{}: rate must be greater than -1, got {}",
            what, rate
        )));
    }
    Ok(())
}

/// Validate that a value is a finite number
pub fn validate_finite(value: f64, what: &str) -> Result<()> {
    if !value.is_finite() {
        return Err(FincalcError::invalid_input(format!(
            "{} must be a finite number, got {}",
            what, value
        )));
    }
    Ok(())
}

/// (1 + rate)^nper
pub fn compound_factor(rate: f64, nper: f64) -> f64 {
    (1.0 + rate).powf(nper)
}

/// ((1 + rate)^nper - 1) / rate, or nper when the rate is zero
pub fn annuity_factor(rate: f64, nper: f64) -> f64 {
    if rate.abs() < RATE_EPSILON {
        nper
    } else {
        (compound_factor(rate, nper) - 1.0) / rate
    }
}

/// d/drate of `annuity_factor`
pub fn annuity_factor_derivative(rate: f64, nper: f64) -> f64 {
    if rate.abs() < RATE_EPSILON {
        nper * (nper - 1.0) / 2.0
    } else {
        let growth = compound_factor(rate, nper);
        let d_growth = nper * compound_factor(rate, nper - 1.0);
        (d_growth * rate - (growth - 1.0)) / (rate * rate)
    }
}

/// Newton-Raphson iteration for finding roots
///
/// Stops when `|f(x)| < tol`, or when the step no longer changes `x` at
/// machine precision. Returns None on a zero or non-finite derivative, a
/// non-finite iterate, or when `max_iter` is exhausted.
pub fn newton_raphson<F, D>(guess: f64, f: F, df: D, max_iter: usize, tol: f64) -> Option<f64>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    let mut x = guess;

    for iteration in 0..max_iter {
        let fx = f(x);
        if !fx.is_finite() {
            return None;
        }
        if fx.abs() < tol {
            trace!(iteration, x, fx, "newton converged");
            return Some(x);
        }

        let dfx = df(x);
        if dfx == 0.0 || !dfx.is_finite() {
            return None;
        }

        // x_new = x - f(x)/f'(x)
        let x_new = x - fx / dfx;
        if !x_new.is_finite() {
            return None;
        }
        if (x_new - x).abs() <= f64::EPSILON * x.abs().max(1.0) {
            trace!(iteration, x = x_new, "newton step stalled at machine precision");
            return Some(x_new);
        }

        x = x_new;
    }

    None
}

/// Bisection on a bracket whose endpoints have opposite signs, or where
/// one endpoint is already a root
pub fn bisection<F>(f: F, mut lo: f64, mut hi: f64, max_iter: usize, tol: f64) -> Option<f64>
where
    F: Fn(f64) -> f64,
{
    let mut f_lo = f(lo);
    let f_hi = f(hi);
    if !f_lo.is_finite() || !f_hi.is_finite() {
        return None;
    }
    if f_lo == 0.0 {
        return Some(lo);
    }
    if f_hi == 0.0 {
        return Some(hi);
    }
    if f_lo.signum() == f_hi.signum() {
        return None;
    }

    for _ in 0..max_iter {
        let mid = 0.5 * (lo + hi);
        let f_mid = f(mid);
        if !f_mid.is_finite() {
            return None;
        }
        if f_mid.abs() < tol || (hi - lo).abs() <= f64::EPSILON * mid.abs().max(1.0) {
            return Some(mid);
        }
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }

    None
}

/// First adjacent pair of `candidates` where `f` changes sign or hits zero
pub fn find_bracket<F>(f: F, candidates: &[f64]) -> Option<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    let values: Vec<(f64, f64)> = candidates
        .iter()
        .map(|&x| (x, f(x)))
        .filter(|(_, fx)| fx.is_finite())
        .collect();

    values.windows(2).find_map(|pair| {
        let (a, fa) = pair[0];
        let (b, fb) = pair[1];
        // signum() of 0.0 is 1.0, so exact roots need their own check
        if fa == 0.0 || fb == 0.0 || fa.signum() != fb.signum() {
            Some((a, b))
        } else {
            None
        }
    })
}
