//! Financial functions callable from expressions
//!
//! Signs follow the balance form of the TVM equation, so a loan of 250000
//! has a negative payment: `pmt(0.05/12, 360, 250000)` is -1342.05.
//! The optional `type` argument is 0 for payments at the end of each period
//! and 1 for the beginning.

use crate::helpers::*;
use crate::tvm::{self, PaymentTiming, TvmField, TvmInputs, TvmSolver};
use fincalc_plugin::prelude::*;

fn timing(args: &[f64], index: usize) -> PaymentTiming {
    args.get(index)
        .copied()
        .map(PaymentTiming::from_type_flag)
        .unwrap_or_default()
}

fn fv(args: &[f64]) -> Result<f64> {
    let (rate, nper, pmt, pv) = (args[0], args[1], args[2], args[3]);
    validate_rate(rate, "fv")?;
    Ok(tvm::future_value(pv, pmt, rate, nper, timing(args, 4)))
}

fn pv(args: &[f64]) -> Result<f64> {
    let (rate, nper, pmt, fv) = (args[0], args[1], args[2], args[3]);
    validate_rate(rate, "pv")?;
    Ok(tvm::present_value(fv, pmt, rate, nper, timing(args, 4)))
}

fn pmt(args: &[f64]) -> Result<f64> {
    let (rate, nper, pv) = (args[0], args[1], args[2]);
    let fv = args.get(3).copied().unwrap_or(0.0);
    validate_rate(rate, "pmt")?;
    tvm::payment(pv, fv, rate, nper, timing(args, 4))
}

fn nper(args: &[f64]) -> Result<f64> {
    let (rate, pmt, pv, fv) = (args[0], args[1], args[2], args[3]);
    validate_rate(rate, "nper")?;
    tvm::number_of_periods(pv, fv, pmt, rate, timing(args, 4))
}

fn rate(args: &[f64]) -> Result<f64> {
    let inputs = TvmInputs::solving_for(TvmField::RatePerPeriod)
        .number_of_periods(args[0])
        .payment(args[1])
        .present_value(args[2])
        .future_value(args[3])
        .payments_at_beginning(timing(args, 4) == PaymentTiming::Beginning);
    Ok(TvmSolver::default().solve(&inputs)?.value)
}

/// Outstanding balance and level payment (both positive) for a loan of `pv`
fn loan_position(name: &str, args: &[f64]) -> Result<(f64, f64, f64)> {
    let (rate, per, nper, pv) = (args[0], args[1], args[2], args[3]);
    validate_rate(rate, name)?;
    if per.fract() != 0.0 || per < 1.0 || per > nper {
        return Err(FincalcError::domain_error(format!(
            "{}: period must be a whole number between 1 and {}, got {}",
            name, nper, per
        )));
    }
    let payment = -tvm::payment(pv, 0.0, rate, nper, PaymentTiming::End)?;
    let balance = tvm::future_value(pv, -payment, rate, per - 1.0, PaymentTiming::End);
    Ok((rate, balance, payment))
}

/// Interest charged in period `per`
fn ipmt(args: &[f64]) -> Result<f64> {
    let (rate, balance, _) = loan_position("ipmt", args)?;
    Ok(balance * rate)
}

/// Principal repaid in period `per`
fn ppmt(args: &[f64]) -> Result<f64> {
    let (rate, balance, payment) = loan_position("ppmt", args)?;
    Ok(payment - balance * rate)
}

fn compounding_periods(name: &str, periods: f64) -> Result<f64> {
    if !periods.is_finite() || periods < 1.0 {
        return Err(FincalcError::domain_error(format!(
            "{}: periods per year must be at least 1, got {}",
            name, periods
        )));
    }
    Ok(periods.trunc())
}

/// Effective annual rate from a nominal rate compounded `periods` times
fn effect(args: &[f64]) -> Result<f64> {
    let periods = compounding_periods("effect", args[1])?;
    Ok(compound_factor(args[0] / periods, periods) - 1.0)
}

fn nominal(args: &[f64]) -> Result<f64> {
    let periods = compounding_periods("nominal", args[1])?;
    validate_rate(args[0], "nominal")?;
    Ok(periods * (compound_factor(args[0], 1.0 / periods) - 1.0))
}

pub const FV: FunctionDef = FunctionDef {
    name: "fv",
    description: "Future value of a present sum plus level payments",
    usage: "fv(rate, nper, pmt, pv, [type])",
    category: "finance",
    arity: Arity::Range(4, 5),
    markup: MarkupStyle::Operator,
    eval: fv,
};

pub const PV: FunctionDef = FunctionDef {
    name: "pv",
    description: "Present value of a future sum and level payments",
    usage: "pv(rate, nper, pmt, fv, [type])",
    category: "finance",
    arity: Arity::Range(4, 5),
    markup: MarkupStyle::Operator,
    eval: pv,
};

pub const PMT: FunctionDef = FunctionDef {
    name: "pmt",
    description: "Level payment that moves pv to fv",
    usage: "pmt(rate, nper, pv, [fv], [type])",
    category: "finance",
    arity: Arity::Range(3, 5),
    markup: MarkupStyle::Operator,
    eval: pmt,
};

pub const NPER: FunctionDef = FunctionDef {
    name: "nper",
    description: "Number of periods to move pv to fv",
    usage: "nper(rate, pmt, pv, fv, [type])",
    category: "finance",
    arity: Arity::Range(4, 5),
    markup: MarkupStyle::Operator,
    eval: nper,
};

pub const RATE: FunctionDef = FunctionDef {
    name: "rate",
    description: "Interest rate per period, solved iteratively",
    usage: "rate(nper, pmt, pv, fv, [type])",
    category: "finance",
    arity: Arity::Range(4, 5),
    markup: MarkupStyle::Operator,
    eval: rate,
};

pub const IPMT: FunctionDef = FunctionDef {
    name: "ipmt",
    description: "Interest portion of a loan payment",
    usage: "ipmt(rate, per, nper, pv)",
    category: "finance",
    arity: Arity::Exact(4),
    markup: MarkupStyle::Operator,
    eval: ipmt,
};

pub const PPMT: FunctionDef = FunctionDef {
    name: "ppmt",
    description: "Principal portion of a loan payment",
    usage: "ppmt(rate, per, nper, pv)",
    category: "finance",
    arity: Arity::Exact(4),
    markup: MarkupStyle::Operator,
    eval: ppmt,
};

pub const EFFECT: FunctionDef = FunctionDef {
    name: "effect",
    description: "Effective annual rate",
    usage: "effect(nominal_rate, periods)",
    category: "finance",
    arity: Arity::Exact(2),
    markup: MarkupStyle::Operator,
    eval: effect,
};

pub const NOMINAL: FunctionDef = FunctionDef {
    name: "nominal",
    description: "Nominal annual rate",
    usage: "nominal(effective_rate, periods)",
    category: "finance",
    arity: Arity::Exact(2),
    markup: MarkupStyle::Operator,
    eval: nominal,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_fv_and_pv() {
        assert!(close(FV.call(&[0.05, 10.0, 0.0, 1000.0]).unwrap(), 1628.89, 1e-2));
        assert!(close(PV.call(&[0.05, 10.0, 0.0, 1628.894627]).unwrap(), 1000.0, 1e-3));
    }

    #[test]
    fn test_pmt() {
        let payment = PMT.call(&[0.05 / 12.0, 360.0, 250000.0]).unwrap();
        assert!(close(payment, -1342.05, 1e-2), "got {}", payment);
    }

    #[test]
    fn test_nper_and_rate_invert_fv() {
        let periods = NPER.call(&[0.05, 0.0, 1000.0, 2000.0]).unwrap();
        assert!(close(periods, 14.2067, 1e-4));

        let r = RATE.call(&[10.0, 0.0, -1000.0, 2000.0]).unwrap();
        assert!(close(r, 0.071773, 1e-6));
    }

    #[test]
    fn test_ipmt_plus_ppmt_is_payment() {
        let args = [0.01, 5.0, 12.0, 10000.0];
        let interest = IPMT.call(&args).unwrap();
        let principal = PPMT.call(&args).unwrap();
        let payment = -PMT.call(&[0.01, 12.0, 10000.0]).unwrap();
        assert!(close(interest + principal, payment, 1e-9));
        assert!(close(IPMT.call(&[0.01, 1.0, 12.0, 10000.0]).unwrap(), 100.0, 1e-9));
    }

    #[test]
    fn test_period_out_of_range() {
        let err = IPMT.call(&[0.01, 13.0, 12.0, 10000.0]).unwrap_err();
        assert!(err.is(ErrorKind::Domain));
    }

    #[test]
    fn test_effect_nominal() {
        let effective = EFFECT.call(&[0.12, 12.0]).unwrap();
        assert!(close(effective, 0.126825, 1e-6));
        let back = NOMINAL.call(&[effective, 12.0]).unwrap();
        assert!(close(back, 0.12, 1e-12));
        assert!(EFFECT.call(&[0.12, 0.0]).unwrap_err().is(ErrorKind::Domain));
    }

    #[test]
    fn test_arity() {
        let err = FV.call(&[0.05, 10.0]).unwrap_err();
        assert_eq!(err.code, codes::ARG_COUNT);
    }
}
