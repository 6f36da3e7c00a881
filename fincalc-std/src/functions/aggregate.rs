//! Aggregate functions

use fincalc_plugin::prelude::*;

fn sum(args: &[f64]) -> Result<f64> {
    Ok(args.iter().sum())
}

fn product(args: &[f64]) -> Result<f64> {
    Ok(args.iter().product())
}

fn min(args: &[f64]) -> Result<f64> {
    Ok(args.iter().copied().fold(f64::INFINITY, f64::min))
}

fn max(args: &[f64]) -> Result<f64> {
    Ok(args.iter().copied().fold(f64::NEG_INFINITY, f64::max))
}

fn avg(args: &[f64]) -> Result<f64> {
    Ok(args.iter().sum::<f64>() / args.len() as f64)
}

pub const SUM: FunctionDef = FunctionDef {
    name: "sum",
    description: "Sum of values",
    usage: "sum(a, b, ...)",
    category: "aggregate",
    arity: Arity::AtLeast(1),
    markup: MarkupStyle::Operator,
    eval: sum,
};

pub const PRODUCT: FunctionDef = FunctionDef {
    name: "product",
    description: "Product of values",
    usage: "product(a, b, ...)",
    category: "aggregate",
    arity: Arity::AtLeast(1),
    markup: MarkupStyle::Operator,
    eval: product,
};

pub const MIN: FunctionDef = FunctionDef {
    name: "min",
    description: "Smallest value",
    usage: "min(a, b, ...)",
    category: "aggregate",
    arity: Arity::AtLeast(1),
    markup: MarkupStyle::Command("\\min"),
    eval: min,
};

pub const MAX: FunctionDef = FunctionDef {
    name: "max",
    description: "Largest value",
    usage: "max(a, b, ...)",
    category: "aggregate",
    arity: Arity::AtLeast(1),
    markup: MarkupStyle::Command("\\max"),
    eval: max,
};

pub const AVG: FunctionDef = FunctionDef {
    name: "avg",
    description: "Arithmetic mean",
    usage: "avg(a, b, ...)",
    category: "aggregate",
    arity: Arity::AtLeast(1),
    markup: MarkupStyle::Operator,
    eval: avg,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_and_product() {
        assert_eq!(SUM.call(&[1.0, 2.0, 3.0]).unwrap(), 6.0);
        assert_eq!(PRODUCT.call(&[2.0, 3.0, 4.0]).unwrap(), 24.0);
    }

    #[test]
    fn test_min_max_avg() {
        assert_eq!(MIN.call(&[3.0, -1.0, 2.0]).unwrap(), -1.0);
        assert_eq!(MAX.call(&[3.0, -1.0, 2.0]).unwrap(), 3.0);
        assert_eq!(AVG.call(&[1.0, 2.0, 3.0]).unwrap(), 2.0);
    }

    #[test]
    fn test_empty_call_rejected() {
        assert!(SUM.call(&[]).is_err());
    }
}
