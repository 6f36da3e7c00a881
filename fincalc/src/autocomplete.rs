//! Formula autocomplete
//!
//! A fixed catalog of functions, constants and common formulas, ranked
//! against what the user has typed so far.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub title: String,
    pub subtitle: String,
    pub category: String,
    /// Text to insert into the input when picked
    pub insertion_text: String,
}

struct Entry {
    title: &'static str,
    subtitle: &'static str,
    category: &'static str,
    insertion: &'static str,
}

const fn entry(
    title: &'static str,
    subtitle: &'static str,
    category: &'static str,
    insertion: &'static str,
) -> Entry {
    Entry {
        title,
        subtitle,
        category,
        insertion,
    }
}

const CATALOG: &[Entry] = &[
    // Math
    entry("sqrt", "Square root", "Math", "sqrt()"),
    entry("cbrt", "Cube root", "Math", "cbrt()"),
    entry("abs", "Absolute value", "Math", "abs()"),
    entry("exp", "e raised to a power", "Math", "exp()"),
    entry("ln", "Natural logarithm", "Math", "ln()"),
    entry("log", "Logarithm, base 10 or given base", "Math", "log()"),
    entry("pow", "Power", "Math", "pow(, )"),
    entry("round", "Round to digits", "Math", "round(, 2)"),
    entry("floor", "Round down", "Math", "floor()"),
    entry("ceil", "Round up", "Math", "ceil()"),
    entry("fact", "Factorial", "Math", "fact()"),
    entry("sin", "Sine", "Trigonometry", "sin()"),
    entry("cos", "Cosine", "Trigonometry", "cos()"),
    entry("tan", "Tangent", "Trigonometry", "tan()"),
    entry("asin", "Inverse sine", "Trigonometry", "asin()"),
    entry("acos", "Inverse cosine", "Trigonometry", "acos()"),
    entry("atan", "Inverse tangent", "Trigonometry", "atan()"),
    entry("sum", "Sum of values", "Aggregate", "sum()"),
    entry("product", "Product of values", "Aggregate", "product()"),
    entry("min", "Smallest value", "Aggregate", "min()"),
    entry("max", "Largest value", "Aggregate", "max()"),
    entry("avg", "Mean of values", "Aggregate", "avg()"),
    entry("integral", "Definite integral", "Calculus", "integral(, x, 0, 1)"),
    // Finance
    entry("fv", "Future value", "Finance", "fv(rate, nper, pmt, pv)"),
    entry("pv", "Present value", "Finance", "pv(rate, nper, pmt, fv)"),
    entry("pmt", "Loan payment", "Finance", "pmt(rate, nper, pv)"),
    entry("nper", "Number of periods", "Finance", "nper(rate, pmt, pv, fv)"),
    entry("rate", "Interest rate per period", "Finance", "rate(nper, pmt, pv, fv)"),
    entry("ipmt", "Interest portion of a payment", "Finance", "ipmt(rate, per, nper, pv)"),
    entry("ppmt", "Principal portion of a payment", "Finance", "ppmt(rate, per, nper, pv)"),
    entry("effect", "Effective annual rate", "Finance", "effect(rate, 12)"),
    entry("nominal", "Nominal annual rate", "Finance", "nominal(rate, 12)"),
    // Constants
    entry("pi", "Ratio of circumference to diameter", "Constant", "pi"),
    entry("e", "Euler's number", "Constant", "e"),
    entry("tau", "Two pi", "Constant", "tau"),
    entry("phi", "Golden ratio", "Constant", "phi"),
    entry("sqrt2", "Square root of 2", "Constant", "sqrt2"),
    entry("sqrt3", "Square root of 3", "Constant", "sqrt3"),
    entry("ln2", "Natural log of 2", "Constant", "ln2"),
    entry("ln10", "Natural log of 10", "Constant", "ln10"),
    // Formulas
    entry(
        "Compound interest",
        "Balance after compounding",
        "Formula",
        "principal * (1 + rate / n)^(n * years)",
    ),
    entry(
        "Continuous compounding",
        "Balance with continuous growth",
        "Formula",
        "principal * exp(rate * years)",
    ),
    entry("Simple interest", "Interest without compounding", "Formula", "principal * rate * years"),
    entry(
        "Monthly mortgage payment",
        "Level payment on a home loan",
        "Formula",
        "-pmt(rate / 12, years * 12, principal)",
    ),
    entry("Rule of 72", "Years to double", "Formula", "72 / (rate * 100)"),
    entry("Percentage change", "Relative change", "Formula", "(new - old) / old * 100"),
    entry(
        "Pythagorean theorem",
        "Hypotenuse length",
        "Formula",
        "sqrt(a^2 + b^2)",
    ),
];

/// Tier of a catalog entry for `query` (already lowercased), lower is better
fn rank(entry: &Entry, query: &str) -> Option<u8> {
    let title = entry.title.to_lowercase();
    if title.starts_with(query) {
        Some(0)
    } else if title.contains(query) {
        Some(1)
    } else if entry.subtitle.to_lowercase().contains(query)
        || entry.insertion.to_lowercase().contains(query)
    {
        Some(2)
    } else {
        None
    }
}

/// Ranked suggestions for a partial input, at most `limit`
///
/// Title prefix matches come first, then title substrings, then matches in
/// the description or inserted text; catalog order breaks ties. Blank input
/// yields nothing.
pub fn suggestions(partial: &str, limit: usize) -> Vec<Suggestion> {
    let query = partial.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let mut ranked: Vec<(u8, &Entry)> = CATALOG
        .iter()
        .filter_map(|e| rank(e, &query).map(|tier| (tier, e)))
        .collect();
    // Stable, so catalog order survives within a tier
    ranked.sort_by_key(|(tier, _)| *tier);

    ranked
        .into_iter()
        .take(limit)
        .map(|(_, e)| Suggestion {
            title: e.title.to_string(),
            subtitle: e.subtitle.to_string(),
            category: e.category.to_string(),
            insertion_text: e.insertion.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(partial: &str, limit: usize) -> Vec<String> {
        suggestions(partial, limit).into_iter().map(|s| s.title).collect()
    }

    #[test]
    fn test_prefix_before_substring() {
        // The theorem only matches through its insertion text
        assert_eq!(
            titles("sq", 10),
            vec!["sqrt", "sqrt2", "sqrt3", "Pythagorean theorem"]
        );
    }

    #[test]
    fn test_catalog_order_within_tier() {
        // All four match on their description only
        assert_eq!(titles("root", 10), vec!["sqrt", "cbrt", "sqrt2", "sqrt3"]);
        assert_eq!(titles("root", 2), vec!["sqrt", "cbrt"]);
    }

    #[test]
    fn test_case_insensitive_and_trimmed() {
        assert_eq!(
            titles("  COMPOUND ", 5),
            vec!["Compound interest", "Continuous compounding", "Simple interest"]
        );
    }

    #[test]
    fn test_limit() {
        assert_eq!(suggestions("a", 3).len(), 3);
        assert!(suggestions("a", 0).is_empty());
    }

    #[test]
    fn test_blank_and_no_match() {
        assert!(suggestions("   ", 10).is_empty());
        assert!(suggestions("zzzz", 10).is_empty());
    }

    #[test]
    fn test_subtitle_match() {
        let found = suggestions("golden", 5);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].insertion_text, "phi");
        assert_eq!(found[0].category, "Constant");
    }
}
