//! Mathematical constants with sources

use fincalc_plugin::ConstantDef;
use std::f64::consts;

fn constant(name: &str, value: f64, markup: &str, source: &str, category: &str) -> ConstantDef {
    ConstantDef {
        name: name.to_string(),
        value,
        markup: Some(markup.to_string()),
        source: source.to_string(),
        category: category.to_string(),
    }
}

pub fn pi() -> ConstantDef {
    constant("pi", consts::PI, "\\pi", "https://oeis.org/A000796", "transcendental")
}

pub fn e() -> ConstantDef {
    constant("e", consts::E, "e", "https://oeis.org/A001113", "transcendental")
}

pub fn tau() -> ConstantDef {
    constant("tau", consts::TAU, "\\tau", "https://oeis.org/A019692", "transcendental")
}

pub fn phi() -> ConstantDef {
    // (1 + sqrt(5)) / 2
    constant(
        "phi",
        1.618_033_988_749_895,
        "\\varphi",
        "https://oeis.org/A001622",
        "algebraic",
    )
}

pub fn sqrt2() -> ConstantDef {
    constant("sqrt2", consts::SQRT_2, "\\sqrt{2}", "https://oeis.org/A002193", "algebraic")
}

pub fn sqrt3() -> ConstantDef {
    constant(
        "sqrt3",
        1.732_050_807_568_877_2,
        "\\sqrt{3}",
        "https://oeis.org/A002194",
        "algebraic",
    )
}

pub fn ln2() -> ConstantDef {
    constant("ln2", consts::LN_2, "\\ln 2", "https://oeis.org/A002162", "transcendental")
}

pub fn ln10() -> ConstantDef {
    constant("ln10", consts::LN_10, "\\ln 10", "https://oeis.org/A002392", "transcendental")
}

// Unicode aliases typed from the symbol keyboard

pub fn pi_unicode() -> ConstantDef {
    ConstantDef {
        name: "π".to_string(),
        ..pi()
    }
}

pub fn phi_unicode() -> ConstantDef {
    ConstantDef {
        name: "φ".to_string(),
        ..phi()
    }
}
