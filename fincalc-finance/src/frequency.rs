//! Payment / compounding frequency

use fincalc_core::FincalcError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Biweekly,
    Semimonthly,
    #[default]
    Monthly,
    Quarterly,
    Semiannually,
    Annually,
}

impl Frequency {
    pub const ALL: [Frequency; 7] = [
        Frequency::Weekly,
        Frequency::Biweekly,
        Frequency::Semimonthly,
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::Semiannually,
        Frequency::Annually,
    ];

    pub fn periods_per_year(self) -> u32 {
        match self {
            Frequency::Weekly => 52,
            Frequency::Biweekly => 26,
            Frequency::Semimonthly => 24,
            Frequency::Monthly => 12,
            Frequency::Quarterly => 4,
            Frequency::Semiannually => 2,
            Frequency::Annually => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Semimonthly => "semimonthly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Semiannually => "semiannually",
            Frequency::Annually => "annually",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Frequency {
    type Err = FincalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Frequency::ALL
            .into_iter()
            .find(|f| f.name() == lower)
            .ok_or_else(|| {
                FincalcError::invalid_input(format!("unknown frequency '{}'", s)).with_suggestion(
                    "Use weekly, biweekly, semimonthly, monthly, quarterly, semiannually or annually",
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_periods_per_year() {
        assert_eq!(Frequency::Monthly.periods_per_year(), 12);
        assert_eq!(Frequency::Quarterly.periods_per_year(), 4);
        assert_eq!(Frequency::Annually.periods_per_year(), 1);
    }

    #[test]
    fn test_parse() {
        assert_eq!(" Monthly ".parse::<Frequency>().unwrap(), Frequency::Monthly);
        assert!("fortnightly".parse::<Frequency>().is_err());
    }
}
