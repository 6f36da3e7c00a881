//! Plain numeric strings for display
//!
//! Currency and locale formatting belong to the host. These helpers only
//! guarantee that a non-finite value shows up as the `"Error"` sentinel the
//! display layer expects.

/// Displayed in place of NaN and infinite values
pub const ERROR_SENTINEL: &str = "Error";

/// Fixed decimal places, or the sentinel
pub fn format_number(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return ERROR_SENTINEL.to_string();
    }
    let s = format!("{:.*}", decimals, value);
    // Avoid "-0.00"
    if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
        return s[1..].to_string();
    }
    s
}

/// Fraction as a percentage string: 0.0525 -> "5.25%"
pub fn format_percent(fraction: f64, decimals: usize) -> String {
    if !fraction.is_finite() {
        return ERROR_SENTINEL.to_string();
    }
    format!("{}%", format_number(fraction * 100.0, decimals))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1628.894626777442, 2), "1628.89");
        assert_eq!(format_number(4.0, 0), "4");
    }

    #[test]
    fn test_non_finite_is_sentinel() {
        assert_eq!(format_number(f64::NAN, 2), "Error");
        assert_eq!(format_number(f64::INFINITY, 2), "Error");
        assert_eq!(format_percent(f64::NEG_INFINITY, 2), "Error");
    }

    #[test]
    fn test_negative_zero() {
        assert_eq!(format_number(-0.0001, 2), "0.00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.0525, 2), "5.25%");
    }
}
