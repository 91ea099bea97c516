//! Display formatting shared by the narrative and the comparison table.
//!
//! Rounding is half-up at the requested precision, so `1.25` renders as
//! `1.3` at one decimal.

/// Round `value` to `decimals` places, halves away from zero.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

pub fn format_fixed(value: f64, decimals: u32) -> String {
    format!("{:.*}", decimals as usize, round_to(value, decimals))
}

/// `0.153` -> `15.3%`
pub fn format_percentage(value: f64) -> String {
    format!("{}%", format_fixed(value * 100.0, 1))
}

/// `150e9` -> `$150.0B`
pub fn format_currency_billion(value: f64) -> String {
    format!("${}B", format_fixed(value / 1e9, 1))
}

/// `1.25` -> `1.3x`
pub fn format_ratio(value: f64) -> String {
    format!("{}x", format_fixed(value, 1))
}

/// `189.987` -> `$189.99`
pub fn format_price(value: f64) -> String {
    format!("${}", format_fixed(value, 2))
}

/// Apply `formatter` to a present, finite value; `N/A` otherwise.
pub fn or_na(value: Option<f64>, formatter: impl Fn(f64) -> String) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => formatter(v),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        assert_eq!(format_percentage(0.153), "15.3%");
        assert_eq!(format_percentage(0.03), "3.0%");
        assert_eq!(format_percentage(0.0), "0.0%");
    }

    #[test]
    fn test_currency_billion() {
        assert_eq!(format_currency_billion(150e9), "$150.0B");
        assert_eq!(format_currency_billion(383_285_000_000.0), "$383.3B");
    }

    #[test]
    fn test_ratio_rounds_half_up() {
        assert_eq!(format_ratio(1.25), "1.3x");
        assert_eq!(format_ratio(12.0), "12.0x");
    }

    #[test]
    fn test_or_na() {
        assert_eq!(or_na(None, format_ratio), "N/A");
        assert_eq!(or_na(Some(f64::NAN), format_percentage), "N/A");
        assert_eq!(or_na(Some(189.987), format_price), "$189.99");
    }
}
