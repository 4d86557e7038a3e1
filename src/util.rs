// Utility helpers for parsing and display formatting.
//
// This module centralizes the "dirty" CSV number handling so the rest of the
// code can assume clean, typed values.
use num_format::{Locale, ToFormattedString};

/// Parse a string-like value into `f64`, mapping anything unusable to `None`.
///
/// - Accepts `Option<&str>` so callers can pass through optional fields.
/// - Trims whitespace.
/// - Rejects empty strings and non-finite results (`NaN`, `inf`).
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a client count. Whole numbers written as floats (`"120.0"`) are
/// accepted; negative or fractional values become `None`.
pub fn parse_count_safe(s: Option<&str>) -> Option<u64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(n) = s.parse::<u64>() {
        return Some(n);
    }
    let v = parse_f64_safe(Some(s))?;
    if v < 0.0 || v.fract() != 0.0 || v > u64::MAX as f64 {
        return None;
    }
    Some(v as u64)
}

/// Compact magnitude: `1.5M`, `2K`, `42`. Missing or `NaN` input gives `N/A`.
pub fn format_k_m(num: Option<f64>) -> String {
    match num {
        Some(n) if !n.is_nan() => {
            if n.abs() >= 1_000_000.0 {
                format!("{:.1}M", n / 1_000_000.0)
            } else if n.abs() >= 1_000.0 {
                format!("{:.0}K", n / 1_000.0)
            } else {
                format!("{:.0}", n)
            }
        }
        _ => "N/A".to_string(),
    }
}

/// Revenue as shown in tables and tooltips: `$ 1.5M`.
pub fn format_usd(num: f64) -> String {
    format!("$ {}", format_k_m(Some(num)))
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for counts shown in the sidebar
    // (e.g., `12,345` total clients).
    n.to_formatted_string(&Locale::en)
}
