//! Number formatting for table cells, chart axes and legends.

/// Format `value` with thousands separators and exactly `decimals` decimal
/// places.
///
/// # Examples
///
/// ```
/// use dash_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5, 1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }

    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + fixed.len() / 3 + 1);
    // "-0.00" is not worth a sign.
    if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Format a USD amount: `$` prefix, thousands separators, two decimals.
///
/// ```
/// use dash_core::formatting::format_usd;
///
/// assert_eq!(format_usd(1234.56), "$1,234.56");
/// assert_eq!(format_usd(-9.99), "-$9.99");
/// ```
pub fn format_usd(amount: f64) -> String {
    let body = format_number(amount.abs(), 2);
    if amount < 0.0 && body != "0.00" {
        format!("-${body}")
    } else {
        format!("${body}")
    }
}

/// Short axis label: `950`, `12.5k`, `3.2M`, `1.1B`.
///
/// ```
/// use dash_core::formatting::format_compact;
///
/// assert_eq!(format_compact(950.0), "950");
/// assert_eq!(format_compact(12_500.0), "12.5k");
/// assert_eq!(format_compact(3_200_000.0), "3.2M");
/// ```
pub fn format_compact(value: f64) -> String {
    let abs = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };
    let (scaled, suffix) = if abs >= 1e9 {
        (abs / 1e9, "B")
    } else if abs >= 1e6 {
        (abs / 1e6, "M")
    } else if abs >= 1e3 {
        (abs / 1e3, "k")
    } else {
        return format!("{sign}{}", trim_zeros(&format!("{abs:.1}")));
    };
    format!("{sign}{}{suffix}", trim_zeros(&format!("{scaled:.1}")))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── format_number ────────────────────────────────────────────────────────

    #[test]
    fn test_format_number_zero() {
        assert_eq!(format_number(0.0, 0), "0");
        assert_eq!(format_number(0.0, 2), "0.00");
    }

    #[test]
    fn test_format_number_with_thousands() {
        assert_eq!(format_number(1_234.5, 1), "1,234.5");
        assert_eq!(format_number(1_000.0, 0), "1,000");
    }

    #[test]
    fn test_format_number_millions() {
        assert_eq!(format_number(12_345_678.0, 0), "12,345,678");
    }

    #[test]
    fn test_format_number_negative() {
        assert_eq!(format_number(-9_876.5, 1), "-9,876.5");
    }

    #[test]
    fn test_format_number_negative_zero_has_no_sign() {
        assert_eq!(format_number(-0.001, 2), "0.00");
    }

    #[test]
    fn test_format_number_non_finite() {
        assert_eq!(format_number(f64::NAN, 2), "-");
        assert_eq!(format_number(f64::INFINITY, 0), "-");
    }

    // ── format_usd ───────────────────────────────────────────────────────────

    #[test]
    fn test_format_usd_positive() {
        assert_eq!(format_usd(1_234.56), "$1,234.56");
        assert_eq!(format_usd(1_000_000.0), "$1,000,000.00");
    }

    #[test]
    fn test_format_usd_zero_and_negative() {
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(-9.99), "-$9.99");
    }

    // ── format_compact ───────────────────────────────────────────────────────

    #[test]
    fn test_format_compact_small() {
        assert_eq!(format_compact(0.0), "0");
        assert_eq!(format_compact(10.67), "10.7");
        assert_eq!(format_compact(950.0), "950");
    }

    #[test]
    fn test_format_compact_scaled() {
        assert_eq!(format_compact(1_000.0), "1k");
        assert_eq!(format_compact(12_500.0), "12.5k");
        assert_eq!(format_compact(3_200_000.0), "3.2M");
        assert_eq!(format_compact(1_100_000_000.0), "1.1B");
    }

    #[test]
    fn test_format_compact_negative() {
        assert_eq!(format_compact(-2_500.0), "-2.5k");
    }
}
