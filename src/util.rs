// Utility helpers for coercing cell text and formatting numbers.
//
// All of the "dirty" number handling lives here so the normalizer can treat
// a failed coercion as nothing more than `None`.
use chrono::{Local, NaiveDate};
use num_format::{Locale, ToFormattedString};

/// Parse cell text into a finite `f64`, forgiving the formatting quirks of
/// spreadsheet exports.
///
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters (this also keeps
///   `NaN` and `inf` out).
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Percentage cells may carry `%` signs (`"87.5%"`); those are dropped first.
pub fn parse_percent_safe(s: &str) -> Option<f64> {
    let stripped: String = s.chars().filter(|c| *c != '%').collect();
    parse_f64_safe(&stripped)
}

/// Counts truncate toward zero and must not be negative.
pub fn parse_count_safe(s: &str) -> Option<i64> {
    let v = parse_f64_safe(s)?;
    if v < 0.0 || v > i64::MAX as f64 {
        return None;
    }
    Some(v.trunc() as i64)
}

pub fn average(v: &[f64]) -> f64 {
    // Arithmetic mean; 0 for an empty slice so no NaN leaks into reports.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

/// The date stamp used when a row carries none, e.g. `18-10-2026`.
pub fn format_row_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus locale-aware thousands separators,
    // e.g. `1,234,567.89`.
    let neg = n.is_sign_negative() && n != 0.0;
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg && res.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Counts in console output, e.g. `9,855 rows loaded`.
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_separated_numbers() {
        assert_eq!(parse_f64_safe(" 42 "), Some(42.0));
        assert_eq!(parse_f64_safe("1,234.5"), Some(1234.5));
        assert_eq!(parse_f64_safe(""), None);
        assert_eq!(parse_f64_safe("abc"), None);
        assert_eq!(parse_f64_safe("NaN"), None);
        assert_eq!(parse_f64_safe("inf"), None);
    }

    #[test]
    fn percent_signs_are_stripped() {
        assert_eq!(parse_percent_safe("87.5%"), Some(87.5));
        assert_eq!(parse_percent_safe(" 100 % "), Some(100.0));
        assert_eq!(parse_percent_safe("%"), None);
        assert_eq!(parse_percent_safe("n/a%"), None);
    }

    #[test]
    fn counts_truncate_and_reject_negatives() {
        assert_eq!(parse_count_safe("50"), Some(50));
        assert_eq!(parse_count_safe("49.9"), Some(49));
        assert_eq!(parse_count_safe("-3"), None);
        assert_eq!(parse_count_safe("12%"), None);
    }

    #[test]
    fn formats_with_separators() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-10.0, 1), "-10.0");
        assert_eq!(format_number(-0.01, 1), "0.0");
        assert_eq!(format_int(9855), "9,855");
        assert_eq!(format_int(-1200i64), "-1,200");
    }

    #[test]
    fn row_date_format() {
        let d = NaiveDate::from_ymd_opt(2025, 11, 11).unwrap();
        assert_eq!(format_row_date(d), "11-11-2025");
    }

    #[test]
    fn average_of_empty_is_zero() {
        assert_eq!(average(&[]), 0.0);
        assert_eq!(average(&[80.0, 100.0]), 90.0);
    }
}
