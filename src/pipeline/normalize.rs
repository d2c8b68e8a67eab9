//! Locale normalization for human-formatted numbers and dates.
//!
//! Scanned documents mix French and US conventions (`1.234,56` vs
//! `1,234.56`). Both operations degrade instead of failing: an unparsable
//! amount becomes `0.0` and an unparsable date becomes today, so a bad cell
//! never aborts the whole document. A human review step downstream catches
//! the zeros.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

/// Parse a human-formatted amount into a canonical non-negative value.
///
/// Comma/period disambiguation, in priority order:
/// 1. exactly one comma, no period: comma is the decimal separator;
/// 2. one comma and at least one period: periods are thousands separators,
///    comma is the decimal separator;
/// 3. anything else is parsed as-is.
pub fn normalize_amount(raw: &str) -> f64 {
    static STRIP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9,.\-]").unwrap());

    let cleaned = STRIP.replace_all(raw, "").into_owned();
    if cleaned.is_empty() {
        return 0.0;
    }

    let commas = cleaned.matches(',').count();
    let periods = cleaned.matches('.').count();

    let canonical = if commas == 1 && periods == 0 {
        cleaned.replace(',', ".")
    } else if commas == 1 && periods >= 1 {
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned
    };

    match canonical.parse::<f64>() {
        Ok(v) if v.is_finite() => v.max(0.0),
        _ => 0.0,
    }
}

/// Formats tried in order. Day-first before month-first is a deliberate,
/// documented policy: `03/04/2025` resolves as April 3rd. The source locale
/// is unknown, so the ambiguity cannot be resolved, only kept deterministic.
const DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y"];

/// Parse a human-formatted date into a canonical `NaiveDate`.
/// Absent or unparsable input yields today's date, never an error.
pub fn normalize_date(raw: Option<&str>) -> NaiveDate {
    normalize_date_or(raw, chrono::Local::now().date_naive())
}

/// Same as [`normalize_date`] with an explicit fallback, so tests do not
/// depend on the wall clock.
pub fn normalize_date_or(raw: Option<&str>, fallback: NaiveDate) -> NaiveDate {
    let Some(raw) = raw else {
        return fallback;
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return fallback;
    }

    let canonical = trimmed.replace(['.', '-'], "/");
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&canonical, format) {
            return date;
        }
    }
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fallback() -> NaiveDate {
        NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()
    }

    #[test]
    fn comma_as_decimal_separator() {
        assert!((normalize_amount("200,50") - 200.50).abs() < f64::EPSILON);
    }

    #[test]
    fn period_thousands_comma_decimal() {
        assert!((normalize_amount("1.234,56") - 1234.56).abs() < f64::EPSILON);
    }

    #[test]
    fn us_thousands_parse_as_is() {
        // Two commas, no special case: commas survive and the parse fails.
        assert_eq!(normalize_amount("1,234,567"), 0.0);
        // One period only: plain decimal.
        assert!((normalize_amount("1234.56") - 1234.56).abs() < f64::EPSILON);
    }

    #[test]
    fn strips_currency_noise() {
        assert!((normalize_amount("1 250,00 DH") - 1250.0).abs() < f64::EPSILON);
        assert!((normalize_amount("$99.95") - 99.95).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_and_garbage_yield_zero() {
        assert_eq!(normalize_amount(""), 0.0);
        assert_eq!(normalize_amount("N/A"), 0.0);
        assert_eq!(normalize_amount("..,,.."), 0.0);
    }

    #[test]
    fn negative_amounts_clamp_to_zero() {
        assert_eq!(normalize_amount("-42.00"), 0.0);
    }

    #[test]
    fn iso_date_is_idempotent() {
        let date = normalize_date_or(Some("2025-11-28"), fallback());
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 11, 28).unwrap());
        assert_eq!(date.format("%Y-%m-%d").to_string(), "2025-11-28");
    }

    #[test]
    fn separators_are_interchangeable() {
        let expected = NaiveDate::from_ymd_opt(2025, 11, 28).unwrap();
        assert_eq!(normalize_date_or(Some("28/11/2025"), fallback()), expected);
        assert_eq!(normalize_date_or(Some("28.11.2025"), fallback()), expected);
        assert_eq!(normalize_date_or(Some("28-11-2025"), fallback()), expected);
    }

    #[test]
    fn try_order_is_day_first() {
        // Both candidates parse; the day-first format is tried first.
        assert_eq!(
            normalize_date_or(Some("03/04/2025"), fallback()),
            NaiveDate::from_ymd_opt(2025, 4, 3).unwrap()
        );
        // Day 28 forces the month-first fallback.
        assert_eq!(
            normalize_date_or(Some("11/28/2025"), fallback()),
            NaiveDate::from_ymd_opt(2025, 11, 28).unwrap()
        );
    }

    #[test]
    fn absent_or_invalid_falls_back() {
        assert_eq!(normalize_date_or(None, fallback()), fallback());
        assert_eq!(normalize_date_or(Some(""), fallback()), fallback());
        assert_eq!(normalize_date_or(Some("soon"), fallback()), fallback());
        assert_eq!(normalize_date_or(Some("99/99/2025"), fallback()), fallback());
    }
}
