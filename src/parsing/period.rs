//! Period parser: "2년6개월" -> 30 months

use super::{parse_plain_digits, strip_chars, ParseOutcome};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref YEARS_PATTERN: Regex = Regex::new("([0-9]+)년").expect("years pattern");
    static ref MONTHS_PATTERN: Regex = Regex::new("([0-9]+)개월").expect("months pattern");
}

fn captured_number(pattern: &Regex, text: &str) -> Option<Option<i64>> {
    let caps = pattern.captures(text)?;
    Some(caps.get(1).and_then(|m| m.as_str().parse::<i64>().ok()))
}

/// Parse a period into a month count
pub fn parse_period_months(text: &str) -> ParseOutcome {
    let cleaned = strip_chars(text, char::is_whitespace);

    let years = captured_number(&YEARS_PATTERN, &cleaned);
    let months = captured_number(&MONTHS_PATTERN, &cleaned);

    if years.is_none() && months.is_none() {
        return parse_plain_digits(&cleaned);
    }

    let total = years
        .map(|y| y.and_then(|y| y.checked_mul(12)))
        .unwrap_or(Some(0))
        .zip(months.unwrap_or(Some(0)))
        .and_then(|(y, m)| y.checked_add(m));

    total.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_years_and_months() {
        assert_eq!(parse_period_months("2년6개월"), ParseOutcome::Value(30));
        assert_eq!(parse_period_months("2년 6개월"), ParseOutcome::Value(30));
        assert_eq!(parse_period_months("3년"), ParseOutcome::Value(36));
        assert_eq!(parse_period_months("18개월"), ParseOutcome::Value(18));
    }

    #[test]
    fn test_plain_month_count() {
        assert_eq!(parse_period_months("18"), ParseOutcome::Value(18));
        assert_eq!(parse_period_months(" 24 "), ParseOutcome::Value(24));
    }

    #[test]
    fn test_unparseable_period() {
        assert_eq!(parse_period_months("언젠가"), ParseOutcome::Unparseable);
        assert_eq!(parse_period_months("이년"), ParseOutcome::Unparseable);
        assert_eq!(parse_period_months(""), ParseOutcome::Unparseable);
    }

    #[test]
    fn test_period_overflow() {
        assert_eq!(
            parse_period_months("999999999999999999년"),
            ParseOutcome::Unparseable
        );
    }
}
