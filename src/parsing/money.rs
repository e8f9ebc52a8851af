//! Won amount parsers
//!
//! Absolute amounts use Korean magnitude words ("1억5천만", "300만").
//! Relative amounts are computed against a base field ("월급의 30%").
//! `parse_money_amount` tries them in that order: relative first, then
//! absolute.

use super::{parse_plain_digits, strip_chars, ParseOutcome};
use crate::state::{UserState, MONTHLY_INCOME};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

/// Magnitude words in priority order
const MAGNITUDE_UNITS: &[(&str, i64)] = &[
    ("억", 100_000_000),
    ("천만", 10_000_000),
    ("백만", 1_000_000),
    ("만", 10_000),
    ("천", 1_000),
];

/// Words that name a base field for relative amounts
const BASE_ALIASES: &[(&str, &str)] = &[
    ("월급", MONTHLY_INCOME),
    ("소득", MONTHLY_INCOME),
    ("급여", MONTHLY_INCOME),
];

lazy_static! {
    static ref UNIT_PATTERNS: Vec<(Regex, i64)> = MAGNITUDE_UNITS
        .iter()
        .map(|(unit, scale)| {
            let pattern = format!("([0-9]+){}", unit);
            (Regex::new(&pattern).expect("magnitude pattern"), *scale)
        })
        .collect();
    static ref PERCENT_PATTERN: Regex =
        Regex::new(r"([0-9]+)(?:\.([0-9]+))?(?:%|퍼)").expect("percent pattern");
    static ref FRACTION_PATTERN: Regex =
        Regex::new(r"([0-9]+)/([0-9]+)").expect("fraction pattern");
}

// =============================
// Absolute amounts
// =============================

/// Parse an absolute won amount.
///
/// Each unit claims the digit run directly in front of it, and the claimed
/// span is blanked out before lower units are searched, so "1억5천만" reads
/// as 100,000,000 + 50,000,000 and the 천 inside "5천만" is not counted
/// twice.
pub fn parse_absolute_amount(text: &str) -> ParseOutcome {
    let mut cleaned = strip_chars(text, |c| c == ',' || c.is_whitespace());

    let mut total: i64 = 0;
    let mut matched = false;

    for (pattern, scale) in UNIT_PATTERNS.iter() {
        let (span, digits) = match pattern.captures(&cleaned) {
            Some(caps) => match (caps.get(0), caps.get(1)) {
                (Some(whole), Some(digits)) => (whole.range(), digits.as_str().parse::<i64>()),
                _ => continue,
            },
            None => continue,
        };

        let contribution = match digits.ok().and_then(|d| d.checked_mul(*scale)) {
            Some(v) => v,
            None => return ParseOutcome::Unparseable,
        };

        total = match total.checked_add(contribution) {
            Some(v) => v,
            None => return ParseOutcome::Unparseable,
        };
        matched = true;

        // a space keeps the neighbours from forming a new digit+unit pair
        cleaned.replace_range(span, " ");
    }

    if matched {
        return ParseOutcome::Value(total);
    }

    parse_plain_digits(&cleaned)
}

// =============================
// Relative amounts
// =============================

/// Exact ratio, kept as integers so `floor(base * ratio)` has no float error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ratio {
    numerator: i128,
    denominator: i128,
}

impl Ratio {
    fn apply(self, base: i64) -> Option<i64> {
        if self.denominator <= 0 {
            return None;
        }
        let scaled = (base as i128).checked_mul(self.numerator)?;
        i64::try_from(scaled.div_euclid(self.denominator)).ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RatioPattern {
    Percent,
    Fraction,
    Half,
    OneThird,
}

/// Tried in this order; the first match decides the ratio
const RATIO_PATTERNS: &[RatioPattern] = &[
    RatioPattern::Percent,
    RatioPattern::Fraction,
    RatioPattern::Half,
    RatioPattern::OneThird,
];

impl RatioPattern {
    /// `None` when the pattern is absent; `Some(None)` when present but unusable
    fn find(self, text: &str) -> Option<Option<Ratio>> {
        match self {
            RatioPattern::Percent => {
                let caps = PERCENT_PATTERN.captures(text)?;
                Some(percent_ratio(
                    caps.get(1).map(|m| m.as_str()).unwrap_or_default(),
                    caps.get(2).map(|m| m.as_str()).unwrap_or_default(),
                ))
            }
            RatioPattern::Fraction => {
                let caps = FRACTION_PATTERN.captures(text)?;
                let numerator = caps.get(1)?.as_str().parse::<i128>().ok();
                let denominator = caps.get(2)?.as_str().parse::<i128>().ok();
                Some(numerator.zip(denominator).map(|(numerator, denominator)| Ratio {
                    numerator,
                    denominator,
                }))
            }
            RatioPattern::Half => text.contains("절반").then_some(Some(Ratio {
                numerator: 1,
                denominator: 2,
            })),
            RatioPattern::OneThird => text.contains("3분의1").then_some(Some(Ratio {
                numerator: 1,
                denominator: 3,
            })),
        }
    }
}

/// "30" + "5" -> 305 / 1000
fn percent_ratio(whole: &str, fraction: &str) -> Option<Ratio> {
    let digits = format!("{}{}", whole, fraction);
    let numerator = digits.parse::<i128>().ok()?;
    let scale = 10i128.checked_pow(u32::try_from(fraction.len()).ok()?)?;
    Some(Ratio {
        numerator,
        denominator: scale.checked_mul(100)?,
    })
}

/// Parse an amount expressed relative to a base field of `state`.
///
/// Unparseable when the text names no base, or the base field has no
/// numeric value yet. Never falls back to absolute parsing.
pub fn parse_relative_amount(text: &str, state: &UserState) -> ParseOutcome {
    let cleaned = strip_chars(text, char::is_whitespace);

    let base = BASE_ALIASES
        .iter()
        .filter(|(alias, _)| cleaned.contains(*alias))
        .find_map(|(_, field)| state.amount(field));

    let Some(base) = base else {
        return ParseOutcome::Unparseable;
    };

    for pattern in RATIO_PATTERNS {
        if let Some(ratio) = pattern.find(&cleaned) {
            debug!(?pattern, base, "Relative amount pattern matched");
            return ratio.and_then(|r| r.apply(base)).into();
        }
    }

    ParseOutcome::Unparseable
}

// =============================
// Strategy chain
// =============================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountStrategy {
    Relative,
    Absolute,
}

impl AmountStrategy {
    pub fn parse(self, text: &str, state: &UserState) -> ParseOutcome {
        match self {
            AmountStrategy::Relative => parse_relative_amount(text, state),
            AmountStrategy::Absolute => parse_absolute_amount(text),
        }
    }
}

/// Relative first: "월급의 30%" must never be read as a bare number
pub const AMOUNT_CHAIN: &[AmountStrategy] = &[AmountStrategy::Relative, AmountStrategy::Absolute];

/// Parse a won amount with the default strategy chain
pub fn parse_money_amount(text: &str, state: &UserState) -> ParseOutcome {
    AMOUNT_CHAIN
        .iter()
        .map(|strategy| (strategy, strategy.parse(text, state)))
        .find(|(_, outcome)| outcome.is_value())
        .map(|(strategy, outcome)| {
            debug!(?strategy, "Amount parsed");
            outcome
        })
        .unwrap_or(ParseOutcome::Unparseable)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_income(income: i64) -> UserState {
        let mut state = UserState::new();
        state.set(MONTHLY_INCOME, income);
        state
    }

    #[test]
    fn test_absolute_digits_only() {
        for s in ["0", "7", "400000", "3000000", "000123"] {
            let expected: i64 = s.parse().unwrap();
            assert_eq!(parse_absolute_amount(s), ParseOutcome::Value(expected), "{}", s);
        }
    }

    #[test]
    fn test_absolute_magnitude_units() {
        let cases = vec![
            ("1억5천만", 150_000_000),
            ("3천", 3_000),
            ("3천만", 30_000_000),
            ("5백만", 5_000_000),
            ("300만", 3_000_000),
            ("2억", 200_000_000),
            ("1억 2000만", 120_000_000),
            ("1,500만", 15_000_000),
            ("3,000,000", 3_000_000),
        ];

        for (input, expected) in cases {
            assert_eq!(
                parse_absolute_amount(input),
                ParseOutcome::Value(expected),
                "{}",
                input
            );
        }
    }

    #[test]
    fn test_absolute_unparseable() {
        for s in ["", "많이", "삼백만원", "30%", "월급의 절반"] {
            assert_eq!(parse_absolute_amount(s), ParseOutcome::Unparseable, "{}", s);
        }
    }

    #[test]
    fn test_absolute_overflow_is_unparseable() {
        assert_eq!(
            parse_absolute_amount("99999999999999억"),
            ParseOutcome::Unparseable
        );
    }

    #[test]
    fn test_relative_against_income() {
        let state = state_with_income(3_000_000);

        assert_eq!(parse_relative_amount("월급의 30%", &state), ParseOutcome::Value(900_000));
        assert_eq!(parse_relative_amount("월급 절반", &state), ParseOutcome::Value(1_500_000));
        assert_eq!(parse_relative_amount("소득 1/3", &state), ParseOutcome::Value(1_000_000));
        assert_eq!(parse_relative_amount("급여 3분의1", &state), ParseOutcome::Value(1_000_000));
        assert_eq!(parse_relative_amount("월급 20퍼", &state), ParseOutcome::Value(600_000));
        assert_eq!(parse_relative_amount("월급의 12.5%", &state), ParseOutcome::Value(375_000));
    }

    #[test]
    fn test_relative_floors_result() {
        let state = state_with_income(1_000_001);
        assert_eq!(parse_relative_amount("월급 1/3", &state), ParseOutcome::Value(333_333));
    }

    #[test]
    fn test_relative_without_base() {
        assert_eq!(parse_relative_amount("30%", &UserState::new()), ParseOutcome::Unparseable);

        let state = state_with_income(3_000_000);
        assert_eq!(parse_relative_amount("30%", &state), ParseOutcome::Unparseable);

        // alias present but base missing
        assert_eq!(
            parse_relative_amount("월급의 30%", &UserState::new()),
            ParseOutcome::Unparseable
        );
    }

    #[test]
    fn test_relative_text_base_is_missing() {
        let mut state = UserState::new();
        state.set(MONTHLY_INCOME, "삼백만원");
        assert_eq!(parse_relative_amount("월급 절반", &state), ParseOutcome::Unparseable);
    }

    #[test]
    fn test_relative_zero_denominator() {
        let state = state_with_income(3_000_000);
        assert_eq!(parse_relative_amount("월급 1/0", &state), ParseOutcome::Unparseable);
    }

    #[test]
    fn test_relative_no_ratio() {
        let state = state_with_income(3_000_000);
        assert_eq!(parse_relative_amount("월급 300만", &state), ParseOutcome::Unparseable);
    }

    #[test]
    fn test_money_prefers_relative() {
        let state = state_with_income(3_000_000);

        // "50만" alone would read as 500,000
        assert_eq!(parse_money_amount("월급 절반 50만", &state), ParseOutcome::Value(1_500_000));
        assert_eq!(parse_money_amount("월급의 30%", &state), ParseOutcome::Value(900_000));
    }

    #[test]
    fn test_money_falls_back_to_absolute() {
        let state = state_with_income(3_000_000);
        assert_eq!(parse_money_amount("월급 300만", &state), ParseOutcome::Value(3_000_000));
        assert_eq!(parse_money_amount("50만", &UserState::new()), ParseOutcome::Value(500_000));
        assert_eq!(parse_money_amount("월급의 30%", &UserState::new()), ParseOutcome::Unparseable);
    }
}
