//! Natural-language numeric parsers
//!
//! Turns free-text answers ("300만", "월급의 30%", "2년6개월") into integers.
//! Parsers never fail with an error: anything they cannot read comes back as
//! `ParseOutcome::Unparseable` and the caller re-prompts.

pub mod money;
pub mod period;
pub mod registry;

pub use money::{
    parse_absolute_amount, parse_money_amount, parse_relative_amount, AmountStrategy,
    AMOUNT_CHAIN,
};
pub use period::parse_period_months;
pub use registry::{FieldParser, FieldParserRegistry, MoneyParser, PeriodParser};

/// Result of reading one answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    Value(i64),
    Unparseable,
}

impl ParseOutcome {
    pub fn value(self) -> Option<i64> {
        match self {
            ParseOutcome::Value(v) => Some(v),
            ParseOutcome::Unparseable => None,
        }
    }

    pub fn is_value(self) -> bool {
        matches!(self, ParseOutcome::Value(_))
    }
}

impl From<Option<i64>> for ParseOutcome {
    fn from(value: Option<i64>) -> Self {
        match value {
            Some(v) => ParseOutcome::Value(v),
            None => ParseOutcome::Unparseable,
        }
    }
}

/// Drop every character matching `reject`
pub(crate) fn strip_chars(text: &str, reject: impl Fn(char) -> bool) -> String {
    text.chars().filter(|c| !reject(*c)).collect()
}

/// Whole text is a plain ASCII integer
pub(crate) fn parse_plain_digits(cleaned: &str) -> ParseOutcome {
    if cleaned.is_empty() || !cleaned.bytes().all(|b| b.is_ascii_digit()) {
        return ParseOutcome::Unparseable;
    }
    cleaned.parse::<i64>().ok().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_digits() {
        assert_eq!(parse_plain_digits("0"), ParseOutcome::Value(0));
        assert_eq!(parse_plain_digits("18"), ParseOutcome::Value(18));
        assert_eq!(parse_plain_digits(""), ParseOutcome::Unparseable);
        assert_eq!(parse_plain_digits("12a"), ParseOutcome::Unparseable);
        assert_eq!(parse_plain_digits("-5"), ParseOutcome::Unparseable);
        assert_eq!(
            parse_plain_digits("99999999999999999999"),
            ParseOutcome::Unparseable
        );
    }

    #[test]
    fn test_zero_is_not_unparseable() {
        assert!(ParseOutcome::Value(0).is_value());
        assert_eq!(ParseOutcome::Value(0).value(), Some(0));
        assert_eq!(ParseOutcome::Unparseable.value(), None);
    }
}
