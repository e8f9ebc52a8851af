//! Field parser trait and registry
//!
//! Maps a requested field name to the parser that reads its answer.
//! Fields without an entry use the fallback (money).

use super::{parse_money_amount, parse_period_months, ParseOutcome};
use crate::state::{UserState, SAVINGS_PERIOD};
use std::collections::HashMap;
use std::sync::Arc;

/// Reads one raw answer into an integer
pub trait FieldParser: Send + Sync {
    fn name(&self) -> &'static str;
    fn parse(&self, raw: &str, state: &UserState) -> ParseOutcome;
}

pub struct MoneyParser;

impl FieldParser for MoneyParser {
    fn name(&self) -> &'static str {
        "money"
    }

    fn parse(&self, raw: &str, state: &UserState) -> ParseOutcome {
        parse_money_amount(raw, state)
    }
}

pub struct PeriodParser;

impl FieldParser for PeriodParser {
    fn name(&self) -> &'static str {
        "period"
    }

    fn parse(&self, raw: &str, _state: &UserState) -> ParseOutcome {
        parse_period_months(raw)
    }
}

pub struct FieldParserRegistry {
    parsers: HashMap<String, Arc<dyn FieldParser>>,
    fallback: Arc<dyn FieldParser>,
}

impl FieldParserRegistry {
    pub fn new(fallback: Arc<dyn FieldParser>) -> Self {
        Self {
            parsers: HashMap::new(),
            fallback,
        }
    }

    pub fn register(&mut self, field: impl Into<String>, parser: Arc<dyn FieldParser>) {
        self.parsers.insert(field.into(), parser);
    }

    pub fn get(&self, field: &str) -> Arc<dyn FieldParser> {
        self.parsers
            .get(field)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }

    pub fn parse(&self, field: &str, raw: &str, state: &UserState) -> ParseOutcome {
        self.get(field).parse(raw, state)
    }

    pub fn list(&self) -> Vec<&str> {
        self.parsers.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for FieldParserRegistry {
    fn default() -> Self {
        let mut registry = Self::new(Arc::new(MoneyParser));
        registry.register(SAVINGS_PERIOD, Arc::new(PeriodParser));
        registry
    }
}
