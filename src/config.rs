//! Environment-driven configuration
//!
//! Call `dotenv::dotenv().ok()` first so values from `.env` are visible.

use crate::error::PlannerError;
use crate::state::UserState;
use crate::Result;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Settings for the chat-completions endpoint
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Agent and loop settings
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub decision_temperature: f32,
    pub calculation_temperature: f32,
    /// Total calls the calculation agent may make
    pub calculation_max_retries: u32,
    pub max_rounds: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            decision_temperature: 0.0,
            calculation_temperature: 0.2,
            calculation_max_retries: 3,
            max_rounds: 20,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlannerConfig {
    pub completion: CompletionConfig,
    pub agent: AgentConfig,
    pub seed_state: UserState,
}

impl PlannerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes `std::env::var`
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = PlannerConfig::default();

        let api_key = lookup("GROQ_API_KEY")
            .or_else(|| lookup("COMPLETION_API_KEY"))
            .unwrap_or_default();

        let completion = CompletionConfig {
            api_key,
            base_url: lookup("COMPLETION_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.completion.base_url),
            model: lookup("COMPLETION_MODEL").unwrap_or(defaults.completion.model),
            timeout: Duration::from_secs(parse_or(
                &lookup,
                "COMPLETION_TIMEOUT_SECS",
                defaults.completion.timeout.as_secs(),
            )?),
        };

        let agent = AgentConfig {
            decision_temperature: parse_or(
                &lookup,
                "DECISION_TEMPERATURE",
                defaults.agent.decision_temperature,
            )?,
            calculation_temperature: parse_or(
                &lookup,
                "CALCULATION_TEMPERATURE",
                defaults.agent.calculation_temperature,
            )?,
            calculation_max_retries: parse_or(
                &lookup,
                "CALCULATION_MAX_RETRIES",
                defaults.agent.calculation_max_retries,
            )?,
            max_rounds: parse_or(&lookup, "MAX_DECISION_ROUNDS", defaults.agent.max_rounds)?,
        };

        if agent.calculation_max_retries == 0 {
            return Err(PlannerError::Config(
                "CALCULATION_MAX_RETRIES must be at least 1".to_string(),
            ));
        }
        if agent.max_rounds == 0 {
            return Err(PlannerError::Config(
                "MAX_DECISION_ROUNDS must be at least 1".to_string(),
            ));
        }

        let seed_state = match lookup("PLANNER_SEED_STATE") {
            Some(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw).map_err(|e| {
                PlannerError::Config(format!("PLANNER_SEED_STATE is not a JSON object: {}", e))
            })?,
            _ => UserState::new(),
        };

        Ok(Self {
            completion,
            agent,
            seed_state,
        })
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| PlannerError::Config(format!("{}={:?}: {}", key, raw, e))),
        None => Ok(default),
    }
}
