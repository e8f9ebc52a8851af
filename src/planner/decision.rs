//! Decision agent: picks the next step of the session
//!
//! Deterministic (temperature 0) and never retried. A reply that is not
//! a valid Decision is a protocol violation.

use super::retry::{run_with_policy, AttemptFailure, RetryPolicy};
use crate::completion::CompletionClient;
use crate::error::PlannerError;
use crate::models::{ChatMessage, Decision};
use crate::state::UserState;
use crate::Result;
use std::sync::Arc;
use tracing::{debug, info};

const DECISION_SYSTEM_PROMPT: &str = r#"You are a decision-making agent for a Korean savings planner.
Respond ONLY in valid JSON. No explanation, no markdown.
The JSON object must have exactly these keys:
- "action": one of "ASK_MORE_INFO", "CALCULATE", "END"
- "message": string shown to the user, written in Korean
- "required_fields": array of snake_case field names

Rules:
- Use ASK_MORE_INFO when information needed for a savings plan is missing, and list the missing fields in the order they should be asked.
- Use CALCULATE when monthly_income, current_savings, savings_goal, monthly_expenses and savings_period are known.
- Use END when the user cannot be helped further.
- required_fields must be [] unless action is ASK_MORE_INFO.
- Amount fields are in won, savings_period is in months."#;

pub struct DecisionAgent {
    client: Arc<dyn CompletionClient>,
    temperature: f32,
}

impl DecisionAgent {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            temperature: 0.0,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn build_messages(state: &UserState) -> Result<Vec<ChatMessage>> {
        let user_prompt = format!(
            "현재 사용자 상태:\n{}\n\n아래 형식으로만 응답해.\n{{\n  \"action\": \"ASK_MORE_INFO | CALCULATE | END\",\n  \"message\": \"string\",\n  \"required_fields\": [\"string\"]\n}}",
            state.to_prompt_json()?
        );

        Ok(vec![
            ChatMessage::system(DECISION_SYSTEM_PROMPT),
            ChatMessage::user(user_prompt),
        ])
    }

    /// Ask for the next action given everything known so far
    pub async fn decide(&self, state: &UserState) -> Result<Decision> {
        let messages = Self::build_messages(state)?;

        debug!(fields = state.len(), "Requesting decision");

        let outcome = run_with_policy(RetryPolicy::single(), "decision", |_| {
            let messages = &messages;
            async move {
                let raw = self
                    .client
                    .complete(messages, self.temperature)
                    .await
                    .map_err(AttemptFailure::Transport)?;
                parse_decision(&raw).map_err(AttemptFailure::Malformed)
            }
        })
        .await;

        match outcome {
            Ok(decision) => {
                info!(
                    action = %decision.action,
                    required_fields = ?decision.required_fields,
                    "Decision received"
                );
                Ok(decision)
            }
            Err(exhausted) => Err(match exhausted.last {
                AttemptFailure::Transport(e) => e,
                AttemptFailure::Malformed(reason) => PlannerError::ProtocolViolation(reason),
            }),
        }
    }
}

/// Strict parse: the whole reply must be the Decision object
fn parse_decision(raw: &str) -> std::result::Result<Decision, String> {
    let decision: Decision = serde_json::from_str(raw)
        .map_err(|e| format!("decision is not valid JSON: {} | raw={}", e, raw))?;
    decision.check_invariant()?;
    Ok(decision)
}
