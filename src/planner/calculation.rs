//! Calculation agent: produces the final savings plan
//!
//! Re-sends the same prompt until a reply deserializes into a
//! `CalculationResult` or the attempts run out. Only the shape is checked,
//! never whether the numbers make financial sense.

use super::retry::{run_with_policy, AttemptFailure, RetryPolicy};
use crate::completion::CompletionClient;
use crate::error::PlannerError;
use crate::models::{CalculationResult, ChatMessage};
use crate::state::UserState;
use crate::Result;
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_MAX_RETRIES: u32 = 3;

const CALCULATION_SYSTEM_PROMPT: &str = r#"You are a Korean financial planner for young professionals.
All explanations must be written in natural Korean.
JSON keys must be written in English.
All money values must be formatted as Korean won with comma separators and a 원 suffix.
Example: "400,000원".
Return ONLY valid JSON. No markdown.

Summary rules:
- Start with: 현재 상황 기준으로 보면
- Explain savings, emergency fund, ETF in words
- Express time as 약 n년 n개월
- Be realistic
- Avoid financial jargon"#;

const OUTPUT_SCHEMA: &str = r#"{
  "monthly_investable_amount": "string",
  "monthly_breakdown": {
    "savings": "string",
    "etf": "string",
    "emergency_fund": "string"
  },
  "time_to_goal_months": number,
  "summary": "string"
}"#;

pub struct CalculationAgent {
    client: Arc<dyn CompletionClient>,
    temperature: f32,
}

impl CalculationAgent {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            temperature: 0.2,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn build_messages(state: &UserState) -> Result<Vec<ChatMessage>> {
        let user_prompt = format!(
            r#"다음은 한국 사회초년생의 자산 정보이다.

입력:
{}

조건:
- 월급 기준 현실적인 저축 가능 금액 산정
- 비상금은 최소 생활비 6개월 기준
- 저축 목표 달성까지 예상 개월 수 계산
- ETF는 장기 투자로 설명

출력 형식:
{}"#,
            state.to_prompt_json()?,
            OUTPUT_SCHEMA
        );

        Ok(vec![
            ChatMessage::system(CALCULATION_SYSTEM_PROMPT),
            ChatMessage::user(user_prompt),
        ])
    }

    /// Produce the plan, calling the model at most `max_retries` times
    pub async fn calculate(
        &self,
        state: &UserState,
        max_retries: u32,
    ) -> Result<CalculationResult> {
        let messages = Self::build_messages(state)?;

        let outcome = run_with_policy(RetryPolicy::attempts(max_retries), "calculation", |_| {
            let messages = &messages;
            async move {
                let raw = self
                    .client
                    .complete(messages, self.temperature)
                    .await
                    .map_err(AttemptFailure::Transport)?;
                serde_json::from_str::<CalculationResult>(&raw)
                    .map_err(|e| AttemptFailure::Malformed(e.to_string()))
            }
        })
        .await;

        match outcome {
            Ok(result) => {
                info!(
                    time_to_goal_months = result.time_to_goal_months,
                    "Calculation result accepted"
                );
                Ok(result)
            }
            Err(exhausted) => Err(PlannerError::RetryExhausted {
                attempts: exhausted.attempts,
                reason: exhausted.last.to_string(),
            }),
        }
    }
}
