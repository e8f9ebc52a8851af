//! Core data models for the savings planner

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

//
// ================= Chat =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

//
// ================= Decision =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    AskMoreInfo,
    Calculate,
    End,
}

/// Next step chosen by the decision agent. Produced fresh on every call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Decision {
    pub action: Action,
    pub message: String,
    pub required_fields: Vec<String>,
}

impl Decision {
    /// `required_fields` may only be populated when asking for more info
    pub fn check_invariant(&self) -> std::result::Result<(), String> {
        if self.action != Action::AskMoreInfo && !self.required_fields.is_empty() {
            return Err(format!(
                "required_fields must be empty for {}, got {:?}",
                self.action, self.required_fields
            ));
        }
        Ok(())
    }
}

//
// ================= Calculation =================
//

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthlyBreakdown {
    pub savings: String,
    pub etf: String,
    pub emergency_fund: String,
}

/// Final plan. Money fields are display strings such as "400,000원".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalculationResult {
    pub monthly_investable_amount: String,
    pub monthly_breakdown: MonthlyBreakdown,
    pub time_to_goal_months: u32,
    pub summary: String,
}

//
// ================= Session =================
//

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionOutcome {
    Planned { plan: CalculationResult },
    Ended { message: String },
    Exited,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    Decision {
        action: Action,
        required_fields: Vec<String>,
    },
    FieldCommitted {
        field: String,
        value: i64,
    },
    FieldRejected {
        field: String,
        raw: String,
    },
    Calculated {
        time_to_goal_months: u32,
    },
    Finished {
        outcome: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TraceEntry {
    pub round: u32,
    pub event: TraceEvent,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: Uuid,
    pub outcome: SessionOutcome,
    pub rounds: u32,
    pub trace: Vec<TraceEntry>,
    pub final_state_hash: String,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::AskMoreInfo => "ASK_MORE_INFO",
            Action::Calculate => "CALCULATE",
            Action::End => "END",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for SessionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionOutcome::Planned { .. } => "planned",
            SessionOutcome::Ended { .. } => "ended",
            SessionOutcome::Exited => "exited",
        };
        write!(f, "{}", s)
    }
}
