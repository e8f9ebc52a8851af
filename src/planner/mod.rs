//! LLM-backed agents
//!
//! The decision agent chooses what happens next; the calculation agent
//! writes the final plan. Both validate the model's JSON strictly and share
//! one retry helper with different policies.

pub mod calculation;
pub mod decision;
pub mod retry;

pub use calculation::{CalculationAgent, DEFAULT_MAX_RETRIES};
pub use decision::DecisionAgent;
pub use retry::{run_with_policy, AttemptFailure, Exhausted, RetryPolicy};
