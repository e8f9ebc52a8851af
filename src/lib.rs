//! Savings Planner
//!
//! A conversational savings-plan agent that:
//! - Reads Korean free-text answers into won amounts and month counts
//! - Asks an LLM what to do next, validating its JSON strictly
//! - Produces a schema-checked monthly savings / ETF / emergency-fund plan
//! - Keeps a per-session trace of every decision and answer
//!
//! SESSION LOOP:
//! DECIDE → (ASK → PARSE → STORE → DECIDE)* → CALCULATE | END

pub mod agent;
pub mod audit;
pub mod completion;
pub mod config;
pub mod error;
pub mod models;
pub mod parsing;
pub mod planner;
pub mod state;

pub use error::Result;

// Re-export common types
pub use models::*;
pub use parsing::ParseOutcome;
pub use state::{FieldValue, UserState};
