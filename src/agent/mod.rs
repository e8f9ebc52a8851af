//! Main orchestrator - implements the session loop
//!
//! AWAITING_DECISION → (ASK_MORE_INFO → COLLECTING_FIELDS → AWAITING_DECISION)*
//!                   → CALCULATE | END → DONE

pub mod console;

pub use console::{ConsoleIo, SessionIo, EXIT_SENTINEL};

use crate::audit::{compute_state_hash, SessionTrace};
use crate::completion::CompletionClient;
use crate::config::AgentConfig;
use crate::error::PlannerError;
use crate::models::{Action, SessionOutcome, SessionReport, TraceEvent};
use crate::parsing::{FieldParserRegistry, ParseOutcome};
use crate::planner::{CalculationAgent, DecisionAgent, DEFAULT_MAX_RETRIES};
use crate::state::UserState;
use crate::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

const DEFAULT_MAX_ROUNDS: u32 = 20;

pub const REPROMPT_NOTICE: &str = "입력을 이해하지 못했습니다. 다시 입력해주세요.";
const END_FALLBACK_MESSAGE: &str = "종료";

enum LoopState {
    AwaitingDecision,
    CollectingFields(Vec<String>),
    Done(SessionOutcome),
}

/// How a field-collection round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoundResult {
    Completed,
    /// An answer could not be parsed; fields before it stay committed
    Abandoned,
    InputClosed,
}

/// Drives decision → field collection → calculation until the session ends
pub struct Orchestrator {
    decision_agent: DecisionAgent,
    calculation_agent: CalculationAgent,
    parsers: FieldParserRegistry,
    max_retries: u32,
    max_rounds: u32,
}

impl Orchestrator {
    pub fn new(
        decision_agent: DecisionAgent,
        calculation_agent: CalculationAgent,
        parsers: FieldParserRegistry,
    ) -> Self {
        Self {
            decision_agent,
            calculation_agent,
            parsers,
            max_retries: DEFAULT_MAX_RETRIES,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    /// Wire both agents to one client using the configured temperatures
    pub fn from_config(client: Arc<dyn CompletionClient>, config: &AgentConfig) -> Self {
        Self::new(
            DecisionAgent::new(client.clone()).with_temperature(config.decision_temperature),
            CalculationAgent::new(client).with_temperature(config.calculation_temperature),
            FieldParserRegistry::default(),
        )
        .with_limits(config.calculation_max_retries, config.max_rounds)
    }

    pub fn with_limits(mut self, max_retries: u32, max_rounds: u32) -> Self {
        self.max_retries = max_retries;
        self.max_rounds = max_rounds;
        self
    }

    /// Run one session against `state`, which is updated in place
    pub async fn run(
        &self,
        state: &mut UserState,
        io: &mut dyn SessionIo,
    ) -> Result<SessionReport> {
        let mut trace = SessionTrace::new();
        let mut rounds: u32 = 0;
        let mut loop_state = LoopState::AwaitingDecision;

        info!(
            session_id = %trace.session_id(),
            seeded_fields = state.len(),
            "Orchestrator: session starting"
        );

        let outcome = loop {
            loop_state = match loop_state {
                LoopState::AwaitingDecision => {
                    if rounds >= self.max_rounds {
                        warn!(rounds, "Decision round limit reached");
                        return Err(PlannerError::RoundLimitExceeded(self.max_rounds));
                    }
                    rounds += 1;

                    let decision = self.decision_agent.decide(state).await?;
                    trace.record(
                        rounds,
                        TraceEvent::Decision {
                            action: decision.action,
                            required_fields: decision.required_fields.clone(),
                        },
                    );

                    match decision.action {
                        Action::End => {
                            let message = if decision.message.trim().is_empty() {
                                END_FALLBACK_MESSAGE.to_string()
                            } else {
                                decision.message
                            };
                            io.emit(&message).await?;
                            LoopState::Done(SessionOutcome::Ended { message })
                        }
                        Action::Calculate => {
                            let plan = self
                                .calculation_agent
                                .calculate(state, self.max_retries)
                                .await?;
                            trace.record(
                                rounds,
                                TraceEvent::Calculated {
                                    time_to_goal_months: plan.time_to_goal_months,
                                },
                            );
                            io.emit(&serde_json::to_string_pretty(&plan)?).await?;
                            LoopState::Done(SessionOutcome::Planned { plan })
                        }
                        Action::AskMoreInfo => {
                            if !decision.message.trim().is_empty() {
                                io.emit(&decision.message).await?;
                            }
                            LoopState::CollectingFields(decision.required_fields)
                        }
                    }
                }
                LoopState::CollectingFields(fields) => {
                    let result = self
                        .collect_fields(rounds, &fields, state, io, &mut trace)
                        .await?;
                    debug!(round = rounds, ?result, "Field collection finished");

                    match result {
                        RoundResult::InputClosed => LoopState::Done(SessionOutcome::Exited),
                        RoundResult::Completed | RoundResult::Abandoned => {
                            LoopState::AwaitingDecision
                        }
                    }
                }
                LoopState::Done(outcome) => break outcome,
            };
        };

        trace.record(
            rounds,
            TraceEvent::Finished {
                outcome: outcome.to_string(),
            },
        );

        info!(
            session_id = %trace.session_id(),
            rounds,
            outcome = %outcome,
            "Orchestrator: session finished"
        );

        Ok(SessionReport {
            session_id: trace.session_id(),
            outcome,
            rounds,
            final_state_hash: compute_state_hash(state),
            trace: trace.into_entries(),
        })
    }

    /// Ask for each field in order. Values are written as soon as they
    /// parse; the first unreadable answer ends the round without undoing them.
    async fn collect_fields(
        &self,
        round: u32,
        fields: &[String],
        state: &mut UserState,
        io: &mut dyn SessionIo,
        trace: &mut SessionTrace,
    ) -> Result<RoundResult> {
        for field in fields {
            let Some(raw) = io.prompt_field(field).await? else {
                info!(field = %field, "Input closed by user");
                return Ok(RoundResult::InputClosed);
            };

            let parser = self.parsers.get(field);

            match parser.parse(&raw, state) {
                ParseOutcome::Value(value) => {
                    debug!(field = %field, parser = parser.name(), value, "Field committed");
                    state.set(field.as_str(), value);
                    trace.record(
                        round,
                        TraceEvent::FieldCommitted {
                            field: field.clone(),
                            value,
                        },
                    );
                }
                ParseOutcome::Unparseable => {
                    warn!(field = %field, parser = parser.name(), "Could not parse answer");
                    trace.record(
                        round,
                        TraceEvent::FieldRejected {
                            field: field.clone(),
                            raw,
                        },
                    );
                    io.emit(REPROMPT_NOTICE).await?;
                    return Ok(RoundResult::Abandoned);
                }
            }
        }

        Ok(RoundResult::Completed)
    }
}
