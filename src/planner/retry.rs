//! Bounded retry with escalation
//!
//! Both agents run their completion call through `run_with_policy`; they
//! differ only in the `RetryPolicy` they pass and in how they turn an
//! `Exhausted` into a `PlannerError`.

use crate::error::PlannerError;
use std::fmt;
use std::future::Future;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,
}

impl RetryPolicy {
    /// One attempt, no retry
    pub const fn single() -> Self {
        Self { max_attempts: 1 }
    }

    pub const fn attempts(max_attempts: u32) -> Self {
        Self { max_attempts }
    }
}

/// Why a single attempt did not yield a usable value
#[derive(Debug)]
pub enum AttemptFailure {
    /// The collaborator could not be reached or answered with an error
    Transport(PlannerError),
    /// The reply arrived but did not match the expected shape
    Malformed(String),
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptFailure::Transport(e) => write!(f, "{}", e),
            AttemptFailure::Malformed(reason) => write!(f, "malformed reply: {}", reason),
        }
    }
}

/// Every attempt failed; carries the last failure
#[derive(Debug)]
pub struct Exhausted {
    pub attempts: u32,
    pub last: AttemptFailure,
}

/// Run `attempt` until it succeeds or the policy runs out.
///
/// `attempt` receives the 1-based attempt number.
pub async fn run_with_policy<T, F, Fut>(
    policy: RetryPolicy,
    label: &str,
    mut attempt: F,
) -> std::result::Result<T, Exhausted>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = std::result::Result<T, AttemptFailure>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut number = 1;

    loop {
        debug!(label, attempt = number, max_attempts, "Attempt starting");

        match attempt(number).await {
            Ok(value) => return Ok(value),
            Err(failure) => {
                warn!(
                    label,
                    attempt = number,
                    max_attempts,
                    reason = %failure,
                    "Attempt failed"
                );

                if number >= max_attempts {
                    return Err(Exhausted {
                        attempts: number,
                        last: failure,
                    });
                }
            }
        }

        number += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_stops_at_first_success() {
        let calls = AtomicU32::new(0);

        let result = run_with_policy(RetryPolicy::attempts(3), "test", |n| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 2 {
                    Ok(n)
                } else {
                    Err(AttemptFailure::Malformed("nope".to_string()))
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_exhausted_keeps_last_failure() {
        let result: std::result::Result<(), _> =
            run_with_policy(RetryPolicy::attempts(3), "test", |n| async move {
                Err(AttemptFailure::Malformed(format!("attempt {}", n)))
            })
            .await;

        let exhausted = result.unwrap_err();
        assert_eq!(exhausted.attempts, 3);
        assert_eq!(exhausted.last.to_string(), "malformed reply: attempt 3");
    }

    #[tokio::test]
    async fn test_zero_attempts_runs_once() {
        let calls = AtomicU32::new(0);

        let result: std::result::Result<(), _> =
            run_with_policy(RetryPolicy::attempts(0), "test", |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(AttemptFailure::Transport(PlannerError::Transport("down".to_string()))) }
            })
            .await;

        assert_eq!(result.unwrap_err().attempts, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
