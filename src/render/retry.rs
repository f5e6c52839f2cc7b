use crate::error::{Error, Result, Service};
use log::warn;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Retry budget for one external call (one view, one search, one record).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts including the first (>= 1).
    pub max_attempts: u32,
    /// Calls slower than this are discarded and counted as transient failures.
    pub timeout_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            timeout_ms: 120_000,
        }
    }
}

impl RetryPolicy {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Run `op` until it succeeds, fails permanently, or the budget runs out.
///
/// Returns the value and the number of attempts used. Only errors for which
/// [`Error::is_transient`] holds are retried.
pub fn with_retry<T, F>(
    policy: &RetryPolicy,
    service: Service,
    label: &str,
    mut op: F,
) -> std::result::Result<(T, u32), (Error, u32)>
where
    F: FnMut() -> Result<T>,
{
    let max_attempts = policy.max_attempts.max(1);
    let timeout = policy.timeout();
    let mut attempt = 0;
    loop {
        attempt += 1;
        let start = Instant::now();
        let outcome = op().and_then(|value| {
            let elapsed = start.elapsed();
            if elapsed > timeout {
                Err(Error::transient(
                    service,
                    format!(
                        "{label} took {} ms, limit {} ms",
                        elapsed.as_millis(),
                        timeout.as_millis()
                    ),
                ))
            } else {
                Ok(value)
            }
        });
        match outcome {
            Ok(value) => return Ok((value, attempt)),
            Err(err) if err.is_transient() && attempt < max_attempts => {
                warn!("{label}: attempt {attempt}/{max_attempts} failed: {err}; retrying");
            }
            Err(err) => return Err((err, attempt)),
        }
    }
}
