//! Retry with exponential backoff.
//!
//! [`with_retry`] is a plain control-flow combinator: it knows nothing about
//! HTTP. The caller supplies the operation and a predicate deciding which
//! failures are worth another attempt.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

/// Retry policy for one logical operation.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first. Zero counts as one.
    pub max_attempts: u32,
    /// Delay after the first failed attempt; doubles each time after that.
    pub base_delay: Duration,
    /// Upper bound on a single delay.
    pub max_delay: Duration,
    /// Extra random delay as a fraction of the computed delay (0.0 to 1.0).
    /// Jitter only ever lengthens the wait.
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            jitter_factor: 0.0,
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries.
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Policy with the given attempt cap and base delay.
    #[must_use]
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            ..Self::default()
        }
    }

    /// Effective attempt cap.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay to wait after `attempt` (1-based) failed: `base × 2^(attempt-1)`,
    /// capped at `max_delay`, before jitter.
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(20);
        let multiplier = 2_u32.saturating_pow(exponent);
        self.base_delay
            .checked_mul(multiplier)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    fn jittered(&self, delay: Duration) -> Duration {
        if self.jitter_factor <= 0.0 || delay.is_zero() {
            return delay;
        }
        let factor = self.jitter_factor.min(1.0) * rand::rng().random::<f64>();
        delay + delay.mul_f64(factor)
    }
}

/// Runs `operation` until it succeeds, fails with a non-transient error, or
/// the attempt cap is reached.
///
/// The operation receives the 1-based attempt number. Attempts are strictly
/// sequential. The last error is returned unchanged.
///
/// # Errors
///
/// Returns the first non-transient error, or the error of the final attempt.
pub async fn with_retry<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    is_transient: P,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let attempts = policy.attempts();
    let mut attempt = 1;
    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(error) if attempt < attempts && is_transient(&error) => {
                let delay = policy.jittered(policy.delay_after(attempt));
                tracing::warn!(
                    attempt,
                    max_attempts = attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %error,
                    "transient failure, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::sync::Mutex;
    use tokio::time::Instant;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Failure {
        transient: bool,
        attempt: u32,
    }

    impl std::fmt::Display for Failure {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "failure on attempt {}", self.attempt)
        }
    }

    fn transient(e: &Failure) -> bool {
        e.transient
    }

    #[test]
    fn test_delay_doubles() {
        let policy = RetryPolicy::new(5, Duration::from_millis(100));
        assert_eq!(policy.delay_after(1), Duration::from_millis(100));
        assert_eq!(policy.delay_after(2), Duration::from_millis(200));
        assert_eq!(policy.delay_after(3), Duration::from_millis(400));
    }

    #[test]
    fn test_delay_is_capped() {
        let policy = RetryPolicy {
            max_delay: Duration::from_secs(1),
            ..RetryPolicy::new(30, Duration::from_millis(300))
        };
        assert_eq!(policy.delay_after(3), Duration::from_secs(1));
        assert_eq!(policy.delay_after(40), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_failure_backs_off_then_rethrows() {
        let d = Duration::from_millis(100);
        let policy = RetryPolicy::new(3, d);
        let started = Instant::now();
        let calls = Arc::new(Mutex::new(Vec::new()));

        let result: Result<(), Failure> = with_retry(&policy, transient, |attempt| {
            let calls = Arc::clone(&calls);
            async move {
                calls.lock().unwrap().push(started.elapsed());
                Err(Failure {
                    transient: true,
                    attempt,
                })
            }
        })
        .await;

        assert_eq!(
            result,
            Err(Failure {
                transient: true,
                attempt: 3
            })
        );
        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        assert!(calls[1] - calls[0] >= d);
        assert!(calls[2] - calls[1] >= d * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_early_success_stops_retrying() {
        let policy = RetryPolicy::new(3, Duration::from_millis(50));
        let mut invocations = 0;

        let result: Result<&str, Failure> = with_retry(&policy, transient, |attempt| {
            invocations += 1;
            async move {
                if attempt == 1 {
                    Err(Failure {
                        transient: true,
                        attempt,
                    })
                } else {
                    Ok("second")
                }
            }
        })
        .await;

        assert_eq!(result, Ok("second"));
        assert_eq!(invocations, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_transient_error_is_not_retried() {
        let policy = RetryPolicy::new(5, Duration::from_millis(10));
        let mut invocations = 0;

        let result: Result<(), Failure> = with_retry(&policy, transient, |attempt| {
            invocations += 1;
            async move {
                Err(Failure {
                    transient: false,
                    attempt,
                })
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(invocations, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_attempts_runs_once() {
        let policy = RetryPolicy::new(0, Duration::from_millis(10));
        let mut invocations = 0;
        let result: Result<(), Failure> = with_retry(&policy, transient, |attempt| {
            invocations += 1;
            async move {
                Err(Failure {
                    transient: true,
                    attempt,
                })
            }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(invocations, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_jitter_only_lengthens_wait() {
        let d = Duration::from_millis(100);
        let policy = RetryPolicy {
            jitter_factor: 0.5,
            ..RetryPolicy::new(2, d)
        };
        let started = Instant::now();
        let result: Result<(), Failure> = with_retry(&policy, transient, |attempt| async move {
            Err(Failure {
                transient: true,
                attempt,
            })
        })
        .await;
        assert!(result.is_err());
        let waited = started.elapsed();
        assert!(waited >= d);
        assert!(waited <= d + d / 2 + Duration::from_millis(1));
    }
}
