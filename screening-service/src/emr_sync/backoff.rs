//! §5 "Backoff": "on transient HTTP failure: immediate retry once, then exponential
//! backoff with jitter (base 1 s, cap 60 s, max 5 attempts)."

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use shared::shared::{AppError, AppResult};

const BASE: Duration = Duration::from_secs(1);
const CAP: Duration = Duration::from_secs(60);
const MAX_ATTEMPTS: u32 = 5;

fn backoff_delay(attempt: u32) -> Duration {
    let exp = BASE.as_secs_f64() * 2f64.powi(attempt as i32 - 1);
    let capped = exp.min(CAP.as_secs_f64());
    let jitter = rand::thread_rng().gen_range(0.0..=capped * 0.25);
    Duration::from_secs_f64(capped + jitter)
}

/// Retries `f` on `AppError::Transient`; any other error or success returns
/// immediately. Attempt 1 retries with no delay ("immediate retry once"); attempts
/// 2..=5 sleep with exponential backoff and jitter.
pub async fn with_backoff<T, F, Fut>(mut f: F) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match f().await {
            Ok(value) => return Ok(value),
            Err(AppError::Transient(msg)) if attempt < MAX_ATTEMPTS => {
                if attempt > 1 {
                    tokio::time::sleep(backoff_delay(attempt)).await;
                }
                tracing::warn!(attempt, error = %msg, "transient FHIR failure, retrying");
                continue;
            }
            Err(other) => return Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn succeeds_after_transient_failures_within_attempt_budget() {
        let calls = AtomicU32::new(0);
        let result = with_backoff(|| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(AppError::Transient("timeout".into()))
                } else {
                    Ok(42)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result: AppResult<()> = with_backoff(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(AppError::Permanent("bad request".into())) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
