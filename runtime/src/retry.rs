//! # Retry
//!
//! The wrapper every generated method runs its attempt in: on any failure
//! with budget left, wait [`RETRY_DELAY`] and start over; once the budget is
//! spent, the last failure is returned unchanged.

use crate::error::ClientResult;
use crate::observer::RequestObserver;
use std::time::Duration;

/// Wait between attempts.
pub const RETRY_DELAY: Duration = Duration::from_millis(250);

/// Retries granted when a call passes `None`.
pub const DEFAULT_RETRIES: u32 = 1;

/// Runs `attempt` up to `budget + 1` times, sleeping on the calling thread
/// between attempts.
pub fn with_retries<T, F>(
    budget: u32,
    observer: Option<&dyn RequestObserver>,
    attempt: F,
) -> ClientResult<T>
where
    F: FnMut() -> ClientResult<T>,
{
    with_retries_using(budget, observer, std::thread::sleep, attempt)
}

/// [`with_retries`] with an explicit sleep function.
pub fn with_retries_using<T, F, S>(
    mut budget: u32,
    observer: Option<&dyn RequestObserver>,
    mut sleep: S,
    mut attempt: F,
) -> ClientResult<T>
where
    F: FnMut() -> ClientResult<T>,
    S: FnMut(Duration),
{
    loop {
        match attempt() {
            Ok(value) => return Ok(value),
            Err(e) if budget == 0 => return Err(e),
            Err(e) => {
                budget -= 1;
                tracing::warn!("Attempt failed: {}; retrying ({} left)", e, budget);
                if let Some(observer) = observer {
                    observer.on_retry(&e, budget);
                }
                sleep(RETRY_DELAY);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;

    fn failure(n: u16) -> ClientError {
        ClientError::Status {
            status: 500 + n,
            body: String::new(),
        }
    }

    #[test]
    fn test_default_budget_attempts_twice() {
        let mut sleeps = Vec::new();
        let mut calls = 0;
        let result: ClientResult<()> = with_retries_using(
            DEFAULT_RETRIES,
            None,
            |d| sleeps.push(d),
            || {
                calls += 1;
                Err(failure(calls))
            },
        );

        assert_eq!(calls, 2);
        assert_eq!(sleeps, vec![Duration::from_millis(250)]);
        // The last failure propagates unchanged.
        assert!(matches!(result, Err(ClientError::Status { status: 502, .. })));
    }

    #[test]
    fn test_success_stops_retrying() {
        let mut sleeps = 0;
        let mut calls = 0;
        let result = with_retries_using(
            3,
            None,
            |_| sleeps += 1,
            || {
                calls += 1;
                if calls < 2 {
                    Err(failure(0))
                } else {
                    Ok(calls)
                }
            },
        );
        assert_eq!(result.unwrap(), 2);
        assert_eq!(sleeps, 1);
    }

    #[test]
    fn test_zero_budget_never_sleeps() {
        let mut sleeps = 0;
        let result: ClientResult<()> = with_retries_using(0, None, |_| sleeps += 1, || Err(failure(0)));
        assert!(result.is_err());
        assert_eq!(sleeps, 0);
    }
}
