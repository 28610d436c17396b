//! Metrics and logging recorded around every storage operation.

use crate::{Error, Result};
use std::time::Instant;

/// Calls made against a store, by engine, call and outcome.
pub const STORE_CALLS: &str = "statusboard_store_calls_total";

/// Wall time of a store call in milliseconds, same labels as [`STORE_CALLS`].
pub const STORE_CALL_MS: &str = "statusboard_store_call_ms";

/// How a store call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The call returned a value.
    Ok,
    /// The request was refused: bad input, missing row, conflict, cancellation.
    Rejected,
    /// The engine or its data is broken.
    Failed,
}

impl Outcome {
    /// Classifies a finished call.
    #[must_use]
    pub fn of<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Self::Ok,
            Err(e) if e.is_severe() => Self::Failed,
            Err(_) => Self::Rejected,
        }
    }

    /// Label value written to the `outcome` label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        }
    }
}

/// Counts one finished call and records how long it took.
pub fn record_call(engine: &'static str, call: &'static str, outcome: Outcome, started: Instant) {
    let labels = [
        ("engine", engine),
        ("call", call),
        ("outcome", outcome.as_str()),
    ];
    metrics::counter!(STORE_CALLS, &labels).increment(1);
    metrics::histogram!(STORE_CALL_MS, &labels).record(started.elapsed().as_secs_f64() * 1000.0);
}

/// Runs `op` as the store call `call` on `engine`, then records and logs it.
///
/// Failed calls log at `error`, rejected ones at `debug`.
pub fn observe<T>(
    engine: &'static str,
    call: &'static str,
    op: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let started = Instant::now();
    let result = op();
    let outcome = Outcome::of(&result);
    record_call(engine, call, outcome, started);
    match (&result, outcome) {
        (Err(e), Outcome::Failed) => log_failure(engine, call, e),
        (Err(e), _) => tracing::debug!(engine, call, error = %e, "store call rejected"),
        (Ok(_), _) => tracing::trace!(engine, call, "store call ok"),
    }
    result
}

fn log_failure(engine: &'static str, call: &'static str, e: &Error) {
    tracing::error!(engine, call, kind = ?e.kind(), error = %e, "store call failed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_outcome_classification() {
        assert_eq!(Outcome::of(&Ok(())), Outcome::Ok);
        assert_eq!(
            Outcome::of::<()>(&Err(Error::not_found("item", "x"))),
            Outcome::Rejected
        );
        let broken = Error::InvalidData {
            entity: "item",
            reason: "bad row".to_string(),
        };
        assert_eq!(Outcome::of::<()>(&Err(broken)), Outcome::Failed);
        assert_eq!(Outcome::Rejected.as_str(), "rejected");
    }

    #[test]
    fn test_record_call_without_recorder() {
        let started = Instant::now();
        thread::sleep(Duration::from_millis(5));
        record_call("memdb", "find_items", Outcome::Ok, started);
        assert!(started.elapsed() >= Duration::from_millis(5));
    }

    #[test]
    fn test_observe_passes_result_through() {
        let value = observe("memdb", "get_item", || Ok(7)).unwrap();
        assert_eq!(value, 7);

        let err = observe::<()>("sqlite", "get_item", || Err(Error::not_found("item", "x")))
            .unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn test_observe_concurrent() {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                thread::spawn(move || {
                    observe("memdb", "concurrent_operation", || {
                        if i % 2 == 0 {
                            Ok(())
                        } else {
                            Err(Error::Unrecoverable {
                                operation: "concurrent_operation".to_string(),
                                cause: "boom".to_string(),
                            })
                        }
                    })
                })
            })
            .collect();
        let failures = handles
            .into_iter()
            .map(|h| h.join().expect("thread panicked"))
            .filter(Result::is_err)
            .count();
        assert_eq!(failures, 2);
    }
}
