//! End-to-end behavior of the fixed-delay retry executor.

use std::cell::Cell;
use std::time::{Duration, Instant};

use quas_utils::prelude::*;
use quas_utils::retry::StoreErrorKind;
use quas_utils::testing::FlakyOperation;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

#[test]
fn flaky_store_recovers_on_third_attempt() {
    init_logging();
    let calls = Cell::new(0);
    let policy = retry(3, 0.01).unwrap();

    let start = Instant::now();
    let result = policy.run("load_balance", || {
        calls.set(calls.get() + 1);
        if calls.get() < 3 {
            Err(OperationError::store(
                StoreErrorKind::Operational,
                "server closed the connection",
            ))
        } else {
            Ok(42)
        }
    });

    assert_eq!(result.unwrap(), 42);
    assert_eq!(calls.get(), 3);
    assert!(start.elapsed() >= Duration::from_millis(20));
}

#[test]
fn exhausted_store_error_comes_back_unchanged() {
    init_logging();
    let policy = RetryPolicy::new(2, Duration::from_millis(1)).unwrap();

    let err = policy
        .run_classified(
            "save_order",
            || -> Result<(), _> {
                Err(OperationError::store(StoreErrorKind::Integrity, "duplicate key"))
            },
            OperationError::kind,
        )
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::BackingStore);
    assert_eq!(err.to_string(), "integrity error: duplicate key");
}

#[test]
fn flaky_operation_that_never_recovers() {
    let op = FlakyOperation::always_failing("timeout", ());
    let policy = retry(4, 0.001).unwrap();

    let exhausted = policy.run_reporting("ping", || op.call()).unwrap_err();

    assert_eq!(op.calls(), 4);
    assert_eq!(exhausted.attempts, 4);
    assert_eq!(*exhausted.error(), "timeout");
}

#[test]
fn wrapped_operation_is_reusable() {
    let lookups = Cell::new(0);
    let find_user = retry(2, 0.001).unwrap().wrap("find_user", |id: u32| {
        lookups.set(lookups.get() + 1);
        if id % 2 == 0 {
            Ok(format!("user-{}", id))
        } else {
            Err("not found")
        }
    });

    assert_eq!(find_user.call(4), Ok("user-4".to_string()));
    assert_eq!(lookups.get(), 1);

    assert_eq!(find_user.call(3), Err("not found"));
    assert_eq!(lookups.get(), 3);
}

#[test]
fn policy_loads_from_json_config() {
    let policy: RetryPolicy =
        serde_json::from_str(r#"{"max_attempts": 5, "delay_seconds": 0.25}"#).unwrap();
    assert_eq!(policy.max_attempts(), 5);
    assert_eq!(policy.delay(), Duration::from_millis(250));

    let defaults: RetryPolicy = serde_json::from_str("{}").unwrap();
    assert_eq!(defaults, RetryPolicy::default());

    assert!(serde_json::from_str::<RetryPolicy>(r#"{"max_attempts": 0}"#).is_err());
}

#[test]
fn invalid_policy_never_runs_the_operation() {
    let calls = Cell::new(0);
    let outcome = retry(0, 1.0).map(|policy| {
        policy.run("never", || {
            calls.set(calls.get() + 1);
            Ok::<_, ()>(())
        })
    });

    assert!(matches!(
        outcome,
        Err(ConfigError::InvalidMaxAttempts { value: 0 })
    ));
    assert_eq!(calls.get(), 0);
}

#[cfg(feature = "async")]
mod async_tests {
    use super::*;

    #[tokio::test]
    async fn async_run_recovers() {
        let op = FlakyOperation::new(1, "busy", "done");
        let policy = retry(3, 0.001).unwrap();

        let result = policy.run_async("fetch", || async { op.call() }).await;

        assert_eq!(result, Ok("done"));
        assert_eq!(op.calls(), 2);
    }
}
