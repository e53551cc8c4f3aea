//! Thin logging helpers over `tracing`.
//!
//! These emit ordinary `tracing` events, so they go wherever the
//! application's subscriber sends everything else. Neither helper can fail.

use std::error::Error as StdError;
use std::fmt;

/// Log `value` at INFO, tagged with `event_type = key`.
///
/// ```rust
/// use quas_utils::logging::console_log;
///
/// console_log("startup", "listening on :8080");
/// ```
pub fn console_log(key: &str, value: impl fmt::Display) {
    tracing::info!(event_type = key, "{}", value);
}

/// Log `error` at ERROR with a description of what was being attempted.
///
/// The event carries the error's Rust type name as `error_type` and its
/// source chain as `causes`. The error is not consumed or re-raised.
///
/// ```rust
/// use quas_utils::logging::log_exception;
///
/// let err = "x".parse::<i32>().unwrap_err();
/// log_exception("parsing page number", &err);
/// ```
pub fn log_exception<E>(context: &str, error: &E)
where
    E: StdError + ?Sized,
{
    let causes = source_chain(error);
    tracing::error!(
        error_type = std::any::type_name::<E>(),
        error = %error,
        causes = %causes,
        "{}",
        context
    );
}

fn source_chain<E: StdError + ?Sized>(error: &E) -> String {
    let mut chain = Vec::new();
    let mut current = error.source();
    while let Some(cause) = current {
        chain.push(cause.to_string());
        current = cause.source();
    }
    chain.join(": ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::{OperationError, RetryExhausted, StoreErrorKind};
    use std::time::Duration;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn console_log_emits_value_and_key() {
        console_log("cache", "warmed 12 entries");
        assert!(logs_contain("warmed 12 entries"));
        assert!(logs_contain("event_type=\"cache\""));
    }

    #[test]
    #[traced_test]
    fn log_exception_includes_type_and_context() {
        let err = "x".parse::<i32>().unwrap_err();
        log_exception("parsing page number", &err);
        assert!(logs_contain("parsing page number"));
        assert!(logs_contain("ParseIntError"));
    }

    #[test]
    fn source_chain_walks_causes() {
        let inner = OperationError::store(StoreErrorKind::Operational, "socket closed");
        let outer = RetryExhausted::new(inner, 3, Duration::ZERO);
        assert_eq!(source_chain(&outer), "operational error: socket closed");
    }

    #[test]
    fn source_chain_empty_without_causes() {
        let err = "x".parse::<i32>().unwrap_err();
        assert_eq!(source_chain(&err), "");
    }
}
