//! Retry policy types and the retry loop.

use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use serde::Deserialize;

use super::error::{ErrorKind, RetryExhausted};
use crate::error::ConfigError;

/// A fixed-delay retry policy.
///
/// A policy is plain data: an attempt bound and the delay slept between
/// attempts. Both are validated at construction, so a policy that exists is
/// always usable. Running an operation through a policy keeps no state
/// between calls; every call starts again at attempt 1.
///
/// # Examples
///
/// ```rust
/// use quas_utils::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new(3, Duration::from_millis(1)).unwrap();
///
/// let mut calls = 0;
/// let result = policy.run("flaky_read", || {
///     calls += 1;
///     if calls < 3 { Err("not yet") } else { Ok(42) }
/// });
///
/// assert_eq!(result, Ok(42));
/// assert_eq!(calls, 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "RetryConfig")]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

/// Unvalidated retry settings, as read from application configuration.
///
/// Missing fields fall back to 3 attempts and a 1 second delay.
///
/// ```rust
/// use quas_utils::RetryPolicy;
///
/// let policy: RetryPolicy = serde_json::from_str(r#"{"max_attempts": 5, "delay_seconds": 0.25}"#).unwrap();
/// assert_eq!(policy.max_attempts(), 5);
///
/// let bad: Result<RetryPolicy, _> = serde_json::from_str(r#"{"max_attempts": 0}"#);
/// assert!(bad.is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Seconds to sleep between attempts.
    pub delay_seconds: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_seconds: 1.0,
        }
    }
}

impl TryFrom<RetryConfig> for RetryPolicy {
    type Error = ConfigError;

    fn try_from(config: RetryConfig) -> Result<Self, Self::Error> {
        RetryPolicy::from_secs_f64(config.max_attempts, config.delay_seconds)
    }
}

/// Information about a failed attempt, passed to hooks.
#[derive(Debug, Clone)]
pub struct RetryEvent<'a, E> {
    /// Name of the operation being retried.
    pub operation: &'a str,
    /// Which attempt just failed (1-indexed).
    pub attempt: u32,
    /// The policy's attempt bound.
    pub max_attempts: u32,
    /// How the error was classified.
    pub kind: ErrorKind,
    /// The error from the failed attempt.
    pub error: &'a E,
    /// Delay before the next attempt, `None` if this was the last one.
    pub next_delay: Option<Duration>,
    /// Total elapsed time since the first attempt started.
    pub elapsed: Duration,
}

/// Build a policy from raw numbers.
///
/// This is the entry point matching the `retry(retries, delay)` decorator
/// shape: validate once, then [`wrap`](RetryPolicy::wrap) any number of
/// operations.
///
/// ```rust
/// use quas_utils::retry;
///
/// assert!(retry(3, 0.5).is_ok());
/// assert!(retry(0, 0.5).is_err());
/// assert!(retry(3, 0.0).is_err());
/// ```
pub fn retry(max_attempts: u32, delay_seconds: f64) -> Result<RetryPolicy, ConfigError> {
    RetryPolicy::from_secs_f64(max_attempts, delay_seconds)
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Create a policy from an attempt bound and a delay.
    ///
    /// Fails if `max_attempts` is 0 or `delay` is zero.
    pub fn new(max_attempts: u32, delay: Duration) -> Result<Self, ConfigError> {
        if max_attempts < 1 {
            return Err(ConfigError::InvalidMaxAttempts {
                value: max_attempts,
            });
        }
        if delay.is_zero() {
            return Err(ConfigError::InvalidDelay { seconds: 0.0 });
        }
        Ok(Self {
            max_attempts,
            delay,
        })
    }

    /// Create a policy with the delay given in (fractional) seconds.
    ///
    /// Fails if `max_attempts` is 0, or `delay_seconds` is not a positive,
    /// finite, representable number of seconds.
    pub fn from_secs_f64(max_attempts: u32, delay_seconds: f64) -> Result<Self, ConfigError> {
        if max_attempts < 1 {
            return Err(ConfigError::InvalidMaxAttempts {
                value: max_attempts,
            });
        }
        // NaN fails the comparison; infinities and overflow fail the conversion.
        let delay = if delay_seconds > 0.0 {
            Duration::try_from_secs_f64(delay_seconds).ok()
        } else {
            None
        };
        match delay {
            Some(delay) if !delay.is_zero() => Ok(Self {
                max_attempts,
                delay,
            }),
            _ => Err(ConfigError::InvalidDelay {
                seconds: delay_seconds,
            }),
        }
    }

    /// Get the maximum number of attempts.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Get the delay slept between attempts.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Delay to sleep after attempt `attempt` (1-indexed) fails.
    ///
    /// Returns `None` once no attempts remain.
    ///
    /// ```rust
    /// use quas_utils::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::new(3, Duration::from_millis(500)).unwrap();
    ///
    /// assert_eq!(policy.delay_for_attempt(1), Some(Duration::from_millis(500)));
    /// assert_eq!(policy.delay_for_attempt(2), Some(Duration::from_millis(500)));
    /// assert_eq!(policy.delay_for_attempt(3), None);
    /// ```
    pub fn delay_for_attempt(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            None
        } else {
            Some(self.delay)
        }
    }

    /// Run `op` until it succeeds or the attempts run out.
    ///
    /// Every error is retried. When the last attempt fails its error is
    /// returned as-is. The calling thread sleeps between attempts.
    pub fn run<T, E, F>(&self, operation: &str, op: F) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
        E: fmt::Debug,
    {
        self.execute(operation, op, |_| ErrorKind::Generic, |_| true, |_| {})
            .map_err(RetryExhausted::into_error)
    }

    /// Like [`run`](Self::run), with `classify` choosing the log category of
    /// each failure.
    ///
    /// Classification never changes whether an error is retried.
    ///
    /// ```rust
    /// use quas_utils::retry::{OperationError, RetryPolicy, StoreErrorKind};
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::new(2, Duration::from_millis(1)).unwrap();
    /// let result: Result<(), _> = policy.run_classified(
    ///     "save_user",
    ///     || Err(OperationError::store(StoreErrorKind::Operational, "connection reset")),
    ///     OperationError::kind,
    /// );
    /// assert!(result.is_err());
    /// ```
    pub fn run_classified<T, E, F, C>(&self, operation: &str, op: F, classify: C) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
        C: Fn(&E) -> ErrorKind,
        E: fmt::Debug,
    {
        self.execute(operation, op, classify, |_| true, |_| {})
            .map_err(RetryExhausted::into_error)
    }

    /// Retry only when `should_retry` returns true for the error.
    ///
    /// Errors the predicate rejects are returned immediately without
    /// sleeping.
    ///
    /// ```rust
    /// use quas_utils::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// #[derive(Debug, PartialEq)]
    /// enum AppError { Transient, Permanent }
    ///
    /// let policy = RetryPolicy::new(5, Duration::from_millis(1)).unwrap();
    /// let mut calls = 0;
    /// let result: Result<(), _> = policy.run_if(
    ///     "lookup",
    ///     || { calls += 1; Err(AppError::Permanent) },
    ///     |err| matches!(err, AppError::Transient),
    /// );
    ///
    /// assert_eq!(result, Err(AppError::Permanent));
    /// assert_eq!(calls, 1);
    /// ```
    pub fn run_if<T, E, F, P>(&self, operation: &str, op: F, should_retry: P) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
        P: Fn(&E) -> bool,
        E: fmt::Debug,
    {
        self.execute(operation, op, |_| ErrorKind::Generic, should_retry, |_| {})
            .map_err(RetryExhausted::into_error)
    }

    /// Retry with a hook for observability.
    ///
    /// `on_retry` is called once per failed attempt, including the last one
    /// (whose event has `next_delay == None`). It runs before the sleep and
    /// should not block.
    ///
    /// ```rust
    /// use quas_utils::{RetryEvent, RetryPolicy};
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::new(3, Duration::from_millis(1)).unwrap();
    /// let mut seen = Vec::new();
    /// let _ = policy.run_with_hooks(
    ///     "ping",
    ///     || Err::<(), _>("down"),
    ///     |event: &RetryEvent<'_, &str>| seen.push((event.attempt, event.next_delay.is_some())),
    /// );
    ///
    /// assert_eq!(seen, vec![(1, true), (2, true), (3, false)]);
    /// ```
    pub fn run_with_hooks<T, E, F, H>(&self, operation: &str, op: F, on_retry: H) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
        H: FnMut(&RetryEvent<'_, E>),
        E: fmt::Debug,
    {
        self.execute(operation, op, |_| ErrorKind::Generic, |_| true, on_retry)
            .map_err(RetryExhausted::into_error)
    }

    /// Like [`run`](Self::run), but wraps the final error with attempt
    /// metadata.
    pub fn run_reporting<T, E, F>(&self, operation: &str, op: F) -> Result<T, RetryExhausted<E>>
    where
        F: FnMut() -> Result<T, E>,
        E: fmt::Debug,
    {
        self.execute(operation, op, |_| ErrorKind::Generic, |_| true, |_| {})
    }

    /// Bind this policy to an operation, producing a reusable retrying
    /// callable.
    ///
    /// ```rust
    /// use quas_utils::retry;
    ///
    /// let fetch = retry(3, 0.001).unwrap().wrap("fetch_user", |id: u64| {
    ///     if id == 0 { Err("no such user") } else { Ok(format!("user-{}", id)) }
    /// });
    ///
    /// assert_eq!(fetch.call(7), Ok("user-7".to_string()));
    /// assert_eq!(fetch.call(0), Err("no such user"));
    /// ```
    pub fn wrap<F>(self, operation: impl Into<String>, op: F) -> Retrying<F> {
        Retrying {
            policy: self,
            operation: operation.into(),
            op,
            classify: Unclassified,
        }
    }

    fn execute<T, E, F, C, P, H>(
        &self,
        operation: &str,
        mut op: F,
        classify: C,
        should_retry: P,
        mut on_retry: H,
    ) -> Result<T, RetryExhausted<E>>
    where
        F: FnMut() -> Result<T, E>,
        C: Fn(&E) -> ErrorKind,
        P: Fn(&E) -> bool,
        H: FnMut(&RetryEvent<'_, E>),
        E: fmt::Debug,
    {
        let start = Instant::now();
        let max_attempts = self.max_attempts;
        let mut attempt = 1u32;

        loop {
            tracing::info!(operation, attempt, "Running ({}): {}()", attempt, operation);

            let error = match op() {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            let kind = classify(&error);
            log_failure(operation, attempt, max_attempts, kind, &error);

            let next_delay = if should_retry(&error) {
                self.delay_for_attempt(attempt)
            } else {
                None
            };

            on_retry(&RetryEvent {
                operation,
                attempt,
                max_attempts,
                kind,
                error: &error,
                next_delay,
                elapsed: start.elapsed(),
            });

            match next_delay {
                Some(delay) => {
                    thread::sleep(delay);
                    attempt += 1;
                }
                None => return Err(RetryExhausted::new(error, attempt, start.elapsed())),
            }
        }
    }

    /// Async version of [`run`](Self::run).
    ///
    /// Sleeps with `tokio::time::sleep`, so the executor thread is free
    /// during the delay.
    ///
    /// ```rust
    /// use quas_utils::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// # tokio_test::block_on(async {
    /// let policy = RetryPolicy::new(2, Duration::from_millis(1)).unwrap();
    /// let result = policy.run_async("ping", || async { Ok::<_, String>(1) }).await;
    /// assert_eq!(result, Ok(1));
    /// # });
    /// ```
    #[cfg(feature = "async")]
    pub async fn run_async<T, E, F, Fut>(&self, operation: &str, op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        E: fmt::Debug,
    {
        self.execute_async(operation, op, |_| ErrorKind::Generic, |_| true, |_| {})
            .await
            .map_err(RetryExhausted::into_error)
    }

    /// Async version of [`run_classified`](Self::run_classified).
    #[cfg(feature = "async")]
    pub async fn run_async_classified<T, E, F, Fut, C>(
        &self,
        operation: &str,
        op: F,
        classify: C,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        C: Fn(&E) -> ErrorKind,
        E: fmt::Debug,
    {
        self.execute_async(operation, op, classify, |_| true, |_| {})
            .await
            .map_err(RetryExhausted::into_error)
    }

    /// Async version of [`run_if`](Self::run_if).
    #[cfg(feature = "async")]
    pub async fn run_async_if<T, E, F, Fut, P>(
        &self,
        operation: &str,
        op: F,
        should_retry: P,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: fmt::Debug,
    {
        self.execute_async(operation, op, |_| ErrorKind::Generic, should_retry, |_| {})
            .await
            .map_err(RetryExhausted::into_error)
    }

    /// Async version of [`run_with_hooks`](Self::run_with_hooks).
    #[cfg(feature = "async")]
    pub async fn run_async_with_hooks<T, E, F, Fut, H>(
        &self,
        operation: &str,
        op: F,
        on_retry: H,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        H: FnMut(&RetryEvent<'_, E>),
        E: fmt::Debug,
    {
        self.execute_async(operation, op, |_| ErrorKind::Generic, |_| true, on_retry)
            .await
            .map_err(RetryExhausted::into_error)
    }

    /// Async version of [`run_reporting`](Self::run_reporting).
    #[cfg(feature = "async")]
    pub async fn run_async_reporting<T, E, F, Fut>(
        &self,
        operation: &str,
        op: F,
    ) -> Result<T, RetryExhausted<E>>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        E: fmt::Debug,
    {
        self.execute_async(operation, op, |_| ErrorKind::Generic, |_| true, |_| {})
            .await
    }

    #[cfg(feature = "async")]
    async fn execute_async<T, E, F, Fut, C, P, H>(
        &self,
        operation: &str,
        mut op: F,
        classify: C,
        should_retry: P,
        mut on_retry: H,
    ) -> Result<T, RetryExhausted<E>>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        C: Fn(&E) -> ErrorKind,
        P: Fn(&E) -> bool,
        H: FnMut(&RetryEvent<'_, E>),
        E: fmt::Debug,
    {
        let start = Instant::now();
        let max_attempts = self.max_attempts;
        let mut attempt = 1u32;

        loop {
            tracing::info!(operation, attempt, "Running ({}): {}()", attempt, operation);

            let error = match op().await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            let kind = classify(&error);
            log_failure(operation, attempt, max_attempts, kind, &error);

            let next_delay = if should_retry(&error) {
                self.delay_for_attempt(attempt)
            } else {
                None
            };

            on_retry(&RetryEvent {
                operation,
                attempt,
                max_attempts,
                kind,
                error: &error,
                next_delay,
                elapsed: start.elapsed(),
            });

            match next_delay {
                Some(delay) => {
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                None => return Err(RetryExhausted::new(error, attempt, start.elapsed())),
            }
        }
    }
}

fn log_failure<E: fmt::Debug>(
    operation: &str,
    attempt: u32,
    max_attempts: u32,
    kind: ErrorKind,
    error: &E,
) {
    match kind {
        ErrorKind::BackingStore => tracing::info!(
            operation,
            attempt,
            max_attempts,
            error = ?error,
            "DB error on attempt {}/{}: {:?}",
            attempt,
            max_attempts,
            error
        ),
        ErrorKind::Generic => tracing::info!(
            operation,
            attempt,
            max_attempts,
            error = ?error,
            "Error on attempt {}/{}: {:?}",
            attempt,
            max_attempts,
            error
        ),
    }
}

/// Chooses the log category of a failed attempt for [`Retrying`].
///
/// Any `Fn(&E) -> ErrorKind` is a classifier, so `OperationError::kind` can
/// be passed directly.
pub trait Classify<E> {
    /// The category `error` is logged under.
    fn classify(&self, error: &E) -> ErrorKind;
}

/// Logs every failure as [`ErrorKind::Generic`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unclassified;

impl<E> Classify<E> for Unclassified {
    fn classify(&self, _error: &E) -> ErrorKind {
        ErrorKind::Generic
    }
}

impl<E, C> Classify<E> for C
where
    C: Fn(&E) -> ErrorKind,
{
    fn classify(&self, error: &E) -> ErrorKind {
        self(error)
    }
}

/// An operation bound to a [`RetryPolicy`].
///
/// Created by [`RetryPolicy::wrap`]. Each [`call`](Retrying::call) runs the
/// full retry loop from attempt 1; arguments are cloned for every attempt.
/// Use a tuple for several arguments.
///
/// Failures are logged as generic errors unless a classifier is attached
/// with [`classify_with`](Retrying::classify_with):
///
/// ```rust
/// use quas_utils::retry;
/// use quas_utils::retry::{OperationError, StoreErrorKind};
///
/// let save = retry(2, 0.001)
///     .unwrap()
///     .wrap("save_user", |name: &str| -> Result<(), OperationError> {
///         Err(OperationError::store(StoreErrorKind::Operational, format!("{} not saved", name)))
///     })
///     .classify_with(OperationError::kind);
///
/// assert!(save.call("ada").is_err());
/// ```
pub struct Retrying<F, C = Unclassified> {
    policy: RetryPolicy,
    operation: String,
    op: F,
    classify: C,
}

impl<F, C> Retrying<F, C> {
    /// Invoke the wrapped operation under the retry policy.
    pub fn call<A, T, E>(&self, args: A) -> Result<T, E>
    where
        F: Fn(A) -> Result<T, E>,
        C: Classify<E>,
        A: Clone,
        E: fmt::Debug,
    {
        self.policy.run_classified(
            &self.operation,
            || (self.op)(args.clone()),
            |error| self.classify.classify(error),
        )
    }

    /// Replace the classifier used to pick each failure's log line.
    pub fn classify_with<C2>(self, classify: C2) -> Retrying<F, C2> {
        Retrying {
            policy: self.policy,
            operation: self.operation,
            op: self.op,
            classify,
        }
    }

    /// Get the policy.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Get the operation name used in log entries.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Unwrap the original operation.
    pub fn into_inner(self) -> F {
        self.op
    }
}

impl<F, C> fmt::Debug for Retrying<F, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retrying")
            .field("policy", &self.policy)
            .field("operation", &self.operation)
            .finish_non_exhaustive()
    }
}
