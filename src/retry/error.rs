//! Error types for retry operations.

use std::time::Duration;

/// How a failed attempt is reported in the retry log.
///
/// Both kinds are retried the same way; the kind only selects the log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorKind {
    /// A recognized transient failure of the backing store.
    BackingStore,
    /// Anything else.
    #[default]
    Generic,
}

/// The family of a backing-store failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorKind {
    /// Connection dropped, server unavailable, lock timeout.
    Operational,
    /// Value rejected by the store (bad encoding, out of range).
    Data,
    /// Constraint violation.
    Integrity,
    /// Any other database-reported failure.
    Database,
}

impl StoreErrorKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Operational => "operational",
            Self::Data => "data",
            Self::Integrity => "integrity",
            Self::Database => "database",
        }
    }
}

/// A ready-made error type for persistence adapters.
///
/// Adapters map their driver errors into [`OperationError::Store`] so the
/// retry log can tell store failures apart from everything else. Pass
/// [`OperationError::kind`] to
/// [`RetryPolicy::run_classified`](super::RetryPolicy::run_classified).
///
/// # Examples
///
/// ```rust
/// use quas_utils::retry::{ErrorKind, OperationError, StoreErrorKind};
///
/// let err = OperationError::store(StoreErrorKind::Operational, "server closed the connection");
/// assert_eq!(err.kind(), ErrorKind::BackingStore);
///
/// let err = OperationError::other("bad input");
/// assert_eq!(err.kind(), ErrorKind::Generic);
/// ```
#[derive(Debug)]
pub enum OperationError {
    /// A failure reported by the backing store.
    Store {
        /// Which family of store error.
        kind: StoreErrorKind,
        /// Driver message.
        message: String,
    },
    /// Any other failure.
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl OperationError {
    /// Create a backing-store error.
    pub fn store(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self::Store {
            kind,
            message: message.into(),
        }
    }

    /// Create a generic error from anything convertible to a boxed error.
    pub fn other(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Other(error.into())
    }

    /// Classify this error for retry logging.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Store { .. } => ErrorKind::BackingStore,
            Self::Other(_) => ErrorKind::Generic,
        }
    }
}

impl std::fmt::Display for OperationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store { kind, message } => write!(f, "{} error: {}", kind.as_str(), message),
            Self::Other(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for OperationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store { .. } => None,
            Self::Other(e) => Some(e.as_ref()),
        }
    }
}

/// Error returned by [`RetryPolicy::run_reporting`](super::RetryPolicy::run_reporting)
/// when all attempts fail.
///
/// Carries the final attempt's error untouched, plus how many attempts ran
/// and how long the whole sequence took.
///
/// # Examples
///
/// ```rust
/// use quas_utils::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new(3, Duration::from_millis(1)).unwrap();
///
/// match policy.run_reporting("always_fails", || Err::<(), _>("boom")) {
///     Err(exhausted) => {
///         assert_eq!(exhausted.final_error, "boom");
///         assert_eq!(exhausted.attempts, 3);
///     }
///     Ok(_) => panic!("Expected failure"),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryExhausted<E> {
    /// The error from the final attempt.
    pub final_error: E,
    /// Total number of attempts made.
    pub attempts: u32,
    /// Total time spent, delays included.
    pub total_duration: Duration,
}

impl<E> RetryExhausted<E> {
    /// Create a new RetryExhausted error.
    pub fn new(final_error: E, attempts: u32, total_duration: Duration) -> Self {
        Self {
            final_error,
            attempts,
            total_duration,
        }
    }

    /// Extract the final error, discarding metadata.
    pub fn into_error(self) -> E {
        self.final_error
    }

    /// Get a reference to the final error.
    pub fn error(&self) -> &E {
        &self.final_error
    }
}

impl<E: std::fmt::Display> std::fmt::Display for RetryExhausted<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "retry exhausted after {} attempts ({:?}): {}",
            self.attempts, self.total_duration, self.final_error
        )
    }
}

impl<E: std::error::Error + 'static> std::error::Error for RetryExhausted<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.final_error)
    }
}
