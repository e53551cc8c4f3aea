//! Construction-time configuration errors.
//!
//! Every builder in this crate validates its parameters up front and reports
//! problems as a [`ConfigError`]. Nothing is attempted once construction fails,
//! and a `ConfigError` is never retried.
//!
//! # Examples
//!
//! ```
//! use quas_utils::{ConfigError, RetryPolicy};
//! use std::time::Duration;
//!
//! let err = RetryPolicy::new(0, Duration::from_millis(10)).unwrap_err();
//! assert_eq!(err, ConfigError::InvalidMaxAttempts { value: 0 });
//! ```

use std::error::Error as StdError;
use std::fmt;

/// An invalid parameter passed to a constructor.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// An attempt bound below 1.
    InvalidMaxAttempts {
        /// The rejected value.
        value: u32,
    },
    /// A delay that is zero, negative, or not a finite number of seconds.
    InvalidDelay {
        /// The rejected value, in seconds.
        seconds: f64,
    },
    /// A length outside the range a helper can produce.
    InvalidLength {
        /// Which parameter was rejected.
        parameter: &'static str,
        /// The rejected value.
        value: usize,
        /// Smallest accepted value.
        min: usize,
        /// Largest accepted value.
        max: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMaxAttempts { value } => {
                write!(f, "max_attempts must be at least 1 (got {})", value)
            }
            Self::InvalidDelay { seconds } => write!(
                f,
                "delay must be a positive, finite number of seconds (got {})",
                seconds
            ),
            Self::InvalidLength {
                parameter,
                value,
                min,
                max,
            } => write!(
                f,
                "{} must be between {} and {} (got {})",
                parameter, min, max, value
            ),
        }
    }
}

impl StdError for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_max_attempts() {
        let err = ConfigError::InvalidMaxAttempts { value: 0 };
        assert_eq!(err.to_string(), "max_attempts must be at least 1 (got 0)");
    }

    #[test]
    fn test_display_delay() {
        let err = ConfigError::InvalidDelay { seconds: -1.5 };
        assert!(err.to_string().contains("got -1.5"));
    }

    #[test]
    fn test_display_length() {
        let err = ConfigError::InvalidLength {
            parameter: "length",
            value: 0,
            min: 1,
            max: 19,
        };
        assert_eq!(err.to_string(), "length must be between 1 and 19 (got 0)");
    }
}
