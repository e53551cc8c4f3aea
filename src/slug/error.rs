//! Error types for slug generation.

use std::fmt;

use crate::error::ConfigError;

/// Why a unique slug could not be produced.
///
/// `E` is the oracle's lookup error; infallible oracles use
/// [`std::convert::Infallible`].
#[derive(Debug, Clone, PartialEq)]
pub enum SlugError<E> {
    /// The generator was configured with invalid parameters.
    Config(ConfigError),
    /// The name contains nothing that survives normalization.
    Empty {
        /// The name as given.
        name: String,
    },
    /// Every candidate tried was already taken.
    Exhausted {
        /// The name as given.
        name: String,
        /// Number of suffixed candidates tried after the base slug.
        attempts: u32,
    },
    /// The uniqueness oracle failed.
    Lookup(E),
}

impl<E> SlugError<E> {
    /// Returns true if the collision loop ran out of attempts.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }
}

impl<E> From<ConfigError> for SlugError<E> {
    fn from(error: ConfigError) -> Self {
        Self::Config(error)
    }
}

impl<E: fmt::Display> fmt::Display for SlugError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid slug configuration: {}", e),
            Self::Empty { name } => write!(f, "name {:?} produces an empty slug", name),
            Self::Exhausted { name, attempts } => write!(
                f,
                "unable to create a unique slug for {:?} after {} attempts",
                name, attempts
            ),
            Self::Lookup(e) => write!(f, "slug lookup failed: {}", e),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for SlugError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Lookup(e) => Some(e),
            Self::Empty { .. } | Self::Exhausted { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::error::Error as _;

    #[test]
    fn test_exhausted_display_names_attempts_and_name() {
        let err: SlugError<Infallible> = SlugError::Exhausted {
            name: "Hello".to_string(),
            attempts: 5,
        };
        assert_eq!(
            err.to_string(),
            "unable to create a unique slug for \"Hello\" after 5 attempts"
        );
        assert!(err.is_exhausted());
    }

    #[test]
    fn test_config_error_is_source() {
        let err: SlugError<Infallible> = ConfigError::InvalidMaxAttempts { value: 0 }.into();
        assert!(!err.is_exhausted());
        assert_eq!(
            err.source().map(|s| s.to_string()).as_deref(),
            Some("max_attempts must be at least 1 (got 0)")
        );
    }

    #[test]
    fn test_lookup_error_display() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "db timeout");
        let err = SlugError::Lookup(io);
        assert_eq!(err.to_string(), "slug lookup failed: db timeout");
        assert!(err.source().is_some());
    }
}
