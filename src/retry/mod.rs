//! Fixed-delay retry for operations against an unreliable backing store.
//!
//! A [`RetryPolicy`] is just data: how many attempts, and how long to sleep
//! between them. Running an operation through it re-invokes the operation on
//! every error until it succeeds or the attempts are used up, then hands back
//! the last error exactly as the operation produced it.
//!
//! # Quick Start
//!
//! ```rust
//! use quas_utils::retry;
//!
//! let policy = retry(3, 0.01).unwrap();
//!
//! let mut calls = 0;
//! let answer = policy.run("compute_answer", || {
//!     calls += 1;
//!     if calls < 3 { Err("transient") } else { Ok(42) }
//! });
//!
//! assert_eq!(answer, Ok(42));
//! assert_eq!(calls, 3);
//! ```
//!
//! # Logging
//!
//! Each attempt emits an INFO event naming the operation, and each failure
//! emits another tagged with `attempt`/`max_attempts`. Failures are logged as
//! either "DB error" or "Error" depending on their [`ErrorKind`]; both kinds
//! are retried the same way.
//!
//! # Error Types
//!
//! - [`RetryExhausted`]: optional wrapper with attempt metadata, returned by
//!   [`RetryPolicy::run_reporting`]
//! - [`OperationError`]: a store/generic error type for persistence adapters
//!
//! The sleep between attempts blocks the calling thread. With the `async`
//! feature, [`RetryPolicy::run_async`] sleeps on the tokio timer instead.

mod error;
mod policy;

pub use error::{ErrorKind, OperationError, RetryExhausted, StoreErrorKind};
pub use policy::{retry, Classify, RetryConfig, RetryEvent, RetryPolicy, Retrying, Unclassified};
