//! # quas-utils
//!
//! Cross-cutting helpers for web backends.
//!
//! The two pieces with real control flow are:
//!
//! - **[`retry`]**: re-run an operation against a flaky backing store with a
//!   fixed delay, returning the last error untouched when attempts run out
//! - **[`slug`]**: turn a name into a URL-safe slug that a uniqueness oracle
//!   confirms is unused, resolving collisions with random suffixes
//!
//! Around them sit small stateless helpers: [`timing`], [`datetime`],
//! [`response`] envelopes, [`keys`] casing, [`misc`] values, and [`logging`].
//!
//! ## Quick Example
//!
//! ```rust
//! use quas_utils::{generate_slug, retry};
//!
//! // A store where "hello-world" is already used.
//! let taken = |slug: &str| (slug == "hello-world").then_some(());
//!
//! let policy = retry(3, 0.01).unwrap();
//! let slug = policy
//!     .run("generate_slug", || generate_slug("Hello, World!", &taken, None, 5, true))
//!     .unwrap();
//!
//! assert!(slug.starts_with("hello-world-"));
//! ```
//!
//! Logging goes through [`tracing`]; install whichever subscriber the
//! application uses.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod datetime;
pub mod error;
pub mod keys;
pub mod logging;
pub mod misc;
pub mod response;
pub mod retry;
pub mod slug;
pub mod testing;
pub mod timing;

// Re-exports
pub use error::ConfigError;
pub use response::{error_response, success_response, JsonResponse};
pub use retry::{retry, RetryEvent, RetryExhausted, RetryPolicy, Retrying};
pub use slug::{generate_slug, slugify, SlugError, SlugGenerator, SlugOracle, SlugRecord};
pub use timing::timed;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::ConfigError;
    pub use crate::retry::{retry, ErrorKind, OperationError, RetryPolicy};
    pub use crate::slug::{generate_slug, SlugGenerator, SlugOracle, SlugRecord};
    pub use crate::timing::timed;
}
