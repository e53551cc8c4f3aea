//! Unique, URL-safe slugs for persisted records.
//!
//! A slug is derived from a human-readable name with [`slugify`]. Before it is
//! handed back, a [`SlugOracle`] (usually a thin adapter over the caller's
//! table) confirms nothing already uses it. On a collision, a short random
//! suffix, and optionally a millisecond timestamp fixed for the whole call,
//! is appended and the oracle is asked again, up to a bounded number of
//! attempts.
//!
//! ```rust
//! use quas_utils::generate_slug;
//!
//! let taken = |slug: &str| (slug == "hello-world").then_some(());
//!
//! let slug = generate_slug("Hello, World!", &taken, None, 5, true).unwrap();
//! assert!(slug.starts_with("hello-world-"));
//! ```
//!
//! # Races
//!
//! Checking and persisting are separate steps, so two writers can still pick
//! the same slug. Put a unique constraint on the column and regenerate when
//! the insert violates it.

mod error;
mod generator;
mod oracle;
mod slugify;

pub use error::SlugError;
pub use generator::{generate_slug, SlugConfig, SlugGenerator, MAX_SUFFIX_LEN};
pub use oracle::{SlugOracle, SlugRecord};
pub use slugify::slugify;
