//! Testing utilities for code that retries operations or generates slugs.
//!
//! This module provides in-memory collaborators and small helpers so callers
//! can test their own retry and slug logic without a database.
//!
//! # Examples
//!
//! ## In-memory oracle
//!
//! ```rust
//! use quas_utils::generate_slug;
//! use quas_utils::testing::{InMemorySlugs, RecordingOracle};
//!
//! let oracle = RecordingOracle::new(InMemorySlugs::from_slugs(["hello-world"]));
//! let slug = generate_slug("Hello World", &oracle, None, 5, false).unwrap();
//!
//! assert_ne!(slug, "hello-world");
//! assert_eq!(oracle.query_count(), 2);
//! ```
//!
//! ## Flaky operations
//!
//! ```rust
//! use quas_utils::retry;
//! use quas_utils::testing::FlakyOperation;
//!
//! let op = FlakyOperation::new(2, "timeout", 42);
//! let result = retry(3, 0.001).unwrap().run("flaky", || op.call());
//!
//! assert_eq!(result, Ok(42));
//! assert_eq!(op.calls(), 3);
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::convert::Infallible;

use crate::slug::SlugOracle;

/// A set of taken slugs, usable as an infallible oracle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemorySlugs {
    slugs: HashSet<String>,
}

impl InMemorySlugs {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with the given slugs already taken.
    pub fn from_slugs<I, S>(slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            slugs: slugs.into_iter().map(Into::into).collect(),
        }
    }

    /// Mark a slug as taken. Returns false if it already was.
    pub fn insert(&mut self, slug: impl Into<String>) -> bool {
        self.slugs.insert(slug.into())
    }

    /// Whether the slug is taken.
    pub fn contains(&self, slug: &str) -> bool {
        self.slugs.contains(slug)
    }

    /// Number of taken slugs.
    pub fn len(&self) -> usize {
        self.slugs.len()
    }

    /// Whether no slug is taken.
    pub fn is_empty(&self) -> bool {
        self.slugs.is_empty()
    }
}

impl SlugOracle for InMemorySlugs {
    type Record = String;
    type Error = Infallible;

    fn find_by_slug(&self, candidate: &str) -> Result<Option<String>, Infallible> {
        Ok(self.slugs.get(candidate).cloned())
    }
}

/// Wraps an oracle and records every candidate it is asked about.
#[derive(Debug)]
pub struct RecordingOracle<O> {
    inner: O,
    queries: RefCell<Vec<String>>,
}

impl<O> RecordingOracle<O> {
    /// Wrap `inner`.
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            queries: RefCell::new(Vec::new()),
        }
    }

    /// Candidates queried so far, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.borrow().clone()
    }

    /// Number of queries so far.
    pub fn query_count(&self) -> usize {
        self.queries.borrow().len()
    }

    /// Unwrap the inner oracle.
    pub fn into_inner(self) -> O {
        self.inner
    }
}

impl<O: SlugOracle> SlugOracle for RecordingOracle<O> {
    type Record = O::Record;
    type Error = O::Error;

    fn find_by_slug(&self, candidate: &str) -> Result<Option<Self::Record>, Self::Error> {
        self.queries.borrow_mut().push(candidate.to_owned());
        self.inner.find_by_slug(candidate)
    }
}

/// An operation that fails a fixed number of times, then succeeds.
///
/// Meant to be called from a retry closure: `|| op.call()`.
#[derive(Debug)]
pub struct FlakyOperation<T, E> {
    failures: u32,
    error: E,
    value: T,
    calls: Cell<u32>,
}

impl<T: Clone, E: Clone> FlakyOperation<T, E> {
    /// Fail the first `failures` calls with `error`, then return `value`.
    pub fn new(failures: u32, error: E, value: T) -> Self {
        Self {
            failures,
            error,
            value,
            calls: Cell::new(0),
        }
    }

    /// Fail every call with `error`.
    pub fn always_failing(error: E, value: T) -> Self {
        Self::new(u32::MAX, error, value)
    }

    /// Run one attempt.
    pub fn call(&self) -> Result<T, E> {
        let n = self.calls.get().saturating_add(1);
        self.calls.set(n);
        if n <= self.failures {
            Err(self.error.clone())
        } else {
            Ok(self.value.clone())
        }
    }

    /// Number of calls made so far.
    pub fn calls(&self) -> u32 {
        self.calls.get()
    }
}

/// Split a generated candidate into its random suffix and optional
/// timestamp.
///
/// Returns `None` if `slug` is not `base` followed by `-<alphanumeric
/// suffix>` and an optional `-<digits>`.
///
/// ```rust
/// use quas_utils::testing::parse_candidate;
///
/// assert_eq!(parse_candidate("post-aB3xY-1700000000000", "post"), Some(("aB3xY", Some(1700000000000))));
/// assert_eq!(parse_candidate("post-aB3xY", "post"), Some(("aB3xY", None)));
/// assert_eq!(parse_candidate("post", "post"), None);
/// ```
pub fn parse_candidate<'a>(slug: &'a str, base: &str) -> Option<(&'a str, Option<i64>)> {
    let rest = slug.strip_prefix(base)?.strip_prefix('-')?;
    let (suffix, timestamp) = match rest.split_once('-') {
        Some((suffix, ts)) => {
            if ts.is_empty() || !ts.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            (suffix, Some(ts.parse().ok()?))
        }
        None => (rest, None),
    };
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }
    Some((suffix, timestamp))
}

/// Assert that a slug is a suffixed candidate of `base`.
///
/// # Example
///
/// ```rust
/// use quas_utils::assert_slug_candidate;
///
/// assert_slug_candidate!("post-Ab3Cd-1700000000000", "post");
/// ```
#[macro_export]
macro_rules! assert_slug_candidate {
    ($slug:expr, $base:expr) => {
        match $crate::testing::parse_candidate(&$slug, &$base) {
            Some(_) => {}
            None => panic!(
                "Expected a suffixed candidate of {:?}, got {:?}",
                $base, $slug
            ),
        }
    };
}

/// Proptest strategies for names and slugs.
#[cfg(feature = "proptest")]
pub mod strategies {
    use proptest::prelude::*;

    /// Human-readable names: words of letters, digits, and punctuation.
    pub fn names() -> impl Strategy<Value = String> {
        "[A-Za-z0-9][A-Za-z0-9 ,.!?'&-]{0,40}"
    }

    /// Strings already in slug form.
    pub fn slugs() -> impl Strategy<Value = String> {
        "[a-z0-9]{1,10}(-[a-z0-9]{1,10}){0,4}"
    }
}
