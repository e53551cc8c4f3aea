//! Unique slug generation against a uniqueness oracle.

use chrono::Utc;
use rand::distr::Alphanumeric;
use rand::Rng;
use serde::Deserialize;

use super::error::SlugError;
use super::oracle::{SlugOracle, SlugRecord};
use super::slugify::slugify;
use crate::error::ConfigError;

/// Largest accepted random suffix.
pub const MAX_SUFFIX_LEN: usize = 64;

/// Options for producing unique slugs.
///
/// The generator holds no state between calls; one instance can serve any
/// number of threads.
///
/// # Examples
///
/// ```rust
/// use quas_utils::slug::SlugGenerator;
///
/// let generator = SlugGenerator::new(3).unwrap().with_timestamp(false);
/// let taken = |slug: &str| (slug == "release-notes").then_some(());
///
/// let slug = generator.generate("Release Notes", &taken, None).unwrap();
/// assert!(slug.starts_with("release-notes-"));
/// assert_eq!(slug.len(), "release-notes-".len() + 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "SlugConfig")]
pub struct SlugGenerator {
    max_attempts: u32,
    add_timestamp: bool,
    suffix_len: usize,
}

/// Unvalidated slug settings, as read from application configuration.
///
/// Missing fields default to 5 attempts, timestamps on, and a 5 character
/// suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SlugConfig {
    /// Suffixed candidates to try after the base slug collides.
    pub max_attempts: u32,
    /// Append a millisecond timestamp to suffixed candidates.
    pub add_timestamp: bool,
    /// Length of the random suffix.
    pub suffix_len: usize,
}

impl Default for SlugConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            add_timestamp: true,
            suffix_len: 5,
        }
    }
}

impl TryFrom<SlugConfig> for SlugGenerator {
    type Error = ConfigError;

    fn try_from(config: SlugConfig) -> Result<Self, Self::Error> {
        SlugGenerator::new(config.max_attempts)?
            .with_timestamp(config.add_timestamp)
            .with_suffix_len(config.suffix_len)
    }
}

impl Default for SlugGenerator {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            add_timestamp: true,
            suffix_len: 5,
        }
    }
}

impl SlugGenerator {
    /// Create a generator trying up to `max_attempts` suffixed candidates.
    pub fn new(max_attempts: u32) -> Result<Self, ConfigError> {
        if max_attempts < 1 {
            return Err(ConfigError::InvalidMaxAttempts {
                value: max_attempts,
            });
        }
        Ok(Self {
            max_attempts,
            ..Self::default()
        })
    }

    /// Append (or not) a millisecond timestamp to suffixed candidates.
    pub fn with_timestamp(mut self, add_timestamp: bool) -> Self {
        self.add_timestamp = add_timestamp;
        self
    }

    /// Set the random suffix length.
    pub fn with_suffix_len(mut self, suffix_len: usize) -> Result<Self, ConfigError> {
        if !(1..=MAX_SUFFIX_LEN).contains(&suffix_len) {
            return Err(ConfigError::InvalidLength {
                parameter: "suffix_len",
                value: suffix_len,
                min: 1,
                max: MAX_SUFFIX_LEN,
            });
        }
        self.suffix_len = suffix_len;
        Ok(self)
    }

    /// Get the attempt bound.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Whether suffixed candidates carry a timestamp.
    pub fn adds_timestamp(&self) -> bool {
        self.add_timestamp
    }

    /// Get the random suffix length.
    pub fn suffix_len(&self) -> usize {
        self.suffix_len
    }

    /// Produce a slug for `name` that `oracle` reports as unused.
    ///
    /// If `existing` is the record being renamed and its name equals `name`,
    /// its current slug is returned and the oracle is not consulted.
    pub fn generate<O>(
        &self,
        name: &str,
        oracle: &O,
        existing: Option<&dyn SlugRecord>,
    ) -> Result<String, SlugError<O::Error>>
    where
        O: SlugOracle + ?Sized,
    {
        let now_ms = Utc::now().timestamp_millis();
        self.generate_with_rng(name, oracle, existing, &mut rand::rng(), now_ms)
    }

    /// [`generate`](Self::generate) with an explicit random source and
    /// timestamp.
    ///
    /// `now_ms` is used for every suffixed candidate of this call.
    pub fn generate_with_rng<O, G>(
        &self,
        name: &str,
        oracle: &O,
        existing: Option<&dyn SlugRecord>,
        rng: &mut G,
        now_ms: i64,
    ) -> Result<String, SlugError<O::Error>>
    where
        O: SlugOracle + ?Sized,
        G: Rng,
    {
        if let Some(existing) = existing {
            if existing.name() == name {
                return Ok(existing.slug().to_owned());
            }
        }

        let base = slugify(name);
        if base.is_empty() {
            return Err(SlugError::Empty {
                name: name.to_owned(),
            });
        }

        if !oracle.is_taken(&base).map_err(SlugError::Lookup)? {
            return Ok(base);
        }

        for attempt in 1..=self.max_attempts {
            let candidate = self.candidate(&base, rng, now_ms);
            if !oracle.is_taken(&candidate).map_err(SlugError::Lookup)? {
                tracing::debug!(attempt, slug = %candidate, "resolved slug collision");
                return Ok(candidate);
            }
            tracing::debug!(
                attempt,
                max_attempts = self.max_attempts,
                slug = %candidate,
                "slug candidate already taken"
            );
        }

        Err(SlugError::Exhausted {
            name: name.to_owned(),
            attempts: self.max_attempts,
        })
    }

    fn candidate<G: Rng>(&self, base: &str, rng: &mut G, now_ms: i64) -> String {
        let suffix: String = (0..self.suffix_len)
            .map(|_| char::from(rng.sample(Alphanumeric)))
            .collect();

        if self.add_timestamp {
            format!("{}-{}-{}", base, suffix, now_ms)
        } else {
            format!("{}-{}", base, suffix)
        }
    }
}

/// Produce a unique slug for `name`.
///
/// Convenience form of [`SlugGenerator`] with a 5 character suffix.
///
/// # Errors
///
/// - [`SlugError::Exhausted`] when the base slug and every suffixed
///   candidate are taken.
/// - [`SlugError::Config`] when `max_attempts` is 0.
/// - [`SlugError::Empty`] when `name` has no letters or digits in any
///   script (e.g. `"?!"`), so there is no base to build on. The oracle is
///   not queried.
/// - [`SlugError::Lookup`] when the oracle fails.
///
/// # Examples
///
/// ```rust
/// use quas_utils::generate_slug;
///
/// let nothing_taken = |_: &str| None::<()>;
/// assert_eq!(generate_slug("Hello, World!", &nothing_taken, None, 5, true).unwrap(), "hello-world");
///
/// assert_eq!(generate_slug("Привет мир", &nothing_taken, None, 5, true).unwrap(), "privet-mir");
///
/// let zero_attempts = generate_slug("Hello", &nothing_taken, None, 0, true);
/// assert!(zero_attempts.is_err());
///
/// let punctuation_only = generate_slug("?!", &nothing_taken, None, 5, true);
/// assert!(matches!(punctuation_only, Err(quas_utils::SlugError::Empty { .. })));
/// ```
pub fn generate_slug<O>(
    name: &str,
    oracle: &O,
    existing: Option<&dyn SlugRecord>,
    max_attempts: u32,
    add_timestamp: bool,
) -> Result<String, SlugError<O::Error>>
where
    O: SlugOracle + ?Sized,
{
    SlugGenerator::new(max_attempts)?
        .with_timestamp(add_timestamp)
        .generate(name, oracle, existing)
}
