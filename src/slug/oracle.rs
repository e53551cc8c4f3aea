//! Collaborator traits for slug generation.

use std::convert::Infallible;

/// Read-only lookup answering whether a slug is already in use.
///
/// Implemented by whatever persistence adapter the caller owns; the slug
/// generator never writes through it. Lookups must reflect at least every
/// write the current process committed before the call.
///
/// Any `Fn(&str) -> Option<R>` closure is an infallible oracle:
///
/// ```rust
/// use quas_utils::slug::SlugOracle;
///
/// let taken = ["hello-world"];
/// let oracle = |slug: &str| taken.iter().find(|s| **s == slug).copied();
///
/// assert!(oracle.is_taken("hello-world").unwrap());
/// assert!(!oracle.is_taken("hello").unwrap());
/// ```
pub trait SlugOracle {
    /// The stored record type returned by a hit.
    type Record;
    /// Lookup failure.
    type Error;

    /// Find the record whose slug equals `candidate`, if any.
    fn find_by_slug(&self, candidate: &str) -> Result<Option<Self::Record>, Self::Error>;

    /// Whether a record with this slug exists.
    fn is_taken(&self, candidate: &str) -> Result<bool, Self::Error> {
        Ok(self.find_by_slug(candidate)?.is_some())
    }
}

impl<F, R> SlugOracle for F
where
    F: Fn(&str) -> Option<R>,
{
    type Record = R;
    type Error = Infallible;

    fn find_by_slug(&self, candidate: &str) -> Result<Option<R>, Infallible> {
        Ok(self(candidate))
    }
}

/// A persisted record that carries a name and the slug derived from it.
pub trait SlugRecord {
    /// The human-readable name.
    fn name(&self) -> &str;
    /// The stored slug.
    fn slug(&self) -> &str;
}

impl<T: SlugRecord + ?Sized> SlugRecord for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn slug(&self) -> &str {
        (**self).slug()
    }
}

impl SlugRecord for (String, String) {
    fn name(&self) -> &str {
        &self.0
    }

    fn slug(&self) -> &str {
        &self.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Article {
        title: String,
        slug: String,
    }

    impl SlugRecord for Article {
        fn name(&self) -> &str {
            &self.title
        }

        fn slug(&self) -> &str {
            &self.slug
        }
    }

    #[test]
    fn test_closure_oracle() {
        let oracle = |slug: &str| (slug == "taken").then_some(1u32);
        assert_eq!(oracle.find_by_slug("taken"), Ok(Some(1)));
        assert_eq!(oracle.find_by_slug("free"), Ok(None));
    }

    #[test]
    fn test_record_through_reference() {
        let article = Article {
            title: "Release Notes".to_string(),
            slug: "release-notes".to_string(),
        };
        let by_ref: &dyn SlugRecord = &article;
        assert_eq!(by_ref.name(), "Release Notes");
        assert_eq!((&article).slug(), "release-notes");
    }

    #[test]
    fn test_tuple_record() {
        let record = ("Name".to_string(), "name".to_string());
        assert_eq!(record.name(), "Name");
        assert_eq!(record.slug(), "name");
    }

    struct FailingStore;

    impl SlugOracle for FailingStore {
        type Record = ();
        type Error = &'static str;

        fn find_by_slug(&self, _candidate: &str) -> Result<Option<()>, &'static str> {
            Err("connection refused")
        }
    }

    #[test]
    fn test_is_taken_propagates_errors() {
        assert_eq!(FailingStore.is_taken("anything"), Err("connection refused"));
    }
}
