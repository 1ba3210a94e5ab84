//! Slug generation and collision avoidance for public content URLs.
//!
//! ## Summary
//! Titles are normalized to a base slug (ASCII, lowercase, hyphen separated).
//! When the base is already used by an active record, numbered candidates
//! `base-1`, `base-2`, ... are probed in order and the first free one wins.
//!
//! The lookup is not a lock. Two writers can pick the same candidate; the
//! partial unique index on `slug` rejects the loser and the save is re-run.

use std::future::Future;

use crate::error::{CoreError, CoreResult};

/// Highest numeric suffix probed before giving up.
pub const MAX_SLUG_SUFFIX: u32 = 10_000;

/// Generate a URL-safe slug from a title.
///
/// Transliterates to ASCII, lowercases, replaces runs of whitespace and
/// punctuation with a single hyphen and trims edge hyphens.
///
/// Examples:
/// - "My Case Study" -> "my-case-study"
/// - "Growth & Ads @ Scale" -> "growth-ads-scale"
/// - "Café Déjà Vu" -> "cafe-deja-vu"
#[must_use]
pub fn generate_slug(name: &str) -> String {
    slug::slugify(name)
}

/// ## Summary
/// Validates a title and returns its base slug.
///
/// ## Errors
/// Returns `InvalidInput` if the title is blank and `EmptySlug` if nothing
/// URL-safe remains after normalization (e.g. `"!!!"`).
pub fn base_slug(title: &str) -> CoreResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidInput("title is required".to_string()));
    }

    let base = generate_slug(trimmed);
    if base.is_empty() {
        return Err(CoreError::EmptySlug(trimmed.to_string()));
    }

    Ok(base)
}

/// Existence check used while assigning slugs.
///
/// Implementations decide the scope of the check: active records only, and
/// optionally excluding the record being renamed.
pub trait SlugLookup {
    type Error: From<CoreError>;

    /// Returns `true` if `candidate` is already used by a record in scope.
    fn slug_exists(
        &mut self,
        candidate: &str,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;
}

/// ## Summary
/// Assigns a slug for `title` that is free at the time of the check.
///
/// Candidates are checked one at a time, in order: `base`, `base-1`, ...,
/// `base-10000`.
///
/// ## Errors
/// Returns the lookup's error type for lookup failures, and converts
/// `InvalidInput`, `EmptySlug` or `SlugExhausted` into it.
#[tracing::instrument(skip(lookup))]
pub async fn assign_unique_slug<L>(title: &str, lookup: &mut L) -> Result<String, L::Error>
where
    L: SlugLookup + Send,
{
    let base = base_slug(title)?;

    if !lookup.slug_exists(&base).await? {
        tracing::debug!(slug = %base, "Base slug is free");
        return Ok(base);
    }

    for suffix in 1..=MAX_SLUG_SUFFIX {
        let candidate = format!("{base}-{suffix}");
        if !lookup.slug_exists(&candidate).await? {
            tracing::debug!(slug = %candidate, suffix, "Assigned numbered slug");
            return Ok(candidate);
        }
    }

    tracing::warn!(base = %base, "Slug candidates exhausted");
    Err(CoreError::SlugExhausted {
        base,
        attempts: MAX_SLUG_SUFFIX,
    }
    .into())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    /// In-memory lookup that records every probe.
    struct TakenSlugs {
        taken: HashSet<String>,
        probes: Vec<String>,
    }

    impl TakenSlugs {
        fn new(taken: &[&str]) -> Self {
            Self {
                taken: taken.iter().map(ToString::to_string).collect(),
                probes: Vec::new(),
            }
        }
    }

    impl SlugLookup for TakenSlugs {
        type Error = CoreError;

        async fn slug_exists(&mut self, candidate: &str) -> Result<bool, CoreError> {
            self.probes.push(candidate.to_string());
            Ok(self.taken.contains(candidate))
        }
    }

    struct AlwaysTaken {
        calls: u32,
    }

    impl SlugLookup for AlwaysTaken {
        type Error = CoreError;

        async fn slug_exists(&mut self, _candidate: &str) -> Result<bool, CoreError> {
            self.calls += 1;
            Ok(true)
        }
    }

    #[test]
    fn test_simple_title() {
        assert_eq!(generate_slug("Growth"), "growth");
    }

    #[test]
    fn test_with_spaces() {
        assert_eq!(generate_slug("My Case Study"), "my-case-study");
    }

    #[test]
    fn test_multiple_spaces_and_edges() {
        assert_eq!(generate_slug("  My   Case  Study  "), "my-case-study");
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(generate_slug("Growth & Ads @ Scale"), "growth-ads-scale");
        assert_eq!(generate_slug("Q3 2024: Results!"), "q3-2024-results");
    }

    #[test]
    fn test_transliteration() {
        assert_eq!(generate_slug("Café Déjà Vu"), "cafe-deja-vu");
    }

    #[test]
    fn test_base_slug_rejects_blank_title() {
        assert!(matches!(base_slug("   "), Err(CoreError::InvalidInput(_))));
        assert!(matches!(base_slug(""), Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn test_base_slug_rejects_symbol_only_title() {
        assert!(matches!(base_slug("!!! ???"), Err(CoreError::EmptySlug(_))));
    }

    #[test_log::test(tokio::test)]
    async fn test_free_base_is_returned_as_is() {
        let mut lookup = TakenSlugs::new(&[]);
        let slug = assign_unique_slug("Hello World", &mut lookup)
            .await
            .expect("slug assigned");

        assert_eq!(slug, "hello-world");
        assert_eq!(lookup.probes, vec!["hello-world"]);
    }

    #[test_log::test(tokio::test)]
    async fn test_taken_base_gets_first_suffix() {
        let mut lookup = TakenSlugs::new(&["hello-world"]);
        let slug = assign_unique_slug("Hello World", &mut lookup)
            .await
            .expect("slug assigned");

        assert_eq!(slug, "hello-world-1");
    }

    #[test_log::test(tokio::test)]
    async fn test_suffixes_are_probed_in_order_without_gaps() {
        let mut lookup = TakenSlugs::new(&["acme", "acme-1", "acme-2", "acme-4"]);
        let slug = assign_unique_slug("Acme", &mut lookup)
            .await
            .expect("slug assigned");

        assert_eq!(slug, "acme-3");
        assert_eq!(lookup.probes, vec!["acme", "acme-1", "acme-2", "acme-3"]);
    }

    #[test_log::test(tokio::test)]
    async fn test_gap_in_suffixes_is_reused() {
        let mut lookup = TakenSlugs::new(&["acme", "acme-2"]);
        let slug = assign_unique_slug("Acme", &mut lookup)
            .await
            .expect("slug assigned");

        assert_eq!(slug, "acme-1");
    }

    #[test_log::test(tokio::test)]
    async fn test_blank_title_never_probes() {
        let mut lookup = TakenSlugs::new(&[]);
        let result = assign_unique_slug("  ", &mut lookup).await;

        assert!(matches!(result, Err(CoreError::InvalidInput(_))));
        assert!(lookup.probes.is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn test_exhaustion_is_bounded() {
        let mut lookup = AlwaysTaken { calls: 0 };
        let result = assign_unique_slug("Busy", &mut lookup).await;

        assert!(matches!(
            result,
            Err(CoreError::SlugExhausted { ref base, attempts }) if base == "busy" && attempts == MAX_SLUG_SUFFIX
        ));
        assert_eq!(lookup.calls, MAX_SLUG_SUFFIX + 1);
    }
}
