//! Category keys and their display names.
//!
//! The admin panel stores category keys in several spellings
//! (`linkedin-branding`, `LinkedIn Branding`, `linkedin_branding`). All of
//! them resolve through the same compact key.

use std::collections::BTreeMap;

const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("linkedin-branding", "LinkedIn Branding"),
    ("ghostwriting", "Ghostwriting"),
    ("performance-marketing", "Performance Marketing"),
    ("website-development", "Website Development"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub key: String,
    pub name: String,
}

/// Immutable lookup table built once at startup.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    /// In configuration order.
    categories: Vec<Category>,
    by_compact_key: BTreeMap<String, usize>,
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::from_pairs(
            DEFAULT_CATEGORIES
                .iter()
                .map(|(key, name)| ((*key).to_string(), (*name).to_string())),
        )
    }
}

impl CategoryTable {
    /// ## Summary
    /// Builds the table from the `site.categories` configuration map, or the
    /// built-in categories when the map is empty.
    #[must_use]
    pub fn from_config(configured: &BTreeMap<String, String>) -> Self {
        if configured.is_empty() {
            return Self::default();
        }
        Self::from_pairs(configured.iter().map(|(k, v)| (k.clone(), v.clone())))
    }

    fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut categories = Vec::new();
        let mut by_compact_key = BTreeMap::new();
        for (key, name) in pairs {
            let compact = compact_key(&key);
            if compact.is_empty() || by_compact_key.contains_key(&compact) {
                continue;
            }
            by_compact_key.insert(compact.clone(), categories.len());
            // Display names are addressable too.
            by_compact_key
                .entry(compact_key(&name))
                .or_insert(categories.len());
            categories.push(Category { key, name });
        }
        Self {
            categories,
            by_compact_key,
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Category> {
        self.by_compact_key
            .get(&compact_key(key))
            .and_then(|idx| self.categories.get(*idx))
    }

    /// ## Summary
    /// Returns the display name for a stored category key. Unknown keys are
    /// title-cased (`"seo-audits"` becomes `"Seo Audits"`).
    #[must_use]
    pub fn display_name(&self, key: &str) -> String {
        self.get(key)
            .map_or_else(|| title_case(key), |category| category.name.clone())
    }

    /// ## Summary
    /// Returns every spelling a stored row may use for this category, for
    /// filtering listings. `None` means the key is unknown.
    #[must_use]
    pub fn filter_values(&self, key: &str) -> Option<Vec<String>> {
        let category = self.get(key)?;
        let mut values = vec![
            category.key.clone(),
            category.name.clone(),
            category.name.to_lowercase(),
            category.key.replace('-', "_"),
        ];
        values.sort();
        values.dedup();
        Some(values)
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }
}

fn compact_key(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

fn title_case(value: &str) -> String {
    value
        .split(['-', '_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_resolve_every_spelling() {
        let table = CategoryTable::default();

        for spelling in ["linkedin-branding", "LinkedIn Branding", "linkedin_branding", "LINKEDINBRANDING"] {
            assert_eq!(table.display_name(spelling), "LinkedIn Branding", "{spelling}");
        }
    }

    #[test]
    fn test_unknown_key_is_title_cased() {
        let table = CategoryTable::default();
        assert_eq!(table.display_name("seo-audits"), "Seo Audits");
        assert_eq!(table.display_name(""), "");
        assert!(table.get("seo-audits").is_none());
    }

    #[test]
    fn test_configured_categories_replace_defaults() {
        let mut configured = BTreeMap::new();
        configured.insert("video".to_string(), "Video Production".to_string());

        let table = CategoryTable::from_config(&configured);

        assert_eq!(table.display_name("video"), "Video Production");
        assert!(table.get("ghostwriting").is_none());
        assert_eq!(table.categories().len(), 1);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let table = CategoryTable::from_config(&BTreeMap::new());
        assert_eq!(table.categories().len(), 4);
    }

    #[test]
    fn test_filter_values() {
        let table = CategoryTable::default();

        let values = table
            .filter_values("performance_marketing")
            .expect("known category");
        assert!(values.contains(&"performance-marketing".to_string()));
        assert!(values.contains(&"Performance Marketing".to_string()));
        assert!(values.contains(&"performance_marketing".to_string()));

        assert!(table.filter_values("nope").is_none());
    }
}
