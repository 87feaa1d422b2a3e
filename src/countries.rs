//! Country reference registry: canonical names, synonym variants, and
//! coordinates.
//!
//! The registry is loaded once at startup from a JSON list and is
//! immutable afterwards. Every counter resolves surface names through
//! it so that "USA" and "United States" always land in the same
//! bucket.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use unicase::UniCase;

/// Errors raised while loading the country reference list. All of
/// them are fatal: a run never starts with a bad registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("cannot read country list: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid country list JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("country record {index} has no names")]
    EmptyNames { index: usize },
    #[error("country record {index} contains a blank name")]
    BlankName { index: usize },
    #[error("synonym {synonym:?} is claimed by both {first:?} and {second:?}")]
    DuplicateSynonym {
        synonym: String,
        first: String,
        second: String,
    },
    #[error("country {name:?} is listed twice")]
    DuplicateCountry { name: String },
}

/// Geographic coordinates of a country, for downstream map rendering.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// One record of the reference list. The name field accepts the
/// spellings found in the wild (`country`, `name`, or `names`), each
/// either a single string or a list whose first entry is the
/// canonical name.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(alias = "name", alias = "names")]
    country: NameField,
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NameField {
    One(String),
    Many(Vec<String>),
}

impl NameField {
    fn into_names(self) -> Vec<String> {
        match self {
            NameField::One(name) => vec![name],
            NameField::Many(names) => names,
        }
    }
}

/// Immutable lookup table from any known country name variant to its
/// canonical name and location.
#[derive(Debug, Default)]
pub struct CountryRegistry {
    synonyms: HashMap<UniCase<String>, String>,
    locations: HashMap<String, Location>,
}

impl CountryRegistry {
    /// Load the registry from a JSON file.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Parse the registry from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let records: Vec<RawRecord> = serde_json::from_str(json)?;
        let mut registry = Self::default();
        for (index, record) in records.into_iter().enumerate() {
            let location = Location {
                latitude: record.latitude,
                longitude: record.longitude,
            };
            registry.insert(index, record.country.into_names(), location)?;
        }
        Ok(registry)
    }

    /// The country list bundled with the crate.
    pub fn builtin() -> Result<Self, RegistryError> {
        static DATA: &str = include_str!("../data/countries.json");
        Self::from_json(DATA)
    }

    /// True if the token matches any known name variant.
    pub fn contains(&self, token: &str) -> bool {
        self.canonical_name(token).is_some()
    }

    /// Resolve a name variant to the country's canonical name.
    ///
    /// Matching is case-insensitive and exact after light cleanup:
    /// surrounding whitespace, one leading article, and trailing dots
    /// are removed, so noun chunks like "the USA" or "France." still
    /// resolve. No substring or fuzzy matching.
    pub fn canonical_name(&self, token: &str) -> Option<&str> {
        self.synonyms
            .get(&UniCase::new(normalize(token)))
            .map(String::as_str)
    }

    /// Coordinates for any known name variant.
    pub fn location(&self, token: &str) -> Option<Location> {
        let canonical = self.canonical_name(token)?;
        self.locations.get(canonical).copied()
    }

    /// All canonical names, in no particular order.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.locations.keys().map(String::as_str)
    }

    /// Number of countries in the registry.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    fn insert(
        &mut self,
        index: usize,
        names: Vec<String>,
        location: Location,
    ) -> Result<(), RegistryError> {
        let Some(first) = names.first() else {
            return Err(RegistryError::EmptyNames { index });
        };
        let canonical = first.trim().to_owned();
        if canonical.is_empty() {
            return Err(RegistryError::BlankName { index });
        }
        if self.locations.contains_key(&canonical) {
            return Err(RegistryError::DuplicateCountry { name: canonical });
        }
        for name in &names {
            let name = name.trim();
            if name.is_empty() {
                return Err(RegistryError::BlankName { index });
            }
            let key = UniCase::new(normalize(name));
            if let Some(existing) = self.synonyms.get(&key) {
                if *existing != canonical {
                    return Err(RegistryError::DuplicateSynonym {
                        synonym: name.to_owned(),
                        first: existing.clone(),
                        second: canonical,
                    });
                }
                continue;
            }
            self.synonyms.insert(key, canonical.clone());
        }
        self.locations.insert(canonical, location);
        Ok(())
    }
}

/// Shared cleanup applied to both stored synonyms and looked-up
/// tokens, so the two sides always agree.
fn normalize(token: &str) -> String {
    let stripped = strip_article(token.trim());
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.trim_end_matches('.').to_owned()
}

/// Remove one leading "the"/"an"/"a" so noun chunks with a
/// determiner ("the USA") match their bare synonym.
fn strip_article(token: &str) -> &str {
    for article in ["the", "an", "a"] {
        if let Some(head) = token.get(..article.len()) {
            if head.eq_ignore_ascii_case(article)
                && token[article.len()..].starts_with(char::is_whitespace)
            {
                return token[article.len()..].trim_start();
            }
        }
    }
    token
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CountryRegistry {
        CountryRegistry::from_json(
            r#"[
                {"names": ["United States", "USA", "America"], "latitude": 38, "longitude": -97},
                {"country": "France", "latitude": 46, "longitude": 2}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn resolves_synonyms_to_canonical_name() {
        let registry = sample();
        assert_eq!(registry.canonical_name("USA"), Some("United States"));
        assert_eq!(registry.canonical_name("America"), Some("United States"));
        assert_eq!(registry.canonical_name("France"), Some("France"));
        assert_eq!(registry.canonical_name("Atlantis"), None);
        assert!(registry.contains("USA"));
        assert!(!registry.contains("Atlantis"));
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let registry = sample();
        assert_eq!(
            registry.canonical_name("usa"),
            registry.canonical_name("USA")
        );
        assert_eq!(
            registry.canonical_name("Usa"),
            registry.canonical_name("USA")
        );
        assert_eq!(registry.canonical_name("fRaNcE"), Some("France"));
    }

    #[test]
    fn canonicalization_is_idempotent() {
        let registry = sample();
        for token in ["USA", "usa", "United States", "France"] {
            let once = registry.canonical_name(token).unwrap();
            assert_eq!(registry.canonical_name(once), Some(once));
        }
    }

    #[test]
    fn leading_article_and_trailing_dot_are_stripped() {
        let registry = sample();
        assert_eq!(registry.canonical_name("the USA"), Some("United States"));
        assert_eq!(registry.canonical_name("The  United   States"), Some("United States"));
        assert_eq!(registry.canonical_name("France."), Some("France"));
    }

    #[test]
    fn location_resolves_through_synonyms() {
        let registry = sample();
        let loc = registry.location("usa").unwrap();
        assert_eq!(loc.latitude, 38.0);
        assert_eq!(loc.longitude, -97.0);
        assert!(registry.location("Atlantis").is_none());
    }

    #[test]
    fn all_returns_only_canonical_names() {
        let registry = sample();
        let mut names: Vec<&str> = registry.all().collect();
        names.sort_unstable();
        assert_eq!(names, ["France", "United States"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn rejects_non_numeric_coordinates() {
        let err = CountryRegistry::from_json(
            r#"[{"country": "France", "latitude": "forty-six", "longitude": 2}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::Parse(_)));
    }

    #[test]
    fn rejects_empty_and_blank_name_lists() {
        let err = CountryRegistry::from_json(
            r#"[{"names": [], "latitude": 1, "longitude": 2}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::EmptyNames { index: 0 }));

        let err = CountryRegistry::from_json(
            r#"[{"names": ["France", "  "], "latitude": 1, "longitude": 2}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::BlankName { index: 0 }));
    }

    #[test]
    fn rejects_conflicting_synonyms() {
        let err = CountryRegistry::from_json(
            r#"[
                {"names": ["United States", "America"], "latitude": 38, "longitude": -97},
                {"names": ["Brazil", "America"], "latitude": -10, "longitude": -55}
            ]"#,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateSynonym { .. }));
    }

    #[test]
    fn builtin_list_loads() {
        let registry = CountryRegistry::builtin().unwrap();
        assert!(registry.len() > 20);
        assert_eq!(registry.canonical_name("U.S."), Some("United States"));
    }
}
