/// Link reference definitions collected during block parsing
use std::collections::HashMap;

use unicode_casefold::UnicodeCaseFold;

#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub url: String,
    pub title: Option<String>,
}

/// Label → reference map. Populated while blocks are parsed, read-only
/// during inline resolution.
#[derive(Debug, Default)]
pub struct RefMap {
    map: HashMap<String, Reference>,
}

impl RefMap {
    pub fn new() -> Self {
        RefMap {
            map: HashMap::new(),
        }
    }

    /// Record a definition. The first definition for a normalized label
    /// wins; later duplicates are ignored.
    pub fn add(&mut self, label: &str, url: String, title: Option<String>) {
        let key = normalize_label(label);
        if key.is_empty() {
            return;
        }
        self.map
            .entry(key)
            .or_insert(Reference { url, title });
    }

    pub fn lookup(&self, label: &str) -> Option<&Reference> {
        let key = normalize_label(label);
        self.map.get(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Normalize a link label: strip surrounding whitespace, Unicode-case-fold,
/// and collapse internal whitespace runs to a single space.
pub fn normalize_label(label: &str) -> String {
    let folded: String = label.chars().case_fold().collect();
    folded.split_whitespace().collect::<Vec<&str>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace_and_folds_case() {
        assert_eq!(normalize_label("  Foo\n   Bar  "), "foo bar");
        assert_eq!(normalize_label("ТОЛПОЙ"), "толпой");
    }

    #[test]
    fn test_first_definition_wins() {
        let mut map = RefMap::new();
        map.add("x", "/a".to_string(), None);
        map.add("x", "/b".to_string(), None);
        assert_eq!(map.lookup("x").map(|r| r.url.as_str()), Some("/a"));
    }

    #[test]
    fn test_lookup_normalizes_query_label() {
        let mut map = RefMap::new();
        map.add("Foo Bar", "/url".to_string(), Some("title".to_string()));
        assert_eq!(
            map.lookup("foo   bar").map(|r| r.url.as_str()),
            Some("/url")
        );
    }

    #[test]
    fn test_empty_label_is_ignored() {
        let mut map = RefMap::new();
        map.add("   ", "/nowhere".to_string(), None);
        assert!(map.is_empty());
    }
}
