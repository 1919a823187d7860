//! Publication catalog: internal identifier → human-readable name.
//!
//! The search backend stores publications under stable internal
//! identifiers; the catalog resolves them to display names for the
//! grounding context and the sources panel. Unknown identifiers pass
//! through using their raw value.

use std::collections::HashMap;

/// Read-only mapping from publication identifier to display name.
#[derive(Debug, Clone)]
pub struct PublicationCatalog {
    names: HashMap<String, String>,
}

impl Default for PublicationCatalog {
    fn default() -> Self {
        Self::with_entries([
            ("mintpress", "MintPress"),
            ("grayzone", "The Grayzone"),
            ("consortium_news", "Consortium News"),
            ("the_cradle", "The Cradle"),
        ])
    }
}

impl PublicationCatalog {
    /// Build a catalog from (identifier, display name) pairs.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            names: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Resolve a publication identifier to its display name.
    ///
    /// Falls back to the raw identifier when unmapped.
    pub fn display_name<'a>(&'a self, identifier: &'a str) -> &'a str {
        self.names
            .get(identifier)
            .map(String::as_str)
            .unwrap_or(identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_publication_resolves() {
        let catalog = PublicationCatalog::default();
        assert_eq!(catalog.display_name("mintpress"), "MintPress");
        assert_eq!(catalog.display_name("grayzone"), "The Grayzone");
        assert_eq!(catalog.display_name("consortium_news"), "Consortium News");
        assert_eq!(catalog.display_name("the_cradle"), "The Cradle");
    }

    #[test]
    fn test_unknown_publication_passes_through() {
        let catalog = PublicationCatalog::default();
        assert_eq!(catalog.display_name("some_new_outlet"), "some_new_outlet");
    }

    #[test]
    fn test_custom_entries() {
        let catalog = PublicationCatalog::with_entries([("wire", "The Wire")]);
        assert_eq!(catalog.display_name("wire"), "The Wire");
        assert_eq!(catalog.display_name("mintpress"), "mintpress");
    }
}
