//! Global classifier
//!
//! Partitions the keys of the two reference catalogs into server-only,
//! browser-only and shared sets. A browser key is shared when the server
//! catalog maps the same key to an equal value.

use globalfence_core::{CatalogSet, Category};
use std::collections::BTreeSet;

/// Identifier names per category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Categories {
    embedded_only: BTreeSet<String>,
    server_only: BTreeSet<String>,
    browser_only: BTreeSet<String>,
    shared: BTreeSet<String>,
}

impl Categories {
    /// Classify the catalogs; `embedded_globals` is taken as-is
    pub fn classify(catalogs: &CatalogSet, embedded_globals: &[String]) -> Self {
        let embedded_only: BTreeSet<String> = embedded_globals.iter().cloned().collect();
        let mut server_only: BTreeSet<String> = catalogs.server.keys().map(str::to_string).collect();
        let mut browser_only: BTreeSet<String> = catalogs.browser.keys().map(str::to_string).collect();
        let mut shared = BTreeSet::new();

        for (key, value) in catalogs.browser.iter() {
            if catalogs.server.get(key) == Some(value) {
                server_only.remove(key);
                browser_only.remove(key);
                shared.insert(key.to_string());
            }
        }

        Self {
            embedded_only,
            server_only,
            browser_only,
            shared,
        }
    }

    /// Names in a category, sorted
    pub fn get(&self, category: Category) -> &BTreeSet<String> {
        match category {
            Category::EmbeddedOnly => &self.embedded_only,
            Category::ServerOnly => &self.server_only,
            Category::BrowserOnly => &self.browser_only,
            Category::Shared => &self.shared,
        }
    }

    /// Category a name was classified into
    ///
    /// Looked up in embedded, shared, server, browser order. A conflicting
    /// key sits in both exclusive sets and is reported as server-only.
    pub fn category_of(&self, name: &str) -> Option<Category> {
        const LOOKUP: [Category; 4] = [
            Category::EmbeddedOnly,
            Category::Shared,
            Category::ServerOnly,
            Category::BrowserOnly,
        ];

        LOOKUP
            .into_iter()
            .find(|category| self.get(*category).contains(name))
    }

    /// Keys present in both catalogs with unequal values
    pub fn conflicts(&self) -> Vec<&str> {
        self.server_only
            .intersection(&self.browser_only)
            .map(String::as_str)
            .collect()
    }

    /// Total number of classified names, counting conflicts once per set
    pub fn len(&self) -> usize {
        Category::ALL.iter().map(|c| self.get(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
