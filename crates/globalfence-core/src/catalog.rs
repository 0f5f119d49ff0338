//! Identifier catalogs (globals.json)
//!
//! A catalog document maps environment names to objects of
//! identifier -> value, the same shape as the `globals` package's
//! `globals.json`. Two environments are picked out of it: one server-like,
//! one browser-like.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Built-in catalog document used when no catalog path is configured
const BUILTIN_CATALOG: &str = include_str!("../data/globals.json");

/// Value a catalog assigns to a global
///
/// Equality is strict literal equality: `false` never equals `"readonly"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogValue {
    /// `true` = writable, `false` = read-only
    Flag(bool),

    /// Access keyword (`readonly`, `writable`, `off`, ...)
    Access(String),
}

impl std::fmt::Display for CatalogValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flag(flag) => write!(f, "{}", flag),
            Self::Access(access) => write!(f, "\"{}\"", access),
        }
    }
}

/// One environment's identifier catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: BTreeMap<String, CatalogValue>,
}

impl Catalog {
    /// Create a catalog from (name, value) pairs
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, CatalogValue)>,
        K: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Look up the value for an identifier
    pub fn get(&self, name: &str) -> Option<&CatalogValue> {
        self.entries.get(name)
    }

    /// Check whether an identifier is present
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Identifier names in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in sorted name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CatalogValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The pair of reference catalogs the classifier compares
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSet {
    /// Server-like environment (e.g. `nodeBuiltin`)
    pub server: Catalog,

    /// Browser-like environment (e.g. `browser`)
    pub browser: Catalog,
}

impl CatalogSet {
    /// Build a catalog set from two already-loaded catalogs
    pub fn new(server: Catalog, browser: Catalog) -> Self {
        Self { server, browser }
    }

    /// Load the built-in catalog document
    pub fn builtin(server_env: &str, browser_env: &str) -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG, server_env, browser_env)
    }

    /// Load a catalog document from disk
    pub fn from_file(
        path: &Path,
        server_env: &str,
        browser_env: &str,
    ) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path).map_err(|e| CatalogError::IoError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Self::from_json(&contents, server_env, browser_env)
    }

    /// Parse a catalog document and pick out the two environments
    pub fn from_json(json: &str, server_env: &str, browser_env: &str) -> Result<Self, CatalogError> {
        let mut document: BTreeMap<String, Catalog> =
            serde_json::from_str(json).map_err(|e| CatalogError::ParseError(e.to_string()))?;

        let server = document
            .remove(server_env)
            .ok_or_else(|| CatalogError::MissingEnvironment(server_env.to_string()))?;
        let browser = document
            .remove(browser_env)
            .ok_or_else(|| CatalogError::MissingEnvironment(browser_env.to_string()))?;

        Ok(Self { server, browser })
    }
}

/// Catalog error types
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("IO error reading catalog {path}: {message}")]
    IoError { path: String, message: String },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Environment '{0}' not found in catalog document")]
    MissingEnvironment(String),
}
