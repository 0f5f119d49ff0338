//! Catalog audit
//!
//! Nothing here rejects a catalog. Problems only surface as warnings so the
//! generated rules can still be inspected.

use crate::classifier::Categories;
use globalfence_core::{CatalogSet, Diagnostic, DiagnosticCode, Location, Severity};
use regex::Regex;
use std::sync::OnceLock;

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("identifier pattern is valid")
    })
}

/// Whether `name` can be written as a bare identifier
pub fn is_identifier(name: &str) -> bool {
    identifier_pattern().is_match(name)
}

/// Audit loaded catalogs; `source` names where they came from
pub fn audit_catalogs(catalogs: &CatalogSet, categories: &Categories, source: &str) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for (env, catalog) in [("server", &catalogs.server), ("browser", &catalogs.browser)] {
        for key in catalog.keys().filter(|key| !is_identifier(key)) {
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticCode::CatalogInvalidIdentifier,
                    Severity::Warn,
                    format!("{} catalog key {:?} is not a valid identifier name", env, key),
                )
                .with_location(Location::new(source)),
            );
        }
    }

    for key in categories.conflicts() {
        let server = catalogs.server.get(key);
        let browser = catalogs.browser.get(key);

        if let (Some(server), Some(browser)) = (server, browser) {
            tracing::warn!(key, %server, %browser, "catalog value conflict");

            diagnostics.push(
                Diagnostic::new(
                    DiagnosticCode::CatalogValueConflict,
                    Severity::Warn,
                    format!(
                        "'{}' is {} in the server catalog but {} in the browser catalog; \
                         it is restricted as exclusive to both",
                        key, server, browser
                    ),
                )
                .with_location(Location::new(source)),
            );
        }
    }

    diagnostics
}
