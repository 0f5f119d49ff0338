//! Restriction-rule synthesizer
//!
//! Turns the classified categories into one lint config entry per runtime
//! file group. Every forbidden identifier is restricted twice: as a property
//! of `globalThis` and as a bare global reference.

use crate::classifier::Categories;
use crate::lint_config::{
    LintConfigEntry, RestrictedName, RestrictedProperty, RestrictionRules, RuleDocument,
    RuleSetting,
};
use crate::policy;
use globalfence_core::{Config, RuleLevel, Runtime};

/// Root global object restricted properties hang off
pub const GLOBAL_OBJECT: &str = "globalThis";

/// Legacy alias of the global object, banned everywhere
pub const LEGACY_GLOBAL_ALIAS: &str = "global";

/// An identifier forbidden in some runtime, with the runtime it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestrictedGlobal {
    pub name: String,
    pub origin: Runtime,
}

impl RestrictedGlobal {
    /// Message reported when the global is used in `runtime`
    pub fn message(&self, runtime: Runtime) -> String {
        format!(
            "'{}' is a {}-only global and should not be used in a {} environment",
            self.name, self.origin, runtime
        )
    }
}

/// Builds restriction rules from classified categories
#[derive(Debug, Clone)]
pub struct Synthesizer<'a> {
    categories: &'a Categories,
    level: RuleLevel,
    window_globals: &'a [String],
}

impl<'a> Synthesizer<'a> {
    pub fn new(categories: &'a Categories, level: RuleLevel, window_globals: &'a [String]) -> Self {
        Self {
            categories,
            level,
            window_globals,
        }
    }

    /// Synthesizer using the configured rule level and window globals
    pub fn from_config(categories: &'a Categories, config: &'a Config) -> Self {
        Self::new(categories, config.rule_level, &config.restricted_window_globals)
    }

    /// Identifiers forbidden in `runtime`, category by category
    pub fn forbidden(&self, runtime: Runtime) -> Vec<RestrictedGlobal> {
        policy::forbidden_categories(runtime)
            .flat_map(|category| {
                self.categories
                    .get(category)
                    .iter()
                    .map(move |name| RestrictedGlobal {
                        name: name.clone(),
                        origin: category.origin(),
                    })
            })
            .collect()
    }

    /// Config entry for one runtime file group
    pub fn entry(&self, runtime: Runtime, files: Vec<String>) -> LintConfigEntry {
        let forbidden = self.forbidden(runtime);

        let mut restricted_properties = RuleSetting::new(self.level);
        let mut restricted_globals = RuleSetting::new(self.level);

        for global in &forbidden {
            let message = global.message(runtime);

            restricted_properties.options.push(RestrictedProperty {
                object: GLOBAL_OBJECT.to_string(),
                property: global.name.clone(),
                message: message.clone(),
            });
            restricted_globals.options.push(RestrictedName {
                name: global.name.clone(),
                message,
            });
        }

        restricted_globals.options.push(RestrictedName {
            name: LEGACY_GLOBAL_ALIAS.to_string(),
            message: format!(
                "Do not use the global object directly. Use {} instead.",
                GLOBAL_OBJECT
            ),
        });

        if runtime == Runtime::Browser {
            restricted_globals
                .options
                .extend(self.window_globals.iter().map(|name| RestrictedName {
                    name: name.clone(),
                    message: format!("Use window.{} instead of global {}", name, name),
                }));
        }

        tracing::debug!(
            runtime = %runtime,
            forbidden = forbidden.len(),
            files = files.len(),
            "synthesized restriction rules"
        );

        LintConfigEntry {
            files,
            rules: RestrictionRules {
                restricted_properties,
                restricted_globals,
            },
        }
    }

    /// Entries for every runtime group declared in `config`
    pub fn document(&self, config: &Config) -> RuleDocument {
        RuleDocument {
            entries: Runtime::ALL
                .into_iter()
                .map(|runtime| self.entry(runtime, config.group_files(runtime)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use globalfence_core::{Catalog, CatalogSet, CatalogValue};

    fn categories() -> Categories {
        let v = |b| CatalogValue::Flag(b);
        let catalogs = CatalogSet::new(
            Catalog::from_entries([("process", v(false)), ("Buffer", v(false)), ("console", v(false))]),
            Catalog::from_entries([("window", v(false)), ("console", v(false))]),
        );
        Categories::classify(&catalogs, &["Bun".to_string()])
    }

    fn names(forbidden: &[RestrictedGlobal]) -> Vec<&str> {
        forbidden.iter().map(|g| g.name.as_str()).collect()
    }

    #[test]
    fn browser_forbids_server_and_embedded() {
        let categories = categories();
        let synth = Synthesizer::new(&categories, RuleLevel::Error, &[]);
        let forbidden = synth.forbidden(Runtime::Browser);

        assert_eq!(names(&forbidden), vec!["Bun", "Buffer", "process"]);
        assert_eq!(forbidden[1].origin, Runtime::Server);
    }

    #[test]
    fn embedded_only_forbids_browser() {
        let categories = categories();
        let synth = Synthesizer::new(&categories, RuleLevel::Error, &[]);
        let forbidden = synth.forbidden(Runtime::Embedded);

        assert_eq!(names(&forbidden), vec!["window"]);
        assert!(forbidden
            .iter()
            .all(|g| g.origin != Runtime::Embedded && g.origin != Runtime::Server));
    }

    #[test]
    fn none_forbids_shared_as_mixed() {
        let categories = categories();
        let synth = Synthesizer::new(&categories, RuleLevel::Error, &[]);
        let forbidden = synth.forbidden(Runtime::None);

        assert_eq!(names(&forbidden), vec!["Bun", "Buffer", "process", "window", "console"]);
        assert_eq!(forbidden.last().map(|g| g.origin), Some(Runtime::Mixed));
    }

    #[test]
    fn message_names_origin_and_target() {
        let global = RestrictedGlobal {
            name: "process".to_string(),
            origin: Runtime::Server,
        };
        assert_eq!(
            global.message(Runtime::Browser),
            "'process' is a server-only global and should not be used in a browser environment"
        );
    }

    #[test]
    fn entry_restricts_property_and_bare_reference() {
        let categories = categories();
        let window = vec!["event".to_string()];
        let synth = Synthesizer::new(&categories, RuleLevel::Error, &window);
        let entry = synth.entry(Runtime::Mixed, vec!["src/**/*.ts".to_string()]);

        assert!(entry.restricts_property(GLOBAL_OBJECT, "process"));
        assert!(entry.restricts_global("process"));
        assert!(entry.restricts_global(LEGACY_GLOBAL_ALIAS));
        assert!(!entry.restricts_global("console"));
        // window-scoped names are only restricted for browser groups
        assert!(!entry.restricts_global("event"));
    }

    #[test]
    fn browser_entry_restricts_window_globals() {
        let categories = categories();
        let window = vec!["event".to_string(), "name".to_string()];
        let synth = Synthesizer::new(&categories, RuleLevel::Warn, &window);
        let entry = synth.entry(Runtime::Browser, Vec::new());

        assert_eq!(
            entry.message_for(globalfence_core::NO_RESTRICTED_GLOBALS, "name"),
            Some("Use window.name instead of global name")
        );
        assert!(!entry.restricts_property(GLOBAL_OBJECT, "event"));
        assert_eq!(entry.rules.restricted_globals.level, RuleLevel::Warn);
    }

    #[test]
    fn document_covers_every_runtime() {
        let categories = categories();
        let config = Config::default();
        let synth = Synthesizer::from_config(&categories, &config);
        let document = synth.document(&config);

        assert_eq!(document.entries.len(), Runtime::ALL.len());
        assert_eq!(
            document.entries[4].files,
            vec![".cache/eslint-check/none.ts".to_string()]
        );
    }
}
