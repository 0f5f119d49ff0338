//! Offline fixture check
//!
//! Replays the restriction rules over a fixture line by line, the way the
//! lint engine would with unused-directive reporting turned on: a flagged
//! line needs a matching `eslint-disable-next-line` directive right above it,
//! and every directive must suppress something.

use crate::FixtureError;
use globalfence_core::{
    Diagnostic, DiagnosticCode, Location, Severity, NO_RESTRICTED_GLOBALS,
    NO_RESTRICTED_PROPERTIES, NO_UNUSED_VARS,
};
use globalfence_engine::{LintConfigEntry, GLOBAL_OBJECT};
use regex::Regex;
use std::path::Path;

/// A rule firing on one line
#[derive(Debug, Clone, PartialEq, Eq)]
struct Violation {
    rule: &'static str,
    message: String,
}

struct Directive {
    line: usize,
    rules: Vec<String>,
}

/// Line patterns of generated fixtures
pub struct FixtureChecker {
    directive: Regex,
    bare: Regex,
    member: Regex,
    shadow: Regex,
}

impl FixtureChecker {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            directive: Regex::new(r"^//\s*eslint-disable-next-line\s+(.+)$")?,
            bare: Regex::new(r"^([A-Za-z_$][\w$]*),$")?,
            member: Regex::new(r"^([A-Za-z_$][\w$]*)\.([A-Za-z_$][\w$]*),$")?,
            shadow: Regex::new(r"^\(\(\) => \{ const ([A-Za-z_$][\w$]*) = '[^']*'; \}\),$")?,
        })
    }

    /// Freshness plus rule replay over the fixture as it is on disk
    ///
    /// A fixture that does not exist yet is replayed from `expected`.
    pub fn verify(
        &self,
        path: &Path,
        label: &str,
        expected: &str,
        entry: &LintConfigEntry,
    ) -> Result<Vec<Diagnostic>, FixtureError> {
        let mut diagnostics: Vec<Diagnostic> =
            check_freshness(path, label, expected)?.into_iter().collect();

        let contents = if path.exists() {
            read_fixture(path)?
        } else {
            expected.to_string()
        };
        diagnostics.extend(self.check(label, &contents, entry));

        Ok(diagnostics)
    }

    fn violations(&self, line: &str, entry: &LintConfigEntry) -> Vec<Violation> {
        let mut found = Vec::new();

        let restricted_global = |name: &str| {
            entry
                .message_for(NO_RESTRICTED_GLOBALS, name)
                .map(|message| Violation {
                    rule: NO_RESTRICTED_GLOBALS,
                    message: message.to_string(),
                })
        };

        if let Some(caps) = self.bare.captures(line) {
            found.extend(restricted_global(&caps[1]));
        } else if let Some(caps) = self.member.captures(line) {
            let (object, property) = (&caps[1], &caps[2]);
            found.extend(restricted_global(object));

            if object == GLOBAL_OBJECT && entry.restricts_property(object, property) {
                found.push(Violation {
                    rule: NO_RESTRICTED_PROPERTIES,
                    message: entry
                        .message_for(NO_RESTRICTED_PROPERTIES, property)
                        .unwrap_or_default()
                        .to_string(),
                });
            }
        } else if let Some(caps) = self.shadow.captures(line) {
            found.push(Violation {
                rule: NO_UNUSED_VARS,
                message: format!("'{}' is assigned a value but never used", &caps[1]),
            });
        }

        found
    }

    /// Check fixture text against the config entry governing it
    pub fn check(&self, label: &str, contents: &str, entry: &LintConfigEntry) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let mut pending: Option<Directive> = None;

        for (index, raw) in contents.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();
            let violations = self.violations(line, entry);
            let directive = pending.take();

            for violation in &violations {
                let suppressed = directive
                    .as_ref()
                    .is_some_and(|d| d.rules.iter().any(|r| r == violation.rule));

                if !suppressed {
                    diagnostics.push(
                        Diagnostic::new(
                            DiagnosticCode::FixtureMissingSuppression,
                            Severity::Error,
                            violation.message.clone(),
                        )
                        .with_location(Location::with_line(label, line_no))
                        .with_rule(violation.rule),
                    );
                }
            }

            if let Some(directive) = directive {
                for rule in &directive.rules {
                    if !violations.iter().any(|v| v.rule == rule) {
                        diagnostics.push(unused_directive(label, directive.line, rule));
                    }
                }
            }

            if let Some(caps) = self.directive.captures(line) {
                pending = Some(Directive {
                    line: line_no,
                    rules: caps[1].split(',').map(|r| r.trim().to_string()).collect(),
                });
            }
        }

        if let Some(directive) = pending {
            for rule in &directive.rules {
                diagnostics.push(unused_directive(label, directive.line, rule));
            }
        }

        tracing::debug!(fixture = label, diagnostics = diagnostics.len(), "checked fixture");
        diagnostics
    }
}

fn unused_directive(label: &str, line: usize, rule: &str) -> Diagnostic {
    Diagnostic::new(
        DiagnosticCode::FixtureUnusedSuppression,
        Severity::Error,
        format!("Unused eslint-disable directive (no problems were reported from '{}')", rule),
    )
    .with_location(Location::with_line(label, line))
    .with_rule(rule)
}

/// Compare an on-disk fixture with a fresh render
fn read_fixture(path: &Path) -> Result<String, FixtureError> {
    std::fs::read_to_string(path).map_err(|source| FixtureError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub fn check_freshness(path: &Path, label: &str, expected: &str) -> Result<Option<Diagnostic>, FixtureError> {
    if !path.exists() {
        return Ok(Some(
            Diagnostic::new(
                DiagnosticCode::FixtureMissing,
                Severity::Error,
                "Fixture has not been generated; run `globalfence generate`",
            )
            .with_location(Location::new(label)),
        ));
    }

    let actual = read_fixture(path)?;

    if actual == expected {
        return Ok(None);
    }

    Ok(Some(
        Diagnostic::new(
            DiagnosticCode::FixtureOutOfDate,
            Severity::Error,
            format!(
                "Fixture is out of date (sha256 {} on disk, {} expected); run `globalfence generate`",
                crate::digest(&actual),
                crate::digest(expected)
            ),
        )
        .with_location(Location::new(label)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use globalfence_core::{Catalog, CatalogSet, CatalogValue, FixtureSamples, RuleLevel, Runtime};
    use globalfence_engine::{Categories, Synthesizer};

    fn entry(runtime: Runtime) -> LintConfigEntry {
        let v = CatalogValue::Flag(false);
        let catalogs = CatalogSet::new(
            Catalog::from_entries([("process", v.clone()), ("console", v.clone())]),
            Catalog::from_entries([("document", v.clone()), ("event", v.clone()), ("console", v)]),
        );
        let categories = Categories::classify(&catalogs, &["Bun".to_string()]);
        let window = vec!["event".to_string()];
        Synthesizer::new(&categories, RuleLevel::Error, &window).entry(runtime, Vec::new())
    }

    fn codes(diagnostics: &[Diagnostic]) -> Vec<DiagnosticCode> {
        diagnostics.iter().map(|d| d.code).collect()
    }

    #[test]
    fn rendered_fixtures_pass() {
        let checker = FixtureChecker::new().unwrap();
        let samples = FixtureSamples {
            embedded: vec!["Bun".to_string()],
            server: vec!["process".to_string()],
            browser: vec!["document".to_string()],
            mixed: vec!["console".to_string()],
            window: vec!["event".to_string()],
        };

        for runtime in Runtime::ALL {
            let text = crate::render_fixture(runtime, &samples);
            let diagnostics = checker.check("fixture.ts", &text, &entry(runtime));
            assert!(diagnostics.is_empty(), "{runtime}: {diagnostics:?}");
        }
    }

    #[test]
    fn unsuppressed_reference_is_reported() {
        let checker = FixtureChecker::new().unwrap();
        let diagnostics = checker.check("f.ts", "[\n    process,\n];\n", &entry(Runtime::Browser));

        assert_eq!(codes(&diagnostics), vec![DiagnosticCode::FixtureMissingSuppression]);
        assert_eq!(diagnostics[0].location, Some(Location::with_line("f.ts", 2)));
        assert!(diagnostics[0].message.contains("server-only"));
    }

    #[test]
    fn needless_directive_is_reported() {
        let checker = FixtureChecker::new().unwrap();
        let text = "// eslint-disable-next-line no-restricted-globals\nconsole,\n";
        let diagnostics = checker.check("f.ts", text, &entry(Runtime::Server));

        assert_eq!(codes(&diagnostics), vec![DiagnosticCode::FixtureUnusedSuppression]);
        assert_eq!(diagnostics[0].location, Some(Location::with_line("f.ts", 1)));
    }

    #[test]
    fn trailing_directive_is_unused() {
        let checker = FixtureChecker::new().unwrap();
        let diagnostics = checker.check(
            "f.ts",
            "// eslint-disable-next-line no-restricted-globals",
            &entry(Runtime::None),
        );
        assert_eq!(codes(&diagnostics), vec![DiagnosticCode::FixtureUnusedSuppression]);
    }

    #[test]
    fn global_this_property_access() {
        let checker = FixtureChecker::new().unwrap();
        let diagnostics = checker.check("f.ts", "globalThis.process,\n", &entry(Runtime::Browser));

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule.as_deref(), Some(NO_RESTRICTED_PROPERTIES));
    }

    #[test]
    fn shadowing_needs_only_unused_vars_directive() {
        let checker = FixtureChecker::new().unwrap();
        let text = "(() => { const event = 'event'; }),\n";
        let diagnostics = checker.check("f.ts", text, &entry(Runtime::Browser));

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule.as_deref(), Some(NO_UNUSED_VARS));
    }

    #[test]
    fn freshness() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("none.ts");

        let missing = check_freshness(&path, "none.ts", "x\n").unwrap();
        assert_eq!(missing.map(|d| d.code), Some(DiagnosticCode::FixtureMissing));

        std::fs::write(&path, "x\n").unwrap();
        assert!(check_freshness(&path, "none.ts", "x\n").unwrap().is_none());

        let stale = check_freshness(&path, "none.ts", "y\n").unwrap();
        assert_eq!(stale.map(|d| d.code), Some(DiagnosticCode::FixtureOutOfDate));
    }

    #[test]
    fn verify_replays_on_disk_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("browser.ts");
        let checker = FixtureChecker::new().unwrap();
        let expected = "[\n];\n";

        std::fs::write(&path, "[\n    process,\n];\n").unwrap();
        let diagnostics = checker
            .verify(&path, "browser.ts", expected, &entry(Runtime::Browser))
            .unwrap();
        assert_eq!(
            codes(&diagnostics),
            vec![DiagnosticCode::FixtureOutOfDate, DiagnosticCode::FixtureMissingSuppression]
        );

        std::fs::remove_file(&path).unwrap();
        let diagnostics = checker
            .verify(&path, "browser.ts", expected, &entry(Runtime::Browser))
            .unwrap();
        assert_eq!(codes(&diagnostics), vec![DiagnosticCode::FixtureMissing]);
    }
}
