//! Integration tests for fixture generation

use globalfence_core::{Config, FixtureSamples, Runtime};
use globalfence_engine::{Categories, Synthesizer};
use globalfence_fixture::{write_all, write_fixture, FixtureChecker, FixtureError};
use pretty_assertions::assert_eq;

#[test]
fn writes_one_file_per_runtime() {
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join(".cache/eslint-check");

    let written = write_all(&cache, &FixtureSamples::default()).unwrap();

    assert_eq!(written.len(), 5);
    for fixture in &written {
        assert!(fixture.path.exists());
        assert_eq!(
            fixture.path.file_name().and_then(|n| n.to_str()),
            Some(format!("{}.ts", fixture.runtime).as_str())
        );
    }
}

#[test]
fn regeneration_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let samples = FixtureSamples::default();

    let first = write_fixture(dir.path(), Runtime::Browser, &samples).unwrap();
    let first_bytes = std::fs::read(&first.path).unwrap();

    let second = write_fixture(dir.path(), Runtime::Browser, &samples).unwrap();
    let second_bytes = std::fs::read(&second.path).unwrap();

    assert_eq!(first.digest, second.digest);
    assert_eq!(first_bytes, second_bytes);
}

#[test]
fn previous_contents_are_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("none.ts");
    std::fs::write(&path, "x".repeat(10_000)).unwrap();

    let written = write_fixture(dir.path(), Runtime::None, &FixtureSamples::default()).unwrap();
    let contents = std::fs::read_to_string(&path).unwrap();

    assert_eq!(contents.len(), written.bytes);
    assert!(contents.starts_with("/**\n * DO NOT EDIT"));
}

#[test]
fn directory_creation_failure_propagates() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("cache");
    std::fs::write(&blocker, "not a directory").unwrap();

    let err = write_fixture(&blocker.join("nested"), Runtime::Mixed, &FixtureSamples::default())
        .unwrap_err();
    assert!(matches!(err, FixtureError::CreateDir { .. }));
}

#[test]
fn browser_fixture_suppression_follows_policy() {
    let text = globalfence_fixture::render_fixture(Runtime::Browser, &FixtureSamples::default());
    let lines: Vec<&str> = text.lines().map(str::trim).collect();

    let suppressed = |name: &str| {
        let idx = lines
            .iter()
            .position(|l| *l == format!("{},", name))
            .unwrap();
        lines[idx - 1] == "// eslint-disable-next-line no-restricted-globals"
    };

    for name in ["window", "document", "alert", "console", "setTimeout"] {
        assert!(!suppressed(name), "{name} should not be suppressed");
    }
    for name in ["Bun", "process", "Buffer", "event", "open", "close", "name"] {
        assert!(suppressed(name), "{name} should be suppressed");
    }
}

#[test]
fn builtin_catalog_fixtures_check_clean() {
    let config = Config::default();
    let catalogs = config.load_catalogs().unwrap();
    let categories = Categories::classify(&catalogs, &config.catalog.embedded_globals);
    let synthesizer = Synthesizer::from_config(&categories, &config);
    let checker = FixtureChecker::new().unwrap();

    for runtime in Runtime::ALL {
        let text = globalfence_fixture::render_fixture(runtime, &config.samples);
        let entry = synthesizer.entry(runtime, config.group_files(runtime));
        let diagnostics = checker.check(&format!("{runtime}.ts"), &text, &entry);
        assert!(diagnostics.is_empty(), "{runtime}: {diagnostics:#?}");
    }
}
