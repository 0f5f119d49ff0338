//! Fixture generation for the runtime restriction rules
//!
//! This crate handles:
//! - Rendering one fixture source file per runtime
//! - Writing fixtures into the cache directory
//! - Checking fixtures offline against the synthesized rules

pub mod check;
pub mod render;
pub mod writer;

pub use check::{check_freshness, FixtureChecker};
pub use render::{render_fixture, GENERATOR};
pub use writer::CodeWriter;

use globalfence_core::{FixtureSamples, Runtime};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// A fixture that has been written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFixture {
    pub runtime: Runtime,
    pub path: PathBuf,

    /// Hex SHA-256 of the contents
    pub digest: String,
    pub bytes: usize,
}

/// File name of a runtime's fixture
pub fn fixture_file_name(runtime: Runtime) -> String {
    format!("{}.ts", runtime)
}

/// Hex SHA-256 of fixture text
pub fn digest(contents: &str) -> String {
    hex::encode(Sha256::digest(contents.as_bytes()))
}

/// Render and write the fixture for `runtime` into `dir`, replacing any previous file
pub fn write_fixture(
    dir: &Path,
    runtime: Runtime,
    samples: &FixtureSamples,
) -> Result<WrittenFixture, FixtureError> {
    std::fs::create_dir_all(dir).map_err(|source| FixtureError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let contents = render_fixture(runtime, samples);
    let path = dir.join(fixture_file_name(runtime));

    std::fs::write(&path, &contents).map_err(|source| FixtureError::Write {
        path: path.clone(),
        source,
    })?;

    tracing::info!(runtime = %runtime, path = %path.display(), "wrote fixture");

    Ok(WrittenFixture {
        runtime,
        digest: digest(&contents),
        bytes: contents.len(),
        path,
    })
}

/// Write fixtures for every runtime, in order; stops at the first failure
pub fn write_all(dir: &Path, samples: &FixtureSamples) -> Result<Vec<WrittenFixture>, FixtureError> {
    Runtime::ALL
        .into_iter()
        .map(|runtime| write_fixture(dir, runtime, samples))
        .collect()
}

/// Fixture error types
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("Failed to create fixture directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write fixture {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read fixture {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}
