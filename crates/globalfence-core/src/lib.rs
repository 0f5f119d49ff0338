//! globalfence core
//!
//! Core domain model: runtimes, catalogs, configuration and the stable
//! diagnostic/report types.
//! Never rename diagnostic codes - they are part of the public API.

pub mod catalog;
pub mod config;
pub mod diagnostic;
pub mod report;
pub mod runtime;

pub use catalog::{Catalog, CatalogError, CatalogSet, CatalogValue};
pub use config::{CatalogConfig, Config, ConfigError, FileGroups, FixtureSamples, RuleLevel};
pub use diagnostic::{Diagnostic, DiagnosticCode, Location, Severity};
pub use report::{Report, ReportSummary, ReportVersion};
pub use runtime::{Category, Runtime};

/// Rule flagging bare references to restricted globals
pub const NO_RESTRICTED_GLOBALS: &str = "no-restricted-globals";

/// Rule flagging property access on restricted objects
pub const NO_RESTRICTED_PROPERTIES: &str = "no-restricted-properties";

/// Rule flagging declared-but-unused locals
pub const NO_UNUSED_VARS: &str = "@typescript-eslint/no-unused-vars";
