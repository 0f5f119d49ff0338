//! globalfence engine - Core business logic
//!
//! This crate implements:
//! - Global classification (server-only / browser-only / shared)
//! - The runtime permission table
//! - Restriction-rule synthesis
//! - Catalog auditing

pub mod audit;
pub mod classifier;
pub mod lint_config;
pub mod policy;
pub mod synthesizer;

pub use audit::audit_catalogs;
pub use classifier::Categories;
pub use lint_config::{LintConfigEntry, RestrictedName, RestrictedProperty, RuleDocument, RuleSetting};
pub use policy::is_permitted;
pub use synthesizer::{RestrictedGlobal, Synthesizer, GLOBAL_OBJECT, LEGACY_GLOBAL_ALIAS};
