//! Configuration schema (globalfence.toml)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::catalog::{CatalogError, CatalogSet};
use crate::runtime::{Category, Runtime};

/// Level the restriction rules are reported at by the lint engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleLevel {
    /// Report as warning
    Warn,

    /// Report as error
    Error,
}

impl Default for RuleLevel {
    fn default() -> Self {
        Self::Error
    }
}

impl RuleLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Where the reference catalogs come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path to a globals.json-shaped document (built-in catalog if unset)
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Environment key of the server-like catalog
    #[serde(default = "default_server_env")]
    pub server_env: String,

    /// Environment key of the browser-like catalog
    #[serde(default = "default_browser_env")]
    pub browser_env: String,

    /// Globals only the embedded runtime provides
    #[serde(default = "default_embedded_globals")]
    pub embedded_globals: Vec<String>,
}

fn default_server_env() -> String {
    "nodeBuiltin".to_string()
}

fn default_browser_env() -> String {
    "browser".to_string()
}

fn default_embedded_globals() -> Vec<String> {
    vec!["Bun".to_string()]
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: None,
            server_env: default_server_env(),
            browser_env: default_browser_env(),
            embedded_globals: default_embedded_globals(),
        }
    }
}

/// File glob patterns governed by each runtime's restrictions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileGroups {
    #[serde(default)]
    pub embedded: Vec<String>,

    #[serde(default)]
    pub server: Vec<String>,

    #[serde(default)]
    pub browser: Vec<String>,

    #[serde(default)]
    pub mixed: Vec<String>,

    #[serde(default)]
    pub none: Vec<String>,
}

impl Default for FileGroups {
    fn default() -> Self {
        Self {
            embedded: vec!["packages/backend/server/**/*.ts".to_string()],
            server: Vec::new(),
            browser: Vec::new(),
            mixed: vec![
                "packages/backend/core/**/*.ts".to_string(),
                "packages/frontend/**/*.ts".to_string(),
                "packages/shared/**/*.ts".to_string(),
            ],
            none: Vec::new(),
        }
    }
}

impl FileGroups {
    /// Declared patterns for a runtime
    pub fn get(&self, runtime: Runtime) -> &[String] {
        match runtime {
            Runtime::Embedded => &self.embedded,
            Runtime::Server => &self.server,
            Runtime::Browser => &self.browser,
            Runtime::Mixed => &self.mixed,
            Runtime::None => &self.none,
        }
    }
}

/// Sample identifiers written into the fixtures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureSamples {
    #[serde(default = "default_embedded_samples")]
    pub embedded: Vec<String>,

    #[serde(default = "default_server_samples")]
    pub server: Vec<String>,

    #[serde(default = "default_browser_samples")]
    pub browser: Vec<String>,

    #[serde(default = "default_mixed_samples")]
    pub mixed: Vec<String>,

    /// Window-scoped names exercised in the browser fixture
    #[serde(default = "default_window_samples")]
    pub window: Vec<String>,
}

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn default_embedded_samples() -> Vec<String> {
    strings(&["Bun"])
}

fn default_server_samples() -> Vec<String> {
    strings(&["process", "Buffer"])
}

fn default_browser_samples() -> Vec<String> {
    strings(&["window", "document", "alert"])
}

fn default_mixed_samples() -> Vec<String> {
    strings(&["console", "setTimeout"])
}

fn default_window_samples() -> Vec<String> {
    strings(&["event", "open", "close", "name"])
}

impl Default for FixtureSamples {
    fn default() -> Self {
        Self {
            embedded: default_embedded_samples(),
            server: default_server_samples(),
            browser: default_browser_samples(),
            mixed: default_mixed_samples(),
            window: default_window_samples(),
        }
    }
}

impl FixtureSamples {
    /// Samples for one category
    pub fn for_category(&self, category: Category) -> &[String] {
        match category {
            Category::EmbeddedOnly => &self.embedded,
            Category::ServerOnly => &self.server,
            Category::BrowserOnly => &self.browser,
            Category::Shared => &self.mixed,
        }
    }
}

fn default_restricted_window_globals() -> Vec<String> {
    strings(&[
        "event", "close", "open", "name", "length", "top", "parent", "self", "frames",
        "history", "location", "navigator", "screen", "status",
    ])
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(".cache/eslint-check")
}

fn default_output() -> PathBuf {
    PathBuf::from("restricted-globals.json")
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory the fixtures are generated into
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Where the rule document is written
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Level for the generated rules
    #[serde(default)]
    pub rule_level: RuleLevel,

    /// Window-scoped names that must be accessed through `window.` in browser code
    #[serde(default = "default_restricted_window_globals")]
    pub restricted_window_globals: Vec<String>,

    /// Catalog source
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Runtime file groups
    #[serde(default)]
    pub groups: FileGroups,

    /// Fixture sample identifiers
    #[serde(default)]
    pub samples: FixtureSamples,

    /// Project root path (for resolving relative paths)
    #[serde(skip)]
    pub project_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            output: default_output(),
            rule_level: RuleLevel::default(),
            restricted_window_globals: default_restricted_window_globals(),
            catalog: CatalogConfig::default(),
            groups: FileGroups::default(),
            samples: FixtureSamples::default(),
            project_root: std::env::current_dir().unwrap_or_default(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        // Set project root to parent of config file
        if let Some(parent) = path.parent() {
            config.project_root = parent.to_path_buf();
        }

        Ok(config)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.project_root = std::env::current_dir().unwrap_or_default();
        Ok(config)
    }

    /// Resolve a configured path against the project root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }

    /// Fixture path for a runtime, as written into the rule document
    pub fn fixture_path(&self, runtime: Runtime) -> PathBuf {
        self.cache_dir.join(format!("{}.ts", runtime))
    }

    /// Globs governed by a runtime, including its own fixture
    pub fn group_files(&self, runtime: Runtime) -> Vec<String> {
        let mut files = self.groups.get(runtime).to_vec();
        files.push(self.fixture_path(runtime).to_string_lossy().replace('\\', "/"));
        files
    }

    /// Load the configured reference catalogs
    pub fn load_catalogs(&self) -> Result<CatalogSet, CatalogError> {
        let server_env = &self.catalog.server_env;
        let browser_env = &self.catalog.browser_env;

        match &self.catalog.path {
            Some(path) => CatalogSet::from_file(&self.resolve(path), server_env, browser_env),
            None => CatalogSet::builtin(server_env, browser_env),
        }
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}
