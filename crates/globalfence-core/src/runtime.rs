//! Runtime tags and global categories

use serde::{Deserialize, Serialize};

/// Execution environment a file group is declared for
///
/// Declaration order is the canonical order: rule entries and fixtures are
/// always produced embedded, server, browser, mixed, none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Runtime {
    /// Embedded-platform runtime with its own namespace global (e.g. `Bun`)
    Embedded,

    /// Server runtime (Node-style builtins)
    Server,

    /// Browser runtime
    Browser,

    /// Code that must run in both server and browser
    Mixed,

    /// No specific environment - only language builtins
    None,
}

impl Runtime {
    /// All runtimes in canonical order
    pub const ALL: [Runtime; 5] = [
        Runtime::Embedded,
        Runtime::Server,
        Runtime::Browser,
        Runtime::Mixed,
        Runtime::None,
    ];

    /// Stable lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Embedded => "embedded",
            Self::Server => "server",
            Self::Browser => "browser",
            Self::Mixed => "mixed",
            Self::None => "none",
        }
    }
}

impl std::fmt::Display for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Runtime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Runtime::ALL
            .into_iter()
            .find(|runtime| runtime.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "unknown runtime '{}' (expected one of: embedded, server, browser, mixed, none)",
                    s
                )
            })
    }
}

/// Category an environment global is classified into
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Only available in the embedded runtime
    EmbeddedOnly,

    /// Only available in server runtimes
    ServerOnly,

    /// Only available in browsers
    BrowserOnly,

    /// Identical in server and browser catalogs
    Shared,
}

impl Category {
    /// All categories in canonical order
    pub const ALL: [Category; 4] = [
        Category::EmbeddedOnly,
        Category::ServerOnly,
        Category::BrowserOnly,
        Category::Shared,
    ];

    /// Runtime label an identifier of this category is attributed to in messages
    pub fn origin(&self) -> Runtime {
        match self {
            Self::EmbeddedOnly => Runtime::Embedded,
            Self::ServerOnly => Runtime::Server,
            Self::BrowserOnly => Runtime::Browser,
            Self::Shared => Runtime::Mixed,
        }
    }

    /// Label used in fixture section headers
    pub fn label(&self) -> &'static str {
        match self {
            Self::EmbeddedOnly => "embedded-only",
            Self::ServerOnly => "server-only",
            Self::BrowserOnly => "browser-only",
            Self::Shared => "mixed",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_names_are_stable() {
        assert_eq!(Runtime::Embedded.as_str(), "embedded");
        assert_eq!(Runtime::None.as_str(), "none");
        assert_eq!("Browser".parse::<Runtime>(), Ok(Runtime::Browser));
        assert!("deno".parse::<Runtime>().is_err());
    }

    #[test]
    fn runtime_serializes_lowercase() {
        let json = serde_json::to_string(&Runtime::Mixed).unwrap();
        assert_eq!(json, "\"mixed\"");
    }

    #[test]
    fn shared_is_attributed_to_mixed() {
        assert_eq!(Category::Shared.origin(), Runtime::Mixed);
        assert_eq!(Category::ServerOnly.origin(), Runtime::Server);
    }
}
