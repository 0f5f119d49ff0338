//! Lint engine configuration objects
//!
//! Serialized in the flat-config shape the lint engine consumes:
//! `{ "files": [...], "rules": { "<rule>": ["error", {...}, ...] } }`.

use globalfence_core::{RuleLevel, NO_RESTRICTED_GLOBALS, NO_RESTRICTED_PROPERTIES};
use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;

/// Option entry of `no-restricted-properties`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestrictedProperty {
    pub object: String,
    pub property: String,
    pub message: String,
}

/// Option entry of `no-restricted-globals`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestrictedName {
    pub name: String,
    pub message: String,
}

/// A rule setting: the level followed by its option entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSetting<T> {
    pub level: RuleLevel,
    pub options: Vec<T>,
}

impl<T> RuleSetting<T> {
    pub fn new(level: RuleLevel) -> Self {
        Self {
            level,
            options: Vec::new(),
        }
    }
}

impl<T: Serialize> Serialize for RuleSetting<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.options.len() + 1))?;
        seq.serialize_element(self.level.as_str())?;
        for option in &self.options {
            seq.serialize_element(option)?;
        }
        seq.end()
    }
}

/// Rules block of one config entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestrictionRules {
    #[serde(rename = "no-restricted-properties")]
    pub restricted_properties: RuleSetting<RestrictedProperty>,

    #[serde(rename = "no-restricted-globals")]
    pub restricted_globals: RuleSetting<RestrictedName>,
}

/// One config entry: file globs plus the rules applied to them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintConfigEntry {
    pub files: Vec<String>,
    pub rules: RestrictionRules,
}

impl LintConfigEntry {
    /// Whether `no-restricted-globals` flags a bare reference to `name`
    pub fn restricts_global(&self, name: &str) -> bool {
        self.rules
            .restricted_globals
            .options
            .iter()
            .any(|entry| entry.name == name)
    }

    /// Whether `no-restricted-properties` flags `object.property`
    pub fn restricts_property(&self, object: &str, property: &str) -> bool {
        self.rules
            .restricted_properties
            .options
            .iter()
            .any(|entry| entry.object == object && entry.property == property)
    }

    /// Message `rule` reports for `name`, if restricted
    pub fn message_for(&self, rule: &str, name: &str) -> Option<&str> {
        match rule {
            NO_RESTRICTED_GLOBALS => self
                .rules
                .restricted_globals
                .options
                .iter()
                .find(|entry| entry.name == name)
                .map(|entry| entry.message.as_str()),
            NO_RESTRICTED_PROPERTIES => self
                .rules
                .restricted_properties
                .options
                .iter()
                .find(|entry| entry.property == name)
                .map(|entry| entry.message.as_str()),
            _ => None,
        }
    }
}

/// The generated document: one entry per runtime file group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RuleDocument {
    pub entries: Vec<LintConfigEntry>,
}

impl RuleDocument {
    /// Pretty JSON with a trailing newline
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_setting_serializes_level_first() {
        let mut setting = RuleSetting::new(RuleLevel::Error);
        setting.options.push(RestrictedName {
            name: "global".to_string(),
            message: "Use globalThis".to_string(),
        });

        let json = serde_json::to_value(&setting).unwrap();
        assert_eq!(
            json,
            serde_json::json!(["error", { "name": "global", "message": "Use globalThis" }])
        );
    }

    #[test]
    fn empty_setting_is_just_the_level() {
        let setting: RuleSetting<RestrictedProperty> = RuleSetting::new(RuleLevel::Warn);
        assert_eq!(serde_json::to_value(&setting).unwrap(), serde_json::json!(["warn"]));
    }
}
