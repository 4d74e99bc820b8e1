//! Persistence for mediator lexicons.
//!
//! Lexicons are stored as flat text, one record per `(entity, name)` pair:
//!
//! ```text
//! entity_id<TAB>normalized name<TAB>weight
//! ```
//!
//! There is no header or footer and no escaping; names never contain tabs
//! or newlines. Records are replayed through [`MediatorLexicon::add`] on
//! load, so a file obeys the same normalization and max-weight rules as
//! live ingestion.
//!
//! [`MediatorLexicon::add`]: crate::MediatorLexicon::add

mod codec;

pub use codec::{read, read_with, write};

use serde::{Deserialize, Serialize};

use crate::entity::EntityKind;
use crate::error::{LexiconError, LexiconResult, ParseError};

/// How a load reacts to malformed records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
    /// Abort on the first malformed record.
    #[default]
    Strict,
    /// Skip malformed records and report them.
    Lenient,
}

/// Configuration for reading a lexicon.
///
/// # Example
/// ```
/// use mediator_lexicon::storage::{LoadConfig, LoadPolicy};
///
/// let config = LoadConfig::from_json(r#"{"policy": "lenient", "max_skipped": 10}"#).unwrap();
/// assert_eq!(config.policy, LoadPolicy::Lenient);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Reaction to malformed records.
    pub policy: LoadPolicy,
    /// Kind of entity the loaded lexicon mediates.
    pub kind: EntityKind,
    /// Under the lenient policy, abort once more records than this are skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_skipped: Option<usize>,
}

impl LoadConfig {
    /// Creates the default strict configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a lenient configuration with no skip limit.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            policy: LoadPolicy::Lenient,
            ..Self::default()
        }
    }

    /// Sets the load policy.
    #[must_use]
    pub fn policy(mut self, policy: LoadPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the entity kind of the loaded lexicon.
    #[must_use]
    pub fn kind(mut self, kind: EntityKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the lenient skip limit.
    #[must_use]
    pub fn max_skipped(mut self, limit: usize) -> Self {
        self.max_skipped = Some(limit);
        self
    }

    /// Parses and validates a JSON configuration.
    ///
    /// Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns `LexiconError::Config` if the JSON is malformed or invalid.
    pub fn from_json(json: &str) -> LexiconResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| LexiconError::config(format!("malformed load config: {e}")))?;
        config.validate()
    }

    /// Checks that the settings are consistent.
    ///
    /// # Errors
    /// Returns `LexiconError::Config` if a skip limit is set under the
    /// strict policy.
    pub fn validate(self) -> LexiconResult<Self> {
        if self.policy == LoadPolicy::Strict && self.max_skipped.is_some() {
            return Err(LexiconError::config(
                "max_skipped requires the lenient load policy",
            ));
        }
        Ok(self)
    }
}

/// Outcome of a load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records parsed and fed to the lexicon.
    pub records: usize,
    /// Malformed records skipped under the lenient policy.
    pub skipped: Vec<ParseError>,
}

impl LoadReport {
    /// Returns true if every record parsed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_strict() {
        let config = LoadConfig::default();
        assert_eq!(config.policy, LoadPolicy::Strict);
        assert_eq!(config.kind, EntityKind::Class);
        assert!(config.max_skipped.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_setters() {
        let config = LoadConfig::new()
            .policy(LoadPolicy::Lenient)
            .kind(EntityKind::Individual)
            .max_skipped(3);
        assert_eq!(config.policy, LoadPolicy::Lenient);
        assert_eq!(config.kind, EntityKind::Individual);
        assert_eq!(config.max_skipped, Some(3));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_skip_limit_when_strict() {
        let err = LoadConfig::new().max_skipped(1).validate().unwrap_err();
        assert!(matches!(err, LexiconError::Config { .. }));
        assert!(err.to_string().contains("lenient"));
    }

    #[test]
    fn test_from_json_defaults_missing_fields() {
        let config = LoadConfig::from_json("{}").unwrap();
        assert_eq!(config, LoadConfig::default());

        let config = LoadConfig::from_json(r#"{"kind": "object_property"}"#).unwrap();
        assert_eq!(config.kind, EntityKind::ObjectProperty);
        assert_eq!(config.policy, LoadPolicy::Strict);
    }

    #[test]
    fn test_from_json_rejects_bad_input() {
        assert!(LoadConfig::from_json(r#"{"policy": "sloppy"}"#).is_err());
        assert!(LoadConfig::from_json("not json").is_err());
        assert!(LoadConfig::from_json(r#"{"max_skipped": 2}"#).is_err());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = LoadConfig::lenient().max_skipped(5);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(LoadConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_report_is_clean() {
        let mut report = LoadReport::default();
        assert!(report.is_clean());
        report.skipped.push(ParseError::FieldCount { line: 1, found: 1 });
        assert!(!report.is_clean());
    }
}
