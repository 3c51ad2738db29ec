//! Diff engine configuration types
//!
//! The engine has few knobs: how the message signal list is compared and
//! which fields are left out of the comparison. Everything about file
//! discovery and reporting lives in the application layer.

use crate::fields::{MESSAGE_FIELDS, SIGNAL_FIELDS};
use crate::types::{DiffError, Result};
use serde::{Deserialize, Serialize};

const MESSAGE_SCOPE: &str = "message";
const SIGNAL_SCOPE: &str = "signal";

/// Configuration for the diff engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffConfig {
    /// Compare the message signal list as a set of names instead of a
    /// sequence (a pure reorder is then not reported)
    #[serde(default)]
    pub ignore_signal_order: bool,

    /// Field names excluded from comparison
    ///
    /// A bare name applies to every entity that has the field (`length` is
    /// both the message DLC and the signal bit width). Prefix it with
    /// `message.` or `signal.` to exclude it from one entity only.
    #[serde(default)]
    pub ignored_fields: Vec<String>,
}

impl DiffConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: enable or disable order-insensitive signal lists
    pub fn with_ignore_signal_order(mut self, enabled: bool) -> Self {
        self.ignore_signal_order = enabled;
        self
    }

    /// Builder method: exclude a field from comparison
    pub fn ignore_field(mut self, field: impl Into<String>) -> Self {
        self.ignored_fields.push(field.into());
        self
    }

    /// Check if a message field should be compared
    pub fn should_compare_message_field(&self, field: &str) -> bool {
        !self.is_ignored(MESSAGE_SCOPE, field)
    }

    /// Check if a signal field should be compared
    pub fn should_compare_signal_field(&self, field: &str) -> bool {
        !self.is_ignored(SIGNAL_SCOPE, field)
    }

    fn is_ignored(&self, scope: &str, field: &str) -> bool {
        self.ignored_fields.iter().any(|entry| match entry.split_once('.') {
            Some((entry_scope, name)) => entry_scope == scope && name == field,
            None => entry == field,
        })
    }

    /// Reject ignored field names that no field table knows
    pub fn validate(&self) -> Result<()> {
        let is_message_field = |name: &str| MESSAGE_FIELDS.iter().any(|f| f.name == name);
        let is_signal_field = |name: &str| SIGNAL_FIELDS.iter().any(|f| f.name == name);

        let unknown: Vec<&str> = self
            .ignored_fields
            .iter()
            .map(String::as_str)
            .filter(|entry| match entry.split_once('.') {
                Some((MESSAGE_SCOPE, name)) => !is_message_field(name),
                Some((SIGNAL_SCOPE, name)) => !is_signal_field(name),
                Some(_) => true,
                None => !is_message_field(entry) && !is_signal_field(entry),
            })
            .collect();

        if unknown.is_empty() {
            Ok(())
        } else {
            Err(DiffError::InvalidConfig(format!(
                "Unknown ignored field(s): {}",
                unknown.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_config_builder() {
        let config = DiffConfig::new()
            .with_ignore_signal_order(true)
            .ignore_field("choices")
            .ignore_field("cycle_time");

        assert!(config.ignore_signal_order);
        assert_eq!(config.ignored_fields, vec!["choices", "cycle_time"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_filter_logic() {
        let config = DiffConfig::new().ignore_field("choices");

        assert!(!config.should_compare_signal_field("choices"));
        assert!(config.should_compare_signal_field("scale"));
    }

    #[test]
    fn test_bare_name_covers_both_entities() {
        let config = DiffConfig::new().ignore_field("length");

        assert!(!config.should_compare_message_field("length"));
        assert!(!config.should_compare_signal_field("length"));
    }

    #[test]
    fn test_qualified_names() {
        let config = DiffConfig::new().ignore_field("message.length");
        assert!(!config.should_compare_message_field("length"));
        assert!(config.should_compare_signal_field("length"));

        let config = DiffConfig::new().ignore_field("signal.length");
        assert!(config.should_compare_message_field("length"));
        assert!(!config.should_compare_signal_field("length"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_qualified_names_are_validated_per_entity() {
        assert!(DiffConfig::new().ignore_field("message.cycle_time").validate().is_ok());
        assert!(DiffConfig::new().ignore_field("signal.cycle_time").validate().is_err());
        assert!(DiffConfig::new().ignore_field("message.scale").validate().is_err());
        assert!(DiffConfig::new().ignore_field("node.length").validate().is_err());
    }

    #[test]
    fn test_no_filters() {
        let config = DiffConfig::new();

        assert!(!config.ignore_signal_order);
        assert!(config.should_compare_signal_field("choices"));
        assert!(config.should_compare_message_field("signals"));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let config = DiffConfig::new().ignore_field("scale").ignore_field("colour");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("colour"));
        assert!(!err.to_string().contains("scale"));
    }
}
