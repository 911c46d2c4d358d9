//! Option values, the flat configuration record, and per-stage resolved options.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// A boolean toggle.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// Text, including enum words and not-yet-parsed integers.
    Text(String),
}

impl OptionValue {
    /// Converts the value into JSON.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(i) => serde_json::Value::from(*i),
            Self::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// The flat configuration record, keyed by camel-cased option name.
///
/// This is the single surface callers configure; the translator splits it
/// into per-stage records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatConfig {
    values: BTreeMap<String, OptionValue>,
}

impl FlatConfig {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets a value in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Gets a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(key)
    }

    /// Returns the number of values set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Overlays `other` on top of `self`; keys in `other` win.
    #[must_use]
    pub fn merge(mut self, other: &Self) -> Self {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
        self
    }

    /// Iterates over keys and values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// One declared option after translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedOption {
    /// External flag spelling.
    pub flag: String,
    /// Key the value is forwarded under.
    pub key: String,
    /// The typed value, or `None` when the caller left it unset.
    pub value: Option<OptionValue>,
}

/// The options for one stage, restricted to that stage's declarations.
///
/// Computed once before the pipeline starts and read-only thereafter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedOptions {
    set_name: String,
    entries: Vec<ResolvedOption>,
}

impl ResolvedOptions {
    /// Creates resolved options from translated entries.
    #[must_use]
    pub fn new(set_name: impl Into<String>, entries: Vec<ResolvedOption>) -> Self {
        Self {
            set_name: set_name.into(),
            entries,
        }
    }

    /// Creates an empty record for stages that take no options.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the option set these options were resolved from.
    #[must_use]
    pub fn set_name(&self) -> &str {
        &self.set_name
    }

    /// Gets the value forwarded under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .and_then(|entry| entry.value.as_ref())
    }

    /// Returns true if a value was supplied for `key`.
    #[must_use]
    pub fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterates over every declared entry, set or not.
    pub fn entries(&self) -> impl Iterator<Item = &ResolvedOption> {
        self.entries.iter()
    }

    /// Iterates over entries that carry a value.
    pub fn iter_set(&self) -> impl Iterator<Item = (&ResolvedOption, &OptionValue)> {
        self.entries
            .iter()
            .filter_map(|entry| entry.value.as_ref().map(|value| (entry, value)))
    }

    /// Returns the number of entries that carry a value.
    #[must_use]
    pub fn set_count(&self) -> usize {
        self.iter_set().count()
    }

    /// Builds the `{key: value}` record an in-process transformer receives.
    ///
    /// Unset options are omitted.
    #[must_use]
    pub fn to_record(&self) -> serde_json::Map<String, serde_json::Value> {
        self.iter_set()
            .map(|(entry, value)| (entry.key.clone(), value.to_json()))
            .collect()
    }

    /// Builds the argument list a subprocess transformer receives.
    ///
    /// A `true` toggle becomes its flag and valued options become
    /// `flag value`. Unset options are dropped. `translate` never yields a
    /// `false` toggle; it rewrites one as the negated flag.
    #[must_use]
    pub fn to_cli_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        for (entry, value) in self.iter_set() {
            match value {
                OptionValue::Bool(true) => args.push(entry.flag.clone()),
                OptionValue::Bool(false) => {}
                other => {
                    args.push(entry.flag.clone());
                    args.push(other.to_string());
                }
            }
        }
        args
    }
}
