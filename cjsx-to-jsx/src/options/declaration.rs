//! Option declarations and option sets.
//!
//! A declaration is written once per stage and drives both CLI flag
//! registration and translation into the stage's own option record.

use super::OptionValue;
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The type of value a flag carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "choices", rename_all = "snake_case")]
pub enum ValueKind {
    /// A presence toggle.
    Bool,
    /// A base-10 integer.
    Int,
    /// One of a fixed list of words.
    Enum(Vec<String>),
    /// Free text.
    String,
}

impl ValueKind {
    /// Builds an enum kind from string slices.
    #[must_use]
    pub fn choices(choices: &[&str]) -> Self {
        Self::Enum(choices.iter().map(|c| (*c).to_string()).collect())
    }

    /// Returns the word used in error messages for this kind.
    #[must_use]
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Bool => "a boolean",
            Self::Int => "an integer",
            Self::Enum(_) => "one of the listed choices",
            Self::String => "text",
        }
    }
}

/// A single pass-through flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDecl {
    /// External spelling, e.g. `--print-width`.
    pub flag: String,
    /// The kind of value the flag carries.
    pub value_kind: ValueKind,
    /// The value the downstream tool assumes when the flag is unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<OptionValue>,
    /// Help text.
    #[serde(default)]
    pub description: String,
    /// Key the downstream tool expects when it differs from the camel-cased flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_override: Option<String>,
    /// Choices that `true` and `false` stand for on an enumerated flag that
    /// used to be a plain toggle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bool_aliases: Option<BoolAliases>,
}

/// The enum choices a legacy boolean value maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoolAliases {
    /// Choice used for `true`.
    pub on: String,
    /// Choice used for `false`.
    pub off: String,
}

impl OptionDecl {
    /// Creates a declaration.
    #[must_use]
    pub fn new(flag: impl Into<String>, value_kind: ValueKind, description: impl Into<String>) -> Self {
        Self {
            flag: flag.into(),
            value_kind,
            default_value: None,
            description: description.into(),
            key_override: None,
            bool_aliases: None,
        }
    }

    /// Creates a boolean toggle.
    #[must_use]
    pub fn toggle(flag: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(flag, ValueKind::Bool, description)
    }

    /// Creates an integer flag.
    #[must_use]
    pub fn int(flag: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(flag, ValueKind::Int, description)
    }

    /// Creates a free-text flag.
    #[must_use]
    pub fn text(flag: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(flag, ValueKind::String, description)
    }

    /// Creates an enumerated flag.
    #[must_use]
    pub fn choice(flag: impl Into<String>, choices: &[&str], description: impl Into<String>) -> Self {
        Self::new(flag, ValueKind::choices(choices), description)
    }

    /// Sets the downstream default.
    #[must_use]
    pub fn with_default(mut self, value: OptionValue) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Sets the irregular downstream key.
    #[must_use]
    pub fn with_key_override(mut self, key: impl Into<String>) -> Self {
        self.key_override = Some(key.into());
        self
    }

    /// Accepts `true` and `false` as spellings of two of the choices.
    #[must_use]
    pub fn with_bool_aliases(mut self, on: impl Into<String>, off: impl Into<String>) -> Self {
        self.bool_aliases = Some(BoolAliases {
            on: on.into(),
            off: off.into(),
        });
        self
    }

    /// Returns the flag without its leading dashes.
    #[must_use]
    pub fn name(&self) -> &str {
        self.flag.trim_start_matches('-')
    }

    /// Returns the key used to look the value up in the flat configuration.
    #[must_use]
    pub fn lookup_key(&self) -> String {
        camel_key(&self.flag)
    }

    /// Returns the key the value is forwarded under.
    #[must_use]
    pub fn record_key(&self) -> String {
        self.key_override
            .clone()
            .unwrap_or_else(|| self.lookup_key())
    }

    /// Returns true if the flag takes an argument.
    #[must_use]
    pub fn expects_value(&self) -> bool {
        !matches!(self.value_kind, ValueKind::Bool)
    }

    /// Returns the placeholder shown in help output, e.g. `int` or `none|es5|all`.
    #[must_use]
    pub fn value_hint(&self) -> Option<String> {
        match &self.value_kind {
            ValueKind::Bool => None,
            ValueKind::Int => Some("int".to_string()),
            ValueKind::Enum(choices) => Some(choices.join("|")),
            ValueKind::String => Some("value".to_string()),
        }
    }
}

/// Camel-cases a kebab-case flag: `--use-js-modules` becomes `useJsModules`.
///
/// Words are runs of ASCII alphanumerics; everything else separates them.
#[must_use]
pub fn camel_key(flag: &str) -> String {
    let mut key = String::with_capacity(flag.len());
    let words = flag
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty());

    for (index, word) in words.enumerate() {
        let lower = word.to_ascii_lowercase();
        if index == 0 {
            key.push_str(&lower);
            continue;
        }
        let mut chars = lower.chars();
        if let Some(first) = chars.next() {
            key.push(first.to_ascii_uppercase());
            key.push_str(chars.as_str());
        }
    }

    key
}

/// An ordered list of declarations for one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawOptionSet")]
pub struct OptionSet {
    name: String,
    version: String,
    decls: Vec<OptionDecl>,
}

#[derive(Deserialize)]
struct RawOptionSet {
    name: String,
    #[serde(default)]
    version: String,
    decls: Vec<OptionDecl>,
}

impl TryFrom<RawOptionSet> for OptionSet {
    type Error = ConfigError;

    fn try_from(raw: RawOptionSet) -> Result<Self, Self::Error> {
        Self::new(raw.name, raw.version, raw.decls)
    }
}

impl OptionSet {
    /// Creates an option set, rejecting duplicate flags.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DuplicateFlag` if a flag or its lookup key repeats.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        decls: Vec<OptionDecl>,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        let mut seen = HashSet::new();
        for decl in &decls {
            if !seen.insert(decl.lookup_key()) {
                return Err(ConfigError::DuplicateFlag {
                    set: name,
                    flag: decl.flag.clone(),
                });
            }
        }

        Ok(Self {
            name,
            version: version.into(),
            decls,
        })
    }

    /// Creates a set from a table known to be free of duplicates.
    pub(crate) fn builtin(name: &str, version: &str, decls: Vec<OptionDecl>) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            decls,
        }
    }

    /// Returns the set name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the version label of the downstream tool this set targets.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Iterates over the declarations in order.
    pub fn iter(&self) -> impl Iterator<Item = &OptionDecl> {
        self.decls.iter()
    }

    /// Returns the number of declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Finds a declaration by its external flag.
    #[must_use]
    pub fn get(&self, flag: &str) -> Option<&OptionDecl> {
        self.decls.iter().find(|decl| decl.flag == flag)
    }

    /// Finds the toggle that switches `decl` off.
    ///
    /// `--x` pairs with `--no-x`, `--allow-x` with `--disallow-x`, and
    /// `--enable-x` with `--disable-x`, in either direction.
    #[must_use]
    pub fn negation_of(&self, decl: &OptionDecl) -> Option<&OptionDecl> {
        if decl.value_kind != ValueKind::Bool {
            return None;
        }
        self.get(&inverse_flag(decl.name()))
            .filter(|candidate| candidate.value_kind == ValueKind::Bool)
    }
}

/// Prefix pairs that turn a toggle on and off.
const NEGATION_PREFIXES: &[(&str, &str)] = &[
    ("allow-", "disallow-"),
    ("enable-", "disable-"),
];

fn inverse_flag(name: &str) -> String {
    for (on, off) in NEGATION_PREFIXES {
        if let Some(rest) = name.strip_prefix(off) {
            return format!("--{on}{rest}");
        }
        if let Some(rest) = name.strip_prefix(on) {
            return format!("--{off}{rest}");
        }
    }
    match name.strip_prefix("no-") {
        Some(rest) => format!("--{rest}"),
        None => format!("--no-{name}"),
    }
}
