//! Translation of the flat configuration into per-stage option records.

use super::{FlatConfig, OptionCatalog, OptionDecl, OptionSet, OptionValue, ResolvedOption, ResolvedOptions, ValueKind};
use crate::errors::ConfigError;
use std::sync::Arc;
use tracing::debug;

/// Translates `config` into the options declared by `set`.
///
/// Keys that `set` does not declare are ignored. Unset options stay unset;
/// declared defaults belong to the downstream tool and are never filled in.
///
/// A toggle set to `false` is rewritten as its negated flag (`bracketSpacing:
/// false` becomes `--no-bracket-spacing`), so every resolved toggle is `true`.
/// An explicit value for the negated flag itself wins.
///
/// # Errors
///
/// Returns a `ConfigError` naming the flag when a value does not fit its
/// declared kind, or when a toggle without a negated form is set to `false`.
pub fn translate(config: &FlatConfig, set: &OptionSet) -> Result<ResolvedOptions, ConfigError> {
    let mut entries: Vec<ResolvedOption> = set
        .iter()
        .map(|decl| ResolvedOption {
            flag: decl.flag.clone(),
            key: decl.record_key(),
            value: None,
        })
        .collect();

    for (index, decl) in set.iter().enumerate() {
        let Some(raw) = config.get(&decl.lookup_key()) else {
            continue;
        };

        match coerce(decl, raw)? {
            OptionValue::Bool(false) => {
                let inverse = set.negation_of(decl).ok_or_else(|| ConfigError::NotNegatable {
                    flag: decl.flag.clone(),
                })?;
                if config.get(&inverse.lookup_key()).is_none() {
                    if let Some(entry) = entries.iter_mut().find(|entry| entry.flag == inverse.flag) {
                        entry.value = Some(OptionValue::Bool(true));
                    }
                }
            }
            value => entries[index].value = Some(value),
        }
    }

    let resolved = ResolvedOptions::new(set.name(), entries);
    debug!(
        option_set = set.name(),
        set_count = resolved.set_count(),
        "Translated options"
    );
    Ok(resolved)
}

fn coerce(decl: &OptionDecl, raw: &OptionValue) -> Result<OptionValue, ConfigError> {
    let mismatch = || ConfigError::TypeMismatch {
        flag: decl.flag.clone(),
        expected: decl.value_kind.describe(),
        value: raw.to_string(),
    };

    match (&decl.value_kind, raw) {
        (ValueKind::Bool, OptionValue::Bool(b)) => Ok(OptionValue::Bool(*b)),
        (ValueKind::Bool, OptionValue::Text(text)) => match text.as_str() {
            "true" => Ok(OptionValue::Bool(true)),
            "false" => Ok(OptionValue::Bool(false)),
            _ => Err(mismatch()),
        },
        (ValueKind::Bool, OptionValue::Int(_)) => Err(mismatch()),

        (ValueKind::Int, OptionValue::Int(i)) => Ok(OptionValue::Int(*i)),
        (ValueKind::Int, OptionValue::Text(text)) => text
            .trim()
            .parse::<i64>()
            .map(OptionValue::Int)
            .map_err(|_| ConfigError::InvalidInteger {
                flag: decl.flag.clone(),
                value: text.clone(),
            }),
        (ValueKind::Int, OptionValue::Bool(_)) => Err(mismatch()),

        (ValueKind::Enum(_), OptionValue::Bool(b)) if decl.bool_aliases.is_some() => {
            Ok(OptionValue::Text(bool_alias(decl, *b)))
        }
        (ValueKind::Enum(_), OptionValue::Text(text))
            if decl.bool_aliases.is_some() && (text == "true" || text == "false") =>
        {
            Ok(OptionValue::Text(bool_alias(decl, text == "true")))
        }
        (ValueKind::Enum(choices), OptionValue::Text(text)) => {
            if choices.iter().any(|choice| choice == text) {
                Ok(OptionValue::Text(text.clone()))
            } else {
                Err(ConfigError::InvalidChoice {
                    flag: decl.flag.clone(),
                    value: text.clone(),
                    choices: choices.clone(),
                })
            }
        }
        (ValueKind::Enum(choices), other) => Err(ConfigError::InvalidChoice {
            flag: decl.flag.clone(),
            value: other.to_string(),
            choices: choices.clone(),
        }),

        (ValueKind::String, OptionValue::Text(text)) => Ok(OptionValue::Text(text.clone())),
        (ValueKind::String, OptionValue::Int(i)) => Ok(OptionValue::Text(i.to_string())),
        (ValueKind::String, OptionValue::Bool(_)) => Err(mismatch()),
    }
}

fn bool_alias(decl: &OptionDecl, value: bool) -> String {
    match &decl.bool_aliases {
        Some(aliases) if value => aliases.on.clone(),
        Some(aliases) => aliases.off.clone(),
        None => value.to_string(),
    }
}

/// Options for both pass-through stages, shared read-only with their adapters.
#[derive(Debug, Clone, Default)]
pub struct StageOptions {
    /// Options for the dialect-convert stage.
    pub dialect: Arc<ResolvedOptions>,
    /// Options for the format stage.
    pub format: Arc<ResolvedOptions>,
}

impl StageOptions {
    /// Resolves both stages' options from one flat configuration.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` found; dialect options are checked first.
    pub fn resolve(config: &FlatConfig, catalog: &OptionCatalog) -> Result<Self, ConfigError> {
        Ok(Self {
            dialect: Arc::new(translate(config, &catalog.dialect)?),
            format: Arc::new(translate(config, &catalog.format)?),
        })
    }
}
