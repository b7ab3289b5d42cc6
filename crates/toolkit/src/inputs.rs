//! Action inputs.
//!
//! GitHub Actions hands every `with:` input to the process as an
//! `INPUT_<NAME>` environment variable. [`ActionInputs`] snapshots them once so
//! configuration is assembled at the entry point and never re-read mid-run.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use thiserror::Error;

const TRUE_VALUES: [&str; 3] = ["true", "TRUE", "True"];
const FALSE_VALUES: [&str; 3] = ["false", "FALSE", "False"];

/// Errors produced while reading inputs.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Input required and not supplied: {name}")]
    Required { name: String },

    #[error("Can't parse input value \"{raw}\" as JSON")]
    Json {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Can't parse input value ({raw:?}) as boolean")]
    Boolean { raw: String },

    #[error("Invalid value for {name}: {message}")]
    Invalid { name: String, message: String },
}

/// A source of named action inputs.
pub trait InputSource {
    /// Returns the trimmed value of input `name`, `None` when unset.
    fn get(&self, name: &str) -> Option<String>;
}

/// Inputs captured from the process environment (or supplied directly).
#[derive(Debug, Clone, Default)]
pub struct ActionInputs {
    values: HashMap<String, String>,
}

impl ActionInputs {
    /// Captures every `INPUT_*` variable of the current process.
    pub fn from_env() -> Self {
        Self::from_vars(process_vars())
    }

    /// Captures the `INPUT_*` entries of an arbitrary variable list.
    pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let values = vars
            .into_iter()
            .filter_map(|(key, value)| key.strip_prefix("INPUT_").map(|k| (k.to_string(), value)))
            .collect();
        Self { values }
    }

    /// Builds inputs from `(name, value)` pairs using action input names
    /// (e.g. `("dry-run", "true")`).
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self::from_vars(
            pairs
                .into_iter()
                .map(|(name, value)| (format!("INPUT_{}", env_key(name)), value.to_string())),
        )
    }
}

impl InputSource for ActionInputs {
    fn get(&self, name: &str) -> Option<String> {
        self.values.get(&env_key(name)).map(|v| v.trim().to_string())
    }
}

/// Variables of the current process whose name and value are both valid
/// Unicode. Anything else is skipped rather than aborting the action.
pub fn process_vars() -> impl Iterator<Item = (String, String)> {
    std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
}

fn env_key(name: &str) -> String {
    name.replace(' ', "_").to_uppercase()
}

/// Returns the input value, or an empty string when unset.
pub fn get_input(source: &(impl InputSource + ?Sized), name: &str) -> String {
    source.get(name).unwrap_or_default()
}

/// Returns the input value, failing when it is unset or empty.
pub fn get_required_input(
    source: &(impl InputSource + ?Sized),
    name: &str,
) -> Result<String, InputError> {
    let value = get_input(source, name);
    if value.is_empty() {
        return Err(InputError::Required {
            name: name.to_string(),
        });
    }
    Ok(value)
}

/// Parses the input as JSON, returning `default` when it is blank.
pub fn get_json_input<T: DeserializeOwned>(
    source: &(impl InputSource + ?Sized),
    name: &str,
    default: Option<T>,
) -> Result<Option<T>, InputError> {
    let raw = get_input(source, name);
    if raw.is_empty() {
        return Ok(default);
    }
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| InputError::Json { raw, source })
}

/// Parses the input as a boolean, returning `default` when it is empty.
///
/// Only `true`/`TRUE`/`True` and `false`/`FALSE`/`False` are accepted.
pub fn get_boolean_input(
    source: &(impl InputSource + ?Sized),
    name: &str,
    default: bool,
) -> Result<bool, InputError> {
    let raw = get_input(source, name);
    if raw.is_empty() {
        return Ok(default);
    }
    if TRUE_VALUES.contains(&raw.as_str()) {
        return Ok(true);
    }
    if FALSE_VALUES.contains(&raw.as_str()) {
        return Ok(false);
    }
    Err(InputError::Boolean { raw })
}
