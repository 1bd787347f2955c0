//! Named action inputs.
//!
//! The CI runner exposes every input as `INPUT_<NAME>`, with `<NAME>`
//! upper-cased and spaces turned into underscores. Hyphens survive, so the
//! `wait-on` input arrives as `INPUT_WAIT-ON`.

use indexmap::IndexMap;
use runway_core::{Error, Result, INPUT_ENV_PREFIX};

/// Raw input values keyed by their normalized name
#[derive(Debug, Clone, Default)]
pub struct ActionInputs {
    values: IndexMap<String, String>,
}

impl ActionInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect inputs from the current process environment
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Collect inputs from `INPUT_*` pairs, ignoring everything else
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let values = vars
            .into_iter()
            .filter_map(|(key, value)| {
                key.as_ref()
                    .strip_prefix(INPUT_ENV_PREFIX)
                    .map(|name| (name.to_string(), value.into()))
            })
            .collect();
        Self { values }
    }

    /// Set or replace one input by its public name
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(normalize(name), value.into());
    }

    /// Builder form of [`ActionInputs::set`]
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Trimmed value, `None` when unset or blank
    pub fn get(&self, name: &str) -> Option<String> {
        self.values
            .get(&normalize(name))
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Boolean input in the runner's accepted spellings
    pub fn get_bool(&self, name: &str, default: bool) -> Result<bool> {
        match self.get(name).as_deref() {
            None => Ok(default),
            Some("true" | "True" | "TRUE") => Ok(true),
            Some("false" | "False" | "FALSE") => Ok(false),
            Some(other) => Err(Error::configuration(format!(
                "input '{name}' must be one of true|True|TRUE|false|False|FALSE, got '{other}'"
            ))),
        }
    }

    /// Non-negative integer input
    pub fn get_u64(&self, name: &str, default: u64) -> Result<u64> {
        match self.get(name) {
            None => Ok(default),
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                Error::configuration(format!(
                    "input '{name}' must be a non-negative integer, got '{raw}'"
                ))
            }),
        }
    }
}

fn normalize(name: &str) -> String {
    name.replace(' ', "_").to_uppercase()
}
