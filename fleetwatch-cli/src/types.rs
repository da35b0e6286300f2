//! Common types used across CLI modules

use std::collections::HashMap;

/// A `KEY=VALUE` environment assignment given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvAssignment {
    pub key: String,
    pub value: String,
}

impl EnvAssignment {
    /// Parse `KEY=VALUE`; the value may itself contain `=` or be empty
    pub fn parse(input: &str) -> Result<Self, String> {
        let (key, value) = input
            .split_once('=')
            .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", input))?;

        if key.trim().is_empty() {
            return Err(format!("missing variable name in '{}'", input));
        }

        Ok(Self {
            key: key.trim().to_string(),
            value: value.to_string(),
        })
    }
}

/// Collect assignments into an environment patch; later keys win
pub fn into_patch(assignments: Vec<EnvAssignment>) -> HashMap<String, String> {
    assignments
        .into_iter()
        .map(|EnvAssignment { key, value }| (key, value))
        .collect()
}
