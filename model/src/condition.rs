/*!

Validation findings. Providers and configuration validation record `Condition`s in a
`ConditionAccumulator` instead of failing on the first problem, so that a host can show a user
every problem with a configuration at once.

!*/

use crate::error::{self, Result};
use serde::{Deserialize, Serialize};
use serde_plain::{derive_display_from_serialize, derive_fromstr_from_deserialize};
use std::fmt::{Display, Formatter};

#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone, Copy, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Error,
    Warning,
}

derive_display_from_serialize!(Severity);
derive_fromstr_from_deserialize!(Severity, |e| -> crate::Error {
    crate::Error::SerdePlain { source: e }
});

/// A single validation finding, optionally tied to the key of the property it concerns.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub severity: Severity,
    /// The key of the property this condition is about, `None` for whole-configuration findings.
    pub key: Option<String>,
    pub message: String,
}

impl Condition {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl Display for Condition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.key {
            Some(key) => write!(f, "{} for '{}': {}", self.severity, key, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// Collects conditions in the order they are recorded.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct ConditionAccumulator {
    conditions: Vec<Condition>,
}

impl ConditionAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error<S>(&mut self, key: Option<&str>, message: S)
    where
        S: Into<String>,
    {
        self.add(Severity::Error, key, message)
    }

    pub fn add_warning<S>(&mut self, key: Option<&str>, message: S)
    where
        S: Into<String>,
    {
        self.add(Severity::Warning, key, message)
    }

    fn add<S>(&mut self, severity: Severity, key: Option<&str>, message: S)
    where
        S: Into<String>,
    {
        self.conditions.push(Condition {
            severity,
            key: key.map(str::to_string),
            message: message.into(),
        })
    }

    pub fn has_error(&self) -> bool {
        self.conditions.iter().any(Condition::is_error)
    }

    pub fn has_warning(&self) -> bool {
        self.conditions.iter().any(|c| !c.is_error())
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// The conditions recorded against `key`.
    pub fn conditions_for<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Condition> + 'a {
        self.conditions
            .iter()
            .filter(move |c| c.key.as_deref() == Some(key))
    }

    /// Returns the warnings if no error was recorded, otherwise an `InvalidConfiguration` error
    /// that carries every condition, warnings included.
    pub fn into_result(self) -> Result<Vec<Condition>> {
        if self.has_error() {
            return error::InvalidConfigurationSnafu {
                conditions: self.conditions,
            }
            .fail();
        }
        Ok(self.conditions)
    }
}
