use crate::condition::Condition;
use snafu::Snafu;

pub type Result<T> = std::result::Result<T, Error>;

/// The error type returned by the model's constructors and configuration lookups.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Error deserializing configuration: {}", source))]
    ConfigDeserialization { source: serde_json::Error },

    #[snafu(display("Error serializing configuration: {}", source))]
    ConfigSerialization { source: serde_json::Error },

    #[snafu(display(
        "Error serializing configuration: expected Value::Object type but got something else."
    ))]
    ConfigWrongValueType {},

    #[snafu(display(
        "Default value '{}' of property '{}' is not one of its valid values",
        value,
        key
    ))]
    DefaultNotInValidValues { key: String, value: String },

    #[snafu(display("Duplicate {} id '{}'", what, id))]
    DuplicateId { what: String, id: String },

    #[snafu(display("Property '{}' uses a password widget but is not sensitive", key))]
    InsensitivePassword { key: String },

    #[snafu(display(
        "Invalid configuration, {} condition(s): {}",
        conditions.len(),
        summarize(conditions)
    ))]
    InvalidConfiguration { conditions: Vec<Condition> },

    #[snafu(display(
        "Default value '{}' of property '{}' is not a valid {}",
        value,
        key,
        property_type
    ))]
    InvalidDefaultValue {
        key: String,
        value: String,
        property_type: String,
    },

    #[snafu(display(
        "Invalid {} id '{}', ids must match '{}'",
        what,
        id,
        crate::constants::PROPERTY_KEY_PATTERN
    ))]
    InvalidId { what: String, id: String },

    #[snafu(display(
        "Invalid property key '{}', keys must match '{}'",
        key,
        crate::constants::PROPERTY_KEY_PATTERN
    ))]
    InvalidPropertyKey { key: String },

    #[snafu(display("Value '{}' of '{}' is not a valid {}", value, key, what))]
    InvalidValue {
        key: String,
        value: String,
        what: String,
    },

    #[snafu(display("A {} id is required", what))]
    MissingId { what: String },

    #[snafu(display(
        "Property at position {} of sequence {} has an empty key",
        position,
        sequence
    ))]
    MissingPropertyKey { sequence: usize, position: usize },

    #[snafu(display("No value was provided for required property '{}'", key))]
    MissingRequiredValue { key: String },

    #[snafu(display("Property '{}' uses a {} widget but declares no valid values", key, widget))]
    MissingValidValues { key: String, widget: String },

    #[snafu(display("Parse error: {}", source))]
    SerdePlain { source: serde_plain::Error },
}

fn summarize(conditions: &[Condition]) -> String {
    conditions
        .iter()
        .map(|condition| condition.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
