/*!

Configuration and display properties are the declarative descriptors a provider uses to tell the
host what configuration it accepts and what information it shows about the resources it creates.
Both kinds are identified by a `key` which is unique within a provider's merged property list.

!*/

use crate::constants::PROPERTY_KEY_PATTERN;
use crate::error::{self, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_plain::{derive_display_from_serialize, derive_fromstr_from_deserialize};
use snafu::ensure;
use std::convert::TryFrom;

lazy_static::lazy_static! {
    static ref KEY_REGEX: Regex = {
        #[allow(clippy::unwrap_used)]
        Regex::new(PROPERTY_KEY_PATTERN).unwrap()
    };
}

/// Anything that is identified by a property key. The merge utility only ever looks at `key`.
pub trait Property {
    fn key(&self) -> &str;
}

impl<P> Property for &P
where
    P: Property + ?Sized,
{
    fn key(&self) -> &str {
        (**self).key()
    }
}

/// Whether `s` matches the key rule. Provider ids follow the same rule as property keys.
pub(crate) fn is_valid_key(s: &str) -> bool {
    KEY_REGEX.is_match(s)
}

/// Checks that `key` is usable as a property key.
pub(crate) fn check_key(key: &str) -> Result<()> {
    ensure!(is_valid_key(key), error::InvalidPropertyKeySnafu { key });
    Ok(())
}

/// The type of value a property holds. Configuration values always travel as strings, the type
/// tells the host (and the validation in `SimpleConfiguration`) how to interpret them.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone, Copy, Hash)]
#[serde(rename_all = "camelCase")]
pub enum PropertyType {
    String,
    Integer,
    Boolean,
    Double,
}

impl Default for PropertyType {
    fn default() -> Self {
        Self::String
    }
}

derive_display_from_serialize!(PropertyType);
derive_fromstr_from_deserialize!(PropertyType, |e| -> crate::Error {
    crate::Error::SerdePlain { source: e }
});

impl PropertyType {
    /// Whether `value` can be interpreted as this type.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            PropertyType::String => true,
            PropertyType::Integer => value.parse::<i64>().is_ok(),
            PropertyType::Boolean => value.parse::<bool>().is_ok(),
            PropertyType::Double => value.parse::<f64>().is_ok(),
        }
    }
}

/// How the host should render the input for a configuration property.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone, Copy, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Widget {
    Textbox,
    Password,
    Checkbox,
    Radio,
    List,
    Number,
    File,
}

impl Default for Widget {
    fn default() -> Self {
        Self::Textbox
    }
}

derive_display_from_serialize!(Widget);
derive_fromstr_from_deserialize!(Widget, |e| -> crate::Error {
    crate::Error::SerdePlain { source: e }
});

impl Widget {
    /// Widgets that only make sense with a fixed set of choices.
    pub fn has_choices(&self) -> bool {
        matches!(self, Widget::Radio | Widget::List)
    }
}

/// Everything about a configuration property except its key. Construct with struct update syntax
/// over `Default::default()` and hand it to [`ConfigurationProperty::new`].
#[derive(Serialize, Deserialize, Debug, Default, Eq, PartialEq, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigurationPropertyOptions {
    /// A human readable name for the property.
    pub name: String,
    pub description: String,
    pub property_type: PropertyType,
    pub widget: Widget,
    /// Whether a value (explicit or default) must be present for the configuration to be valid.
    pub required: bool,
    /// Sensitive values must not be logged or displayed.
    pub sensitive: bool,
    pub default_value: Option<String>,
    pub placeholder: Option<String>,
    /// The allowed values, in the order the host should offer them. Empty means unrestricted.
    pub valid_values: Vec<String>,
}

/// A configuration property declared by a provider.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone)]
#[serde(try_from = "UncheckedConfigurationProperty")]
pub struct ConfigurationProperty {
    key: String,
    #[serde(flatten)]
    options: ConfigurationPropertyOptions,
}

#[derive(Deserialize)]
struct UncheckedConfigurationProperty {
    key: String,
    #[serde(flatten)]
    options: ConfigurationPropertyOptions,
}

impl TryFrom<UncheckedConfigurationProperty> for ConfigurationProperty {
    type Error = crate::Error;

    fn try_from(value: UncheckedConfigurationProperty) -> Result<Self> {
        Self::new(value.key, value.options)
    }
}

impl ConfigurationProperty {
    /// Creates a configuration property, validating the key and the consistency of the options.
    pub fn new<S>(key: S, options: ConfigurationPropertyOptions) -> Result<Self>
    where
        S: Into<String>,
    {
        let key = key.into();
        check_key(&key)?;
        ensure!(
            options.widget != Widget::Password || options.sensitive,
            error::InsensitivePasswordSnafu { key }
        );
        ensure!(
            !options.widget.has_choices() || !options.valid_values.is_empty(),
            error::MissingValidValuesSnafu {
                key,
                widget: options.widget.to_string(),
            }
        );
        if let Some(value) = &options.default_value {
            ensure!(
                options.property_type.accepts(value),
                error::InvalidDefaultValueSnafu {
                    key,
                    value,
                    property_type: options.property_type.to_string(),
                }
            );
            ensure!(
                options.valid_values.is_empty() || options.valid_values.contains(value),
                error::DefaultNotInValidValuesSnafu { key, value }
            );
        }
        Ok(Self { key, options })
    }

    /// For the crate's own base properties, which are covered by tests instead of checked on
    /// every construction.
    pub(crate) fn unchecked(key: &str, options: ConfigurationPropertyOptions) -> Self {
        Self {
            key: key.to_string(),
            options,
        }
    }

    pub fn name(&self) -> &str {
        &self.options.name
    }

    pub fn description(&self) -> &str {
        &self.options.description
    }

    pub fn property_type(&self) -> PropertyType {
        self.options.property_type
    }

    pub fn widget(&self) -> Widget {
        self.options.widget
    }

    pub fn is_required(&self) -> bool {
        self.options.required
    }

    pub fn is_sensitive(&self) -> bool {
        self.options.sensitive
    }

    pub fn default_value(&self) -> Option<&str> {
        self.options.default_value.as_deref()
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.options.placeholder.as_deref()
    }

    pub fn valid_values(&self) -> &[String] {
        &self.options.valid_values
    }

    pub fn options(&self) -> &ConfigurationPropertyOptions {
        &self.options
    }

    /// Whether `value` is acceptable for this property, both by type and by valid values.
    pub fn accepts(&self, value: &str) -> bool {
        self.options.property_type.accepts(value)
            && (self.options.valid_values.is_empty()
                || self.options.valid_values.iter().any(|v| v == value))
    }
}

impl Property for ConfigurationProperty {
    fn key(&self) -> &str {
        &self.key
    }
}

/// Everything about a display property except its key.
#[derive(Serialize, Deserialize, Debug, Default, Eq, PartialEq, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayPropertyOptions {
    pub name: String,
    pub description: String,
    pub property_type: PropertyType,
    pub sensitive: bool,
}

/// A property of a created resource that the host shows to users, e.g. an instance's IP address.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone)]
#[serde(try_from = "UncheckedDisplayProperty")]
pub struct DisplayProperty {
    key: String,
    #[serde(flatten)]
    options: DisplayPropertyOptions,
}

#[derive(Deserialize)]
struct UncheckedDisplayProperty {
    key: String,
    #[serde(flatten)]
    options: DisplayPropertyOptions,
}

impl TryFrom<UncheckedDisplayProperty> for DisplayProperty {
    type Error = crate::Error;

    fn try_from(value: UncheckedDisplayProperty) -> Result<Self> {
        Self::new(value.key, value.options)
    }
}

impl DisplayProperty {
    pub fn new<S>(key: S, options: DisplayPropertyOptions) -> Result<Self>
    where
        S: Into<String>,
    {
        let key = key.into();
        check_key(&key)?;
        Ok(Self { key, options })
    }

    pub(crate) fn unchecked(key: &str, options: DisplayPropertyOptions) -> Self {
        Self {
            key: key.to_string(),
            options,
        }
    }

    pub fn name(&self) -> &str {
        &self.options.name
    }

    pub fn description(&self) -> &str {
        &self.options.description
    }

    pub fn property_type(&self) -> PropertyType {
        self.options.property_type
    }

    pub fn is_sensitive(&self) -> bool {
        self.options.sensitive
    }

    pub fn options(&self) -> &DisplayPropertyOptions {
        &self.options
    }
}

impl Property for DisplayProperty {
    fn key(&self) -> &str {
        &self.key
    }
}
