use crate::condition::ConditionAccumulator;
use crate::error::{self, Result};
use crate::property::{ConfigurationProperty, Property};
use crate::token::PropertyToken;
use log::trace;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use snafu::{OptionExt, ResultExt};
use std::collections::{BTreeMap, HashSet};
use std::fmt::Debug;
use std::str::FromStr;

/// The `Configuration` trait is for structs that carry provider-specific data which the host
/// stores without knowing its schema, such as the details a provider attaches to an
/// [`Instance`](crate::Instance). The host only sees an open JSON object.
///
/// The traits aggregated by the `Configuration` trait are typical of "plain old data" types and
/// provide a way for providers to strongly type this data which is otherwise unconstrained.
///
pub trait Configuration:
    Serialize + DeserializeOwned + Clone + Debug + Default + Send + Sync + Sized + 'static
{
    /// Convert the `Configuration` object to a serde `Map`.
    fn into_map(self) -> Result<Map<String, Value>> {
        match self.into_value()? {
            Value::Object(map) => Ok(map),
            _ => error::ConfigWrongValueTypeSnafu {}.fail(),
        }
    }

    /// Convert the `Configuration` object to a serde `Value`.
    fn into_value(self) -> Result<Value> {
        serde_json::to_value(self).context(error::ConfigSerializationSnafu)
    }

    /// Deserialize the `Configuration` object from a serde `Map`.
    fn from_map(map: Map<String, Value>) -> Result<Self> {
        Self::from_value(Value::Object(map))
    }

    /// Deserialize the `Configuration` object from a serde `Value`.
    fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).context(error::ConfigDeserializationSnafu)
    }
}

/// The configuration the host hands to a provider: plain string values keyed by property key.
/// Values are interpreted through the [`ConfigurationProperty`] declarations the provider made.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Eq, PartialEq)]
#[serde(transparent)]
pub struct SimpleConfiguration {
    values: BTreeMap<String, String>,
}

impl From<BTreeMap<String, String>> for SimpleConfiguration {
    fn from(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }
}

impl<K, V> FromIterator<(K, V)> for SimpleConfiguration
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl SimpleConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<String>
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into())
    }

    /// The raw value stored for `key`, ignoring any property default.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The value for `property`: the configured value if there is one, otherwise the property's
    /// default.
    pub fn value<'a>(&'a self, property: &'a ConfigurationProperty) -> Option<&'a str> {
        self.get(property.key()).or_else(|| property.default_value())
    }

    /// Like [`value`](Self::value), for the property wrapped by `token`.
    pub fn value_for<T>(&self, token: &T) -> Option<String>
    where
        T: PropertyToken<Property = ConfigurationProperty>,
    {
        let property = token.property();
        self.value(&property).map(str::to_string)
    }

    /// The value for `property`, failing if there is neither a configured nor a default value.
    /// An empty value counts as missing.
    pub fn require<'a>(&'a self, property: &'a ConfigurationProperty) -> Result<&'a str> {
        self.present_value(property).context(error::MissingRequiredValueSnafu {
            key: property.key(),
        })
    }

    /// Parses the value for `property` as `T`. A missing value is `Ok(None)`.
    pub fn parse<T>(&self, property: &ConfigurationProperty) -> Result<Option<T>>
    where
        T: FromStr,
    {
        match self.value(property) {
            None => Ok(None),
            Some(value) => value.parse::<T>().map(Some).map_err(|_| {
                error::InvalidValueSnafu {
                    key: property.key(),
                    value: shown_value(property, value),
                    what: property.property_type().to_string(),
                }
                .build()
            }),
        }
    }

    /// Checks this configuration against `properties`. Records an error for every missing or empty
    /// required value and for every unacceptable value. Records a warning for every key that none
    /// of the properties declares.
    pub fn validate(
        &self,
        properties: &[ConfigurationProperty],
        accumulator: &mut ConditionAccumulator,
    ) {
        for property in properties {
            let key = property.key();
            match self.present_value(property) {
                None if property.is_required() => {
                    accumulator.add_error(Some(key), format!("'{}' is required", property.name()))
                }
                None => {}
                Some(value) if !property.property_type().accepts(value) => accumulator.add_error(
                    Some(key),
                    format!(
                        "'{}' is not a valid {}",
                        shown_value(property, value),
                        property.property_type()
                    ),
                ),
                Some(value) if !property.accepts(value) => accumulator.add_error(
                    Some(key),
                    format!(
                        "'{}' must be one of: {}",
                        shown_value(property, value),
                        property.valid_values().join(", ")
                    ),
                ),
                Some(_) => {}
            }
        }

        let declared: HashSet<&str> = properties.iter().map(|p| p.key()).collect();
        for key in self.values.keys().filter(|k| !declared.contains(k.as_str())) {
            trace!("configuration key '{}' is not declared", key);
            accumulator.add_warning(Some(key.as_str()), "unknown configuration key");
        }
    }

    fn present_value<'a>(&'a self, property: &'a ConfigurationProperty) -> Option<&'a str> {
        self.value(property).filter(|value| !value.is_empty())
    }

    /// Keeps only the values whose keys are declared by `properties`.
    pub fn filter(&self, properties: &[ConfigurationProperty]) -> Self {
        properties
            .iter()
            .filter_map(|p| self.get(p.key()).map(|v| (p.key(), v)))
            .collect()
    }
}

/// Sensitive values never end up in error messages.
fn shown_value(property: &ConfigurationProperty, value: &str) -> String {
    if property.is_sensitive() {
        "****".to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{ConfigurationPropertyOptions, Error, PropertyType, Widget};
    use maplit::btreemap;

    fn properties() -> Vec<ConfigurationProperty> {
        vec![
            ConfigurationProperty::new(
                "region",
                ConfigurationPropertyOptions {
                    name: "Region".into(),
                    required: true,
                    ..Default::default()
                },
            )
            .unwrap(),
            ConfigurationProperty::new(
                "count",
                ConfigurationPropertyOptions {
                    name: "Count".into(),
                    property_type: PropertyType::Integer,
                    default_value: Some("1".into()),
                    ..Default::default()
                },
            )
            .unwrap(),
            ConfigurationProperty::new(
                "size",
                ConfigurationPropertyOptions {
                    name: "Size".into(),
                    widget: Widget::List,
                    valid_values: vec!["small".into(), "large".into()],
                    ..Default::default()
                },
            )
            .unwrap(),
            ConfigurationProperty::new(
                "secret",
                ConfigurationPropertyOptions {
                    name: "Secret".into(),
                    property_type: PropertyType::Integer,
                    widget: Widget::Password,
                    sensitive: true,
                    ..Default::default()
                },
            )
            .unwrap(),
        ]
    }

    #[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Details {
        volume_id: String,
        size_gb: u32,
    }

    impl Configuration for Details {}

    #[test]
    fn configuration_map_round_trip() {
        let details = Details {
            volume_id: "vol-1".into(),
            size_gb: 8,
        };
        let map = details.clone().into_map().unwrap();
        assert_eq!(map["volumeId"], "vol-1");
        assert_eq!(Details::from_map(map).unwrap(), details);
    }

    #[test]
    fn values_fall_back_to_defaults() {
        let properties = properties();
        let config: SimpleConfiguration = btreemap! { "region" => "us-west-2" }
            .into_iter()
            .collect();
        assert_eq!(config.value(&properties[0]), Some("us-west-2"));
        assert_eq!(config.value(&properties[1]), Some("1"));
        assert_eq!(config.parse::<u32>(&properties[1]).unwrap(), Some(1));
        assert_eq!(config.value(&properties[2]), None);
        assert_eq!(config.parse::<u32>(&properties[2]).unwrap(), None);
    }

    #[test]
    fn require_missing() {
        let properties = properties();
        let config = SimpleConfiguration::new();
        match config.require(&properties[0]) {
            Err(Error::MissingRequiredValue { key }) => assert_eq!(key, "region"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(config.require(&properties[1]).unwrap(), "1");
    }

    #[test]
    fn parse_hides_sensitive_values() {
        let properties = properties();
        let mut config = SimpleConfiguration::new();
        config.insert("secret", "letmein");
        let error = config.parse::<i64>(&properties[3]).unwrap_err();
        assert!(!error.to_string().contains("letmein"));
    }

    #[test]
    fn validate_records_conditions() {
        let properties = properties();
        let config: SimpleConfiguration = vec![
            ("count", "many"),
            ("size", "medium"),
            ("color", "blue"),
        ]
        .into_iter()
        .collect();
        let mut accumulator = ConditionAccumulator::new();
        config.validate(&properties, &mut accumulator);

        let conditions = accumulator.conditions();
        assert_eq!(conditions.len(), 4);
        assert_eq!(conditions[0].key.as_deref(), Some("region"));
        assert!(conditions[0].is_error());
        assert_eq!(conditions[1].key.as_deref(), Some("count"));
        assert_eq!(conditions[1].message, "'many' is not a valid integer");
        assert_eq!(conditions[2].key.as_deref(), Some("size"));
        assert_eq!(conditions[2].message, "'medium' must be one of: small, large");
        assert_eq!(conditions[3].key.as_deref(), Some("color"));
        assert!(!conditions[3].is_error());
    }

    #[test]
    fn empty_required_value_is_missing() {
        let properties = properties();
        let config: SimpleConfiguration = vec![("region", ""), ("count", "")].into_iter().collect();
        let mut accumulator = ConditionAccumulator::new();
        config.validate(&properties, &mut accumulator);
        let conditions = accumulator.conditions();
        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].key.as_deref(), Some("region"));
        assert_eq!(conditions[0].message, "'Region' is required");
        assert!(matches!(
            config.require(&properties[0]),
            Err(Error::MissingRequiredValue { .. })
        ));
    }

    #[test]
    fn validate_clean() {
        let properties = properties();
        let config: SimpleConfiguration = vec![("region", "eu-west-1"), ("size", "large")]
            .into_iter()
            .collect();
        let mut accumulator = ConditionAccumulator::new();
        config.validate(&properties, &mut accumulator);
        assert!(accumulator.is_empty());
    }

    #[test]
    fn filter_declared() {
        let properties = properties();
        let config: SimpleConfiguration = vec![("region", "eu-west-1"), ("color", "blue")]
            .into_iter()
            .collect();
        let filtered = config.filter(&properties);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.get("region"), Some("eu-west-1"));
    }

    #[test]
    fn serializes_as_plain_map() {
        let config: SimpleConfiguration = vec![("region", "eu-west-1")].into_iter().collect();
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value, serde_json::json!({ "region": "eu-west-1" }));
    }
}
