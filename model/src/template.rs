use crate::configuration::SimpleConfiguration;
use crate::constants::{
    DATABASE_ADMIN_PASSWORD, DATABASE_ADMIN_USERNAME, DATABASE_TYPE, DEFAULT_INSTANCE_NAME_PREFIX,
    INSTANCE_NAME_PREFIX,
};
use crate::error::{self, Result};
use crate::property::{ConfigurationProperty, ConfigurationPropertyOptions, Widget};
use crate::token::{expand_tokens, PropertyToken};
use serde::{Deserialize, Serialize};
use serde_plain::{derive_display_from_serialize, derive_fromstr_from_deserialize};
use snafu::ensure;
use std::collections::BTreeMap;
use std::convert::TryFrom;

/// The kinds of resources a provider can create.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone, Copy, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ResourceType {
    Compute,
    DatabaseServer,
}

derive_display_from_serialize!(ResourceType);
derive_fromstr_from_deserialize!(ResourceType, |e| -> crate::Error {
    crate::Error::SerdePlain { source: e }
});

#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone, Copy, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    Mysql,
    Postgresql,
}

derive_display_from_serialize!(DatabaseType);
derive_fromstr_from_deserialize!(DatabaseType, |e| -> crate::Error {
    crate::Error::SerdePlain { source: e }
});

/// Template properties every resource provider accepts.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum TemplateToken {
    InstanceNamePrefix,
}

impl TemplateToken {
    pub const ALL: [TemplateToken; 1] = [TemplateToken::InstanceNamePrefix];
}

impl PropertyToken for TemplateToken {
    type Property = ConfigurationProperty;

    fn property(&self) -> ConfigurationProperty {
        match self {
            TemplateToken::InstanceNamePrefix => ConfigurationProperty::unchecked(
                INSTANCE_NAME_PREFIX,
                ConfigurationPropertyOptions {
                    name: "Instance name prefix".into(),
                    description: "Prefix for the names of instances created from the template"
                        .into(),
                    default_value: Some(DEFAULT_INSTANCE_NAME_PREFIX.into()),
                    ..Default::default()
                },
            ),
        }
    }
}

/// Template properties every database server provider accepts.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum DatabaseServerTemplateToken {
    Type,
    AdminUsername,
    AdminPassword,
}

impl DatabaseServerTemplateToken {
    pub const ALL: [DatabaseServerTemplateToken; 3] = [
        DatabaseServerTemplateToken::Type,
        DatabaseServerTemplateToken::AdminUsername,
        DatabaseServerTemplateToken::AdminPassword,
    ];
}

impl PropertyToken for DatabaseServerTemplateToken {
    type Property = ConfigurationProperty;

    fn property(&self) -> ConfigurationProperty {
        match self {
            DatabaseServerTemplateToken::Type => ConfigurationProperty::unchecked(
                DATABASE_TYPE,
                ConfigurationPropertyOptions {
                    name: "Database type".into(),
                    widget: Widget::List,
                    required: true,
                    valid_values: vec![
                        DatabaseType::Mysql.to_string(),
                        DatabaseType::Postgresql.to_string(),
                    ],
                    ..Default::default()
                },
            ),
            DatabaseServerTemplateToken::AdminUsername => ConfigurationProperty::unchecked(
                DATABASE_ADMIN_USERNAME,
                ConfigurationPropertyOptions {
                    name: "Admin username".into(),
                    required: true,
                    ..Default::default()
                },
            ),
            DatabaseServerTemplateToken::AdminPassword => ConfigurationProperty::unchecked(
                DATABASE_ADMIN_PASSWORD,
                ConfigurationPropertyOptions {
                    name: "Admin password".into(),
                    widget: Widget::Password,
                    required: true,
                    sensitive: true,
                    ..Default::default()
                },
            ),
        }
    }
}

/// The template properties that come with every provider of `resource_type`, in order.
pub fn base_template_properties(resource_type: ResourceType) -> Vec<ConfigurationProperty> {
    let mut properties = expand_tokens(TemplateToken::ALL);
    if resource_type == ResourceType::DatabaseServer {
        properties.extend(expand_tokens(DatabaseServerTemplateToken::ALL));
    }
    properties
}

/// A named, reusable description of the instances a provider should create.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase", try_from = "UncheckedInstanceTemplate")]
pub struct InstanceTemplate {
    name: String,
    resource_type: ResourceType,
    configuration: SimpleConfiguration,
    tags: BTreeMap<String, String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UncheckedInstanceTemplate {
    name: String,
    resource_type: ResourceType,
    #[serde(default)]
    configuration: SimpleConfiguration,
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

impl TryFrom<UncheckedInstanceTemplate> for InstanceTemplate {
    type Error = crate::Error;

    fn try_from(value: UncheckedInstanceTemplate) -> Result<Self> {
        Self::new(
            value.name,
            value.resource_type,
            value.configuration,
            value.tags,
        )
    }
}

impl InstanceTemplate {
    pub fn new<S>(
        name: S,
        resource_type: ResourceType,
        configuration: SimpleConfiguration,
        tags: BTreeMap<String, String>,
    ) -> Result<Self>
    where
        S: Into<String>,
    {
        let name = name.into();
        ensure!(
            !name.trim().is_empty(),
            error::MissingIdSnafu { what: "template" }
        );
        Ok(Self {
            name,
            resource_type,
            configuration,
            tags,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    pub fn configuration(&self) -> &SimpleConfiguration {
        &self.configuration
    }

    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    pub fn instance_name_prefix(&self) -> String {
        self.configuration
            .value_for(&TemplateToken::InstanceNamePrefix)
            .unwrap_or_else(|| DEFAULT_INSTANCE_NAME_PREFIX.to_string())
    }

    /// The name a provider should give the instance with `instance_id`.
    pub fn instance_name(&self, instance_id: &str) -> String {
        format!("{}-{}", self.instance_name_prefix(), instance_id)
    }

    /// The configured database type. `None` when it is not configured, an error when it is not a
    /// known database type.
    pub fn database_type(&self) -> Result<Option<DatabaseType>> {
        self.configuration
            .parse::<DatabaseType>(&DatabaseServerTemplateToken::Type.property())
    }
}
