use crate::error::{self, Result};
use crate::instance::base_display_properties;
use crate::merge_properties;
use crate::property::{is_valid_key, ConfigurationProperty, DisplayProperty};
use crate::template::{base_template_properties, ResourceType};
use log::debug;
use serde::Serialize;
use snafu::ensure;
use std::collections::HashSet;

/// What a provider author declares about a resource provider. The base template and display
/// properties for the resource type are added by [`ResourceProviderMetadata::new`]; a property
/// declared here with the same key as a base property overrides it.
#[derive(Debug, Clone)]
pub struct ResourceProviderDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub resource_type: ResourceType,
    /// Properties of the configuration used to create the resource provider.
    pub provider_configuration_properties: Vec<ConfigurationProperty>,
    /// Properties of the configuration of each instance template.
    pub template_configuration_properties: Vec<ConfigurationProperty>,
    /// Properties shown for each created instance.
    pub display_properties: Vec<DisplayProperty>,
}

/// The assembled, immutable description of a resource provider.
#[derive(Serialize, Debug, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceProviderMetadata {
    id: String,
    name: String,
    description: String,
    resource_type: ResourceType,
    provider_configuration_properties: Vec<ConfigurationProperty>,
    template_configuration_properties: Vec<ConfigurationProperty>,
    display_properties: Vec<DisplayProperty>,
}

impl ResourceProviderMetadata {
    pub fn new(definition: ResourceProviderDefinition) -> Result<Self> {
        check_id(&definition.id, "resource provider")?;
        let resource_type = definition.resource_type;
        let metadata = Self {
            provider_configuration_properties: merge_properties!(
                definition.provider_configuration_properties
            )?,
            template_configuration_properties: merge_properties!(
                base_template_properties(resource_type),
                definition.template_configuration_properties
            )?,
            display_properties: merge_properties!(
                base_display_properties(),
                definition.display_properties
            )?,
            id: definition.id,
            name: definition.name,
            description: definition.description,
            resource_type,
        };
        debug!(
            "assembled {} provider '{}' with {} template properties",
            metadata.resource_type,
            metadata.id,
            metadata.template_configuration_properties.len()
        );
        Ok(metadata)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    pub fn provider_configuration_properties(&self) -> &[ConfigurationProperty] {
        &self.provider_configuration_properties
    }

    pub fn template_configuration_properties(&self) -> &[ConfigurationProperty] {
        &self.template_configuration_properties
    }

    pub fn display_properties(&self) -> &[DisplayProperty] {
        &self.display_properties
    }
}

/// What a provider author declares about a cloud provider.
#[derive(Debug, Clone, Default)]
pub struct CloudProviderDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Properties of the configuration used to create the cloud provider.
    pub configuration_properties: Vec<ConfigurationProperty>,
    /// Properties of the credentials used to authenticate with the cloud.
    pub credentials_properties: Vec<ConfigurationProperty>,
    pub resource_providers: Vec<ResourceProviderMetadata>,
}

/// The assembled, immutable description of a cloud provider and the resource providers it offers.
#[derive(Serialize, Debug, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CloudProviderMetadata {
    id: String,
    name: String,
    description: String,
    configuration_properties: Vec<ConfigurationProperty>,
    credentials_properties: Vec<ConfigurationProperty>,
    resource_providers: Vec<ResourceProviderMetadata>,
}

impl CloudProviderMetadata {
    pub fn new(definition: CloudProviderDefinition) -> Result<Self> {
        check_id(&definition.id, "cloud provider")?;
        let mut seen = HashSet::new();
        for resource_provider in &definition.resource_providers {
            ensure!(
                seen.insert(resource_provider.id()),
                error::DuplicateIdSnafu {
                    what: "resource provider",
                    id: resource_provider.id(),
                }
            );
        }
        Ok(Self {
            configuration_properties: merge_properties!(definition.configuration_properties)?,
            credentials_properties: merge_properties!(definition.credentials_properties)?,
            id: definition.id,
            name: definition.name,
            description: definition.description,
            resource_providers: definition.resource_providers,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn configuration_properties(&self) -> &[ConfigurationProperty] {
        &self.configuration_properties
    }

    pub fn credentials_properties(&self) -> &[ConfigurationProperty] {
        &self.credentials_properties
    }

    pub fn resource_providers(&self) -> &[ResourceProviderMetadata] {
        &self.resource_providers
    }

    pub fn resource_provider(&self, id: &str) -> Option<&ResourceProviderMetadata> {
        self.resource_providers.iter().find(|r| r.id() == id)
    }
}

fn check_id(id: &str, what: &str) -> Result<()> {
    ensure!(!id.trim().is_empty(), error::MissingIdSnafu { what });
    ensure!(is_valid_key(id), error::InvalidIdSnafu { what, id });
    Ok(())
}
