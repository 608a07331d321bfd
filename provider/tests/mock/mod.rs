/*!

This test module provides a mock provider plugin: a [`Launcher`] offering one cloud provider,
which offers one compute [`ResourceProvider`] that keeps its instances in memory. It demonstrates
how a plugin uses the metadata types and validation helpers, and lets us test the contract
without a cloud.

!*/

use serde::{Deserialize, Serialize};
use spi_model::constants::{DEFAULT_INSTANCE_NAME_PREFIX, INSTANCE_NAME_PREFIX};
use spi_model::{
    CloudProviderDefinition, ConfigurationProperty, ConfigurationPropertyOptions, DisplayProperty,
    DisplayPropertyOptions, Property, PropertyType, ResourceProviderDefinition, Widget,
};
use spi_provider::error::ErrorMessage;
use spi_provider::provider::IntoProviderError;
use spi_provider::{
    check_allocation, find_cloud_provider, find_resource_provider, validate_configuration,
    CloudProvider, CloudProviderMetadata, Configuration, Instance, InstanceState, InstanceStatus,
    InstanceTemplate, Launcher, ProviderError, ProviderResult, Recovery, ResourceProvider,
    ResourceProviderMetadata, ResourceType, SimpleConfiguration,
};
use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr};
use tokio::sync::Mutex;

pub(crate) const CLOUD_ID: &str = "mock-cloud";
pub(crate) const COMPUTE_ID: &str = "mock-compute";
pub(crate) const DEFAULT_CAPACITY: &str = "10";

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn property(key: &str, options: ConfigurationPropertyOptions) -> ConfigurationProperty {
    ConfigurationProperty::new(key, options).unwrap()
}

fn required(key: &str, name: &str) -> ConfigurationProperty {
    property(
        key,
        ConfigurationPropertyOptions {
            name: name.into(),
            required: true,
            ..Default::default()
        },
    )
}

fn capacity_property() -> ConfigurationProperty {
    property(
        "capacity",
        ConfigurationPropertyOptions {
            name: "Capacity".into(),
            property_type: PropertyType::Integer,
            widget: Widget::Number,
            default_value: Some(DEFAULT_CAPACITY.into()),
            ..Default::default()
        },
    )
}

pub(crate) fn compute_metadata() -> ResourceProviderMetadata {
    ResourceProviderMetadata::new(ResourceProviderDefinition {
        id: COMPUTE_ID.into(),
        name: "Mock compute".into(),
        description: "Instances that only exist in memory".into(),
        resource_type: ResourceType::Compute,
        provider_configuration_properties: vec![capacity_property()],
        template_configuration_properties: vec![
            required("image", "Image"),
            property(
                "instanceNamePrefix",
                ConfigurationPropertyOptions {
                    name: "Instance name prefix".into(),
                    default_value: Some("mock".into()),
                    ..Default::default()
                },
            ),
        ],
        display_properties: vec![DisplayProperty::new(
            "imageId",
            DisplayPropertyOptions {
                name: "Image".into(),
                ..Default::default()
            },
        )
        .unwrap()],
    })
    .unwrap()
}

pub(crate) fn cloud_metadata() -> CloudProviderMetadata {
    CloudProviderMetadata::new(CloudProviderDefinition {
        id: CLOUD_ID.into(),
        name: "Mock cloud".into(),
        description: String::new(),
        configuration_properties: vec![required("region", "Region")],
        credentials_properties: vec![
            required("accessKey", "Access key"),
            property(
                "secretKey",
                ConfigurationPropertyOptions {
                    name: "Secret key".into(),
                    widget: Widget::Password,
                    required: true,
                    sensitive: true,
                    ..Default::default()
                },
            ),
        ],
        resource_providers: vec![compute_metadata()],
    })
    .unwrap()
}

/// The provider-specific details the mock attaches to each instance.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MockDetails {
    pub(crate) image: String,
    pub(crate) region: String,
    pub(crate) name: String,
}

impl Configuration for MockDetails {}

pub(crate) struct MockLauncher {}

impl Launcher for MockLauncher {
    fn cloud_provider_metadata(&self) -> Vec<CloudProviderMetadata> {
        vec![cloud_metadata()]
    }

    fn create_cloud_provider(
        &self,
        id: &str,
        configuration: &SimpleConfiguration,
    ) -> ProviderResult<Box<dyn CloudProvider>> {
        let all = self.cloud_provider_metadata();
        let metadata = find_cloud_provider(&all, id)?.clone();
        let properties: Vec<ConfigurationProperty> = metadata
            .configuration_properties()
            .iter()
            .chain(metadata.credentials_properties())
            .cloned()
            .collect();
        validate_configuration(&properties, configuration)?;
        let region = configuration
            .get("region")
            .context(Recovery::Unrecoverable, "region is missing")?
            .to_string();
        Ok(Box::new(MockCloudProvider { metadata, region }))
    }
}

pub(crate) struct MockCloudProvider {
    metadata: CloudProviderMetadata,
    region: String,
}

impl CloudProvider for MockCloudProvider {
    fn metadata(&self) -> &CloudProviderMetadata {
        &self.metadata
    }

    fn create_resource_provider(
        &self,
        id: &str,
        configuration: &SimpleConfiguration,
    ) -> ProviderResult<Box<dyn ResourceProvider>> {
        let metadata = find_resource_provider(&self.metadata, id)?.clone();
        validate_configuration(metadata.provider_configuration_properties(), configuration)?;
        let capacity = configuration
            .parse::<usize>(&capacity_property())?
            .unwrap_or_default();
        Ok(Box::new(MockComputeProvider {
            metadata,
            region: self.region.clone(),
            capacity,
            instances: Mutex::new(BTreeMap::new()),
        }))
    }
}

/// Keeps created instances in memory, and can only hold `capacity` of them.
pub(crate) struct MockComputeProvider {
    metadata: ResourceProviderMetadata,
    region: String,
    capacity: usize,
    instances: Mutex<BTreeMap<String, Instance>>,
}

#[async_trait::async_trait]
impl ResourceProvider for MockComputeProvider {
    fn metadata(&self) -> &ResourceProviderMetadata {
        &self.metadata
    }

    async fn allocate(
        &self,
        template: &InstanceTemplate,
        instance_ids: &[String],
        min_count: usize,
    ) -> ProviderResult<Vec<Instance>> {
        check_allocation(instance_ids, min_count)?;
        self.validate_template(template)?;
        let image = template
            .configuration()
            .get("image")
            .context(Recovery::Unrecoverable, "image is missing")?
            .to_string();
        // Our metadata overrides the default of the base name prefix property.
        let prefix = self
            .metadata
            .template_configuration_properties()
            .iter()
            .find(|p| p.key() == INSTANCE_NAME_PREFIX)
            .and_then(|p| template.configuration().value(p))
            .unwrap_or(DEFAULT_INSTANCE_NAME_PREFIX)
            .to_string();

        let mut instances = self.instances.lock().await;
        // Ids that already exist are returned as they are and count toward `min_count`.
        let mut allocated = Vec::new();
        let mut created_ids = Vec::new();
        for id in instance_ids {
            if let Some(existing) = instances.get(id) {
                allocated.push(existing.clone());
                continue;
            }
            if instances.len() >= self.capacity {
                continue;
            }
            let address = IpAddr::V4(Ipv4Addr::from(0x0a00_0001 + instances.len() as u32));
            let instance = Instance::new(template, id.as_str())?
                .with_private_ip_address(address)
                .with_port(22)
                .with_details(MockDetails {
                    image: image.clone(),
                    region: self.region.clone(),
                    name: format!("{}-{}", prefix, id),
                })?;
            instances.insert(id.clone(), instance.clone());
            created_ids.push(id);
            allocated.push(instance);
        }

        if allocated.len() < min_count {
            for id in created_ids {
                instances.remove(id);
            }
            return Err(ProviderError::new_with_source_and_context(
                Recovery::Transient,
                format!(
                    "Only {} of the minimum {} instances could be allocated",
                    allocated.len(),
                    min_count
                ),
                ErrorMessage::from("insufficient capacity"),
            ));
        }
        Ok(allocated)
    }

    async fn find(
        &self,
        _template: &InstanceTemplate,
        instance_ids: &[String],
    ) -> ProviderResult<Vec<Instance>> {
        let instances = self.instances.lock().await;
        Ok(instance_ids
            .iter()
            .filter_map(|id| instances.get(id).cloned())
            .collect())
    }

    async fn instance_states(
        &self,
        _template: &InstanceTemplate,
        instance_ids: &[String],
    ) -> ProviderResult<BTreeMap<String, InstanceState>> {
        let instances = self.instances.lock().await;
        Ok(instance_ids
            .iter()
            .map(|id| {
                let state = if instances.contains_key(id) {
                    InstanceState::new(InstanceStatus::Running)
                } else {
                    InstanceState::default()
                };
                (id.clone(), state)
            })
            .collect())
    }

    async fn delete(
        &self,
        _template: &InstanceTemplate,
        instance_ids: &[String],
    ) -> ProviderResult<()> {
        let mut instances = self.instances.lock().await;
        for id in instance_ids {
            instances.remove(id);
        }
        Ok(())
    }
}
