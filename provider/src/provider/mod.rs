mod error;

pub use self::error::{AsRecovery, IntoProviderError, ProviderError, ProviderResult, Recovery};
use log::{debug, trace};
use spi_model::{
    CloudProviderMetadata, Condition, ConditionAccumulator, ConfigurationProperty, Instance,
    InstanceState, InstanceTemplate, ResourceProviderMetadata, SimpleConfiguration,
};
use std::collections::{BTreeMap, HashSet};

/// You implement the [`Launcher`] trait as the entry point of your provider plugin. The host asks
/// it which cloud providers the plugin offers and has it create them.
pub trait Launcher: Send + Sync {
    /// Describes every cloud provider this plugin can create.
    fn cloud_provider_metadata(&self) -> Vec<CloudProviderMetadata>;

    /// Create the cloud provider with `id`. The `configuration` holds values for the cloud
    /// provider's configuration and credentials properties. Implementations should check it with
    /// [`validate_configuration`] before using it.
    fn create_cloud_provider(
        &self,
        id: &str,
        configuration: &SimpleConfiguration,
    ) -> ProviderResult<Box<dyn CloudProvider>>;
}

/// You implement the [`CloudProvider`] trait to group the resource providers of one cloud, which
/// typically share credentials and API clients.
pub trait CloudProvider: Send + Sync {
    fn metadata(&self) -> &CloudProviderMetadata;

    /// Create the resource provider with `id`, configured with values for its provider
    /// configuration properties.
    fn create_resource_provider(
        &self,
        id: &str,
        configuration: &SimpleConfiguration,
    ) -> ProviderResult<Box<dyn ResourceProvider>>;
}

/// You implement the [`ResourceProvider`] trait in order to create, find and delete compute
/// instances or database server instances (the [`ResourceType`](spi_model::ResourceType) in your
/// metadata says which).
///
/// ## Contract
///
/// - Instance ids are chosen by the host and passed in. A provider must be able to find its
///   instances again from the template and the ids alone, e.g. by tagging cloud resources with
///   them.
/// - `allocate` must end up with at least `min_count` of the requested instances or fail. An id
///   that already has an instance is returned as is. When it fails it should clean up the
///   instances this call created, and only those.
/// - `find` and `instance_states` never fail because an id is unknown: unknown instances are
///   left out of `find` and reported as `Unknown` by `instance_states`.
/// - `delete` of an instance that no longer exists is not an error.
///
#[async_trait::async_trait]
pub trait ResourceProvider: Send + Sync {
    fn metadata(&self) -> &ResourceProviderMetadata;

    /// Check a template before it is used. The default implementation checks the resource type
    /// and validates the template configuration against the template configuration properties,
    /// returning any warnings.
    fn validate_template(&self, template: &InstanceTemplate) -> ProviderResult<Vec<Condition>> {
        let metadata = self.metadata();
        if template.resource_type() != metadata.resource_type() {
            return Err(ProviderError::new_with_context(
                Recovery::Unrecoverable,
                format!(
                    "Template '{}' is for {} resources but provider '{}' creates {} resources",
                    template.name(),
                    template.resource_type(),
                    metadata.id(),
                    metadata.resource_type()
                ),
            ));
        }
        validate_configuration(
            metadata.template_configuration_properties(),
            template.configuration(),
        )
    }

    /// Create an instance from `template` for each of `instance_ids`, succeeding if at least
    /// `min_count` of them exist afterwards.
    async fn allocate(
        &self,
        template: &InstanceTemplate,
        instance_ids: &[String],
        min_count: usize,
    ) -> ProviderResult<Vec<Instance>>;

    /// Find the instances with `instance_ids` that exist.
    async fn find(
        &self,
        template: &InstanceTemplate,
        instance_ids: &[String],
    ) -> ProviderResult<Vec<Instance>>;

    /// Get the state of each of `instance_ids`.
    async fn instance_states(
        &self,
        template: &InstanceTemplate,
        instance_ids: &[String],
    ) -> ProviderResult<BTreeMap<String, InstanceState>>;

    /// Delete the instances with `instance_ids`.
    async fn delete(&self, template: &InstanceTemplate, instance_ids: &[String])
        -> ProviderResult<()>;
}

/// Validates `configuration` against `properties`. Returns the warnings (e.g. unknown keys) if the
/// configuration is usable, otherwise an unrecoverable `ProviderError` carrying every condition.
pub fn validate_configuration(
    properties: &[ConfigurationProperty],
    configuration: &SimpleConfiguration,
) -> ProviderResult<Vec<Condition>> {
    let mut accumulator = ConditionAccumulator::new();
    configuration.validate(properties, &mut accumulator);
    for condition in accumulator.conditions() {
        trace!("configuration {}", condition);
    }
    let warnings = accumulator.into_result()?;
    if !warnings.is_empty() {
        debug!("configuration accepted with {} warning(s)", warnings.len());
    }
    Ok(warnings)
}

/// Checks an allocation request: the ids must be unique and at least `min_count` of them must be
/// requested.
pub fn check_allocation(instance_ids: &[String], min_count: usize) -> ProviderResult<()> {
    if min_count > instance_ids.len() {
        return Err(ProviderError::new_with_context(
            Recovery::Unrecoverable,
            format!(
                "Minimum count {} exceeds the {} requested instance(s)",
                min_count,
                instance_ids.len()
            ),
        ));
    }
    let mut seen = HashSet::new();
    if let Some(duplicate) = instance_ids.iter().find(|id| !seen.insert(id.as_str())) {
        return Err(ProviderError::new_with_context(
            Recovery::Unrecoverable,
            format!("Instance id '{}' was requested more than once", duplicate),
        ));
    }
    Ok(())
}

/// Finds the metadata of the cloud provider with `id`.
pub fn find_cloud_provider<'a>(
    metadata: &'a [CloudProviderMetadata],
    id: &str,
) -> ProviderResult<&'a CloudProviderMetadata> {
    metadata.iter().find(|m| m.id() == id).context(
        Recovery::Unrecoverable,
        format!("Unknown cloud provider '{}'", id),
    )
}

/// Finds the metadata of the resource provider with `id` within `cloud_provider`.
pub fn find_resource_provider<'a>(
    cloud_provider: &'a CloudProviderMetadata,
    id: &str,
) -> ProviderResult<&'a ResourceProviderMetadata> {
    cloud_provider.resource_provider(id).context(
        Recovery::Unrecoverable,
        format!(
            "Cloud provider '{}' has no resource provider '{}'",
            cloud_provider.id(),
            id
        ),
    )
}
