/*!

The `spi-provider` library defines the contract between an orchestration host and the plugins
that provide cloud resources to it. A plugin implements [`Launcher`], which creates
[`CloudProvider`]s, which in turn create [`ResourceProvider`]s for compute instances or database
server instances. Everything the host needs to know to configure these objects is described by the
metadata types re-exported from `spi-model`.

!*/

pub mod error;
pub mod provider;

pub use provider::{
    check_allocation, find_cloud_provider, find_resource_provider, validate_configuration,
    CloudProvider, Launcher, ProviderError, ProviderResult, Recovery, ResourceProvider,
};
pub use spi_model::{
    CloudProviderMetadata, Configuration, Instance, InstanceState, InstanceStatus,
    InstanceTemplate, ResourceProviderMetadata, ResourceType, SimpleConfiguration,
};
