/*!

This library provides the data model of the provider service-provider-interface: the properties a
provider declares, the metadata it exposes, the templates and instances it works with, and the
validated settings (like proxy parameters) a provider consumes.

Two pieces of logic live here besides plain data:

- [`merge_properties`] combines property lists by key, later lists overriding earlier ones in
  place. Provider metadata uses it to lay a provider's own properties over the base properties
  of its resource type.
- [`ProxyParameters::new`] checks the dependencies between the optional proxy settings so that no
  inconsistent proxy configuration can be constructed.

!*/

#![deny(
    clippy::expect_used,
    clippy::get_unwrap,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::panicking_unwrap,
    clippy::unwrap_in_result,
    clippy::unwrap_used
)]

pub use condition::{Condition, ConditionAccumulator, Severity};
pub use configuration::{Configuration, SimpleConfiguration};
pub use error::{Error, Result};
pub use instance::{
    base_display_properties, Identifiable, Instance, InstanceDisplayToken, InstanceState,
    InstanceStatus, NetworkAddressable,
};
pub use merge::merge_properties;
pub use metadata::{
    CloudProviderDefinition, CloudProviderMetadata, ResourceProviderDefinition,
    ResourceProviderMetadata,
};
pub use property::{
    ConfigurationProperty, ConfigurationPropertyOptions, DisplayProperty, DisplayPropertyOptions,
    Property, PropertyType, Widget,
};
pub use proxy::{ProxyError, ProxyParameters};
pub use template::{
    base_template_properties, DatabaseServerTemplateToken, DatabaseType, InstanceTemplate,
    ResourceType, TemplateToken,
};
pub use token::{expand_tokens, PropertyToken};

mod condition;
mod configuration;
pub mod constants;
mod error;
mod instance;
mod merge;
mod metadata;
mod property;
mod proxy;
mod template;
mod token;
