/*!

The resources that providers create. Compute instances and database server instances share one
`Instance` struct; what sets them apart is their `resource_type`. Code that only needs part of an
instance's capabilities can be written against the [`Identifiable`] and [`NetworkAddressable`]
traits.

!*/

use crate::configuration::Configuration;
use crate::constants::{INSTANCE_ID, PRIVATE_IP_ADDRESS, PUBLIC_IP_ADDRESS};
use crate::error::{self, Result};
use crate::property::{DisplayProperty, DisplayPropertyOptions, Property};
use crate::template::{InstanceTemplate, ResourceType};
use crate::token::{expand_tokens, PropertyToken};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_plain::{derive_display_from_serialize, derive_fromstr_from_deserialize};
use snafu::ensure;
use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::net::{IpAddr, SocketAddr};

/// Something with a provider-assigned identity.
pub trait Identifiable {
    fn id(&self) -> &str;
    fn resource_type(&self) -> ResourceType;
}

/// Something that can be reached over the network.
pub trait NetworkAddressable {
    fn private_ip_address(&self) -> Option<IpAddr>;
    fn public_ip_address(&self) -> Option<IpAddr>;
    fn port(&self) -> Option<u16>;

    /// The private address and port together, when both are known.
    fn socket_address(&self) -> Option<SocketAddr> {
        match (self.private_ip_address(), self.port()) {
            (Some(ip), Some(port)) => Some(SocketAddr::new(ip, port)),
            _ => None,
        }
    }
}

/// Display properties every instance has.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum InstanceDisplayToken {
    InstanceId,
    PrivateIpAddress,
    PublicIpAddress,
}

impl InstanceDisplayToken {
    pub const ALL: [InstanceDisplayToken; 3] = [
        InstanceDisplayToken::InstanceId,
        InstanceDisplayToken::PrivateIpAddress,
        InstanceDisplayToken::PublicIpAddress,
    ];
}

impl PropertyToken for InstanceDisplayToken {
    type Property = DisplayProperty;

    fn property(&self) -> DisplayProperty {
        let (key, name) = match self {
            InstanceDisplayToken::InstanceId => (INSTANCE_ID, "Instance ID"),
            InstanceDisplayToken::PrivateIpAddress => (PRIVATE_IP_ADDRESS, "Private IP address"),
            InstanceDisplayToken::PublicIpAddress => (PUBLIC_IP_ADDRESS, "Public IP address"),
        };
        DisplayProperty::unchecked(
            key,
            DisplayPropertyOptions {
                name: name.to_string(),
                ..Default::default()
            },
        )
    }
}

pub fn base_display_properties() -> Vec<DisplayProperty> {
    expand_tokens(InstanceDisplayToken::ALL)
}

/// A compute instance or database server instance as reported by a provider.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase", try_from = "UncheckedInstance")]
pub struct Instance {
    id: String,
    template_name: String,
    resource_type: ResourceType,
    private_ip_address: Option<IpAddr>,
    public_ip_address: Option<IpAddr>,
    port: Option<u16>,
    /// Provider-specific information, opaque to the host.
    details: Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UncheckedInstance {
    id: String,
    template_name: String,
    resource_type: ResourceType,
    private_ip_address: Option<IpAddr>,
    public_ip_address: Option<IpAddr>,
    port: Option<u16>,
    #[serde(default)]
    details: Map<String, Value>,
}

impl TryFrom<UncheckedInstance> for Instance {
    type Error = crate::Error;

    fn try_from(value: UncheckedInstance) -> Result<Self> {
        ensure!(
            !value.template_name.trim().is_empty(),
            error::MissingIdSnafu { what: "template" }
        );
        let instance = Self::from_parts(value.id, value.template_name, value.resource_type)?;
        Ok(Self {
            private_ip_address: value.private_ip_address,
            public_ip_address: value.public_ip_address,
            port: value.port,
            details: value.details,
            ..instance
        })
    }
}

impl Instance {
    /// Creates an instance with the given id from `template`, with no addresses or details yet.
    pub fn new<S>(template: &InstanceTemplate, id: S) -> Result<Self>
    where
        S: Into<String>,
    {
        Self::from_parts(
            id.into(),
            template.name().to_string(),
            template.resource_type(),
        )
    }

    fn from_parts(id: String, template_name: String, resource_type: ResourceType) -> Result<Self> {
        ensure!(
            !id.trim().is_empty(),
            error::MissingIdSnafu { what: "instance" }
        );
        Ok(Self {
            id,
            template_name,
            resource_type,
            private_ip_address: None,
            public_ip_address: None,
            port: None,
            details: Map::new(),
        })
    }

    pub fn with_private_ip_address(self, address: IpAddr) -> Self {
        Self {
            private_ip_address: Some(address),
            ..self
        }
    }

    pub fn with_public_ip_address(self, address: IpAddr) -> Self {
        Self {
            public_ip_address: Some(address),
            ..self
        }
    }

    pub fn with_port(self, port: u16) -> Self {
        Self {
            port: Some(port),
            ..self
        }
    }

    /// Attaches provider-specific details, replacing any previous details.
    pub fn with_details<C>(self, details: C) -> Result<Self>
    where
        C: Configuration,
    {
        Ok(Self {
            details: details.into_map()?,
            ..self
        })
    }

    pub fn template_name(&self) -> &str {
        &self.template_name
    }

    /// The provider-specific details as `C`. An instance without details yields `C::default()`.
    pub fn details<C>(&self) -> Result<C>
    where
        C: Configuration,
    {
        if self.details.is_empty() {
            return Ok(C::default());
        }
        C::from_map(self.details.clone())
    }

    pub fn raw_details(&self) -> &Map<String, Value> {
        &self.details
    }

    /// The values of the base instance display properties. Absent values are left out.
    pub fn display_values(&self) -> BTreeMap<String, String> {
        let mut values = BTreeMap::new();
        for token in InstanceDisplayToken::ALL {
            let value = match token {
                InstanceDisplayToken::InstanceId => Some(self.id.clone()),
                InstanceDisplayToken::PrivateIpAddress => {
                    self.private_ip_address.map(|ip| ip.to_string())
                }
                InstanceDisplayToken::PublicIpAddress => {
                    self.public_ip_address.map(|ip| ip.to_string())
                }
            };
            if let Some(value) = value {
                values.insert(token.property().key().to_string(), value);
            }
        }
        values
    }
}

impl Identifiable for Instance {
    fn id(&self) -> &str {
        &self.id
    }

    fn resource_type(&self) -> ResourceType {
        self.resource_type
    }
}

impl NetworkAddressable for Instance {
    fn private_ip_address(&self) -> Option<IpAddr> {
        self.private_ip_address
    }

    fn public_ip_address(&self) -> Option<IpAddr> {
        self.public_ip_address
    }

    fn port(&self) -> Option<u16> {
        self.port
    }
}

/// The lifecycle status of an instance as last observed by its provider.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone, Copy, Hash)]
#[serde(rename_all = "camelCase")]
pub enum InstanceStatus {
    Pending,
    Running,
    Stopping,
    Stopped,
    Deleting,
    Deleted,
    Failed,
    Unknown,
}

impl Default for InstanceStatus {
    fn default() -> Self {
        Self::Unknown
    }
}

derive_display_from_serialize!(InstanceStatus);
derive_fromstr_from_deserialize!(InstanceStatus, |e| -> crate::Error {
    crate::Error::SerdePlain { source: e }
});

impl InstanceStatus {
    /// Whether the instance can no longer change status by itself.
    pub fn is_terminal(&self) -> bool {
        matches!(self, InstanceStatus::Deleted | InstanceStatus::Failed)
    }
}

#[derive(Serialize, Deserialize, Debug, Default, Eq, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InstanceState {
    pub status: InstanceStatus,
    /// A provider message explaining the status, e.g. a cloud API's state reason.
    pub message: Option<String>,
}

impl InstanceState {
    pub fn new(status: InstanceStatus) -> Self {
        Self {
            status,
            message: None,
        }
    }

    pub fn with_message<S>(status: InstanceStatus, message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            status,
            message: Some(message.into()),
        }
    }
}
