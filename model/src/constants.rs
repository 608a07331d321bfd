/// The pattern every property key must match. Keys become configuration map keys and display
/// column identifiers in the host, so they are restricted to identifier-like strings.
pub const PROPERTY_KEY_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9_.-]*$";

/// The instance name prefix used when a template does not configure one.
pub const DEFAULT_INSTANCE_NAME_PREFIX: &str = "spi";

/// The port value of a proxy configuration with no host.
pub const NO_PROXY_PORT: i32 = -1;

/// The largest port number a proxy may listen on.
pub const MAX_PORT: i32 = 65535;

// Base template configuration keys
pub const INSTANCE_NAME_PREFIX: &str = "instanceNamePrefix";
pub const DATABASE_TYPE: &str = "type";
pub const DATABASE_ADMIN_USERNAME: &str = "adminUsername";
pub const DATABASE_ADMIN_PASSWORD: &str = "adminPassword";

// Base instance display keys
pub const INSTANCE_ID: &str = "instanceId";
pub const PRIVATE_IP_ADDRESS: &str = "privateIpAddress";
pub const PUBLIC_IP_ADDRESS: &str = "publicIpAddress";
