/*!

HTTP proxy settings for providers that reach their cloud's API through a proxy. The fields depend
on one another (credentials need a host, NTLM domain/workstation need credentials), so
`ProxyParameters` can only be obtained through a constructor that checks the whole chain. An
instance that exists is always consistent.

!*/

use crate::constants::{MAX_PORT, NO_PROXY_PORT};
use serde::{Deserialize, Serialize};
use snafu::{ensure, Snafu};
use std::convert::TryFrom;
use std::fmt::{Display, Formatter};

/// The rule that a set of proxy parameters violated.
#[derive(Debug, Clone, Eq, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ProxyError {
    #[snafu(display("Proxy port {} is out of range, it must be between 1 and {}", port, MAX_PORT))]
    InvalidPort { port: i32 },

    #[snafu(display("Proxy password is required when a proxy username is set"))]
    UsernameWithoutPassword,

    #[snafu(display("Proxy username is required when a proxy password is set"))]
    PasswordWithoutUsername,

    #[snafu(display("Proxy host/port required when proxy username/password are set"))]
    CredentialsWithoutHost,

    #[snafu(display("Proxy workstation is required when a proxy domain is set"))]
    DomainWithoutWorkstation,

    #[snafu(display("Proxy domain is required when a proxy workstation is set"))]
    WorkstationWithoutDomain,

    #[snafu(display("Proxy username/password required when proxy domain/workstation are set"))]
    NtlmWithoutCredentials,
}

/// A validated, immutable set of HTTP proxy settings.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
#[serde(rename_all = "camelCase", try_from = "UncheckedProxyParameters")]
pub struct ProxyParameters {
    host: Option<String>,
    port: i32,
    username: Option<String>,
    password: Option<String>,
    domain: Option<String>,
    workstation: Option<String>,
    preemptive_auth: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UncheckedProxyParameters {
    host: Option<String>,
    #[serde(default = "no_proxy_port")]
    port: i32,
    username: Option<String>,
    password: Option<String>,
    domain: Option<String>,
    workstation: Option<String>,
    #[serde(default)]
    preemptive_auth: bool,
}

fn no_proxy_port() -> i32 {
    NO_PROXY_PORT
}

impl TryFrom<UncheckedProxyParameters> for ProxyParameters {
    type Error = ProxyError;

    fn try_from(value: UncheckedProxyParameters) -> Result<Self, ProxyError> {
        Self::new(
            value.host,
            value.port,
            value.username,
            value.password,
            value.domain,
            value.workstation,
            value.preemptive_auth,
        )
    }
}

impl Default for ProxyParameters {
    /// No proxy at all.
    fn default() -> Self {
        Self {
            host: None,
            port: NO_PROXY_PORT,
            username: None,
            password: None,
            domain: None,
            workstation: None,
            preemptive_auth: false,
        }
    }
}

impl ProxyParameters {
    /// Validates and assembles proxy parameters. The rules are checked in this order and the
    /// first one that fails is returned:
    ///
    /// 1. with a `host`, `port` must be a valid port number (`port` is ignored without a host)
    /// 2. `username` and `password` are both set or both unset
    /// 3. `username`/`password` need a `host`
    /// 4. `domain` and `workstation` are both set or both unset
    /// 5. `domain`/`workstation` need `username`/`password`
    pub fn new(
        host: Option<String>,
        port: i32,
        username: Option<String>,
        password: Option<String>,
        domain: Option<String>,
        workstation: Option<String>,
        preemptive_auth: bool,
    ) -> Result<Self, ProxyError> {
        if host.is_some() {
            ensure!(port > 0 && port <= MAX_PORT, InvalidPortSnafu { port });
        }
        ensure!(
            username.is_some() || password.is_none(),
            PasswordWithoutUsernameSnafu
        );
        ensure!(
            password.is_some() || username.is_none(),
            UsernameWithoutPasswordSnafu
        );
        ensure!(
            username.is_none() || host.is_some(),
            CredentialsWithoutHostSnafu
        );
        ensure!(
            domain.is_some() || workstation.is_none(),
            WorkstationWithoutDomainSnafu
        );
        ensure!(
            workstation.is_some() || domain.is_none(),
            DomainWithoutWorkstationSnafu
        );
        ensure!(
            domain.is_none() || username.is_some(),
            NtlmWithoutCredentialsSnafu
        );
        Ok(Self {
            host,
            port,
            username,
            password,
            domain,
            workstation,
            preemptive_auth,
        })
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// The port exactly as it was given, which is only meaningful when `host` is set.
    pub fn port(&self) -> i32 {
        self.port
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn workstation(&self) -> Option<&str> {
        self.workstation.as_deref()
    }

    /// Whether the client should send credentials before the proxy asks for them.
    pub fn preemptive_auth(&self) -> bool {
        self.preemptive_auth
    }

    pub fn is_configured(&self) -> bool {
        self.host.is_some()
    }

    pub fn has_credentials(&self) -> bool {
        self.username.is_some()
    }

    pub fn has_ntlm_credentials(&self) -> bool {
        self.domain.is_some()
    }

    /// The port as a socket port, `None` when no proxy host is configured.
    pub fn socket_port(&self) -> Option<u16> {
        self.host.as_ref().and_then(|_| u16::try_from(self.port).ok())
    }
}

impl Display for ProxyParameters {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let host = match &self.host {
            None => return write!(f, "no proxy"),
            Some(host) => host,
        };
        if let Some(username) = &self.username {
            write!(f, "{}:****@", username)?;
        }
        write!(f, "{}:{}", host, self.port)?;
        if let (Some(domain), Some(workstation)) = (&self.domain, &self.workstation) {
            write!(f, " (ntlm {}\\{})", domain, workstation)?;
        }
        if self.preemptive_auth {
            write!(f, " preemptive")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn accepts_full_set() {
        let proxy =
            ProxyParameters::new(some("h"), 2, some("u"), some("p"), some("d"), some("w"), false)
                .unwrap();
        assert_eq!(proxy.host(), Some("h"));
        assert_eq!(proxy.port(), 2);
        assert_eq!(proxy.username(), Some("u"));
        assert_eq!(proxy.password(), Some("p"));
        assert_eq!(proxy.domain(), Some("d"));
        assert_eq!(proxy.workstation(), Some("w"));
        assert!(!proxy.preemptive_auth());
        assert!(proxy.has_ntlm_credentials());
        assert_eq!(proxy.socket_port(), Some(2));
    }

    #[test]
    fn accepts_empty_set() {
        let proxy = ProxyParameters::new(None, -1, None, None, None, None, false).unwrap();
        assert_eq!(proxy, ProxyParameters::default());
        assert!(!proxy.is_configured());
        assert_eq!(proxy.port(), -1);
        assert_eq!(proxy.socket_port(), None);
        assert_eq!(proxy.to_string(), "no proxy");
    }

    #[test]
    fn accepts_host_only() {
        let proxy = ProxyParameters::new(some("proxy"), 3128, None, None, None, None, true).unwrap();
        assert!(proxy.is_configured());
        assert!(!proxy.has_credentials());
        assert_eq!(proxy.to_string(), "proxy:3128 preemptive");
    }

    #[test]
    fn rejects_invalid_combinations() {
        let cases = vec![
            (
                (some("h"), -1, some("u"), some("p"), some("d"), some("w")),
                ProxyError::InvalidPort { port: -1 },
            ),
            (
                (some("h"), 1234, None, some("p"), some("d"), some("w")),
                ProxyError::PasswordWithoutUsername,
            ),
            (
                (some("h"), 1234, some("u"), None, some("d"), some("w")),
                ProxyError::UsernameWithoutPassword,
            ),
            (
                (some("h"), 1234, some("u"), some("p"), None, some("w")),
                ProxyError::WorkstationWithoutDomain,
            ),
            (
                (some("h"), 1234, some("u"), some("p"), some("d"), None),
                ProxyError::DomainWithoutWorkstation,
            ),
            (
                (None, 1234, some("u"), some("p"), some("d"), some("w")),
                ProxyError::CredentialsWithoutHost,
            ),
            (
                (some("h"), 1234, None, None, some("d"), some("w")),
                ProxyError::NtlmWithoutCredentials,
            ),
            (
                (some("h"), 65536, None, None, None, None),
                ProxyError::InvalidPort { port: 65536 },
            ),
            (
                (some("h"), 0, None, None, None, None),
                ProxyError::InvalidPort { port: 0 },
            ),
        ];
        for ((host, port, username, password, domain, workstation), expected) in cases {
            let error =
                ProxyParameters::new(host, port, username, password, domain, workstation, false)
                    .unwrap_err();
            assert_eq!(error, expected);
        }
    }

    #[test]
    fn port_bounds() {
        assert!(ProxyParameters::new(some("h"), 1, None, None, None, None, false).is_ok());
        assert!(ProxyParameters::new(some("h"), 65535, None, None, None, None, false).is_ok());
        // Without a host the port is not looked at.
        assert!(ProxyParameters::new(None, 70000, None, None, None, None, false).is_ok());
    }

    #[test]
    fn error_names_rule() {
        let error = ProxyParameters::new(None, 1234, some("u"), some("p"), None, None, false)
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "Proxy host/port required when proxy username/password are set"
        );
    }

    #[test]
    fn display_hides_password() {
        let proxy = ProxyParameters::new(
            some("proxy"),
            8080,
            some("admin"),
            some("hunter2"),
            some("corp"),
            some("ws1"),
            false,
        )
        .unwrap();
        let shown = proxy.to_string();
        assert!(!shown.contains("hunter2"));
        assert_eq!(shown, "admin:****@proxy:8080 (ntlm corp\\ws1)");
    }

    #[test]
    fn deserialize_validates() {
        let proxy: ProxyParameters = serde_json::from_value(json!({
            "host": "proxy",
            "port": 8080,
            "username": "u",
            "password": "p",
            "preemptiveAuth": true
        }))
        .unwrap();
        assert!(proxy.preemptive_auth());
        assert_eq!(proxy.username(), Some("u"));

        let empty: ProxyParameters = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty, ProxyParameters::default());

        let result = serde_json::from_value::<ProxyParameters>(json!({
            "port": 8080,
            "username": "u",
            "password": "p"
        }));
        assert!(result.is_err());
    }
}
