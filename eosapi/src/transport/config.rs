//! eAPI transport configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default path of the on-box eAPI UNIX socket.
pub const DEFAULT_SOCKET_PATH: &str = "/var/run/command-api.sock";

/// URL path of the JSON-RPC endpoint.
pub const COMMAND_API_PATH: &str = "/command-api";

/// Which wire transport a connection uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TransportKind {
    /// Plain HTTP.
    Http,

    /// HTTP over TLS. This is the default.
    #[default]
    Https,

    /// Plain HTTP to the on-box loopback listener.
    HttpLocal,

    /// HTTP over the on-box UNIX domain socket.
    Socket,
}

impl TransportKind {
    /// The default TCP port, if the transport uses TCP.
    pub fn default_port(self) -> Option<u16> {
        match self {
            Self::Http => Some(80),
            Self::Https => Some(443),
            Self::HttpLocal => Some(8080),
            Self::Socket => None,
        }
    }

    /// The URL scheme used by TCP transports.
    pub fn scheme(self) -> &'static str {
        match self {
            Self::Https => "https",
            Self::Http | Self::HttpLocal | Self::Socket => "http",
        }
    }

    /// Name as written in profile files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
            Self::HttpLocal => "http_local",
            Self::Socket => "socket",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            "http_local" => Ok(Self::HttpLocal),
            "socket" => Ok(Self::Socket),
            other => Err(ConfigError::InvalidValue {
                section: String::new(),
                key: "transport".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Everything a transport needs to reach the command API.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Transport kind.
    pub kind: TransportKind,

    /// Target host (hostname or IP address).
    pub host: String,

    /// TCP port. `None` means the transport default.
    pub port: Option<u16>,

    /// Username for HTTP Basic authentication.
    pub username: String,

    /// Password for HTTP Basic authentication.
    pub password: SecretString,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Verify the device certificate on `https`. Disable for lab use only.
    pub verify_certificate: bool,

    /// UNIX socket path for the `socket` transport.
    pub socket_path: PathBuf,
}

impl TransportConfig {
    /// Create a configuration for a host with transport defaults.
    pub fn new(kind: TransportKind, host: impl Into<String>) -> Self {
        Self {
            kind,
            host: host.into(),
            port: None,
            username: String::new(),
            password: SecretString::from(String::new()),
            timeout: Duration::from_secs(60),
            verify_certificate: true,
            socket_path: PathBuf::from(DEFAULT_SOCKET_PATH),
        }
    }

    /// The effective TCP port.
    pub fn port(&self) -> Option<u16> {
        self.port.or_else(|| self.kind.default_port())
    }

    /// The full endpoint URL for TCP transports.
    pub fn url(&self) -> String {
        let host = match self.kind {
            TransportKind::HttpLocal => "127.0.0.1",
            _ => self.host.as_str(),
        };
        match self.port() {
            Some(port) => format!(
                "{}://{}:{}{}",
                self.kind.scheme(),
                host,
                port,
                COMMAND_API_PATH
            ),
            None => format!("{}://{}{}", self.kind.scheme(), host, COMMAND_API_PATH),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_from_str() {
        assert_eq!("http".parse::<TransportKind>().unwrap(), TransportKind::Http);
        assert_eq!("HTTPS".parse::<TransportKind>().unwrap(), TransportKind::Https);
        assert_eq!(
            "http_local".parse::<TransportKind>().unwrap(),
            TransportKind::HttpLocal
        );
        assert_eq!("socket".parse::<TransportKind>().unwrap(), TransportKind::Socket);
        assert!("telnet".parse::<TransportKind>().is_err());
    }

    #[test]
    fn test_default_ports() {
        assert_eq!(TransportKind::Http.default_port(), Some(80));
        assert_eq!(TransportKind::Https.default_port(), Some(443));
        assert_eq!(TransportKind::HttpLocal.default_port(), Some(8080));
        assert_eq!(TransportKind::Socket.default_port(), None);
    }

    #[test]
    fn test_url() {
        let config = TransportConfig::new(TransportKind::Https, "sw1");
        assert_eq!(config.url(), "https://sw1:443/command-api");

        let mut config = TransportConfig::new(TransportKind::Http, "10.0.0.1");
        config.port = Some(8081);
        assert_eq!(config.url(), "http://10.0.0.1:8081/command-api");

        let config = TransportConfig::new(TransportKind::HttpLocal, "ignored");
        assert_eq!(config.url(), "http://127.0.0.1:8080/command-api");
    }
}
