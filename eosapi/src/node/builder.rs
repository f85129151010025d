//! Builder for creating nodes.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use super::Node;
use crate::connection::{Connection, Encoding};
use crate::error::Result;
use crate::transport::{TransportConfig, TransportKind};

/// Builder for constructing a [`Node`].
///
/// # Example
///
/// ```rust,no_run
/// use eosapi::{NodeBuilder, TransportKind};
///
/// # fn example() -> Result<(), eosapi::Error> {
/// let node = NodeBuilder::new("192.168.1.1")
///     .transport(TransportKind::Https)
///     .username("admin")
///     .password("secret")
///     .danger_disable_certificate_verification()
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct NodeBuilder {
    config: TransportConfig,
    enable_password: Option<SecretString>,
    autorefresh: bool,
    encoding: Encoding,
}

impl NodeBuilder {
    /// Create a new builder for the specified host over `https`.
    pub fn new(host: impl Into<String>) -> Self {
        Self::from_config(TransportConfig::new(TransportKind::Https, host))
    }

    /// Start from an existing transport configuration.
    pub fn from_config(config: TransportConfig) -> Self {
        Self {
            config,
            enable_password: None,
            autorefresh: true,
            encoding: Encoding::Json,
        }
    }

    /// Set the transport kind (default: https).
    pub fn transport(mut self, kind: TransportKind) -> Self {
        self.config.kind = kind;
        self
    }

    /// Set the TCP port (default: derived from the transport).
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = Some(port);
        self
    }

    /// Set the username for HTTP Basic authentication.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.config.username = username.into();
        self
    }

    /// Set the password for HTTP Basic authentication.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = SecretString::from(password.into());
        self
    }

    /// Set the password sent with `enable`.
    pub fn enable_password(mut self, password: impl Into<String>) -> Self {
        self.enable_password = Some(SecretString::from(password.into()));
        self
    }

    /// Set the per-request timeout (default: 60s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Accept any TLS certificate. For testing and lab use only.
    pub fn danger_disable_certificate_verification(mut self) -> Self {
        self.config.verify_certificate = false;
        self
    }

    /// Set the UNIX socket path used by the `socket` transport.
    pub fn socket_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.socket_path = path.into();
        self
    }

    /// Drop cached configs after configuration changes (default: true).
    pub fn autorefresh(mut self, autorefresh: bool) -> Self {
        self.autorefresh = autorefresh;
        self
    }

    /// Default encoding for `enable` (default: json).
    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// The transport configuration built so far.
    pub fn transport_config(&self) -> &TransportConfig {
        &self.config
    }

    /// Build the node.
    ///
    /// This does not contact the device; the first command does.
    pub fn build(self) -> Result<Node> {
        let connection = Connection::new(&self.config)?;
        let mut node = Node::new(connection);
        node.set_enable_password(self.enable_password);
        node.set_autorefresh(self.autorefresh);
        node.set_encoding(self.encoding);
        Ok(node)
    }
}
