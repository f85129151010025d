//! Wire transports for the eAPI JSON-RPC endpoint.
//!
//! A transport moves one serialized request body to the device and returns
//! the raw response body. Envelope handling lives in [`crate::connection`].

pub mod config;
mod http;
#[cfg(unix)]
mod socket;

pub use config::{TransportConfig, TransportKind};
pub use http::HttpTransport;
#[cfg(unix)]
pub use socket::SocketTransport;

use async_trait::async_trait;

use crate::error::{ConnectionError, Result};

/// Trait for request/response transports.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a JSON body to the command API and return the response body.
    async fn send(&self, body: String) -> Result<String>;

    /// Human readable endpoint description, used in logs.
    fn endpoint(&self) -> String;
}

/// Build the transport described by `config`.
pub fn from_config(config: &TransportConfig) -> Result<Box<dyn Transport>> {
    match config.kind {
        TransportKind::Http | TransportKind::Https | TransportKind::HttpLocal => {
            Ok(Box::new(HttpTransport::new(config)?))
        }
        #[cfg(unix)]
        TransportKind::Socket => Ok(Box::new(SocketTransport::new(config))),
        #[cfg(not(unix))]
        TransportKind::Socket => Err(ConnectionError::InvalidResponse {
            message: "socket transport requires a UNIX platform".to_string(),
        }
        .into()),
    }
}

/// Turn an HTTP status and body into a transport result.
pub(crate) fn check_status(status: u16, body: String) -> Result<String> {
    if (200..300).contains(&status) {
        Ok(body)
    } else {
        Err(ConnectionError::HttpStatus { status, body }.into())
    }
}
