//! HTTP and HTTPS transport using reqwest.

use std::time::Duration;

use async_trait::async_trait;
use log::trace;
use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};

use super::config::TransportConfig;
use super::{Transport, check_status};
use crate::error::{ConnectionError, Result};

/// Transport for the `http`, `https` and `http_local` kinds.
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    username: String,
    password: SecretString,
    timeout: Duration,
}

impl HttpTransport {
    /// Build the reqwest client for a transport configuration.
    pub fn new(config: &TransportConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(!config.verify_certificate)
            .build()
            .map_err(ConnectionError::Http)?;

        Ok(Self {
            client,
            url: config.url(),
            username: config.username.clone(),
            password: config.password.clone(),
            timeout: config.timeout,
        })
    }

    /// Wrap a pre-built client, e.g. one with custom roots or proxies.
    pub fn with_client(client: reqwest::Client, config: &TransportConfig) -> Self {
        Self {
            client,
            url: config.url(),
            username: config.username.clone(),
            password: config.password.clone(),
            timeout: config.timeout,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, body: String) -> Result<String> {
        trace!("POST {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| self.map_error(e))?;
        check_status(status, text)
    }

    fn endpoint(&self) -> String {
        self.url.clone()
    }
}

impl HttpTransport {
    fn map_error(&self, err: reqwest::Error) -> ConnectionError {
        if err.is_timeout() {
            ConnectionError::Timeout(self.timeout)
        } else {
            ConnectionError::Http(err)
        }
    }
}
