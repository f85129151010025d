//! NTP source interface and servers.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Entity, Setting};
use crate::error::Result;
use crate::node::Node;

static SOURCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^ntp (?:source|local-interface) (\S+)\s*$").unwrap());
static SERVER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^ntp server (?:vrf (\S+) )?(\S+)(.*)$").unwrap()
});

/// One `ntp server` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NtpServer {
    pub address: String,
    pub vrf: Option<String>,
    pub prefer: bool,
}

/// Parsed NTP settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NtpConfig {
    pub source_interface: Option<String>,
    pub servers: Vec<NtpServer>,
}

impl NtpConfig {
    /// Parse settings from a full running config.
    pub fn parse(config: &str) -> Self {
        Self {
            source_interface: SOURCE_RE.captures(config).map(|caps| caps[1].to_string()),
            servers: SERVER_RE
                .captures_iter(config)
                .map(|caps| NtpServer {
                    address: caps[2].to_string(),
                    vrf: caps.get(1).map(|m| m.as_str().to_string()),
                    prefer: caps[3].split_whitespace().any(|w| w == "prefer"),
                })
                .collect(),
        }
    }
}

/// NTP API.
pub struct Ntp<'a> {
    entity: Entity<'a>,
}

impl<'a> Ntp<'a> {
    pub fn new(node: &'a mut Node) -> Self {
        Self {
            entity: Entity::new(node),
        }
    }

    pub async fn get(&mut self) -> Result<NtpConfig> {
        Ok(NtpConfig::parse(self.entity.config().await?))
    }

    pub async fn set_source_interface(&mut self, interface: Setting<'_>) -> Result<bool> {
        self.entity.configure([interface.command("ntp source")]).await
    }

    pub async fn add_server(&mut self, address: &str, prefer: bool) -> Result<bool> {
        let mut command = format!("ntp server {address}");
        if prefer {
            command.push_str(" prefer");
        }
        self.entity.configure([command]).await
    }

    pub async fn remove_server(&mut self, address: &str) -> Result<bool> {
        self.entity.configure([format!("no ntp server {address}")]).await
    }

    /// Remove every configured server. Returns `Ok(false)` when there are none.
    pub async fn remove_all_servers(&mut self) -> Result<bool> {
        let servers = self.get().await?.servers;
        let commands = servers.iter().map(|server| match &server.vrf {
            Some(vrf) => format!("no ntp server vrf {} {}", vrf, server.address),
            None => format!("no ntp server {}", server.address),
        });
        self.entity.configure(commands.collect::<Vec<_>>()).await
    }
}
