//! MLAG domain settings and per-interface MLAG ids.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{Entity, Setting};
use crate::error::Result;
use crate::node::Node;
use crate::section;

static MLAG_CONFIG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^mlag configuration$").unwrap());
static DOMAIN_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s+domain-id\s+(.+?)\s*$").unwrap());
static LOCAL_INTERFACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s+local-interface\s+(\S+)\s*$").unwrap());
static PEER_ADDRESS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s+peer-address\s+(\S+)\s*$").unwrap());
static PEER_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s+peer-link\s+(\S+)\s*$").unwrap());
static SHUTDOWN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s+shutdown\s*$").unwrap());
static INTERFACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^interface (\S+)$").unwrap());
static MLAG_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s+mlag (\d+)\s*$").unwrap());

/// The `mlag configuration` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MlagGlobal {
    pub domain_id: Option<String>,
    pub local_interface: Option<String>,
    pub peer_address: Option<String>,
    pub peer_link: Option<String>,
    pub shutdown: bool,
}

impl MlagGlobal {
    pub fn parse(block: &str) -> Self {
        let first = |re: &Regex| re.captures(block).map(|caps| caps[1].to_string());
        Self {
            domain_id: first(&DOMAIN_ID_RE),
            local_interface: first(&LOCAL_INTERFACE_RE),
            peer_address: first(&PEER_ADDRESS_RE),
            peer_link: first(&PEER_LINK_RE),
            shutdown: SHUTDOWN_RE.is_match(block),
        }
    }
}

/// Global MLAG settings plus interface ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MlagConfig {
    pub config: MlagGlobal,
    /// MLAG id keyed by interface name.
    pub interfaces: IndexMap<String, u32>,
}

impl MlagConfig {
    /// Parse settings from a full running config.
    pub fn parse(config: &str) -> Self {
        let global = section::section_with(config, &MLAG_CONFIG_RE)
            .map(MlagGlobal::parse)
            .unwrap_or_default();

        let mut interfaces = IndexMap::new();
        for (caps, block) in section::blocks(config, &INTERFACE_RE) {
            if let Some(id) = MLAG_ID_RE
                .captures(block)
                .and_then(|caps| caps[1].parse::<u32>().ok())
            {
                interfaces.entry(caps[1].to_string()).or_insert(id);
            }
        }

        Self {
            config: global,
            interfaces,
        }
    }
}

/// MLAG API.
pub struct Mlag<'a> {
    entity: Entity<'a>,
}

impl<'a> Mlag<'a> {
    pub fn new(node: &'a mut Node) -> Self {
        Self {
            entity: Entity::new(node),
        }
    }

    pub async fn get(&mut self) -> Result<MlagConfig> {
        Ok(MlagConfig::parse(self.entity.config().await?))
    }

    pub async fn set_domain_id(&mut self, value: Setting<'_>) -> Result<bool> {
        self.configure_mlag(value.command("domain-id")).await
    }

    pub async fn set_local_interface(&mut self, value: Setting<'_>) -> Result<bool> {
        self.configure_mlag(value.command("local-interface")).await
    }

    pub async fn set_peer_address(&mut self, value: Setting<'_>) -> Result<bool> {
        self.configure_mlag(value.command("peer-address")).await
    }

    pub async fn set_peer_link(&mut self, value: Setting<'_>) -> Result<bool> {
        self.configure_mlag(value.command("peer-link")).await
    }

    pub async fn set_shutdown(&mut self, shutdown: bool) -> Result<bool> {
        let command = if shutdown { "shutdown" } else { "no shutdown" };
        self.configure_mlag(command.to_string()).await
    }

    /// Set the MLAG id on a port-channel.
    pub async fn set_mlag_id(&mut self, interface: &str, value: Setting<'_>) -> Result<bool> {
        self.entity
            .configure_interface(interface, [value.command("mlag")])
            .await
    }

    async fn configure_mlag(&mut self, command: String) -> Result<bool> {
        self.entity
            .configure(["mlag configuration".to_string(), command])
            .await
    }
}
