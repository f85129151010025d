//! Base interface attributes.
//!
//! Every interface carries a description and shutdown state. Ethernet
//! interfaces also report sFlow and flow control.

use std::fmt;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{Entity, Setting, parent_pattern};
use crate::error::Result;
use crate::node::Node;
use crate::section;

static INTERFACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^interface (\S+)$").unwrap());
static DESCRIPTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s+description\s+(.+?)\s*$").unwrap());
static SHUTDOWN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s+shutdown\s*$").unwrap());
static NO_SFLOW_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s+no sflow( enable)?\s*$").unwrap());
static FLOWCONTROL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s+flowcontrol (send|receive) (\S+)\s*$").unwrap());

/// Flow control direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowcontrolDirection {
    Send,
    Receive,
}

impl FlowcontrolDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Send => "send",
            Self::Receive => "receive",
        }
    }
}

impl fmt::Display for FlowcontrolDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed interface attributes. Ethernet-only fields are `None` elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceConfig {
    pub name: String,
    pub description: Option<String>,
    pub shutdown: bool,
    pub sflow: Option<bool>,
    pub flowcontrol_send: Option<String>,
    pub flowcontrol_receive: Option<String>,
}

impl InterfaceConfig {
    /// Parse an `interface <name>` block.
    pub fn parse(name: &str, block: &str) -> Self {
        let mut config = Self {
            name: name.to_string(),
            description: DESCRIPTION_RE
                .captures(block)
                .map(|caps| caps[1].to_string()),
            shutdown: SHUTDOWN_RE.is_match(block),
            ..Self::default()
        };

        if is_ethernet(name) {
            config.sflow = Some(!NO_SFLOW_RE.is_match(block));
            for caps in FLOWCONTROL_RE.captures_iter(block) {
                let value = Some(caps[2].to_string());
                match &caps[1] {
                    "send" => config.flowcontrol_send = value,
                    _ => config.flowcontrol_receive = value,
                }
            }
        }
        config
    }
}

fn is_ethernet(name: &str) -> bool {
    name.starts_with("Ethernet") || (name.starts_with("Et") && name[2..].starts_with(char::is_numeric))
}

/// Interface API.
pub struct Interfaces<'a> {
    entity: Entity<'a>,
}

impl<'a> Interfaces<'a> {
    pub fn new(node: &'a mut Node) -> Self {
        Self {
            entity: Entity::new(node),
        }
    }

    pub async fn get(&mut self, name: &str) -> Result<Option<InterfaceConfig>> {
        let block = self.entity.get_block(&parent_pattern("interface", name)).await?;
        Ok(block.map(|block| InterfaceConfig::parse(name, &block)))
    }

    /// Every interface keyed by name, in config order.
    pub async fn get_all(&mut self) -> Result<IndexMap<String, InterfaceConfig>> {
        let config = self.entity.config().await?;
        let mut interfaces = IndexMap::new();
        for (caps, block) in section::blocks(config, &INTERFACE_RE) {
            let name = &caps[1];
            interfaces
                .entry(name.to_string())
                .or_insert_with(|| InterfaceConfig::parse(name, block));
        }
        Ok(interfaces)
    }

    /// Create a logical interface such as a loopback or SVI.
    pub async fn create(&mut self, name: &str) -> Result<bool> {
        self.entity.configure([format!("interface {name}")]).await
    }

    pub async fn delete(&mut self, name: &str) -> Result<bool> {
        self.entity.configure([format!("no interface {name}")]).await
    }

    pub async fn default(&mut self, name: &str) -> Result<bool> {
        self.entity.configure([format!("default interface {name}")]).await
    }

    pub async fn set_description(&mut self, name: &str, description: Setting<'_>) -> Result<bool> {
        self.entity
            .configure_interface(name, [description.command("description")])
            .await
    }

    /// Administratively disable (`true`) or enable (`false`) the interface.
    pub async fn set_shutdown(&mut self, name: &str, shutdown: bool) -> Result<bool> {
        let command = if shutdown { "shutdown" } else { "no shutdown" };
        self.entity.configure_interface(name, [command]).await
    }

    pub async fn set_sflow(&mut self, name: &str, enable: bool) -> Result<bool> {
        let command = if enable {
            Setting::Value("")
        } else {
            Setting::Disable
        };
        self.entity
            .configure_interface(name, [command.command("sflow enable")])
            .await
    }

    /// Set flow control, e.g. `Setting::Value("on")`.
    pub async fn set_flowcontrol(
        &mut self,
        name: &str,
        direction: FlowcontrolDirection,
        value: Setting<'_>,
    ) -> Result<bool> {
        let verb = format!("flowcontrol {direction}");
        self.entity
            .configure_interface(name, [value.command(&verb)])
            .await
    }
}
