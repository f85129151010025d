//! Feature APIs over the running configuration.
//!
//! Each feature reads its state by scoping a regex parse to a block of the
//! running config and changes it by sending configuration batches through
//! the [`Node`]. Nothing here caches: every read goes through
//! [`Node::running_config`], so the node's cache discipline applies.
//!
//! Mutators return `Ok(true)` when a batch was applied and `Ok(false)` when
//! there was nothing to send. Device and transport errors propagate.

pub mod acl;
pub mod interfaces;
pub mod mlag;
pub mod ntp;
pub mod system;
pub mod vlans;

pub use acl::{AclAction, AclEntry, Acls, StandardAcl};
pub use interfaces::{FlowcontrolDirection, InterfaceConfig, Interfaces};
pub use mlag::{Mlag, MlagConfig, MlagGlobal};
pub use ntp::{Ntp, NtpConfig, NtpServer};
pub use system::{Banner, System, SystemConfig};
pub use vlans::{VlanConfig, Vlans};

use crate::connection::Command;
use crate::error::Result;
use crate::node::Node;
use crate::section;

/// A value to set, remove, or reset to the device default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting<'v> {
    /// `<verb> <value>`, or the bare verb when the value is empty.
    Value(&'v str),
    /// `no <verb>`
    Disable,
    /// `default <verb>`
    Default,
}

impl Setting<'_> {
    /// Render the configuration command for `verb`.
    pub fn command(self, verb: &str) -> String {
        match self {
            Setting::Value(value) => command_builder(verb, value, false, true),
            Setting::Disable => command_builder(verb, "", false, false),
            Setting::Default => command_builder(verb, "", true, true),
        }
    }
}

/// Build a configuration command.
///
/// `default` wins over everything, then a disabled command negates the
/// verb, then a non-empty value is appended.
///
/// ```
/// use eosapi::api::command_builder;
///
/// assert_eq!(command_builder("description", "", true, true), "default description");
/// assert_eq!(command_builder("description", "x", false, false), "no description");
/// assert_eq!(command_builder("description", "x", false, true), "description x");
/// assert_eq!(command_builder("shutdown", "", false, true), "shutdown");
/// ```
pub fn command_builder(verb: &str, value: &str, default: bool, enable: bool) -> String {
    if default {
        format!("default {verb}")
    } else if !enable {
        format!("no {verb}")
    } else if !value.is_empty() {
        format!("{verb} {value}")
    } else {
        verb.to_string()
    }
}

/// Shared plumbing for feature APIs bound to one node.
pub(crate) struct Entity<'a> {
    node: &'a mut Node,
}

impl<'a> Entity<'a> {
    pub(crate) fn new(node: &'a mut Node) -> Self {
        Self { node }
    }

    /// The running configuration, possibly from the node cache.
    pub(crate) async fn config(&mut self) -> Result<&str> {
        self.node.running_config().await
    }

    /// The block under `parent`, or `None` when no line matches.
    pub(crate) async fn get_block(&mut self, parent: &str) -> Result<Option<String>> {
        let config = self.node.running_config().await?;
        match section::section(config, parent) {
            Ok(block) => Ok(Some(block)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Send a configuration batch. An empty batch sends nothing.
    pub(crate) async fn configure<I>(&mut self, commands: I) -> Result<bool>
    where
        I: IntoIterator,
        I::Item: Into<Command>,
    {
        let commands: Vec<Command> = commands.into_iter().map(Into::into).collect();
        if commands.is_empty() {
            return Ok(false);
        }
        self.node.config(commands).await?;
        Ok(true)
    }

    /// Send a configuration batch under `interface <name>`.
    pub(crate) async fn configure_interface<I>(&mut self, name: &str, commands: I) -> Result<bool>
    where
        I: IntoIterator,
        I::Item: Into<Command>,
    {
        let commands: Vec<Command> = commands.into_iter().map(Into::into).collect();
        if commands.is_empty() {
            return Ok(false);
        }
        self.node.configure_interface(name, commands).await?;
        Ok(true)
    }
}

/// `^<prefix> <name>$` with `name` matched literally.
pub(crate) fn parent_pattern(prefix: &str, name: &str) -> String {
    format!("^{} {}$", prefix, regex::escape(name))
}
