//! Batch builder for typed command objects.
//!
//! A [`Handle`] collects command objects, sends them in one `enable`
//! prefixed round-trip, and hands each object its own result. The handle
//! mutably borrows both the node and every command object, so results can
//! be read from the objects once the handle is gone.
//!
//! # Example
//!
//! ```rust,no_run
//! use eosapi::{Encoding, NodeBuilder};
//! use eosapi::show::{ShowHostname, ShowVersion};
//!
//! # async fn example() -> Result<(), eosapi::Error> {
//! let mut node = NodeBuilder::new("sw1").username("admin").password("pw").build()?;
//!
//! let mut version = ShowVersion::default();
//! let mut hostname = ShowHostname::default();
//!
//! let mut handle = node.get_handle(Encoding::Json);
//! handle.add_command(&mut version)?;
//! handle.add_command(&mut hostname)?;
//! handle.call().await?;
//! handle.close();
//!
//! println!("{} runs {}", hostname.hostname, version.version);
//! # Ok(())
//! # }
//! ```

mod command;

pub use command::{EapiCommand, JsonCommand, RawCommand, ShowCommand, decode_show, decode_value};

use log::debug;
use serde_json::Value;

use crate::connection::{Command, Encoding, ExecuteOptions};
use crate::error::{CommandError, Error, Result};
use crate::node::Node;

/// An open batch of command objects awaiting a single round-trip.
pub struct Handle<'n, 'c> {
    node: &'n mut Node,
    commands: Vec<&'c mut dyn EapiCommand>,
    encoding: Encoding,
    options: ExecuteOptions,
    closed: bool,
    results: Vec<Value>,
    last_error: Option<CommandError>,
}

impl<'n, 'c> Handle<'n, 'c> {
    /// Open a handle on `node` with the given result encoding.
    pub fn new(node: &'n mut Node, encoding: Encoding) -> Self {
        Self {
            node,
            commands: Vec::new(),
            encoding,
            options: ExecuteOptions::default(),
            closed: false,
            results: Vec::new(),
            last_error: None,
        }
    }

    /// Let the device expand abbreviated commands.
    pub fn set_auto_complete(&mut self, enabled: bool) {
        self.options.auto_complete = Some(enabled);
    }

    /// Let the device expand CLI aliases.
    pub fn set_expand_aliases(&mut self, enabled: bool) {
        self.options.expand_aliases = Some(enabled);
    }

    /// Ask for per-command timestamps.
    pub fn set_timestamps(&mut self, enabled: bool) {
        self.options.timestamps = Some(enabled);
    }

    /// The encoding results are requested in.
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Number of command objects waiting for the next call.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Append a command object to the batch.
    pub fn add_command(&mut self, command: &'c mut dyn EapiCommand) -> Result<()> {
        self.ensure_open()?;
        self.commands.push(command);
        Ok(())
    }

    /// Run a single command object on its own.
    ///
    /// Fails with a usage error while other commands are pending; use
    /// [`call`](Self::call) to send those.
    pub async fn enable(&mut self, command: &'c mut dyn EapiCommand) -> Result<()> {
        if !self.commands.is_empty() {
            return Err(Error::usage(format!(
                "handle has {} pending commands, call them before enable",
                self.commands.len()
            )));
        }
        self.add_command(command)?;
        self.call().await
    }

    /// Send the batch and decode each result into its command object.
    ///
    /// Commands go out in insertion order behind an `enable` prelude. The
    /// batch is emptied afterwards, whether or not the call succeeded.
    pub async fn call(&mut self) -> Result<()> {
        self.ensure_open()?;
        if self.commands.is_empty() {
            return Err(Error::usage("handle has no commands to call"));
        }

        let batch: Vec<Command> = self
            .commands
            .iter()
            .map(|c| Command::from(c.command()))
            .collect();
        debug!("handle call: {} commands", batch.len());

        let outcome = self
            .node
            .execute_enabled(&batch, self.encoding, self.options)
            .await;
        let commands = std::mem::take(&mut self.commands);

        let results = match outcome {
            Ok(results) => results,
            Err(err) => {
                if let Some(cmd_err) = err.as_command_error() {
                    self.results = cmd_err.output.clone();
                    self.last_error = Some(cmd_err.clone());
                }
                return Err(err);
            }
        };

        self.last_error = None;
        self.results = results;
        for (command, result) in commands.into_iter().zip(self.results.iter().skip(1)) {
            command.decode(result.clone())?;
        }
        Ok(())
    }

    /// Raw results of the last call, `enable` prelude included.
    pub fn results(&self) -> &[Value] {
        &self.results
    }

    /// The command error from the last call, if it failed on the device.
    pub fn last_error(&self) -> Option<&CommandError> {
        self.last_error.as_ref()
    }

    /// Close the handle. Every later operation fails with a state error.
    pub fn close(&mut self) {
        self.closed = true;
        self.commands.clear();
        self.results.clear();
        self.last_error = None;
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(Error::state("handle is closed"))
        } else {
            Ok(())
        }
    }
}

impl Node {
    /// Run one typed show command and return its decoded shape.
    pub async fn show<T: ShowCommand>(&mut self) -> Result<T> {
        let mut value = T::default();
        let mut handle = Handle::new(self, Encoding::Json);
        handle.enable(&mut value).await?;
        drop(handle);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Connection;
    use crate::connection::testing::ScriptedTransport;
    use crate::error::ErrorKind;
    use crate::show::{ShowHostname, ShowVersion};
    use serde_json::json;

    fn node() -> (Node, ScriptedTransport) {
        let transport = ScriptedTransport::default();
        let node = Node::new(Connection::with_transport(Box::new(transport.clone())));
        (node, transport)
    }

    #[tokio::test]
    async fn test_two_shapes_in_one_batch() {
        let (mut node, transport) = node();
        transport.push_result(json!([
            {},
            {"version": "4.30.1F", "modelName": "vEOS-lab"},
            {"hostname": "sw1", "fqdn": "sw1.lab"}
        ]));

        let mut version = ShowVersion::default();
        let mut hostname = ShowHostname::default();
        {
            let mut handle = node.get_handle(Encoding::Json);
            handle.add_command(&mut version).unwrap();
            handle.add_command(&mut hostname).unwrap();
            handle.call().await.unwrap();
            handle.close();
        }

        assert_eq!(
            transport.cmds(0),
            json!(["enable", "show version", "show hostname"])
        );
        assert_eq!(version.version, "4.30.1F");
        assert_eq!(version.model_name, "vEOS-lab");
        assert_eq!(hostname.hostname, "sw1");
        assert_eq!(hostname.fqdn, "sw1.lab");
    }

    #[tokio::test]
    async fn test_text_encoding_raw_command() {
        let (mut node, transport) = node();
        transport.push_result(json!([{"output": ""}, {"output": "Hostname: sw1\n"}]));

        let mut raw = RawCommand::new("show hostname");
        {
            let mut handle = node.get_handle(Encoding::Text);
            handle.set_auto_complete(true);
            handle.enable(&mut raw).await.unwrap();
        }
        assert_eq!(raw.output(), Some("Hostname: sw1\n"));
        let request = &transport.requests()[0];
        assert_eq!(request["params"]["format"], json!("text"));
        assert_eq!(request["params"]["autoComplete"], json!(true));
    }

    #[tokio::test]
    async fn test_text_encoding_rejects_typed_show() {
        let (mut node, transport) = node();
        transport.push_result(json!([
            {"output": ""},
            {"output": "Arista vEOS-lab\nSoftware image version: 4.30.1F\n"}
        ]));

        let mut version = ShowVersion::default();
        {
            let mut handle = node.get_handle(Encoding::Text);
            let err = handle.enable(&mut version).await.unwrap_err();
            assert!(matches!(err, Error::Decode { ref command, .. } if command == "show version"));
        }
        assert_eq!(version, ShowVersion::default());
    }

    #[tokio::test]
    async fn test_enable_with_pending_commands_is_usage_error() {
        let (mut node, transport) = node();
        let mut pending = RawCommand::new("show clock");
        let mut single = RawCommand::new("show hostname");

        let mut handle = node.get_handle(Encoding::Json);
        handle.add_command(&mut pending).unwrap();
        let err = handle.enable(&mut single).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert_eq!(handle.len(), 1);
        drop(handle);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_closed_handle_rejects_use() {
        let (mut node, _transport) = node();
        let mut raw = RawCommand::new("show clock");
        let mut handle = node.get_handle(Encoding::Json);
        handle.close();
        assert!(handle.is_closed());

        let err = handle.add_command(&mut raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
        let err = handle.call().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
    }

    #[tokio::test]
    async fn test_empty_call_is_usage_error() {
        let (mut node, transport) = node();
        let mut handle = node.get_handle(Encoding::Json);
        let err = handle.call().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_command_error_kept_on_handle() {
        let (mut node, transport) = node();
        transport.push_error(1002, "invalid command", &["Invalid input (at token 1: 'bogus')"]);

        let mut good = RawCommand::new("show version");
        let mut bad = RawCommand::new("show bogus");
        let mut handle = node.get_handle(Encoding::Json);
        handle.add_command(&mut good).unwrap();
        handle.add_command(&mut bad).unwrap();
        let err = handle.call().await.unwrap_err();

        let cmd_err = err.as_command_error().unwrap();
        assert_eq!(cmd_err.failed_index(), Some(2));
        assert_eq!(handle.last_error(), Some(cmd_err));
        assert!(handle.is_empty());

        handle.close();
        assert!(handle.last_error().is_none());
        drop(handle);
        assert!(good.result.is_none());
    }

    #[tokio::test]
    async fn test_node_show() {
        let (mut node, transport) = node();
        transport.push_result(json!([{}, {"hostname": "leaf1", "fqdn": "leaf1.dc"}]));
        let hostname: ShowHostname = node.show().await.unwrap();
        assert_eq!(hostname.hostname, "leaf1");
    }
}
