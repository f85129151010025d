//! JSON-RPC connection to the eAPI endpoint.
//!
//! A [`Connection`] serializes one `runCmds` request per batch, hands it to
//! a [`Transport`], and decodes the envelope into per-command results or a
//! [`CommandError`](crate::error::CommandError).

pub mod rpc;

pub use rpc::{Command, Encoding, ExecuteOptions};

use std::fmt;

use log::{debug, trace};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use self::rpc::Request;
use crate::error::{ConnectionError, Error, LastError, Result};
use crate::transport::{self, Transport, TransportConfig};

/// A single-owner connection to one device.
pub struct Connection {
    transport: Box<dyn Transport>,
    next_id: u64,
    last_error: Option<LastError>,
}

impl Connection {
    /// Open a connection using the transport described by `config`.
    ///
    /// No network traffic happens until the first `execute`.
    pub fn new(config: &TransportConfig) -> Result<Self> {
        Ok(Self::with_transport(transport::from_config(config)?))
    }

    /// Wrap an existing transport.
    pub fn with_transport(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            next_id: 1,
            last_error: None,
        }
    }

    /// Send a batch and decode the per-command results.
    ///
    /// On success there is exactly one result per command. A JSON-RPC error
    /// is returned as [`Error::Command`]. The connection stays usable after
    /// any failure.
    pub async fn execute(
        &mut self,
        commands: &[Command],
        encoding: Encoding,
        options: ExecuteOptions,
    ) -> Result<Vec<Value>> {
        let outcome = self.send_batch(commands, encoding, options).await;
        self.record(outcome)
    }

    /// Like [`execute`](Self::execute), but abandons the request when `cancel`
    /// fires.
    ///
    /// Dropping the in-flight request closes its underlying connection.
    pub async fn execute_with_cancel(
        &mut self,
        commands: &[Command],
        encoding: Encoding,
        options: ExecuteOptions,
        cancel: &CancellationToken,
    ) -> Result<Vec<Value>> {
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ConnectionError::Cancelled.into()),
            outcome = self.send_batch(commands, encoding, options) => outcome,
        };
        self.record(outcome)
    }

    /// The error from the most recent failed `execute`, cleared on success.
    pub fn last_error(&self) -> Option<&LastError> {
        self.last_error.as_ref()
    }

    /// Forget the last error.
    pub fn clear_last_error(&mut self) {
        self.last_error = None;
    }

    /// Endpoint description of the underlying transport.
    pub fn endpoint(&self) -> String {
        self.transport.endpoint()
    }

    fn take_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    async fn send_batch(
        &mut self,
        commands: &[Command],
        encoding: Encoding,
        options: ExecuteOptions,
    ) -> Result<Vec<Value>> {
        if commands.is_empty() {
            return Err(Error::usage("command batch is empty"));
        }

        let id = self.take_id();
        let request = Request::run_cmds(id, commands, encoding, options);
        let body = serde_json::to_string(&request).map_err(ConnectionError::Json)?;

        debug!(
            "runCmds id={} cmds={} format={} endpoint={}",
            id,
            commands.len(),
            encoding,
            self.transport.endpoint()
        );
        if log::log_enabled!(log::Level::Trace) {
            let redacted: Vec<Command> = commands.iter().map(Command::redacted).collect();
            trace!("runCmds id={} request cmds={:?}", id, redacted);
        }

        let response = self.transport.send(body).await?;
        trace!("runCmds id={} response {} bytes", id, response.len());

        rpc::decode_response(&response, commands)
    }

    fn record(&mut self, outcome: Result<Vec<Value>>) -> Result<Vec<Value>> {
        match &outcome {
            Ok(_) => self.last_error = None,
            Err(err) => {
                debug!("runCmds failed: {}", err);
                self.last_error = Some(LastError::from(err));
            }
        }
        outcome
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("endpoint", &self.transport.endpoint())
            .field("next_id", &self.next_id)
            .field("last_error", &self.last_error)
            .finish()
    }
}
