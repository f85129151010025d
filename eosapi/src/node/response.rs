//! Response type for command execution results.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::connection::Encoding;
use crate::error::{Error, Result};

/// Decoded result of one command in a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// The command that was executed.
    pub command: String,

    /// Encoding the result was requested in.
    pub encoding: Encoding,

    /// The raw per-command result object.
    pub result: Value,
}

impl Response {
    /// Create a new response.
    pub fn new(command: impl Into<String>, encoding: Encoding, result: Value) -> Self {
        Self {
            command: command.into(),
            encoding,
            result,
        }
    }

    /// The CLI text output of a `text` encoded result.
    pub fn output(&self) -> Option<&str> {
        self.result.get("output").and_then(Value::as_str)
    }

    /// Decode a `json` encoded result into a typed shape.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.result.clone()).map_err(|source| Error::Decode {
            command: self.command.clone(),
            source,
        })
    }

    /// Get the output lines of a `text` result.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.output().unwrap_or_default().lines()
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.output() {
            Some(text) => write!(f, "{}", text),
            None => write!(f, "{}", self.result),
        }
    }
}
