//! Command objects that a [`Handle`](super::Handle) can batch.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// A value that knows its CLI command and how to take in its result.
pub trait EapiCommand: Send {
    /// The CLI command to send.
    fn command(&self) -> String;

    /// Store the decoded per-command result.
    ///
    /// For `text` batches `result` is `{"output": "..."}`.
    fn decode(&mut self, result: Value) -> Result<()>;
}

/// A fixed `show ...` command with a typed JSON shape.
pub trait ShowCommand: EapiCommand + DeserializeOwned + Default {
    /// The command text, e.g. `show version`.
    const COMMAND: &'static str;
}

/// Deserialize `result` into `T`, tagging failures with `command`.
pub fn decode_value<T: DeserializeOwned>(command: &str, result: Value) -> Result<T> {
    serde_json::from_value(result).map_err(|source| Error::Decode {
        command: command.to_string(),
        source,
    })
}

/// Deserialize a typed show result, rejecting `text` bodies.
///
/// A `{"output": ...}` result means the batch used `text` encoding, which
/// would otherwise leave every field of the shape at its default.
pub fn decode_show<T: DeserializeOwned>(command: &str, result: Value) -> Result<T> {
    if is_text_body(&result) {
        return Err(Error::Decode {
            command: command.to_string(),
            source: serde::de::Error::custom(
                "got text output, typed show commands need json encoding",
            ),
        });
    }
    decode_value(command, result)
}

fn is_text_body(result: &Value) -> bool {
    result
        .as_object()
        .is_some_and(|body| body.len() == 1 && body.get("output").is_some_and(Value::is_string))
}

/// Implement [`ShowCommand`] and [`EapiCommand`] for a decoding shape.
#[macro_export]
macro_rules! show_command {
    ($ty:ty, $cmd:expr) => {
        impl $crate::handle::ShowCommand for $ty {
            const COMMAND: &'static str = $cmd;
        }

        impl $crate::handle::EapiCommand for $ty {
            fn command(&self) -> String {
                $cmd.to_string()
            }

            fn decode(
                &mut self,
                result: $crate::__serde_json::Value,
            ) -> $crate::error::Result<()> {
                *self = $crate::handle::decode_show($cmd, result)?;
                Ok(())
            }
        }
    };
}

/// Any command, keeping its undecoded result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCommand {
    command: String,
    /// The result from the last call, if any.
    pub result: Option<Value>,
}

impl RawCommand {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            result: None,
        }
    }

    /// The text body when the handle used `text` encoding.
    pub fn output(&self) -> Option<&str> {
        self.result
            .as_ref()
            .and_then(|r| r.get("output"))
            .and_then(Value::as_str)
    }
}

impl EapiCommand for RawCommand {
    fn command(&self) -> String {
        self.command.clone()
    }

    fn decode(&mut self, result: Value) -> Result<()> {
        self.result = Some(result);
        Ok(())
    }
}

/// A caller-defined shape `T` paired with an arbitrary command.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonCommand<T> {
    command: String,
    /// The decoded result from the last call, if any.
    pub value: Option<T>,
}

impl<T> JsonCommand<T> {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            value: None,
        }
    }

    /// Take the decoded value out.
    pub fn into_inner(self) -> Option<T> {
        self.value
    }
}

impl<T: DeserializeOwned + Send> EapiCommand for JsonCommand<T> {
    fn command(&self) -> String {
        self.command.clone()
    }

    fn decode(&mut self, result: Value) -> Result<()> {
        self.value = Some(decode_value(&self.command, result)?);
        Ok(())
    }
}
