//! JSON-RPC 2.0 request and response envelopes for `runCmds`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CommandError, ConnectionError, Error};

/// Result encoding requested from the device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Structured JSON per command. This is the default.
    #[default]
    Json,

    /// Raw CLI text per command, wrapped as `{"output": "..."}`.
    Text,
}

impl Encoding {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            other => Err(Error::usage(format!(
                "unsupported encoding '{other}', expected 'json' or 'text'"
            ))),
        }
    }
}

/// One element of the `cmds` array.
///
/// Most commands are plain strings. Commands that prompt for input, such as
/// `enable` with a password or a multi-line `banner`, carry it alongside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Command {
    Plain(String),
    WithInput { cmd: String, input: String },
}

impl Command {
    /// A command with associated input.
    pub fn with_input(cmd: impl Into<String>, input: impl Into<String>) -> Self {
        Self::WithInput {
            cmd: cmd.into(),
            input: input.into(),
        }
    }

    /// The CLI text of the command, without its input.
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(cmd) | Self::WithInput { cmd, .. } => cmd,
        }
    }

    /// Copy safe to write to logs: `enable` input is redacted.
    pub(crate) fn redacted(&self) -> Self {
        match self {
            Self::WithInput { cmd, .. } if cmd.trim() == "enable" => Self::WithInput {
                cmd: cmd.clone(),
                input: "<removed>".to_string(),
            },
            other => other.clone(),
        }
    }
}

impl From<&str> for Command {
    fn from(cmd: &str) -> Self {
        Self::Plain(cmd.to_string())
    }
}

impl From<String> for Command {
    fn from(cmd: String) -> Self {
        Self::Plain(cmd)
    }
}

impl From<&String> for Command {
    fn from(cmd: &String) -> Self {
        Self::Plain(cmd.clone())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Optional `runCmds` parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecuteOptions {
    /// Let the device expand abbreviated commands.
    pub auto_complete: Option<bool>,

    /// Let the device expand CLI aliases.
    pub expand_aliases: Option<bool>,

    /// Ask for per-command execution timestamps.
    pub timestamps: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Request<'a> {
    pub jsonrpc: &'static str,
    pub method: &'static str,
    pub params: Params<'a>,
    pub id: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Params<'a> {
    pub version: u8,
    pub cmds: &'a [Command],
    pub format: Encoding,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_complete: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expand_aliases: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamps: Option<bool>,
}

impl<'a> Request<'a> {
    pub fn run_cmds(
        id: u64,
        cmds: &'a [Command],
        format: Encoding,
        options: ExecuteOptions,
    ) -> Self {
        Self {
            jsonrpc: "2.0",
            method: "runCmds",
            params: Params {
                version: 1,
                cmds,
                format,
                auto_complete: options.auto_complete,
                expand_aliases: options.expand_aliases,
                timestamps: options.timestamps,
            },
            id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseEnvelope {
    #[serde(default)]
    pub result: Option<Vec<Value>>,
    #[serde(default)]
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcError {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

impl RpcError {
    /// Build the caller-facing error for the batch `commands`.
    ///
    /// `data` comes in two shapes. Either an object carrying `errors`, or
    /// an array of per-command results where the failing entry carries
    /// `errors`. The array shape pins the failing position exactly.
    pub fn into_command_error(self, commands: &[Command]) -> CommandError {
        let wire: Vec<String> = commands.iter().map(|c| c.text().to_string()).collect();
        let mut err = CommandError::new(self.code, self.message, wire, Vec::new());

        match self.data {
            Some(Value::Object(map)) => {
                err.errors = string_list(map.get("errors"));
            }
            Some(Value::Array(items)) => {
                let failed = items.iter().position(|item| item.get("errors").is_some());
                if let Some(index) = failed {
                    err.errors = string_list(items[index].get("errors"));
                    err.reported_index = Some(index);
                    err.output = items[..index].to_vec();
                } else {
                    err.output = items;
                }
            }
            _ => {}
        }
        err
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Some(Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// Decode a response body into per-command results.
pub(crate) fn decode_response(
    body: &str,
    commands: &[Command],
) -> crate::error::Result<Vec<Value>> {
    let envelope: ResponseEnvelope =
        serde_json::from_str(body).map_err(ConnectionError::Json)?;

    if let Some(error) = envelope.error {
        return Err(error.into_command_error(commands).into());
    }

    let result = envelope
        .result
        .ok_or_else(|| ConnectionError::InvalidResponse {
            message: "response carries neither 'result' nor 'error'".to_string(),
        })?;

    if result.len() != commands.len() {
        return Err(ConnectionError::InvalidResponse {
            message: format!(
                "expected {} results, device returned {}",
                commands.len(),
                result.len()
            ),
        }
        .into());
    }
    Ok(result)
}
