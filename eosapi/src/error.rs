//! Error types for eosapi.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

/// Main error type for eosapi operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Network/transport failure, timeout or an unreadable response body.
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// The device rejected one of the commands in the batch.
    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    /// Profile file or profile lookup errors.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Caller misuse, such as passing `configure` to `enable`.
    #[error("Usage error: {message}")]
    Usage { message: String },

    /// Operation on a closed handle or an uninitialized node.
    #[error("State error: {message}")]
    State { message: String },

    /// The section extractor found no match for the parent regex.
    #[error("Config section not found for pattern '{pattern}'")]
    NotFound { pattern: String },

    /// A command result could not be decoded into its command object.
    #[error("Failed to decode result of '{command}': {source}")]
    Decode {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid regex pattern
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl Error {
    pub(crate) fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    pub(crate) fn state(message: impl Into<String>) -> Self {
        Self::State {
            message: message.into(),
        }
    }

    /// The caller-facing category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Connection(_) | Self::Decode { .. } => ErrorKind::Connection,
            Self::Command(_) => ErrorKind::Command,
            Self::Config(_) => ErrorKind::Config,
            Self::Usage { .. } | Self::InvalidPattern(_) => ErrorKind::Usage,
            Self::State { .. } => ErrorKind::State,
            Self::NotFound { .. } => ErrorKind::NotFound,
        }
    }

    /// The device-side command error, if this is one.
    pub fn as_command_error(&self) -> Option<&CommandError> {
        match self {
            Self::Command(err) => Some(err),
            _ => None,
        }
    }

    /// Whether this error means "no such entity" rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Coarse error categories surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Connection,
    Command,
    Config,
    Usage,
    State,
    NotFound,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connection => "ConnectionError",
            Self::Command => "CommandError",
            Self::Config => "ConfigError",
            Self::Usage => "UsageError",
            Self::State => "StateError",
            Self::NotFound => "NotFound",
        };
        f.write_str(name)
    }
}

/// Transport layer errors (HTTP, UNIX socket, envelope decoding).
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success HTTP status.
    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// The caller cancelled the request.
    #[error("Request cancelled")]
    Cancelled,

    /// The response was not a usable JSON-RPC envelope.
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    /// JSON encode/decode error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A JSON-RPC error returned by the device for a command batch.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("[{code}] {message}")]
pub struct CommandError {
    /// JSON-RPC error code.
    pub code: i64,

    /// Human readable error message.
    pub message: String,

    /// The batch as it was sent on the wire.
    pub commands: Vec<String>,

    /// CLI error strings, starting at the first failing command.
    pub errors: Vec<String>,

    /// Per-command results the device returned before the failure.
    pub output: Vec<Value>,

    /// Failing position when the device reported it explicitly.
    pub(crate) reported_index: Option<usize>,
}

impl CommandError {
    /// Create a command error for a batch.
    pub fn new(
        code: i64,
        message: impl Into<String>,
        commands: Vec<String>,
        errors: Vec<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            commands,
            errors,
            output: Vec::new(),
            reported_index: None,
        }
    }

    /// Index of the first failing command in the wire batch.
    ///
    /// When the device does not say which command failed, the index is
    /// inferred as `commands.len() - errors.len()`. That assumes the errors
    /// cover exactly the trailing commands of the batch.
    pub fn failed_index(&self) -> Option<usize> {
        if let Some(index) = self.reported_index {
            return Some(index);
        }
        if self.errors.is_empty() || self.errors.len() > self.commands.len() {
            return None;
        }
        Some(self.commands.len() - self.errors.len())
    }

    /// The command text that failed.
    pub fn failed_command(&self) -> Option<&str> {
        self.failed_index()
            .and_then(|i| self.commands.get(i))
            .map(String::as_str)
    }

    /// The first CLI error string, if any.
    pub fn command_error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }
}

/// Connection profile errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No profile with this name is loaded.
    #[error("Connection profile '{name}' not found")]
    UnknownProfile { name: String },

    /// The profile file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A line in the profile file could not be parsed.
    #[error("{path}:{line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A known key carried an unusable value.
    #[error("Invalid value '{value}' for '{key}' in [{section}]")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
    },
}

/// A cloneable snapshot of the last error seen by a connection.
#[derive(Debug, Clone, PartialEq)]
pub struct LastError {
    pub kind: ErrorKind,
    pub message: String,
    pub code: Option<i64>,
    pub errors: Vec<String>,
}

impl From<&Error> for LastError {
    fn from(err: &Error) -> Self {
        match err {
            Error::Command(cmd) => Self {
                kind: ErrorKind::Command,
                message: cmd.message.clone(),
                code: Some(cmd.code),
                errors: cmd.errors.clone(),
            },
            other => Self {
                kind: other.kind(),
                message: other.to_string(),
                code: None,
                errors: Vec::new(),
            },
        }
    }
}

/// Result type alias using eosapi's Error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(cmds: &[&str]) -> Vec<String> {
        cmds.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_failed_index_from_trailing_errors() {
        let err = CommandError::new(
            1002,
            "CLI command 3 of 4 'bogus' failed: invalid command",
            batch(&["enable", "configure", "bogus", "hostname x"]),
            vec!["Invalid input (at token 0: 'bogus')".to_string()],
        );
        assert_eq!(err.failed_index(), Some(3));
        assert_eq!(err.failed_command(), Some("hostname x"));
        assert_eq!(
            err.command_error(),
            Some("Invalid input (at token 0: 'bogus')")
        );
    }

    #[test]
    fn test_failed_index_is_within_batch() {
        let cmds = batch(&["enable", "show version"]);
        for n in 1..=cmds.len() {
            let err = CommandError::new(1000, "failed", cmds.clone(), vec!["e".to_string(); n]);
            let index = err.failed_index().unwrap();
            assert!(index < cmds.len());
            assert_eq!(index, cmds.len() - n);
        }
    }

    #[test]
    fn test_failed_index_unknown() {
        let err = CommandError::new(1000, "failed", batch(&["enable"]), vec![]);
        assert_eq!(err.failed_index(), None);

        let err = CommandError::new(1000, "failed", batch(&["enable"]), vec!["a".into(), "b".into()]);
        assert_eq!(err.failed_index(), None);
    }

    #[test]
    fn test_reported_index_wins() {
        let mut err = CommandError::new(
            1002,
            "failed",
            batch(&["enable", "bogus", "show version"]),
            vec!["Invalid input".to_string()],
        );
        err.reported_index = Some(1);
        assert_eq!(err.failed_command(), Some("bogus"));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(Error::usage("x").kind(), ErrorKind::Usage);
        assert_eq!(Error::state("x").kind(), ErrorKind::State);
        assert_eq!(
            Error::NotFound {
                pattern: "^x$".into()
            }
            .kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            Error::from(ConnectionError::Cancelled).kind(),
            ErrorKind::Connection
        );
        assert_eq!(
            Error::from(ConfigError::UnknownProfile { name: "a".into() }).kind(),
            ErrorKind::Config
        );
        assert_eq!(ErrorKind::Command.to_string(), "CommandError");
    }

    #[test]
    fn test_last_error_snapshot() {
        let err: Error = CommandError::new(
            1002,
            "invalid command",
            batch(&["enable", "bogus"]),
            vec!["Invalid input".into()],
        )
        .into();
        let last = LastError::from(&err);
        assert_eq!(last.kind, ErrorKind::Command);
        assert_eq!(last.code, Some(1002));
        assert_eq!(last.errors, vec!["Invalid input".to_string()]);

        let err: Error = ConnectionError::Timeout(Duration::from_secs(5)).into();
        let last = LastError::from(&err);
        assert_eq!(last.kind, ErrorKind::Connection);
        assert!(last.message.contains("timed out"));
    }
}
