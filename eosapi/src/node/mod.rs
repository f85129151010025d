//! Device session with EOS enable-mode discipline.
//!
//! A [`Node`] owns a [`Connection`] and layers the conventions every
//! caller needs on top of it:
//!
//! - every privileged batch starts with `enable` (carrying the enable
//!   password when one is configured)
//! - configuration batches run as `enable` → `configure` → commands
//! - `running-config` / `startup-config` are cached and the cache is
//!   dropped after each successful configuration change when auto-refresh
//!   is on
//!
//! # Example
//!
//! ```rust,no_run
//! use eosapi::NodeBuilder;
//!
//! # async fn example() -> Result<(), eosapi::Error> {
//! let mut node = NodeBuilder::new("sw1.example.com")
//!     .username("admin")
//!     .password("secret")
//!     .build()?;
//!
//! let version = node.enable(["show version"]).await?;
//! println!("{}", version[0].result["version"]);
//!
//! node.config(["hostname sw1"]).await?;
//! # Ok(())
//! # }
//! ```

mod builder;
pub mod config_session;
pub(crate) mod response;

pub use builder::NodeBuilder;
pub use config_session::ConfigSession;
pub use response::Response;

use std::fmt;
use std::str::FromStr;

use log::debug;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::api::{Acls, Interfaces, Mlag, Ntp, System, Vlans};
use crate::connection::{Command, Connection, Encoding, ExecuteOptions};
use crate::error::{Error, LastError, Result};
use crate::handle::Handle;
use crate::section;
use crate::show::ShowVersion;

/// Which configuration a read targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ConfigSource {
    #[default]
    Running,
    Startup,
}

impl ConfigSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running-config",
            Self::Startup => "startup-config",
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.replace('_', "-").as_str() {
            "running-config" => Ok(Self::Running),
            "startup-config" => Ok(Self::Startup),
            other => Err(Error::usage(format!(
                "unknown config source '{other}', expected running-config or startup-config"
            ))),
        }
    }
}

/// A session with one EOS device.
pub struct Node {
    connection: Connection,
    enable_password: Option<SecretString>,
    autorefresh: bool,
    encoding: Encoding,
    running_config: Option<String>,
    startup_config: Option<String>,
    version: Option<ShowVersion>,
}

impl Node {
    /// Create a node over an established connection.
    pub fn new(connection: Connection) -> Self {
        Self {
            connection,
            enable_password: None,
            autorefresh: true,
            encoding: Encoding::Json,
            running_config: None,
            startup_config: None,
            version: None,
        }
    }

    /// Set the password sent with `enable`.
    pub fn set_enable_password(&mut self, password: Option<SecretString>) {
        self.enable_password = password;
    }

    /// Whether configuration changes drop the cached configs.
    pub fn autorefresh(&self) -> bool {
        self.autorefresh
    }

    pub fn set_autorefresh(&mut self, autorefresh: bool) {
        self.autorefresh = autorefresh;
    }

    /// Default encoding for [`enable`](Self::enable).
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn set_encoding(&mut self, encoding: Encoding) {
        self.encoding = encoding;
    }

    /// The underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Mutable access to the underlying connection.
    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.connection
    }

    /// The error from the last failed batch on this node.
    pub fn last_error(&self) -> Option<&LastError> {
        self.connection.last_error()
    }

    /// The `enable` prelude command, with the enable password if set.
    pub(crate) fn enable_command(&self) -> Command {
        match &self.enable_password {
            Some(password) => Command::with_input("enable", password.expose_secret()),
            None => Command::from("enable"),
        }
    }

    // ── Command execution ────────────────────────────────────────────

    /// Run commands in enable mode using the node's default encoding.
    ///
    /// The `enable` prelude is stripped from the returned results. Commands
    /// containing `configure` are rejected before anything is sent; use
    /// [`config`](Self::config) for those.
    pub async fn enable<I>(&mut self, commands: I) -> Result<Vec<Response>>
    where
        I: IntoIterator,
        I::Item: Into<Command>,
    {
        let encoding = self.encoding;
        self.enable_with(commands, encoding).await
    }

    /// Run commands in enable mode with an explicit encoding.
    pub async fn enable_with<I>(&mut self, commands: I, encoding: Encoding) -> Result<Vec<Response>>
    where
        I: IntoIterator,
        I::Item: Into<Command>,
    {
        let commands = to_commands(commands);
        if let Some(cmd) = commands.iter().find(|c| c.text().contains("configure")) {
            return Err(Error::usage(format!(
                "config mode commands not supported by enable: '{}'",
                cmd.text()
            )));
        }

        self.run_with_prelude(commands, encoding, 1).await
    }

    /// Run configuration commands as `enable` → `configure` → commands.
    ///
    /// Results are text encoded with the prelude stripped. On success the
    /// cached configs are dropped when auto-refresh is on.
    pub async fn config<I>(&mut self, commands: I) -> Result<Vec<Response>>
    where
        I: IntoIterator,
        I::Item: Into<Command>,
    {
        let mut batch = vec![Command::from("configure")];
        batch.extend(to_commands(commands));

        let responses = self.run_with_prelude(batch, Encoding::Text, 2).await?;
        if self.autorefresh {
            self.refresh();
        }
        Ok(responses)
    }

    /// Alias of [`config`](Self::config).
    pub async fn configure<I>(&mut self, commands: I) -> Result<Vec<Response>>
    where
        I: IntoIterator,
        I::Item: Into<Command>,
    {
        self.config(commands).await
    }

    /// Run configuration commands under `interface <name>`.
    pub async fn configure_interface<I>(&mut self, name: &str, commands: I) -> Result<Vec<Response>>
    where
        I: IntoIterator,
        I::Item: Into<Command>,
    {
        let mut batch = vec![Command::from(format!("interface {name}"))];
        batch.extend(to_commands(commands));
        self.config(batch).await
    }

    /// Execute a batch exactly as given, with no prelude.
    pub async fn run_commands<I>(&mut self, commands: I, encoding: Encoding) -> Result<Vec<Response>>
    where
        I: IntoIterator,
        I::Item: Into<Command>,
    {
        let commands = to_commands(commands);
        let results = self
            .connection
            .execute(&commands, encoding, ExecuteOptions::default())
            .await?;
        self.invalidate_after(&commands);
        Ok(zip_responses(&commands, results, encoding))
    }

    /// Execute a batch exactly as given, abandoning it when `cancel` fires.
    pub async fn run_commands_with_cancel<I>(
        &mut self,
        commands: I,
        encoding: Encoding,
        cancel: &CancellationToken,
    ) -> Result<Vec<Response>>
    where
        I: IntoIterator,
        I::Item: Into<Command>,
    {
        let commands = to_commands(commands);
        let results = self
            .connection
            .execute_with_cancel(&commands, encoding, ExecuteOptions::default(), cancel)
            .await?;
        self.invalidate_after(&commands);
        Ok(zip_responses(&commands, results, encoding))
    }

    /// Drop cached configs after an ad-hoc batch that entered config mode.
    fn invalidate_after(&mut self, commands: &[Command]) {
        let entered_config = commands
            .iter()
            .any(|c| c.text().trim_start().starts_with("configure"));
        if self.autorefresh && entered_config {
            debug!("ad-hoc batch entered config mode, dropping cached configs");
            self.refresh();
        }
    }

    /// Prepend `enable`, execute, and drop the first `strip` results.
    async fn run_with_prelude(
        &mut self,
        commands: Vec<Command>,
        encoding: Encoding,
        strip: usize,
    ) -> Result<Vec<Response>> {
        let results = self
            .execute_enabled(&commands, encoding, ExecuteOptions::default())
            .await?;
        let skip = strip - 1;
        Ok(zip_responses(&commands[skip..], results[strip..].to_vec(), encoding))
    }

    /// Execute `commands` behind the `enable` prelude and return every
    /// result, prelude included.
    pub(crate) async fn execute_enabled(
        &mut self,
        commands: &[Command],
        encoding: Encoding,
        options: ExecuteOptions,
    ) -> Result<Vec<Value>> {
        let mut batch = Vec::with_capacity(commands.len() + 1);
        batch.push(self.enable_command());
        batch.extend_from_slice(commands);
        self.connection.execute(&batch, encoding, options).await
    }

    // ── Configuration cache ──────────────────────────────────────────

    /// Fetch a configuration as text, optionally with params such as `all`.
    ///
    /// The leading `!` banner is removed. This always goes to the device.
    pub async fn get_config(&mut self, source: ConfigSource, params: Option<&str>) -> Result<String> {
        let command = match params {
            Some(params) => format!("show {} {}", source, params),
            None => format!("show {}", source),
        };
        let responses = self.enable_with([command], Encoding::Text).await?;
        let output = responses
            .first()
            .and_then(Response::output)
            .unwrap_or_default();
        Ok(strip_banner(output).to_string())
    }

    /// The running configuration, from cache when available.
    pub async fn running_config(&mut self) -> Result<&str> {
        if self.running_config.is_none() {
            debug!("fetching running-config");
            let config = self.get_config(ConfigSource::Running, Some("all")).await?;
            self.running_config = Some(config);
        }
        Ok(self.running_config.as_deref().unwrap_or_default())
    }

    /// The startup configuration, from cache when available.
    pub async fn startup_config(&mut self) -> Result<&str> {
        if self.startup_config.is_none() {
            debug!("fetching startup-config");
            let config = self.get_config(ConfigSource::Startup, None).await?;
            self.startup_config = Some(config);
        }
        Ok(self.startup_config.as_deref().unwrap_or_default())
    }

    /// Drop cached configs so the next read goes to the device.
    pub fn refresh(&mut self) {
        self.running_config = None;
        self.startup_config = None;
    }

    /// Extract the block under `parent` from the chosen config.
    pub async fn section(&mut self, parent: &str, source: ConfigSource) -> Result<String> {
        let config = match source {
            ConfigSource::Running => self.running_config().await?,
            ConfigSource::Startup => self.startup_config().await?,
        };
        section::section(config, parent)
    }

    // ── Device facts ─────────────────────────────────────────────────

    /// `show version`, cached for the life of the node.
    pub async fn version(&mut self) -> Result<&ShowVersion> {
        if self.version.is_none() {
            let responses = self.enable_with(["show version"], Encoding::Json).await?;
            let version = match responses.first() {
                Some(response) => response.decode::<ShowVersion>()?,
                None => ShowVersion::default(),
            };
            self.version = Some(version);
        }
        Ok(self.version.get_or_insert_with(ShowVersion::default))
    }

    /// EOS version string, e.g. `4.30.1F`.
    pub async fn version_number(&mut self) -> Result<String> {
        Ok(self.version().await?.version_number().to_string())
    }

    /// Hardware model name.
    pub async fn model(&mut self) -> Result<String> {
        Ok(self.version().await?.model_name.clone())
    }

    // ── Batches, sessions and feature APIs ───────────────────────────

    /// Open a batch handle bound to this node.
    pub fn get_handle<'c>(&mut self, encoding: Encoding) -> Handle<'_, 'c> {
        Handle::new(self, encoding)
    }

    /// Open or re-attach to a named configuration session.
    pub async fn config_session(&mut self, name: &str) -> Result<ConfigSession<'_>> {
        ConfigSession::new(self, name).await
    }

    pub fn acls(&mut self) -> Acls<'_> {
        Acls::new(self)
    }

    pub fn interfaces(&mut self) -> Interfaces<'_> {
        Interfaces::new(self)
    }

    pub fn mlag(&mut self) -> Mlag<'_> {
        Mlag::new(self)
    }

    pub fn ntp(&mut self) -> Ntp<'_> {
        Ntp::new(self)
    }

    pub fn system(&mut self) -> System<'_> {
        System::new(self)
    }

    pub fn vlans(&mut self) -> Vlans<'_> {
        Vlans::new(self)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("connection", &self.connection)
            .field("autorefresh", &self.autorefresh)
            .field("encoding", &self.encoding)
            .field("running_config_cached", &self.running_config.is_some())
            .field("startup_config_cached", &self.startup_config.is_some())
            .finish()
    }
}

fn to_commands<I>(commands: I) -> Vec<Command>
where
    I: IntoIterator,
    I::Item: Into<Command>,
{
    commands.into_iter().map(Into::into).collect()
}

fn zip_responses(commands: &[Command], results: Vec<Value>, encoding: Encoding) -> Vec<Response> {
    commands
        .iter()
        .zip(results)
        .map(|(cmd, result)| Response::new(cmd.text(), encoding, result))
        .collect()
}

/// Drop the `! Command: ...` / `! device: ...` header lines.
fn strip_banner(config: &str) -> &str {
    let mut rest = config;
    while rest.starts_with('!') {
        match rest.find('\n') {
            Some(i) => rest = &rest[i + 1..],
            None => return "",
        }
    }
    rest
}
