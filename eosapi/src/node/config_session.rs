//! Named configuration sessions.
//!
//! EOS `configure session <name>` keeps an isolated candidate configuration
//! that is applied with `commit` or discarded with `abort`. eAPI requests
//! are stateless, so every batch re-enters the session by name.
//!
//! The guard holds `&mut Node`, which keeps the node from being used for
//! anything else while the session is open. `commit()`/`abort()`/`detach()`
//! consume the guard.
//!
//! # Example
//!
//! ```rust,no_run
//! use eosapi::NodeBuilder;
//!
//! # async fn example() -> Result<(), eosapi::Error> {
//! let mut node = NodeBuilder::new("sw1").username("admin").password("pw").build()?;
//!
//! let mut session = node.config_session("vlan-change").await?;
//! session.config(["vlan 100", "name servers"]).await?;
//! println!("{}", session.diff().await?);
//! session.commit().await?;
//! # Ok(())
//! # }
//! ```

use log::{debug, warn};

use super::Node;
use super::response::Response;
use crate::connection::{Command, Encoding};
use crate::error::{Error, Result};

/// RAII guard for a named configuration session.
pub struct ConfigSession<'a> {
    node: &'a mut Node,
    name: String,
    consumed: bool,
}

impl<'a> ConfigSession<'a> {
    /// Create or re-attach to the session `name`.
    ///
    /// Entering an existing session re-attaches to it on the device.
    pub async fn new(node: &'a mut Node, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(Error::usage(format!("invalid config session name '{name}'")));
        }

        debug!("config session {}: enter", name);
        let mut session = Self {
            node,
            name,
            consumed: false,
        };
        if let Err(err) = session.run(vec![Command::from("end")]).await {
            session.consumed = true;
            return Err(err);
        }
        Ok(session)
    }

    /// The session name.
    pub fn session_name(&self) -> &str {
        &self.name
    }

    /// Send configuration commands into the session.
    pub async fn config<I>(&mut self, commands: I) -> Result<Vec<Response>>
    where
        I: IntoIterator,
        I::Item: Into<Command>,
    {
        let commands = commands.into_iter().map(Into::into).collect();
        self.run(commands).await
    }

    /// Show the uncommitted changes of this session.
    pub async fn diff(&mut self) -> Result<String> {
        debug!("config session {}: diff", self.name);
        let responses = self
            .run(vec![Command::from("show session-config diffs")])
            .await?;
        Ok(responses
            .first()
            .and_then(Response::output)
            .unwrap_or_default()
            .to_string())
    }

    /// Commit the session and drop the node's config cache.
    pub async fn commit(mut self) -> Result<()> {
        debug!("config session {}: commit", self.name);
        self.consumed = true;
        self.run(vec![Command::from("commit")]).await?;
        if self.node.autorefresh() {
            self.node.refresh();
        }
        Ok(())
    }

    /// Discard the session's changes.
    pub async fn abort(mut self) -> Result<()> {
        debug!("config session {}: abort", self.name);
        self.consumed = true;
        self.run(vec![Command::from("abort")]).await?;
        Ok(())
    }

    /// Release the guard and leave the session pending on the device.
    pub fn detach(mut self) -> Result<()> {
        debug!("config session {}: detach", self.name);
        self.consumed = true;
        Ok(())
    }

    /// Run `enable` → `configure session <name>` → commands.
    async fn run(&mut self, commands: Vec<Command>) -> Result<Vec<Response>> {
        let mut batch = Vec::with_capacity(commands.len() + 1);
        batch.push(Command::from(format!("configure session {}", self.name)));
        batch.extend(commands);
        self.node.run_with_prelude(batch, Encoding::Text, 2).await
    }
}

impl Drop for ConfigSession<'_> {
    fn drop(&mut self) {
        if !self.consumed {
            warn!(
                "ConfigSession '{}' dropped without commit/abort/detach",
                self.name
            );
        }
    }
}
