//! # eosapi
//!
//! Async client for the Arista EOS command API (eAPI).
//!
//! eosapi sends batches of CLI commands to a switch as JSON-RPC `runCmds`
//! requests and layers the usual automation conventions on top:
//!
//! ## Features
//!
//! - HTTP, HTTPS, loopback HTTP and on-box UNIX socket transports
//! - Enable-mode prelude with optional enable password
//! - Configuration batches (`enable` → `configure` → commands) with
//!   running-config caching and invalidation
//! - Indentation-aware config section extraction
//! - Typed `show` bindings and batched command handles
//! - Named connection profiles from `eapi.conf`
//! - Feature APIs for ACLs, interfaces, MLAG, NTP, system and VLANs
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use eosapi::NodeBuilder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), eosapi::Error> {
//!     let mut node = NodeBuilder::new("192.0.2.10")
//!         .username("admin")
//!         .password("secret")
//!         .build()?;
//!
//!     let responses = node.enable(["show version"]).await?;
//!     println!("{}", responses[0].result["version"]);
//!
//!     node.config(["hostname leaf1"]).await?;
//!     Ok(())
//! }
//! ```
//!
//! Profiles from `eapi.conf` work the same way:
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), eosapi::Error> {
//! let mut node = eosapi::connect_to("leaf1")?;
//! let vlans = node.vlans().get_all().await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod connection;
pub mod error;
pub mod handle;
pub mod node;
pub mod profiles;
pub mod section;
pub mod show;
pub mod transport;

// Re-export main types for convenience
pub use api::Setting;
pub use connection::{Command, Connection, Encoding, ExecuteOptions};
pub use error::{CommandError, ConfigError, ConnectionError, Error, ErrorKind, LastError, Result};
pub use handle::{EapiCommand, Handle, JsonCommand, RawCommand, ShowCommand};
pub use node::{ConfigSession, ConfigSource, Node, NodeBuilder, Response};
pub use profiles::{Profile, ProfileStore, connect_to};
pub use transport::{Transport, TransportConfig, TransportKind};

#[doc(hidden)]
pub use serde_json as __serde_json;
