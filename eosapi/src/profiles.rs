//! Named connection profiles loaded from an `eapi.conf` file.
//!
//! The file is INI-style. Each `[connection:<name>]` section describes one
//! device:
//!
//! ```text
//! [connection:leaf1]
//! host = 192.0.2.11
//! username = admin
//! password = secret
//! transport = https
//! enablepwd = enable-secret
//! ```
//!
//! Recognized keys are `host` (defaults to the profile name), `username`,
//! `password`, `port`, `transport` (`http`, `https`, `http_local`,
//! `socket`; default `https`) and `enablepwd`. Other sections and keys are
//! ignored. A `localhost` profile using the on-box socket is always present.
//!
//! The process-wide store is read-mostly. Call [`load`] at startup, before
//! nodes are spread across tasks.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use indexmap::IndexMap;
use log::{debug, warn};
use once_cell::sync::Lazy;
use secrecy::{ExposeSecret, SecretString};

use crate::error::{ConfigError, Error, Result};
use crate::node::{Node, NodeBuilder};
use crate::transport::{TransportConfig, TransportKind};

/// Environment variable naming the profile file.
pub const CONFIG_ENV: &str = "EAPI_CONF";

const SECTION_PREFIX: &str = "connection:";

/// Global profile store, loaded from the default search path on first use.
static STORE: Lazy<RwLock<ProfileStore>> = Lazy::new(|| RwLock::new(ProfileStore::autoload()));

/// One named connection profile.
#[derive(Debug, Clone)]
pub struct Profile {
    pub name: String,
    pub host: String,
    pub username: String,
    pub password: SecretString,
    pub port: Option<u16>,
    pub transport: TransportKind,
    pub enable_password: Option<SecretString>,
}

impl Profile {
    /// A profile with defaults for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            host: name.clone(),
            name,
            username: String::new(),
            password: SecretString::from(String::new()),
            port: None,
            transport: TransportKind::Https,
            enable_password: None,
        }
    }

    /// The implicit on-box profile.
    pub fn localhost() -> Self {
        Self {
            transport: TransportKind::Socket,
            ..Self::new("localhost")
        }
    }

    /// Transport settings for this profile.
    pub fn transport_config(&self) -> TransportConfig {
        let mut config = TransportConfig::new(self.transport, self.host.clone());
        config.port = self.port;
        config.username = self.username.clone();
        config.password = self.password.clone();
        config
    }

    /// A node builder preloaded with this profile.
    pub fn node_builder(&self) -> NodeBuilder {
        let mut builder = NodeBuilder::from_config(self.transport_config());
        if let Some(password) = &self.enable_password {
            builder = builder.enable_password(password.expose_secret());
        }
        builder
    }

    /// Build a node for this profile.
    pub fn connect(&self) -> Result<Node> {
        self.node_builder().build()
    }
}

/// Map from profile name to profile.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    profiles: IndexMap<String, Profile>,
    source: Option<PathBuf>,
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileStore {
    /// A store holding only the `localhost` profile.
    pub fn new() -> Self {
        let mut profiles = IndexMap::new();
        profiles.insert("localhost".to_string(), Profile::localhost());
        Self {
            profiles,
            source: None,
        }
    }

    /// Get the global store.
    pub fn global() -> &'static RwLock<ProfileStore> {
        &STORE
    }

    /// Read and parse a profile file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut store = Self::parse(&text, path)?;
        store.source = Some(path.to_path_buf());
        Ok(store)
    }

    /// Parse profile file text. `path` is only used in error messages.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let mut store = Self::new();
        let mut current: Option<Profile> = None;
        let mut in_section = false;

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(header) = line.strip_prefix('[') {
                let header = header.strip_suffix(']').ok_or_else(|| ConfigError::Parse {
                    path: path.to_path_buf(),
                    line: index + 1,
                    message: format!("unterminated section header '{line}'"),
                })?;
                if let Some(profile) = current.take() {
                    store.insert(profile);
                }
                in_section = true;
                current = header
                    .trim()
                    .strip_prefix(SECTION_PREFIX)
                    .map(|name| Profile::new(name.trim()));
                continue;
            }

            let Some((key, value)) = line.split_once(['=', ':']) else {
                return Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    line: index + 1,
                    message: format!("expected 'key = value', got '{line}'"),
                }
                .into());
            };
            if !in_section {
                return Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    line: index + 1,
                    message: "key outside of a section".to_string(),
                }
                .into());
            }
            if let Some(profile) = current.as_mut() {
                apply_key(profile, key.trim(), value.trim())?;
            }
        }

        if let Some(profile) = current.take() {
            store.insert(profile);
        }
        Ok(store)
    }

    /// Load from `EAPI_CONF` or the default search path.
    ///
    /// Falls back to a localhost-only store when no file is found or the
    /// file is unreadable.
    pub fn autoload() -> Self {
        let env = std::env::var(CONFIG_ENV).ok();
        let Some(path) = search_paths(env.as_deref()).into_iter().find(|p| p.is_file()) else {
            debug!("no eapi.conf found, using localhost profile only");
            return Self::new();
        };

        match Self::from_file(&path) {
            Ok(store) => {
                debug!("loaded connection profiles from {}", path.display());
                store
            }
            Err(err) => {
                warn!("ignoring {}: {}", path.display(), err);
                Self::new()
            }
        }
    }

    /// Add or replace a profile.
    pub fn insert(&mut self, profile: Profile) {
        self.profiles.insert(profile.name.clone(), profile);
    }

    /// Get a profile by name.
    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    /// Check if a profile exists.
    pub fn contains(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    /// All profile names, in file order, always including `localhost`.
    pub fn connections(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }

    /// The file this store was read from.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Build a node for the profile `name`.
    pub fn connect_to(&self, name: &str) -> Result<Node> {
        self.get(name)
            .ok_or_else(|| ConfigError::UnknownProfile {
                name: name.to_string(),
            })?
            .connect()
    }
}

fn apply_key(profile: &mut Profile, key: &str, value: &str) -> Result<()> {
    let invalid = |key: &str| ConfigError::InvalidValue {
        section: format!("{SECTION_PREFIX}{}", profile.name),
        key: key.to_string(),
        value: value.to_string(),
    };

    match key.to_ascii_lowercase().as_str() {
        "host" => profile.host = value.to_string(),
        "username" => profile.username = value.to_string(),
        "password" => profile.password = SecretString::from(value.to_string()),
        "port" => {
            profile.port = Some(value.parse::<u16>().map_err(|_| invalid(key))?);
        }
        "transport" => {
            profile.transport = value.parse::<TransportKind>().map_err(|_| invalid(key))?;
        }
        "enablepwd" => profile.enable_password = Some(SecretString::from(value.to_string())),
        other => debug!("ignoring unknown profile key '{}'", other),
    }
    Ok(())
}

/// Candidate profile file locations, in lookup order.
///
/// `EAPI_CONF` wins when set; otherwise `./eapi.conf` then `~/.eapi.conf`.
pub fn search_paths(env: Option<&str>) -> Vec<PathBuf> {
    if let Some(path) = env.filter(|p| !p.is_empty()) {
        return vec![PathBuf::from(path)];
    }
    let mut paths = vec![PathBuf::from("eapi.conf")];
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".eapi.conf"));
    }
    paths
}

/// Replace the global store with the contents of `path`.
pub fn load(path: impl AsRef<Path>) -> Result<()> {
    let store = ProfileStore::from_file(path)?;
    *write_global()? = store;
    Ok(())
}

/// Names of all profiles in the global store.
pub fn connections() -> Result<Vec<String>> {
    Ok(read_global()?.connections())
}

/// A copy of the named profile from the global store.
pub fn config_for(name: &str) -> Result<Option<Profile>> {
    Ok(read_global()?.get(name).cloned())
}

/// Build a node for a profile in the global store.
pub fn connect_to(name: &str) -> Result<Node> {
    read_global()?.connect_to(name)
}

fn read_global() -> Result<std::sync::RwLockReadGuard<'static, ProfileStore>> {
    ProfileStore::global()
        .read()
        .map_err(|_| Error::state("profile store lock poisoned"))
}

fn write_global() -> Result<std::sync::RwLockWriteGuard<'static, ProfileStore>> {
    ProfileStore::global()
        .write()
        .map_err(|_| Error::state("profile store lock poisoned"))
}
