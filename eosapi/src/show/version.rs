//! `show version` and `show hostname`.

use serde::{Deserialize, Serialize};

use crate::show_command;

/// `show version`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShowVersion {
    pub model_name: String,
    pub internal_version: String,
    pub system_mac_address: String,
    pub serial_number: String,
    pub mem_total: u64,
    pub bootup_timestamp: f64,
    pub mem_free: u64,
    pub version: String,
    pub architecture: String,
    pub is_intl_version: bool,
    pub internal_build_id: String,
    pub hardware_revision: String,
}

impl ShowVersion {
    /// The numeric EOS version, e.g. `4.30.1F`.
    pub fn version_number(&self) -> &str {
        self.version.split('-').next().unwrap_or_default()
    }

    /// Whether this is a virtual (vEOS/cEOS) platform.
    pub fn is_virtual(&self) -> bool {
        let model = self.model_name.to_ascii_lowercase();
        model.starts_with("veos") || model.starts_with("ceos")
    }
}

show_command!(ShowVersion, "show version");

/// `show hostname`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowHostname {
    pub hostname: String,
    pub fqdn: String,
}

show_command!(ShowHostname, "show hostname");
