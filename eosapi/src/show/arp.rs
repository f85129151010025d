//! `show arp`

use serde::{Deserialize, Serialize};

use crate::show_command;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShowArp {
    pub dynamic_entries: u32,
    pub ip_v4_neighbors: Vec<ArpEntry>,
    pub not_learned_entries: u32,
    pub total_entries: u32,
    pub static_entries: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArpEntry {
    pub hw_address: String,
    pub address: String,
    pub interface: String,
    pub age: u64,
}

impl ShowArp {
    /// Look up the hardware address learned for an IPv4 address.
    pub fn lookup(&self, address: &str) -> Option<&ArpEntry> {
        self.ip_v4_neighbors.iter().find(|e| e.address == address)
    }
}

show_command!(ShowArp, "show arp");
