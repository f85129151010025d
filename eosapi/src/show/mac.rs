//! `show mac address-table`

use serde::{Deserialize, Serialize};

use crate::show_command;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShowMacAddressTable {
    pub multicast_table: MulticastTable,
    pub unicast_table: MacTable,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MacTable {
    pub table_entries: Vec<UnicastEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UnicastEntry {
    pub mac_address: String,
    pub last_move: f64,
    pub interface: String,
    pub moves: u32,
    pub entry_type: String,
    pub vlan_id: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MulticastTable {
    pub table_entries: Vec<MulticastEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MulticastEntry {
    pub mac_address: String,
    pub vlan_id: u32,
    pub entry_type: String,
    pub interfaces: Vec<String>,
}

impl ShowMacAddressTable {
    /// Unicast entries learned in `vlan`.
    pub fn unicast_in_vlan(&self, vlan: u32) -> impl Iterator<Item = &UnicastEntry> {
        self.unicast_table
            .table_entries
            .iter()
            .filter(move |e| e.vlan_id == vlan)
    }
}

show_command!(ShowMacAddressTable, "show mac address-table");
