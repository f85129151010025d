//! `show lldp neighbors`

use serde::{Deserialize, Serialize};

use crate::show_command;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShowLldpNeighbors {
    pub tables_deletes: u64,
    pub tables_age_outs: u64,
    pub tables_drops: u64,
    pub tables_inserts: u64,
    pub lldp_neighbors: Vec<LldpNeighbor>,
    pub tables_last_change_time: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LldpNeighbor {
    pub ttl: u32,
    pub neighbor_device: String,
    pub neighbor_port: String,
    pub port: String,
}

show_command!(ShowLldpNeighbors, "show lldp neighbors");
