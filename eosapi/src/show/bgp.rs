//! `show ip bgp summary`

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::string_or_number;
use crate::show_command;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowIpBgpSummary {
    pub vrfs: BTreeMap<String, BgpVrf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BgpVrf {
    pub router_id: String,
    /// Peers keyed by neighbor address.
    pub peers: BTreeMap<String, BgpPeer>,
    pub vrf: String,
    #[serde(deserialize_with = "string_or_number")]
    pub asn: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BgpPeer {
    pub msg_sent: u64,
    pub in_msg_queue: u64,
    pub prefix_received: u64,
    pub up_down_time: f64,
    pub version: u32,
    pub msg_received: u64,
    pub prefix_accepted: u64,
    pub peer_state: String,
    pub out_msg_queue: u64,
    pub under_maintenance: bool,
    #[serde(deserialize_with = "string_or_number")]
    pub asn: String,
}

impl BgpPeer {
    pub fn is_established(&self) -> bool {
        self.peer_state == "Established"
    }
}

show_command!(ShowIpBgpSummary, "show ip bgp summary");
