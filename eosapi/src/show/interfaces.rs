//! `show interfaces` and `show interfaces switchport`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::show_command;

/// `show interfaces`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowInterfaces {
    pub interfaces: BTreeMap<String, InterfaceDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InterfaceDetail {
    pub name: String,
    pub interface_status: String,
    pub line_protocol_status: String,
    pub description: String,
    pub bandwidth: u64,
    pub mtu: u32,
    pub physical_address: String,
    pub hardware: String,
    pub forwarding_model: String,
    pub duplex: String,
    pub auto_negotiate: String,
    pub last_status_change_timestamp: f64,
    pub interface_address: Vec<InterfaceAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface_counters: Option<InterfaceCounters>,
}

impl InterfaceDetail {
    pub fn is_up(&self) -> bool {
        self.line_protocol_status == "up"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InterfaceAddress {
    pub primary_ip: IpAddress,
    pub secondary_ips: BTreeMap<String, IpAddress>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IpAddress {
    pub address: String,
    pub mask_len: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InterfaceCounters {
    pub in_octets: u64,
    pub in_ucast_pkts: u64,
    pub in_multicast_pkts: u64,
    pub in_broadcast_pkts: u64,
    pub in_discards: u64,
    pub total_in_errors: u64,
    pub out_octets: u64,
    pub out_ucast_pkts: u64,
    pub out_multicast_pkts: u64,
    pub out_broadcast_pkts: u64,
    pub out_discards: u64,
    pub total_out_errors: u64,
    pub link_status_changes: u64,
    pub counter_refresh_time: f64,
}

show_command!(ShowInterfaces, "show interfaces");

/// `show interfaces switchport`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowInterfacesSwitchport {
    pub switchports: BTreeMap<String, Switchport>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Switchport {
    pub enabled: bool,
    pub switchport_info: SwitchportInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SwitchportInfo {
    pub mode: String,
    pub access_vlan_id: u32,
    pub access_vlan_name: String,
    pub trunking_native_vlan_id: u32,
    pub trunking_native_vlan_name: String,
    pub trunk_allowed_vlans: String,
    pub trunk_groups: Vec<String>,
    pub mac_learning: bool,
}

show_command!(ShowInterfacesSwitchport, "show interfaces switchport");
