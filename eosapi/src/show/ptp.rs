//! `show ptp`

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::show_command;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShowPtp {
    pub ptp_mode: String,
    pub ptp_clock_summary: PtpClockSummary,
    pub ptp_intf_summaries: BTreeMap<String, PtpIntfSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PtpClockSummary {
    pub clock_identity: String,
    pub gm_clock_identity: String,
    pub number_of_slave_ports: u32,
    pub number_of_master_ports: u32,
    pub slave_port: String,
    pub slave_vlan_id: u32,
    pub offset_from_master: f64,
    pub mean_path_delay: f64,
    pub steps_removed: u32,
    pub skew: f64,
    pub last_sync_time: f64,
    pub current_ptp_system_time: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PtpIntfSummary {
    pub interface: String,
    pub ptp_intf_vlan_summaries: Vec<PtpIntfVlanSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PtpIntfVlanSummary {
    pub port_state: String,
    pub delay_mechanism: String,
    pub vlan_id: u32,
}

impl ShowPtp {
    pub fn is_enabled(&self) -> bool {
        !self.ptp_mode.is_empty() && self.ptp_mode != "ptpDisabled"
    }
}

show_command!(ShowPtp, "show ptp");
