//! `show queue-monitor length`

use serde::{Deserialize, Serialize};

use crate::show_command;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShowQueueMonitorLength {
    pub report_time: f64,
    pub bytes_per_txmp_segment: u32,
    pub global_hit_count: u64,
    pub lanz_enabled: bool,
    pub platform_name: String,
    pub warnings: Vec<String>,
    pub entry_list: Vec<QueueMonitorEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueueMonitorEntry {
    pub entry_type: String,
    pub interface: String,
    pub queue_length: u64,
    pub traffic_class: u32,
    pub time_of_max_q_len: f64,
    pub duration: f64,
    pub tx_latency: f64,
    pub global_hit_count: u64,
    pub change_in_queue_length: i64,
    pub timestamp: f64,
}

show_command!(ShowQueueMonitorLength, "show queue-monitor length");
