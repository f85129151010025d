//! Typed shapes for common `show ...` commands.
//!
//! Each shape mirrors the camelCase JSON the device returns and is a
//! [`ShowCommand`](crate::handle::ShowCommand), so it can be added to a
//! [`Handle`](crate::handle::Handle) directly or fetched with
//! [`Node::show`](crate::node::Node::show). Missing keys decode to
//! defaults, which keeps older EOS releases readable.

mod arp;
mod bgp;
mod environment;
mod interfaces;
mod lldp;
mod mac;
mod ptp;
mod queue_monitor;
mod route;
mod version;

pub use arp::{ArpEntry, ShowArp};
pub use bgp::{BgpPeer, BgpVrf, ShowIpBgpSummary};
pub use environment::{Fan, PowerSupply, ShowEnvironmentPower, TempSensor};
pub use interfaces::{
    InterfaceAddress, InterfaceCounters, InterfaceDetail, IpAddress, ShowInterfaces,
    ShowInterfacesSwitchport, Switchport, SwitchportInfo,
};
pub use lldp::{LldpNeighbor, ShowLldpNeighbors};
pub use mac::{MacTable, MulticastEntry, MulticastTable, ShowMacAddressTable, UnicastEntry};
pub use ptp::{PtpClockSummary, PtpIntfSummary, PtpIntfVlanSummary, ShowPtp};
pub use queue_monitor::{QueueMonitorEntry, ShowQueueMonitorLength};
pub use route::{Route, RouteVrf, ShowIpRoute, Via};
pub use version::{ShowHostname, ShowVersion};

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept a JSON string or number and keep it as a string.
///
/// Some EOS releases report AS numbers as integers, others as strings.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}
