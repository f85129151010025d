//! `show ip route`

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::show_command;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowIpRoute {
    pub vrfs: BTreeMap<String, RouteVrf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteVrf {
    /// Routes keyed by prefix, e.g. `10.0.0.0/24`.
    pub routes: BTreeMap<String, Route>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Route {
    pub kernel_programmed: bool,
    pub directly_connected: bool,
    pub preference: u32,
    pub route_action: String,
    pub vias: Vec<Via>,
    pub metric: u32,
    pub hardware_programmed: bool,
    pub route_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Via {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nexthop_addr: Option<String>,
}

impl ShowIpRoute {
    /// A route in the default VRF.
    pub fn default_route(&self, prefix: &str) -> Option<&Route> {
        self.vrfs.get("default")?.routes.get(prefix)
    }
}

show_command!(ShowIpRoute, "show ip route");
