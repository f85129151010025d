//! `show environment power`

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::show_command;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShowEnvironmentPower {
    /// Power supplies keyed by slot number.
    pub power_supplies: BTreeMap<String, PowerSupply>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PowerSupply {
    pub model_name: String,
    pub capacity: f64,
    pub input_current: f64,
    pub output_current: f64,
    pub output_power: f64,
    pub state: String,
    pub uptime: f64,
    pub temp_sensors: BTreeMap<String, TempSensor>,
    pub fans: BTreeMap<String, Fan>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TempSensor {
    pub status: String,
    pub temperature: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fan {
    pub status: String,
    pub speed: u32,
}

impl ShowEnvironmentPower {
    /// Supplies whose state is not `ok`.
    pub fn failed(&self) -> impl Iterator<Item = (&String, &PowerSupply)> {
        self.power_supplies
            .iter()
            .filter(|(_, psu)| !psu.state.eq_ignore_ascii_case("ok"))
    }
}

show_command!(ShowEnvironmentPower, "show environment power");
