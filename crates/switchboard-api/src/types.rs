// Wire types for the northbound switch API.
//
// Field names follow the JSON payloads verbatim; optional fields default
// so partially populated inventories still decode.

use serde::{Deserialize, Serialize};

/// One entry of `GET /api/switch/list`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchInfo {
    pub switch_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "common-name")]
    pub common_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default, rename = "pop-location", alias = "pop")]
    pub pop_location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, rename = "controller-switch")]
    pub controller_switch: Option<bool>,
    #[serde(default, rename = "inventory-switch")]
    pub inventory_switch: Option<bool>,
}

/// One entry of `GET /api/switch/{switch_id}/flows`.
///
/// Only the fields the table needs are modelled; everything else in the
/// flow payload is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowInfo {
    #[serde(default, alias = "flowid")]
    pub flow_id: Option<String>,
    #[serde(default)]
    pub maximum_bandwidth: Option<u64>,
    #[serde(default)]
    pub status: Option<String>,
}
