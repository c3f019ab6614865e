// ── API → domain conversions ──

use switchboard_api::types::{FlowInfo, SwitchInfo};

use crate::model::{FlowRecord, SwitchRow};

impl From<SwitchInfo> for SwitchRow {
    fn from(info: SwitchInfo) -> Self {
        Self {
            switch_id: info.switch_id,
            name: info.name,
            common_name: info.common_name,
            address: info.address,
            hostname: info.hostname,
            pop_location: info.pop_location,
            description: info.description,
            state: info.state,
            controller_switch: info.controller_switch,
            inventory_switch: info.inventory_switch,
        }
    }
}

impl From<FlowInfo> for FlowRecord {
    fn from(info: FlowInfo) -> Self {
        Self {
            flow_id: info.flow_id,
            maximum_bandwidth: info.maximum_bandwidth.unwrap_or(0),
        }
    }
}
