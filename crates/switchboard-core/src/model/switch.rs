// ── Switch domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// One switch as shown in the table. Supplied externally and replaced
/// wholesale; never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchRow {
    pub switch_id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Operator-assigned alias, preferred over `name` for display.
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

impl SwitchRow {
    /// Construct a row with only the identifier set.
    pub fn new(switch_id: impl Into<String>) -> Self {
        Self {
            switch_id: switch_id.into(),
            ..Self::default()
        }
    }

    /// Whether the switch reports itself as active.
    pub fn is_active(&self) -> bool {
        self.state
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("activated") || s.eq_ignore_ascii_case("active"))
    }

    /// The raw text of a row-backed column. Derived columns (discrepancy,
    /// flow summaries) return `None`.
    pub fn text(&self, field: SwitchField) -> Option<&str> {
        match field {
            SwitchField::SwitchId => Some(&self.switch_id),
            SwitchField::Name => self.name.as_deref(),
            SwitchField::Address => self.address.as_deref(),
            SwitchField::Hostname => self.hostname.as_deref(),
            SwitchField::PopLocation => self.pop_location.as_deref(),
            SwitchField::Description => self.description.as_deref(),
            SwitchField::State => self.state.as_deref(),
            SwitchField::Discrepancy | SwitchField::SumOfBandwidth | SwitchField::NoOfFlows => {
                None
            }
        }
    }
}

/// Table columns in display order. A column's grid index is its position
/// in [`SwitchField::ALL`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SwitchField {
    SwitchId,
    Name,
    Address,
    Hostname,
    Discrepancy,
    PopLocation,
    Description,
    SumOfBandwidth,
    NoOfFlows,
    State,
}

impl SwitchField {
    pub const ALL: [SwitchField; 10] = [
        Self::SwitchId,
        Self::Name,
        Self::Address,
        Self::Hostname,
        Self::Discrepancy,
        Self::PopLocation,
        Self::Description,
        Self::SumOfBandwidth,
        Self::NoOfFlows,
        Self::State,
    ];

    /// Grid column index.
    pub fn index(self) -> usize {
        match self {
            Self::SwitchId => 0,
            Self::Name => 1,
            Self::Address => 2,
            Self::Hostname => 3,
            Self::Discrepancy => 4,
            Self::PopLocation => 5,
            Self::Description => 6,
            Self::SumOfBandwidth => 7,
            Self::NoOfFlows => 8,
            Self::State => 9,
        }
    }

    /// Column at a grid index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Column header text.
    pub fn label(self) -> &'static str {
        match self {
            Self::SwitchId => "Switch ID",
            Self::Name => "Name",
            Self::Address => "Address",
            Self::Hostname => "Hostname",
            Self::Discrepancy => "Discrepancy",
            Self::PopLocation => "PoP",
            Self::Description => "Description",
            Self::SumOfBandwidth => "Bandwidth (Mbps)",
            Self::NoOfFlows => "Flows",
            Self::State => "State",
        }
    }
}

/// Row-detail payload handed to the detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchDetails {
    pub switch_id: String,
    pub name: Option<String>,
    #[serde(rename = "common-name")]
    pub common_name: Option<String>,
    pub address: Option<String>,
    pub hostname: Option<String>,
    pub description: Option<String>,
    pub state: Option<String>,
}

impl From<&SwitchRow> for SwitchDetails {
    fn from(row: &SwitchRow) -> Self {
        Self {
            switch_id: row.switch_id.clone(),
            name: row.name.clone(),
            common_name: row.common_name.clone(),
            address: row.address.clone(),
            hostname: row.hostname.clone(),
            description: row.description.clone(),
            state: row.state.clone(),
        }
    }
}
