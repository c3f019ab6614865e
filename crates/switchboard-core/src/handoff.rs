// ── Detail hand-off and navigation seams ──

/// Session key holding the JSON-encoded `SwitchDetails`.
pub const SWITCH_DETAILS_KEY: &str = "switchDetailsJSON";
/// Session key holding the active search flag.
pub const SWITCH_FILTER_FLAG_KEY: &str = "switchFilterFlag";

/// Short-lived key/value store shared between screens.
pub trait SessionStore {
    fn set_item(&self, key: &str, value: String);
    fn get_item(&self, key: &str) -> Option<String>;
}

/// Navigation targets reachable from the switch table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Switches,
    SwitchDetails { switch_id: String },
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Self::Switches => "/switches".into(),
            Self::SwitchDetails { switch_id } => format!("/switches/details/{switch_id}"),
        }
    }
}

pub trait Navigator {
    fn navigate(&self, route: Route);
}
