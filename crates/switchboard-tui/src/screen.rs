//! Screen identifiers and their mapping from navigation routes.

use std::fmt;

use switchboard_core::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Switches,
    SwitchDetail,
}

impl ScreenId {
    pub fn label(self) -> &'static str {
        match self {
            Self::Switches => "Switches",
            Self::SwitchDetail => "Switch Details",
        }
    }
}

impl From<&Route> for ScreenId {
    fn from(route: &Route) -> Self {
        match route {
            Route::Switches => Self::Switches,
            Route::SwitchDetails { .. } => Self::SwitchDetail,
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
