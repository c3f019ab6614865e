//! Reusable rendering widgets.

pub mod grid;
pub mod status_indicator;
