//! Screen implementations. Each screen is a top-level Component.

pub mod switch_detail;
pub mod switches;
