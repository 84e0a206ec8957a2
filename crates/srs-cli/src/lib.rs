//! CLI library components for Star Rating Studio.

pub mod logging;
pub mod session;
pub mod settings;
