//! CLI library components for the `cascade` driver.

pub mod logging;
pub mod render;
pub mod setup;
