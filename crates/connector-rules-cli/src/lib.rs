//! CLI library components for the connector rules validator.

pub mod batch;
pub mod logging;
