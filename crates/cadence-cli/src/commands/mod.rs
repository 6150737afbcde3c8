//! CLI command implementations

pub mod phases;
pub mod simulate;
