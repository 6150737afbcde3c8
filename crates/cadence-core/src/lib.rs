//! Cadence Core - Foundational types for the Cadence frame dispatcher
//!
//! This crate provides the types shared by every Cadence crate:
//! - `Phase` - The fixed set of frame-cycle points targets can register for
//! - Error types and Result alias

mod error;
mod phase;

pub use error::{CadenceError, Result};
pub use phase::Phase;
