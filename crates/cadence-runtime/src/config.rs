//! Dispatcher configuration
//!
//! Every field has a default, so an empty TOML file is a valid config:
//!
//! ```toml
//! verbose = true
//! fixed_timestep_hz = 50.0
//! max_frame_time = 0.1
//! ```

use cadence_core::{CadenceError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings for a [`FrameDispatcher`](crate::FrameDispatcher) and its frame loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Trace registration, removal and eviction events at debug level
    #[serde(default)]
    pub verbose: bool,
    /// Rate of the `FixedUpdate` phase
    #[serde(default = "default_fixed_timestep_hz")]
    pub fixed_timestep_hz: f64,
    /// Longest frame delta the clock will report, in seconds
    #[serde(default = "default_max_frame_time")]
    pub max_frame_time: f64,
}

fn default_fixed_timestep_hz() -> f64 {
    60.0
}

fn default_max_frame_time() -> f64 {
    0.25
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            fixed_timestep_hz: default_fixed_timestep_hz(),
            max_frame_time: default_max_frame_time(),
        }
    }
}

impl DispatcherConfig {
    /// Parse and validate a config from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: DispatcherConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.fixed_timestep_hz.is_finite() && self.fixed_timestep_hz > 0.0) {
            return Err(CadenceError::Config(format!(
                "fixed_timestep_hz must be a positive number, got {}",
                self.fixed_timestep_hz
            )));
        }
        if !(self.max_frame_time.is_finite() && self.max_frame_time > 0.0) {
            return Err(CadenceError::Config(format!(
                "max_frame_time must be a positive number, got {}",
                self.max_frame_time
            )));
        }
        Ok(())
    }

    /// Interval between fixed steps, in seconds
    pub fn fixed_timestep(&self) -> f64 {
        1.0 / self.fixed_timestep_hz
    }
}
