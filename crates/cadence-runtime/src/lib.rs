//! Cadence Runtime - Centralized per-frame callback dispatch
//!
//! Instead of every component hooking the frame loop on its own, components
//! register with one dispatcher and are called in a single sweep per phase:
//! - `FrameDispatcher` — per-phase registries with add/remove/has and sweeps
//! - `FrameTarget` / `FrameContext` — the callback trait and its call context
//! - `Lifeline` / `LivenessHandle` — destruction detection for evicting stale targets
//! - `FrameClock` / `FrameLoop` — fixed-timestep clock driving the four phases
//! - `DispatcherConfig` — TOML-loadable settings

mod clock;
mod config;
mod dispatcher;
mod frame_loop;
mod liveness;
mod registry;
mod target;

pub use cadence_core::{CadenceError, Phase, Result};
pub use clock::FrameClock;
pub use config::DispatcherConfig;
pub use dispatcher::{FrameDispatcher, SweepStats};
pub use frame_loop::{FrameLoop, FrameReport};
pub use liveness::{Lifeline, LivenessHandle};
pub use target::{FrameContext, FrameTarget, TargetRef};
