//! Centralized per-phase dispatch
//!
//! A [`FrameDispatcher`] owns one registry per [`Phase`]. Components register
//! with [`add`](FrameDispatcher::add) and are then called once per sweep of
//! that phase, in registration order, until they are removed or their backing
//! object is destroyed.
//!
//! Sweeps walk a snapshot of the registry, so callbacks may freely add and
//! remove targets (themselves included) on any phase. A target removed during
//! a sweep is not called later in that sweep; a target added during a sweep
//! gets its inline first call from `add` and joins the next sweep.

use crate::config::DispatcherConfig;
use crate::registry::PhaseRegistry;
use crate::target::{FrameContext, TargetRef};
use cadence_core::{CadenceError, Phase, Result};
use log::{debug, warn};
use std::cell::{Cell, RefCell};
use std::ops::AddAssign;

/// Outcome of one sweep over a phase
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepStats {
    /// Registrations examined
    pub visited: usize,
    /// Handlers called
    pub invoked: usize,
    /// Registrations dropped because their backing object was gone
    pub evicted: usize,
}

impl AddAssign for SweepStats {
    fn add_assign(&mut self, other: Self) {
        self.visited += other.visited;
        self.invoked += other.invoked;
        self.evicted += other.evicted;
    }
}

/// Registers frame targets per phase and calls them once per sweep.
///
/// Not thread-safe: registration and dispatch are driven from one thread.
/// Every method takes `&self` so callbacks can reach the dispatcher through
/// their [`FrameContext`] while a sweep is in progress.
pub struct FrameDispatcher {
    registries: [RefCell<PhaseRegistry>; Phase::COUNT],
    /// Timing value last used for each phase
    timing: [Cell<f64>; Phase::COUNT],
    verbose: Cell<bool>,
}

impl Default for FrameDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDispatcher {
    /// Create a dispatcher with empty registries and a 60Hz fixed timestep
    pub fn new() -> Self {
        Self::with_config(&DispatcherConfig::default())
    }

    pub fn with_config(config: &DispatcherConfig) -> Self {
        let dispatcher = Self {
            registries: std::array::from_fn(|_| RefCell::new(PhaseRegistry::new())),
            timing: std::array::from_fn(|_| Cell::new(0.0)),
            verbose: Cell::new(config.verbose),
        };
        dispatcher.timing[Phase::FixedUpdate.index()].set(config.fixed_timestep());
        dispatcher
    }

    /// Toggle debug tracing of registration and eviction events
    pub fn set_verbose(&self, verbose: bool) {
        self.verbose.set(verbose);
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose.get()
    }

    /// The timing value `phase` will pass to an inline first call
    pub fn current_delta(&self, phase: Phase) -> f64 {
        self.timing[phase.index()].get()
    }

    fn registry(&self, phase: Phase) -> &RefCell<PhaseRegistry> {
        &self.registries[phase.index()]
    }

    /// Register `target` for `phase`.
    ///
    /// On success the target receives `on_added` and then one handler call
    /// with the phase's current timing value before this returns. Returns
    /// `Ok(false)` without side effects if the target was already registered.
    pub fn add(&self, phase: Phase, target: &TargetRef) -> Result<bool> {
        let Some(liveness) = target.liveness() else {
            return Err(self.reject("add", phase, target));
        };

        if !self.registry(phase).borrow_mut().push(target.clone(), liveness) {
            return Ok(false);
        }

        if self.is_verbose() {
            debug!(
                "[{}] added '{}' ({} registered)",
                phase,
                target.name(),
                self.len(phase)
            );
        }

        let cx = FrameContext::new(self, target, phase, self.current_delta(phase));
        target.on_added(&cx);

        // on_added may have removed the target again
        if self.registry(phase).borrow().is_active(target) {
            cx.invoke_handler();
        }

        Ok(true)
    }

    /// Unregister `target` from `phase`.
    ///
    /// `on_removed` fires first, while the target is still registered, then
    /// the registration is dropped. Returns `Ok(false)` without side effects if
    /// the target was not registered or its removal is already in progress.
    pub fn remove(&self, phase: Phase, target: &TargetRef) -> Result<bool> {
        if target.liveness().is_none() {
            return Err(self.reject("remove", phase, target));
        }
        let removed = self.detach(phase, target);
        if removed && self.is_verbose() {
            debug!(
                "[{}] removed '{}' ({} registered)",
                phase,
                target.name(),
                self.len(phase)
            );
        }
        Ok(removed)
    }

    /// Whether `target` is registered for `phase`
    pub fn has(&self, phase: Phase, target: &TargetRef) -> bool {
        self.registry(phase).borrow().contains(target)
    }

    /// Number of targets registered for `phase`
    pub fn len(&self, phase: Phase) -> usize {
        self.registry(phase).borrow().len()
    }

    pub fn is_empty(&self, phase: Phase) -> bool {
        self.registry(phase).borrow().is_empty()
    }

    /// Number of registrations across all phases
    pub fn total_len(&self) -> usize {
        Phase::ALL.into_iter().map(|p| self.len(p)).sum()
    }

    fn reject(&self, op: &str, phase: Phase, target: &TargetRef) -> CadenceError {
        warn!(
            "[{}] {} rejected: '{}' has no liveness handle",
            phase,
            op,
            target.name()
        );
        CadenceError::NotRegistrable {
            target: target.name().to_string(),
        }
    }

    fn detach(&self, phase: Phase, target: &TargetRef) -> bool {
        if !self.registry(phase).borrow_mut().begin_removal(target) {
            return false;
        }

        let cx = FrameContext::new(self, target, phase, self.current_delta(phase));
        target.on_removed(&cx);

        self.registry(phase).borrow_mut().finish_removal(target);
        true
    }

    /// Run one sweep of `phase`, passing `delta` to every live target
    pub fn dispatch(&self, phase: Phase, delta: f64) -> SweepStats {
        self.timing[phase.index()].set(delta);

        let mut stats = SweepStats::default();
        let snapshot = {
            let registry = self.registry(phase).borrow();
            if registry.is_empty() {
                return stats;
            }
            registry.snapshot()
        };

        for registration in &snapshot {
            let target = &registration.target;
            // skip entries removed earlier in this sweep, even if re-added since
            if !self
                .registry(phase)
                .borrow()
                .is_current(target, registration.id)
            {
                continue;
            }
            stats.visited += 1;

            if !registration.liveness.is_alive() {
                if self.detach(phase, target) {
                    stats.evicted += 1;
                    if self.is_verbose() {
                        debug!(
                            "[{}] evicted '{}': backing object destroyed",
                            phase,
                            target.name()
                        );
                    }
                }
                continue;
            }

            FrameContext::new(self, target, phase, delta).invoke_handler();
            stats.invoked += 1;
        }

        stats
    }

    /// Sweep `Update` with the frame delta
    pub fn update(&self, delta: f64) -> SweepStats {
        self.dispatch(Phase::Update, delta)
    }

    /// Sweep `LateUpdate` with the frame delta
    pub fn late_update(&self, delta: f64) -> SweepStats {
        self.dispatch(Phase::LateUpdate, delta)
    }

    /// Sweep `FixedUpdate` with the fixed timestep
    pub fn fixed_update(&self, fixed_delta: f64) -> SweepStats {
        self.dispatch(Phase::FixedUpdate, fixed_delta)
    }

    /// Sweep `PostLateUpdate` with the frame delta
    pub fn post_late_update(&self, delta: f64) -> SweepStats {
        self.dispatch(Phase::PostLateUpdate, delta)
    }
}
