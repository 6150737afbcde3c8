//! Frame target trait and the context passed to its callbacks

use crate::dispatcher::FrameDispatcher;
use crate::liveness::LivenessHandle;
use cadence_core::{Phase, Result};
use std::rc::Rc;

/// Shared handle to a registered target. Identity is the allocation.
pub type TargetRef = Rc<dyn FrameTarget>;

/// A component that can be registered with a [`FrameDispatcher`]
///
/// Only [`liveness`](FrameTarget::liveness) is required; every callback has
/// an empty default body. Callbacks take `&self` because the dispatcher may
/// call back into the same target re-entrantly (a handler that adds the
/// target to another phase receives that phase's `on_added` immediately).
pub trait FrameTarget {
    /// Handle used to detect that the backing object was destroyed.
    ///
    /// Returning `None` marks the target as not registrable: `add` and
    /// `remove` reject it without touching any registry.
    fn liveness(&self) -> Option<LivenessHandle>;

    /// Human-readable name for diagnostics
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Called once per frame with the variable frame delta
    fn update(&self, _cx: &FrameContext<'_>) {}

    /// Called once per frame after `update`
    fn late_update(&self, _cx: &FrameContext<'_>) {}

    /// Called once per fixed step with the fixed timestep
    fn fixed_update(&self, _cx: &FrameContext<'_>) {}

    /// Called once per frame after `late_update`
    fn post_late_update(&self, _cx: &FrameContext<'_>) {}

    /// Called when the target joins a phase, before its first handler call
    fn on_added(&self, _cx: &FrameContext<'_>) {}

    /// Called when the target leaves a phase, while it is still registered
    fn on_removed(&self, _cx: &FrameContext<'_>) {}
}

/// Everything a callback can see about the call it is in
pub struct FrameContext<'a> {
    dispatcher: &'a FrameDispatcher,
    target: &'a TargetRef,
    phase: Phase,
    delta: f64,
}

impl<'a> FrameContext<'a> {
    pub(crate) fn new(
        dispatcher: &'a FrameDispatcher,
        target: &'a TargetRef,
        phase: Phase,
        delta: f64,
    ) -> Self {
        Self {
            dispatcher,
            target,
            phase,
            delta,
        }
    }

    /// The dispatcher driving this call; safe to add/remove through
    pub fn dispatcher(&self) -> &'a FrameDispatcher {
        self.dispatcher
    }

    /// The target being called, as registered
    pub fn target(&self) -> &'a TargetRef {
        self.target
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Timing value for this call: the fixed timestep for `FixedUpdate`,
    /// the frame delta otherwise
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Whether the target is currently registered for this phase
    pub fn is_registered(&self) -> bool {
        self.dispatcher.has(self.phase, self.target)
    }

    /// Remove the target from this phase
    pub fn remove_self(&self) -> Result<bool> {
        self.dispatcher.remove(self.phase, self.target)
    }

    /// Invoke the handler matching this context's phase
    pub(crate) fn invoke_handler(&self) {
        match self.phase {
            Phase::Update => self.target.update(self),
            Phase::LateUpdate => self.target.late_update(self),
            Phase::FixedUpdate => self.target.fixed_update(self),
            Phase::PostLateUpdate => self.target.post_late_update(self),
        }
    }
}

/// Identity comparison on the target allocation, ignoring vtable metadata
pub(crate) fn same_target(a: &TargetRef, b: &TargetRef) -> bool {
    Rc::as_ptr(a).cast::<()>() == Rc::as_ptr(b).cast::<()>()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;

    impl FrameTarget for Plain {
        fn liveness(&self) -> Option<LivenessHandle> {
            Some(LivenessHandle::immortal())
        }
    }

    #[test]
    fn test_default_name_is_type_name() {
        let target = Plain;
        assert!(target.name().ends_with("Plain"));
    }

    #[test]
    fn test_same_target_is_identity() {
        let a: TargetRef = Rc::new(Plain);
        let a2 = Rc::clone(&a);
        let b: TargetRef = Rc::new(Plain);
        assert!(same_target(&a, &a2));
        assert!(!same_target(&a, &b));
    }
}
