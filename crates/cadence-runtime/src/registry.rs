//! Per-phase registry of frame targets

use crate::liveness::LivenessHandle;
use crate::target::{same_target, TargetRef};

/// A target together with the handle that says whether its backing object still exists
#[derive(Clone)]
pub(crate) struct Registration {
    /// Unique per push; a target removed and re-added gets a new id
    pub id: u64,
    pub target: TargetRef,
    pub liveness: LivenessHandle,
}

/// Ordered registrations for a single phase.
///
/// Order is registration order. A target appears at most once. Targets whose
/// `on_removed` notification is running stay in `entries` (they are still
/// registered) and are also listed in `removing` so a second removal of the
/// same target is ignored.
#[derive(Default)]
pub(crate) struct PhaseRegistry {
    entries: Vec<Registration>,
    removing: Vec<TargetRef>,
    next_id: u64,
}

impl PhaseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, target: &TargetRef) -> Option<usize> {
        self.entries
            .iter()
            .position(|r| same_target(&r.target, target))
    }

    pub fn contains(&self, target: &TargetRef) -> bool {
        self.position(target).is_some()
    }

    pub fn is_removing(&self, target: &TargetRef) -> bool {
        self.removing.iter().any(|t| same_target(t, target))
    }

    /// Registered and not on its way out
    pub fn is_active(&self, target: &TargetRef) -> bool {
        self.contains(target) && !self.is_removing(target)
    }

    /// Whether registration `id` is still the live, active entry for `target`
    pub fn is_current(&self, target: &TargetRef, id: u64) -> bool {
        self.position(target)
            .is_some_and(|i| self.entries[i].id == id)
            && !self.is_removing(target)
    }

    /// Append a registration. Returns false if the target is already present.
    pub fn push(&mut self, target: TargetRef, liveness: LivenessHandle) -> bool {
        if self.contains(&target) {
            return false;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Registration {
            id,
            target,
            liveness,
        });
        true
    }

    /// Mark a registered target as being removed.
    ///
    /// Returns false if the target is absent or already being removed.
    pub fn begin_removal(&mut self, target: &TargetRef) -> bool {
        if !self.is_active(target) {
            return false;
        }
        self.removing.push(target.clone());
        true
    }

    /// Drop the registration and its removal mark, preserving the order of the rest
    pub fn finish_removal(&mut self, target: &TargetRef) -> Option<Registration> {
        self.removing.retain(|t| !same_target(t, target));
        let index = self.position(target)?;
        Some(self.entries.remove(index))
    }

    /// Copy of the current registrations, for walking while callbacks mutate `self`
    pub fn snapshot(&self) -> Vec<Registration> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
