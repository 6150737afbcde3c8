//! Liveness handles for detecting destroyed backing objects

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Host-side destruction flag for the object a target is attached to.
///
/// The owner keeps the `Lifeline`; registrations keep [`LivenessHandle`]s
/// obtained from [`Lifeline::handle`]. Destroying or dropping the lifeline
/// makes every handle report dead.
pub struct Lifeline {
    alive: Rc<Cell<bool>>,
}

impl Default for Lifeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifeline {
    pub fn new() -> Self {
        Self {
            alive: Rc::new(Cell::new(true)),
        }
    }

    /// Mark the backing object as destroyed
    pub fn destroy(&self) {
        self.alive.set(false);
    }

    pub fn is_alive(&self) -> bool {
        self.alive.get()
    }

    /// A handle that observes this lifeline
    pub fn handle(&self) -> LivenessHandle {
        LivenessHandle {
            probe: Probe::Flag(Rc::clone(&self.alive)),
        }
    }
}

impl Drop for Lifeline {
    fn drop(&mut self) {
        self.alive.set(false);
    }
}

impl fmt::Debug for Lifeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifeline")
            .field("alive", &self.alive.get())
            .finish()
    }
}

#[derive(Clone)]
enum Probe {
    Flag(Rc<Cell<bool>>),
    Predicate(Rc<dyn Fn() -> bool>),
}

/// O(1) "is the backing object still alive?" query, stored next to each registration.
#[derive(Clone)]
pub struct LivenessHandle {
    probe: Probe,
}

impl LivenessHandle {
    /// Alive while `weak` can still be upgraded
    pub fn watch<T: ?Sized + 'static>(weak: Weak<T>) -> Self {
        Self::from_fn(move || weak.strong_count() > 0)
    }

    /// Alive while `predicate` returns true
    pub fn from_fn(predicate: impl Fn() -> bool + 'static) -> Self {
        Self {
            probe: Probe::Predicate(Rc::new(predicate)),
        }
    }

    /// A handle that never reports dead, for targets with no backing object
    pub fn immortal() -> Self {
        Self {
            probe: Probe::Flag(Rc::new(Cell::new(true))),
        }
    }

    pub fn is_alive(&self) -> bool {
        match &self.probe {
            Probe::Flag(flag) => flag.get(),
            Probe::Predicate(predicate) => predicate(),
        }
    }
}

impl fmt::Debug for LivenessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LivenessHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}
