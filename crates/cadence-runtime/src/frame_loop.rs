//! Frame loop: drives all four phases of a dispatcher from a [`FrameClock`]

use crate::clock::FrameClock;
use crate::config::DispatcherConfig;
use crate::dispatcher::{FrameDispatcher, SweepStats};
use cadence_core::Phase;

/// What happened during one frame
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FrameReport {
    /// Frame delta passed to the variable-rate phases
    pub delta: f64,
    /// Number of `FixedUpdate` sweeps run this frame
    pub fixed_steps: u32,
    phases: [SweepStats; Phase::COUNT],
}

impl FrameReport {
    /// Stats for one phase, summed over all its sweeps this frame
    pub fn phase(&self, phase: Phase) -> SweepStats {
        self.phases[phase.index()]
    }

    /// Stats summed over every phase
    pub fn total(&self) -> SweepStats {
        let mut total = SweepStats::default();
        for stats in self.phases {
            total += stats;
        }
        total
    }

    fn record(&mut self, phase: Phase, stats: SweepStats) {
        self.phases[phase.index()] += stats;
    }
}

/// Calls a dispatcher's phases once per frame.
///
/// Order within a frame: `Update`, `LateUpdate`, one `FixedUpdate` per
/// accumulated fixed step (possibly none), then `PostLateUpdate`.
pub struct FrameLoop {
    pub clock: FrameClock,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            clock: FrameClock::new(),
        }
    }

    pub fn from_config(config: &DispatcherConfig) -> Self {
        Self {
            clock: FrameClock::from_config(config),
        }
    }

    /// Run one frame timed from the wall clock
    pub fn tick(&mut self, dispatcher: &FrameDispatcher) -> FrameReport {
        self.clock.tick();
        self.run_phases(dispatcher)
    }

    /// Run one frame with an explicit elapsed time
    pub fn step(&mut self, dispatcher: &FrameDispatcher, elapsed: f64) -> FrameReport {
        self.clock.advance(elapsed);
        self.run_phases(dispatcher)
    }

    fn run_phases(&mut self, dispatcher: &FrameDispatcher) -> FrameReport {
        let delta = self.clock.delta_time;
        let mut report = FrameReport {
            delta,
            ..FrameReport::default()
        };

        report.record(Phase::Update, dispatcher.update(delta));
        report.record(Phase::LateUpdate, dispatcher.late_update(delta));

        while self.clock.should_fixed_update() {
            let step = self.clock.fixed_timestep;
            report.record(Phase::FixedUpdate, dispatcher.fixed_update(step));
            self.clock.consume_fixed_step();
            report.fixed_steps += 1;
        }

        report.record(Phase::PostLateUpdate, dispatcher.post_late_update(delta));
        report
    }
}
