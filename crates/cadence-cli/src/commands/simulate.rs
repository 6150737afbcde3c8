//! Simulate command: headless frame loop over synthetic targets

use anyhow::{Context, Result};
use cadence_core::Phase;
use cadence_runtime::{
    DispatcherConfig, FrameContext, FrameDispatcher, FrameLoop, FrameTarget, Lifeline,
    LivenessHandle, SweepStats, TargetRef,
};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

pub struct SimulateArgs {
    pub targets: usize,
    pub frames: u64,
    pub frame_time: f64,
    pub destroy_every: Option<usize>,
    pub phases: Vec<Phase>,
    pub config: Option<String>,
    pub verbose: bool,
}

/// Synthetic target that counts its handler calls
struct Counter {
    name: String,
    host: Lifeline,
    calls: Cell<u64>,
}

impl FrameTarget for Counter {
    fn liveness(&self) -> Option<LivenessHandle> {
        Some(self.host.handle())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn update(&self, _cx: &FrameContext<'_>) {
        self.calls.set(self.calls.get() + 1);
    }

    fn late_update(&self, _cx: &FrameContext<'_>) {
        self.calls.set(self.calls.get() + 1);
    }

    fn fixed_update(&self, _cx: &FrameContext<'_>) {
        self.calls.set(self.calls.get() + 1);
    }

    fn post_late_update(&self, _cx: &FrameContext<'_>) {
        self.calls.set(self.calls.get() + 1);
    }
}

/// Load the config file (if any) and merge the `--verbose` flag into it
fn resolve_config(path: Option<&str>, verbose: bool) -> Result<DispatcherConfig> {
    let mut config = match path {
        Some(path) => DispatcherConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config '{}'", path))?,
        None => DispatcherConfig::default(),
    };
    config.verbose |= verbose;
    Ok(config)
}

pub fn run(args: SimulateArgs) -> Result<()> {
    let config = resolve_config(args.config.as_deref(), args.verbose)?;
    crate::init_logging(config.verbose);

    let phases = if args.phases.is_empty() {
        Phase::ALL.to_vec()
    } else {
        args.phases.clone()
    };

    let dispatcher = FrameDispatcher::with_config(&config);
    let mut frame_loop = FrameLoop::from_config(&config);

    let counters: Vec<Rc<Counter>> = (0..args.targets)
        .map(|i| {
            Rc::new(Counter {
                name: format!("counter-{}", i),
                host: Lifeline::new(),
                calls: Cell::new(0),
            })
        })
        .collect();

    for (i, counter) in counters.iter().enumerate() {
        let target: TargetRef = counter.clone();
        dispatcher
            .add(phases[i % phases.len()], &target)
            .context("Failed to register target")?;
    }
    log::info!(
        "registered {} targets across {} phase(s)",
        dispatcher.total_len(),
        phases.len()
    );

    let halfway = args.frames / 2;
    let mut totals = [SweepStats::default(); Phase::COUNT];
    let mut fixed_steps = 0u64;
    let start = Instant::now();

    for frame in 0..args.frames {
        if frame == halfway {
            if let Some(every) = args.destroy_every.filter(|n| *n > 0) {
                let destroyed = counters
                    .iter()
                    .step_by(every)
                    .inspect(|c| c.host.destroy())
                    .count();
                log::info!("frame {}: destroyed {} hosts", frame, destroyed);
            }
        }

        let report = frame_loop.step(&dispatcher, args.frame_time);
        fixed_steps += u64::from(report.fixed_steps);
        for phase in Phase::ALL {
            totals[phase.index()] += report.phase(phase);
        }
    }

    let elapsed = start.elapsed().as_secs_f64();
    let invoked: usize = totals.iter().map(|s| s.invoked).sum();
    let evicted: usize = totals.iter().map(|s| s.evicted).sum();

    println!("Frames:        {}", args.frames);
    println!("Fixed steps:   {}", fixed_steps);
    println!("{:<18} {:>10} {:>8} {:>10}", "phase", "invoked", "evicted", "remaining");
    for phase in Phase::ALL {
        let stats = totals[phase.index()];
        println!(
            "{:<18} {:>10} {:>8} {:>10}",
            phase,
            stats.invoked,
            stats.evicted,
            dispatcher.len(phase)
        );
    }
    println!("Handler calls: {}", invoked);
    println!("Evictions:     {}", evicted);
    println!("Call sum:      {}", counters.iter().map(|c| c.calls.get()).sum::<u64>());
    if elapsed > 0.0 {
        println!(
            "Elapsed:       {:.3}s ({:.0} calls/s)",
            elapsed,
            invoked as f64 / elapsed
        );
    }

    Ok(())
}
