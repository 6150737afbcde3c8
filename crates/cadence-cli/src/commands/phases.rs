//! Phases command

use anyhow::Result;
use cadence_core::Phase;

pub fn run() -> Result<()> {
    for phase in Phase::ALL {
        let timing = if phase.is_fixed_rate() {
            "fixed timestep, zero or more times per frame"
        } else {
            "frame delta, once per frame"
        };
        println!("{:<18} {}", phase, timing);
    }
    Ok(())
}
