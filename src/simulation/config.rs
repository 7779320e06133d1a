//! Timing configuration for the signal controller

use anyhow::{ensure, Result};
use std::time::Duration;

use super::types::{DEFAULT_CYCLE_MS, MICRO_PAUSE_MS, PAUSE_RED_MS};

/// Timing parameters for one intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingConfig {
    /// How long a green phase is held before the next transition starts
    pub cycle: Duration,
    /// All-red clearance after the current green is cleared
    pub pause_red: Duration,
    /// Pause between the re-asserted all-red and the next green
    pub micro_pause: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            cycle: Duration::from_millis(DEFAULT_CYCLE_MS),
            pause_red: Duration::from_millis(PAUSE_RED_MS),
            micro_pause: Duration::from_millis(MICRO_PAUSE_MS),
        }
    }
}

impl TimingConfig {
    /// Default phase pauses with a custom cycle
    pub fn with_cycle(cycle: Duration) -> Self {
        Self {
            cycle,
            ..Self::default()
        }
    }

    /// Build a config from millisecond values, as supplied on the command line
    pub fn from_millis(cycle_ms: u64, pause_red_ms: u64, micro_pause_ms: u64) -> Result<Self> {
        let config = Self {
            cycle: Duration::from_millis(cycle_ms),
            pause_red: Duration::from_millis(pause_red_ms),
            micro_pause: Duration::from_millis(micro_pause_ms),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.cycle.is_zero(), "cycle duration must be positive");
        ensure!(!self.pause_red.is_zero(), "all-red pause must be positive");
        ensure!(!self.micro_pause.is_zero(), "micro pause must be positive");
        Ok(())
    }

    /// Time from the start of a transition until the next green shows
    pub fn transition_window(&self) -> Duration {
        self.pause_red + self.micro_pause
    }
}
