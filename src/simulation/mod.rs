//! Standalone intersection simulation module
//!
//! This module contains all the signal control logic that can run
//! independently of the Bevy game engine. It can be tested via console
//! without needing to boot up the full game.

mod config;
mod controller;
mod host;
mod render;
mod scheduler;
mod stats;
mod types;

pub use config::TimingConfig;
pub use controller::{IntersectionController, SignalEvent, TransitionPhase};
pub use host::{
    CommandOutcome, ExitOutcome, IntersectionHost, LoopExit, ProcessExiter, UnsupportedExit,
    UserCommand,
};
pub use render::draw_intersection;
pub use scheduler::{FiredTimer, TimerEvent, TimerQueue, TimerSlot};
pub use stats::SignalStats;
pub use types::{Approach, LightState, Signal, DEFAULT_CYCLE_MS, MICRO_PAUSE_MS, PAUSE_RED_MS};
