//! Signal controller for a single four-way intersection
//!
//! The controller rotates right-of-way clockwise through the approaches. A
//! transition runs in three phases: the current green is cleared, then the
//! cursor advances and all-red is re-asserted, then the next approach goes
//! green. Every step is a timer on the controller's own [`TimerQueue`], so the
//! whole thing runs on virtual time and can be driven tick by tick.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::time::Duration;

use super::config::TimingConfig;
use super::scheduler::{FiredTimer, TimerEvent, TimerQueue, TimerSlot};
use super::stats::SignalStats;
use super::types::{Approach, LightState, Signal};

/// Where the controller is inside a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPhase {
    /// Steady state, exactly one approach green
    #[default]
    Idle,
    /// Current green cleared, waiting out the all-red pause
    AllRedSettling,
    /// Cursor advanced and all-red re-asserted, waiting to show the next green
    AwaitingGreen,
}

/// Observable change produced by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalEvent {
    Started { at: Duration, cycle: Duration },
    /// Phase A: the green approach turned red
    Cleared { at: Duration, approach: Approach },
    /// Phase B: cursor moved to `next`, all approaches red
    AllRedAsserted { at: Duration, next: Approach },
    /// Phase C: `approach` turned green
    Green { at: Duration, approach: Approach },
    Reset { at: Duration },
    Stopped { at: Duration },
}

impl SignalEvent {
    pub fn at(&self) -> Duration {
        match *self {
            SignalEvent::Started { at, .. }
            | SignalEvent::Cleared { at, .. }
            | SignalEvent::AllRedAsserted { at, .. }
            | SignalEvent::Green { at, .. }
            | SignalEvent::Reset { at }
            | SignalEvent::Stopped { at } => at,
        }
    }
}

/// Owns the rotation order, the light state and both timers of one intersection
#[derive(Debug)]
pub struct IntersectionController {
    timing: TimingConfig,
    lights: LightState,
    /// Index into [`Approach::ROTATION`] of the approach that is (or is about to be) green
    cursor: usize,
    phase: TransitionPhase,
    timers: TimerQueue,
    running: bool,
    /// Bumped on every observable light change
    revision: u64,
    stats: SignalStats,
}

impl IntersectionController {
    /// Create a controller that is not yet running
    pub fn new(timing: TimingConfig) -> Result<Self> {
        timing.validate().context("invalid signal timing")?;
        Ok(Self {
            timing,
            lights: LightState::initial(),
            cursor: 0,
            phase: TransitionPhase::Idle,
            timers: TimerQueue::new(),
            running: false,
            revision: 0,
            stats: SignalStats::new(),
        })
    }

    /// Create and start a controller in one step
    pub fn started(timing: TimingConfig) -> Result<Self> {
        let mut controller = Self::new(timing)?;
        controller.start(timing.cycle)?;
        Ok(controller)
    }

    /// Put the intersection in its start state and arm the cycle timer.
    ///
    /// Any running schedule is replaced. A zero `cycle` is rejected before
    /// anything is touched.
    pub fn start(&mut self, cycle: Duration) -> Result<SignalEvent> {
        let timing = TimingConfig {
            cycle,
            ..self.timing
        };
        timing.validate().context("cannot start controller")?;

        self.timers.cancel_all();
        self.timing = timing;
        self.running = true;
        self.restore_origin();

        let at = self.now();
        info!("Controller started at {:?} with cycle {:?}", at, cycle);
        Ok(SignalEvent::Started { at, cycle })
    }

    /// Back to north green with the cursor at the start, cycle timer re-armed.
    ///
    /// Has no effect once the controller has been stopped.
    pub fn reset(&mut self) -> Option<SignalEvent> {
        if !self.running {
            warn!("Reset ignored: controller is stopped");
            return None;
        }
        self.timers.cancel(TimerSlot::Cycle);
        self.timers.cancel(TimerSlot::Transition);
        self.restore_origin();
        self.stats.record_reset();

        let at = self.now();
        info!("Controller reset at {:?}", at);
        Some(SignalEvent::Reset { at })
    }

    /// Tear down: cancel every timer. No callback fires after this returns.
    pub fn stop(&mut self) -> Option<SignalEvent> {
        if !self.running {
            return None;
        }
        self.timers.cancel_all();
        self.running = false;
        self.phase = TransitionPhase::Idle;

        let at = self.now();
        info!("Controller stopped at {:?}", at);
        Some(SignalEvent::Stopped { at })
    }

    /// Snapshot of the lights for the rendering side
    pub fn current_state(&self) -> LightState {
        self.lights
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Approach under the cursor
    pub fn current_approach(&self) -> Approach {
        Approach::at(self.cursor)
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    pub fn stats(&self) -> &SignalStats {
        &self.stats
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    /// When the cycle timer will start the next transition
    pub fn next_transition_at(&self) -> Option<Duration> {
        self.timers.due_time(TimerSlot::Cycle)
    }

    /// Number of timers currently scheduled (at most one per slot)
    pub fn pending_timers(&self) -> usize {
        self.timers.pending_count()
    }

    /// Overwrite the lights without touching the schedule.
    ///
    /// Simulates external interference; the next all-red phase repairs it.
    pub fn override_lights(&mut self, lights: LightState) {
        warn!("Light state overridden externally: {}", lights);
        self.lights = lights;
        self.revision += 1;
    }

    /// Advance virtual time by `delta`, firing due timers in order
    pub fn advance_by(&mut self, delta: Duration) -> Vec<SignalEvent> {
        let until = self.now() + delta;
        self.advance_to(until)
    }

    /// Advance virtual time to `until`, firing every timer due on the way
    pub fn advance_to(&mut self, until: Duration) -> Vec<SignalEvent> {
        let mut events = Vec::new();
        while let Some(fired) = self.timers.pop_due(until) {
            events.push(self.fire(fired));
        }
        self.timers.advance_clock(until);
        events
    }

    fn restore_origin(&mut self) {
        self.cursor = 0;
        self.lights = LightState::initial();
        self.phase = TransitionPhase::Idle;
        self.revision += 1;
        self.timers
            .schedule(TimerSlot::Cycle, self.timing.cycle, TimerEvent::BeginTransition);
    }

    fn fire(&mut self, fired: FiredTimer) -> SignalEvent {
        let at = fired.at;
        match fired.event {
            TimerEvent::BeginTransition => {
                let approach = self.current_approach();
                self.lights.set(approach, Signal::Red);
                self.revision += 1;
                self.phase = TransitionPhase::AllRedSettling;
                self.timers.cancel(TimerSlot::Transition);
                self.timers.schedule(
                    TimerSlot::Transition,
                    self.timing.pause_red,
                    TimerEvent::SettleAllRed,
                );
                debug!("{:?}: {} cleared", at, approach);
                SignalEvent::Cleared { at, approach }
            }
            TimerEvent::SettleAllRed => {
                self.cursor = (self.cursor + 1) % Approach::ROTATION.len();
                self.lights = LightState::all_red();
                self.revision += 1;
                self.phase = TransitionPhase::AwaitingGreen;
                self.timers.schedule(
                    TimerSlot::Transition,
                    self.timing.micro_pause,
                    TimerEvent::ActivateGreen,
                );
                let next = self.current_approach();
                debug!("{:?}: all red, {} is next", at, next);
                SignalEvent::AllRedAsserted { at, next }
            }
            TimerEvent::ActivateGreen => {
                let approach = self.current_approach();
                self.lights.set(approach, Signal::Green);
                self.revision += 1;
                self.phase = TransitionPhase::Idle;
                self.stats.record_green(approach);
                self.timers
                    .schedule(TimerSlot::Cycle, self.timing.cycle, TimerEvent::BeginTransition);
                info!("{:?}: {} green", at, approach);
                SignalEvent::Green { at, approach }
            }
        }
    }
}
