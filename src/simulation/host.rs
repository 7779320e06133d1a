//! Command routing between the user-facing surface and the controller
//!
//! Leaving the application is a platform concern, so the host only sees it
//! through the [`ProcessExiter`] capability it was built with.

use log::{info, warn};
use std::time::Duration;

use super::controller::{IntersectionController, SignalEvent};

/// Commands the user can issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    Reset,
    Exit,
}

/// Result of asking the platform to exit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// The platform will shut the application down
    Honored,
    /// No exit mechanism on this platform; nothing happened
    Unsupported,
}

/// Platform capability for leaving the application
pub trait ProcessExiter {
    fn request_exit(&mut self) -> ExitOutcome;
}

/// Exit by ending the owner's run loop: the owner polls [`IntersectionHost::exit_requested`]
#[derive(Debug, Default, Clone, Copy)]
pub struct LoopExit;

impl ProcessExiter for LoopExit {
    fn request_exit(&mut self) -> ExitOutcome {
        ExitOutcome::Honored
    }
}

/// Used where the platform offers no way to exit from inside the app
#[derive(Debug, Clone)]
pub struct UnsupportedExit {
    pub platform: String,
}

impl UnsupportedExit {
    pub fn new(platform: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
        }
    }
}

impl ProcessExiter for UnsupportedExit {
    fn request_exit(&mut self) -> ExitOutcome {
        warn!("Exit is not supported on platform '{}'", self.platform);
        ExitOutcome::Unsupported
    }
}

/// What handling a command did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Controller restored to its start state
    Reset,
    /// Reset arrived after the controller was stopped
    Ignored,
    /// Exit honored; the controller has been stopped
    Exiting,
    /// Exit not available, the intersection keeps running
    ExitUnavailable,
}

/// Owns a controller and the exit capability, and applies user commands
pub struct IntersectionHost {
    controller: IntersectionController,
    exiter: Box<dyn ProcessExiter + Send + Sync>,
    exit_requested: bool,
}

impl IntersectionHost {
    pub fn new(
        controller: IntersectionController,
        exiter: Box<dyn ProcessExiter + Send + Sync>,
    ) -> Self {
        Self {
            controller,
            exiter,
            exit_requested: false,
        }
    }

    pub fn controller(&self) -> &IntersectionController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut IntersectionController {
        &mut self.controller
    }

    /// Whether an honored exit is waiting for the owner to shut down
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn handle(&mut self, command: UserCommand) -> CommandOutcome {
        match command {
            UserCommand::Reset => match self.controller.reset() {
                Some(_) => CommandOutcome::Reset,
                None => CommandOutcome::Ignored,
            },
            UserCommand::Exit => match self.exiter.request_exit() {
                ExitOutcome::Honored => {
                    info!("Exit requested");
                    self.controller.stop();
                    self.exit_requested = true;
                    CommandOutcome::Exiting
                }
                ExitOutcome::Unsupported => CommandOutcome::ExitUnavailable,
            },
        }
    }

    /// Advance the controller's clock by one frame
    pub fn tick(&mut self, delta: Duration) -> Vec<SignalEvent> {
        self.controller.advance_by(delta)
    }
}
