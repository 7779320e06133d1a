//! UI components and resources for linking Bevy entities to controller state

use anyhow::Result;
use bevy::prelude::*;

use crate::simulation::{
    Approach, IntersectionController, IntersectionHost, LoopExit, ProcessExiter, Signal,
    TimingConfig, UnsupportedExit, UserCommand,
};

/// Resource wrapper for the intersection host
#[derive(Resource)]
pub struct IntersectionResource(pub IntersectionHost);

impl IntersectionResource {
    pub fn new(timing: TimingConfig, exit_unsupported: bool) -> Result<Self> {
        let exiter: Box<dyn ProcessExiter + Send + Sync> = if exit_unsupported {
            Box::new(UnsupportedExit::new(std::env::consts::OS))
        } else {
            Box::new(LoopExit)
        };
        let controller = IntersectionController::started(timing)?;
        Ok(Self(IntersectionHost::new(controller, exiter)))
    }
}

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Housing of the signal head facing one approach
#[derive(Component)]
pub struct SignalHead(pub Approach);

/// One lamp inside a signal head
#[derive(Component)]
pub struct Lamp {
    pub approach: Approach,
    pub lamp: Signal,
}

/// Button that issues a user command
#[derive(Component)]
pub struct ControlButton(pub UserCommand);

/// Text line showing controller status
#[derive(Component)]
pub struct StatusText;

pub const LAMP_OFF_COLOR: Color = Color::srgb(0.27, 0.27, 0.27);
pub const ROAD_COLOR: Color = Color::srgb(0.22, 0.22, 0.24);
pub const LANE_MARK_COLOR: Color = Color::srgb(0.95, 0.85, 0.2);

/// Color of a lit lamp
pub fn lamp_on_color(lamp: Signal) -> Color {
    match lamp {
        Signal::Red => Color::srgb(1.0, 0.0, 0.0),
        Signal::Green => Color::srgb(0.0, 1.0, 0.42),
    }
}
