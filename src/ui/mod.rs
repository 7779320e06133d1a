//! UI module that visualizes the intersection using Bevy
//!
//! This module is purely for visualization - all signal logic is in the `simulation` module.
//! The UI reads the controller's light state and renders it with Bevy 2D sprites.

mod components;
mod controls;
mod sync;
mod world;

use bevy::prelude::*;

pub use components::IntersectionResource;

use crate::simulation::TimingConfig;
use controls::{exit_when_requested, handle_control_buttons, handle_keyboard, setup_controls};
use sync::{sync_lamps, tick_controller, update_status_text};
use world::setup_world;

/// Plugin to register all UI systems
pub struct IntersectionUiPlugin {
    pub timing: TimingConfig,
    /// Install the exiter for platforms that cannot exit from inside the app
    pub exiter_unsupported: bool,
}

impl Plugin for IntersectionUiPlugin {
    fn build(&self, app: &mut App) {
        let resource = match IntersectionResource::new(self.timing, self.exiter_unsupported) {
            Ok(resource) => resource,
            Err(e) => {
                bevy::log::error!("Failed to start intersection controller: {:#}", e);
                return;
            }
        };

        app.insert_resource(resource)
            .insert_resource(ClearColor(Color::srgb(0.25, 0.45, 0.28)))
            .add_systems(Startup, (setup_world, setup_controls))
            .add_systems(FixedUpdate, tick_controller)
            .add_systems(
                Update,
                (
                    sync_lamps,
                    update_status_text,
                    handle_control_buttons,
                    handle_keyboard,
                    exit_when_requested,
                ),
            );
    }
}
