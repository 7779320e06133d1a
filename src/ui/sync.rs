//! Systems for syncing Bevy entities with controller state

use bevy::prelude::*;

use super::components::{lamp_on_color, IntersectionResource, Lamp, StatusText, LAMP_OFF_COLOR};

/// System to advance the controller's virtual clock
pub fn tick_controller(time: Res<Time>, mut sim: ResMut<IntersectionResource>) {
    sim.0.tick(time.delta());
}

/// System to recolor lamps whenever the light state changes
pub fn sync_lamps(
    sim: Res<IntersectionResource>,
    mut rendered_revision: Local<Option<u64>>,
    mut lamp_query: Query<(&Lamp, &mut Sprite)>,
) {
    let controller = sim.0.controller();
    if *rendered_revision == Some(controller.revision()) {
        return;
    }
    *rendered_revision = Some(controller.revision());

    let lights = controller.current_state();
    for (lamp, mut sprite) in lamp_query.iter_mut() {
        sprite.color = if lights.get(lamp.approach) == lamp.lamp {
            lamp_on_color(lamp.lamp)
        } else {
            LAMP_OFF_COLOR
        };
    }
}

/// System to update the status line
pub fn update_status_text(
    sim: Res<IntersectionResource>,
    mut text_query: Query<&mut Text, With<StatusText>>,
) {
    let controller = sim.0.controller();
    let stats = controller.stats();
    for mut text in text_query.iter_mut() {
        **text = format!(
            "Green: {} | Phase: {:?} | Cycle: {}ms | Transitions: {} | Resets: {}",
            controller
                .current_state()
                .green_approach()
                .map(|approach| approach.name())
                .unwrap_or("none"),
            controller.phase(),
            controller.timing().cycle.as_millis(),
            stats.transitions_completed,
            stats.resets
        );
    }
}
