//! Scene setup: camera, roads and the four signal heads

use bevy::prelude::*;

use super::components::{
    Lamp, MainCamera, SignalHead, LAMP_OFF_COLOR, LANE_MARK_COLOR, ROAD_COLOR,
};
use crate::simulation::{Approach, Signal};

const ROAD_WIDTH: f32 = 160.0;
const ROAD_LENGTH: f32 = 2000.0;
const HEAD_SIZE: Vec2 = Vec2::new(48.0, 96.0);
const LAMP_SIZE: f32 = 30.0;
const LAMP_OFFSET: f32 = 22.0;

/// Where the head for an approach stands, beside its road just before the crossing
fn head_position(approach: Approach) -> Vec2 {
    match approach {
        Approach::North => Vec2::new(-120.0, 170.0),
        Approach::East => Vec2::new(170.0, 120.0),
        Approach::South => Vec2::new(120.0, -170.0),
        Approach::West => Vec2::new(-170.0, -120.0),
    }
}

/// System to setup the camera and the crossing
pub fn setup_world(mut commands: Commands) {
    commands.spawn((MainCamera, Camera2d));

    // Vertical and horizontal roads
    commands.spawn((
        Sprite::from_color(ROAD_COLOR, Vec2::new(ROAD_WIDTH, ROAD_LENGTH)),
        Transform::from_xyz(0.0, 0.0, 0.0),
    ));
    commands.spawn((
        Sprite::from_color(ROAD_COLOR, Vec2::new(ROAD_LENGTH, ROAD_WIDTH)),
        Transform::from_xyz(0.0, 0.0, 0.0),
    ));

    // Centre lines, interrupted by the box of the crossing
    let mark_length = (ROAD_LENGTH - ROAD_WIDTH) / 2.0;
    let mark_offset = ROAD_WIDTH / 2.0 + mark_length / 2.0;
    for sign in [-1.0, 1.0] {
        commands.spawn((
            Sprite::from_color(LANE_MARK_COLOR, Vec2::new(4.0, mark_length)),
            Transform::from_xyz(0.0, sign * mark_offset, 0.1),
        ));
        commands.spawn((
            Sprite::from_color(LANE_MARK_COLOR, Vec2::new(mark_length, 4.0)),
            Transform::from_xyz(sign * mark_offset, 0.0, 0.1),
        ));
    }

    for approach in Approach::ROTATION {
        spawn_signal_head(&mut commands, approach);
    }
}

/// Spawn one signal head, red lamp on top, rotated clockwise for its approach
fn spawn_signal_head(commands: &mut Commands, approach: Approach) {
    let position = head_position(approach);
    let rotation = Quat::from_rotation_z(-approach.rotation_degrees().to_radians());

    commands
        .spawn((
            SignalHead(approach),
            Sprite::from_color(Color::srgb(0.08, 0.08, 0.08), HEAD_SIZE),
            Transform::from_xyz(position.x, position.y, 1.0).with_rotation(rotation),
        ))
        .with_children(|head| {
            for (lamp, offset) in [(Signal::Red, LAMP_OFFSET), (Signal::Green, -LAMP_OFFSET)] {
                head.spawn((
                    Lamp { approach, lamp },
                    Sprite::from_color(LAMP_OFF_COLOR, Vec2::splat(LAMP_SIZE)),
                    Transform::from_xyz(0.0, offset, 0.1),
                ));
            }
        });
}
