//! On-screen buttons and keyboard shortcuts for Reset / Exit

use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::prelude::*;

use super::components::{ControlButton, IntersectionResource, StatusText};
use crate::simulation::{CommandOutcome, UserCommand};

/// System to setup the title, status line and control buttons
pub fn setup_controls(mut commands: Commands) {
    commands
        .spawn((Node {
            width: Val::Percent(100.0),
            height: Val::Auto,
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            flex_direction: FlexDirection::Column,
            align_items: AlignItems::Center,
            row_gap: Val::Px(5.0),
            ..default()
        },))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Intersection Signals"),
                TextFont {
                    font_size: 28.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            parent.spawn((
                StatusText,
                Text::new(""),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.9, 0.9, 0.9)),
            ));
        });

    commands
        .spawn((Node {
            width: Val::Percent(100.0),
            height: Val::Auto,
            position_type: PositionType::Absolute,
            bottom: Val::Px(20.0),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            column_gap: Val::Px(10.0),
            ..default()
        },))
        .with_children(|parent| {
            spawn_control_button(
                parent,
                UserCommand::Reset,
                "Reset [R]",
                Color::srgb(0.2, 0.4, 0.8),
            );
            spawn_control_button(
                parent,
                UserCommand::Exit,
                "Exit [Esc]",
                Color::srgb(0.7, 0.2, 0.2),
            );
        });
}

fn spawn_control_button(
    parent: &mut ChildSpawnerCommands,
    command: UserCommand,
    text: &str,
    color: Color,
) {
    parent
        .spawn((
            ControlButton(command),
            Button,
            Node {
                padding: UiRect::all(Val::Px(10.0)),
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BorderColor::all(Color::WHITE),
            BackgroundColor(color),
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(text),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

fn apply_command(sim: &mut IntersectionResource, command: UserCommand) {
    match sim.0.handle(command) {
        CommandOutcome::ExitUnavailable => {
            bevy::log::warn!("Exit button pressed but this platform cannot exit");
        }
        outcome => bevy::log::info!("{:?} -> {:?}", command, outcome),
    }
}

/// System to handle control button clicks
pub fn handle_control_buttons(
    mut sim: ResMut<IntersectionResource>,
    mut interaction_query: Query<
        (&Interaction, &ControlButton, &mut BorderColor),
        Changed<Interaction>,
    >,
) {
    for (interaction, button, mut border_color) in interaction_query.iter_mut() {
        match *interaction {
            Interaction::Pressed => apply_command(&mut sim, button.0),
            Interaction::Hovered => {
                *border_color = BorderColor::all(Color::srgb(1.0, 1.0, 0.0));
            }
            Interaction::None => {
                *border_color = BorderColor::all(Color::WHITE);
            }
        }
    }
}

/// Handle keyboard shortcuts
pub fn handle_keyboard(keyboard: Res<ButtonInput<KeyCode>>, mut sim: ResMut<IntersectionResource>) {
    if keyboard.just_pressed(KeyCode::KeyR) {
        apply_command(&mut sim, UserCommand::Reset);
    }
    if keyboard.just_pressed(KeyCode::Escape) {
        apply_command(&mut sim, UserCommand::Exit);
    }
}

/// Close the app once the host has accepted an Exit
pub fn exit_when_requested(sim: Res<IntersectionResource>, mut exit: MessageWriter<AppExit>) {
    if sim.0.exit_requested() {
        exit.write(AppExit::Success);
    }
}
