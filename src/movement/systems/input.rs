//! Movement domain: keyboard reading and per-tick input sampling.

use bevy::prelude::*;

use crate::movement::{InputSampler, MovementInput, MovementTuning, Player};

pub(crate) fn read_input(keyboard: Res<ButtonInput<KeyCode>>, mut input: ResMut<MovementInput>) {
    // Steer axis
    let mut x = 0.0;
    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
        x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
        x += 1.0;
    }

    // Throttle axis
    let mut y = 0.0;
    if keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown) {
        y -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyW) || keyboard.pressed(KeyCode::ArrowUp) {
        y += 1.0;
    }

    input.axis = Vec2::new(x, y);
    input.jump_held = keyboard.pressed(KeyCode::Space);

    // Edges stay set until the next fixed tick latches them
    input.jump_just_pressed |= keyboard.just_pressed(KeyCode::Space);
    input.dash_just_pressed |=
        keyboard.just_pressed(KeyCode::ShiftLeft) || keyboard.just_pressed(KeyCode::ShiftRight);
}

/// Latch the accumulated raw input into each player's tick snapshot.
pub(crate) fn sample_player_input(
    time: Res<Time>,
    tuning: Res<MovementTuning>,
    mut input: ResMut<MovementInput>,
    mut query: Query<&mut InputSampler, With<Player>>,
) {
    let now = time.elapsed_secs();
    for mut sampler in &mut query {
        sampler.sample(&mut input, now, tuning.jump_buffer_time);
    }
}
