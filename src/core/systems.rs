//! Core domain: run flow systems, camera and pause handling.

use avian3d::prelude::{Physics, PhysicsTime};
use bevy::prelude::*;

use crate::core::resources::GameplayPaused;
use crate::core::state::GameState;
use crate::movement::Player;

const PAUSE_SOURCE: &str = "pause_key";
const CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 4.0, 9.0);
const CAMERA_FOLLOW_RATE: f32 = 6.0;

/// Marker for the chase camera.
#[derive(Component, Debug)]
pub struct ChaseCamera;

pub(crate) fn transition_to_character_select(mut game_state: ResMut<NextState<GameState>>) {
    // Content is loaded at Startup; go straight to character selection
    game_state.set(GameState::CharacterSelect);
}

pub(crate) fn setup_camera(mut commands: Commands) {
    commands.spawn((
        ChaseCamera,
        Camera3d::default(),
        Transform::from_translation(CAMERA_OFFSET).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(10.0, 20.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Ease the camera to a point behind and above the player's facing.
pub(crate) fn follow_player(
    time: Res<Time>,
    player: Query<&Transform, (With<Player>, Without<ChaseCamera>)>,
    mut camera: Query<&mut Transform, With<ChaseCamera>>,
) {
    let Ok(target) = player.single() else {
        return;
    };
    let Ok(mut camera) = camera.single_mut() else {
        return;
    };

    let desired = target.translation + target.rotation * CAMERA_OFFSET;
    let blend = 1.0 - (-CAMERA_FOLLOW_RATE * time.delta_secs()).exp();
    camera.translation = camera.translation.lerp(desired, blend);
    camera.look_at(target.translation + Vec3::Y, Vec3::Y);
}

/// Escape toggles a pause source.
pub(crate) fn toggle_pause(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut paused: ResMut<GameplayPaused>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        let now_paused = paused.toggle(PAUSE_SOURCE);
        info!("Gameplay {}", if now_paused { "paused" } else { "resumed" });
    }
}

/// Stop the virtual and physics clocks while any pause source is active.
/// Fixed-tick systems and the solver both run off these clocks.
pub(crate) fn sync_pause_clocks(
    paused: Res<GameplayPaused>,
    mut virtual_time: ResMut<Time<Virtual>>,
    physics_time: Option<ResMut<Time<Physics>>>,
) {
    let paused = paused.is_paused();
    if paused == virtual_time.is_paused() {
        return;
    }

    if paused {
        virtual_time.pause();
    } else {
        virtual_time.unpause();
    }
    if let Some(mut physics_time) = physics_time {
        if paused {
            physics_time.pause();
        } else {
            physics_time.unpause();
        }
    }
    debug!("Clocks {}", if paused { "stopped" } else { "running" });
}
