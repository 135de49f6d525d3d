//! Movement domain: test course, probe gizmos and hotkeys for tuning.

use std::path::Path;

use avian3d::prelude::*;
use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::content::{CONTENT_DIR, load_all_content};
use crate::core::{RespawnRequested, SelectedCharacter};
use crate::movement::{
    GameLayer, Hostile, MotionController, MovementStats, MovementTuning, Player, SpeedModifier,
    SpeedZone,
};

/// Gizmo overlay toggle (F3).
#[derive(Resource, Debug, Default)]
pub struct ProbeGizmos {
    pub enabled: bool,
}

struct Block {
    size: Vec3,
    position: Vec3,
    color: Color,
}

pub(crate) fn spawn_test_course(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let ground_color = Color::srgb(0.35, 0.45, 0.35);
    let wall_color = Color::srgb(0.3, 0.3, 0.4);
    let ramp_color = Color::srgb(0.5, 0.4, 0.3);

    let world_layers = CollisionLayers::new(GameLayer::World, [GameLayer::Player]);

    let blocks = [
        // Ground
        Block {
            size: Vec3::new(120.0, 1.0, 120.0),
            position: Vec3::new(0.0, -0.5, 0.0),
            color: ground_color,
        },
        // Wall-run corridor, left and right
        Block {
            size: Vec3::new(1.0, 8.0, 40.0),
            position: Vec3::new(-6.0, 4.0, -30.0),
            color: wall_color,
        },
        Block {
            size: Vec3::new(1.0, 8.0, 40.0),
            position: Vec3::new(6.0, 4.0, -30.0),
            color: wall_color,
        },
        // Landing platform at the end of the corridor
        Block {
            size: Vec3::new(10.0, 1.0, 10.0),
            position: Vec3::new(0.0, 3.0, -56.0),
            color: ramp_color,
        },
        // Pillar for wall jumping practice
        Block {
            size: Vec3::new(2.0, 12.0, 2.0),
            position: Vec3::new(15.0, 6.0, 0.0),
            color: wall_color,
        },
    ];

    for block in blocks {
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::from_size(block.size))),
            MeshMaterial3d(materials.add(block.color)),
            Transform::from_translation(block.position),
            RigidBody::Static,
            Collider::cuboid(block.size.x, block.size.y, block.size.z),
            world_layers,
        ));
    }

    // Gentle ramp
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(6.0, 0.5, 12.0))),
        MeshMaterial3d(materials.add(ramp_color)),
        Transform::from_xyz(-15.0, 1.2, 0.0).with_rotation(Quat::from_rotation_x(0.25)),
        RigidBody::Static,
        Collider::cuboid(6.0, 0.5, 12.0),
        world_layers,
    ));

    // Dash targets
    let hostile_mesh = meshes.add(Cuboid::new(1.0, 1.0, 1.0));
    let hostile_material = materials.add(Color::srgb(0.85, 0.25, 0.25));
    for x in [-4.0, 0.0, 4.0] {
        commands.spawn((
            Hostile,
            Mesh3d(hostile_mesh.clone()),
            MeshMaterial3d(hostile_material.clone()),
            Transform::from_xyz(x, 0.5, 10.0),
            RigidBody::Static,
            Collider::cuboid(1.0, 1.0, 1.0),
            CollisionLayers::new(GameLayer::Hostile, [GameLayer::Player]),
        ));
    }

    // Slow and fast zones
    let zones = [
        ("zone_mud", SpeedModifier::scale(0.5), Vec3::new(-10.0, 1.0, 20.0)),
        ("zone_boost", SpeedModifier::bonus(6.0), Vec3::new(10.0, 1.0, 20.0)),
    ];
    for (source, modifier, position) in zones {
        commands.spawn((
            SpeedZone {
                source: source.to_string(),
                modifier,
            },
            Transform::from_translation(position),
            RigidBody::Static,
            Collider::cuboid(6.0, 2.0, 6.0),
            Sensor,
            CollisionLayers::new(GameLayer::Zone, [GameLayer::Player]),
        ));
    }

    info!("Spawned movement test course");
}

/// F3 gizmos, F5 reload stats and tuning from disk, F6 respawn.
pub(crate) fn handle_dev_hotkeys(
    keyboard: Res<ButtonInput<KeyCode>>,
    selected: Res<SelectedCharacter>,
    mut gizmo_state: ResMut<ProbeGizmos>,
    mut tuning: ResMut<MovementTuning>,
    mut players: Query<(Entity, &mut MovementStats), With<Player>>,
    mut respawns: MessageWriter<RespawnRequested>,
) {
    if keyboard.just_pressed(KeyCode::F3) {
        gizmo_state.enabled = !gizmo_state.enabled;
        info!("[DEV] Probe gizmos: {}", gizmo_state.enabled);
    }

    if keyboard.just_pressed(KeyCode::F5) {
        match load_all_content(Path::new(CONTENT_DIR)) {
            Ok((registry, new_tuning)) => {
                *tuning = new_tuning;
                let stats = selected
                    .character_id
                    .as_ref()
                    .and_then(|id| registry.characters.get(id))
                    .map(|def| def.movement.clone());
                if let Some(stats) = stats {
                    for (_, mut current) in &mut players {
                        *current = stats.clone();
                    }
                }
                info!("[DEV] Reloaded movement stats and tuning");
            }
            Err(errors) => {
                for e in errors {
                    error!("[DEV] {}", e);
                }
            }
        }
    }

    if keyboard.just_pressed(KeyCode::F6) {
        for (entity, _) in &players {
            respawns.write(RespawnRequested { entity });
        }
    }
}

/// Draw ground and wall probes plus the current wall contact.
pub(crate) fn draw_probe_gizmos(
    mut gizmos: Gizmos,
    gizmo_state: Res<ProbeGizmos>,
    tuning: Res<MovementTuning>,
    players: Query<(&Transform, &MotionController), With<Player>>,
) {
    if !gizmo_state.enabled {
        return;
    }

    for (transform, controller) in &players {
        let origin = transform.translation;
        let feet = origin - Vec3::Y * tuning.ground_probe_offset;
        let ground_color = if controller.grounded() {
            Color::srgb(0.2, 0.9, 0.2)
        } else {
            Color::srgb(0.9, 0.2, 0.2)
        };
        gizmos.line(
            feet,
            feet - Vec3::Y * tuning.ground_probe_length,
            ground_color,
        );
        let ground = controller.ground();
        if ground.distance.is_finite() {
            gizmos.sphere(
                Isometry3d::from_translation(feet - Vec3::Y * ground.distance),
                0.05,
                ground_color,
            );
        }

        gizmos.circle(
            Isometry3d::new(origin, Quat::from_rotation_x(std::f32::consts::FRAC_PI_2)),
            tuning.wall_probe_distance,
            Color::srgb(0.4, 0.4, 0.9),
        );

        if let Some(contact) = controller.wall_contact() {
            gizmos.arrow(origin, origin + contact.normal, Color::srgb(0.9, 0.8, 0.2));
            gizmos.arrow(origin, origin + contact.tangent * 2.0, Color::srgb(0.2, 0.8, 0.9));
        }
    }
}

/// Log a one-line state summary whenever the ability flags change.
pub(crate) fn log_state_changes(
    players: Query<(&MotionController, &LinearVelocity), With<Player>>,
    mut last: Local<Option<String>>,
) {
    for (controller, velocity) in &players {
        let flags = controller.flags();
        let summary = format!(
            "grounded={} dash={} side_dash={} wall_run={} kick={}",
            controller.grounded(),
            flags.is_dashing,
            flags.is_side_dashing,
            flags.is_wall_running,
            flags.is_kicking
        );
        if last.as_deref() != Some(summary.as_str()) {
            debug!(
                "[DEV] {} speed={:.2}",
                summary,
                velocity.0.with_y(0.0).length()
            );
            *last = Some(summary);
        }
    }
}
