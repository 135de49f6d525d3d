//! Movement domain: player bootstrap from character data.

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::content::ContentRegistry;
use crate::core::{FALLBACK_CHARACTER_ID, SelectedCharacter};
use crate::movement::{
    GameLayer, InputSampler, MotionController, MovementStats, Player, SpawnPoint, SpeedModifiers,
    VisualTilt,
};

const PLAYER_SPAWN: Vec3 = Vec3::new(0.0, 2.0, 0.0);
const PLAYER_RADIUS: f32 = 0.4;
const PLAYER_LENGTH: f32 = 1.0;

/// Look up the stat block for `character_id`, falling back to defaults.
pub(crate) fn stats_for(registry: Option<&ContentRegistry>, character_id: &str) -> MovementStats {
    let Some(registry) = registry else {
        warn!("ContentRegistry not available, using default movement stats");
        return MovementStats::default();
    };

    match registry.characters.get(character_id) {
        Some(def) => {
            info!("Loaded character '{}' ({})", def.name, def.id);
            def.movement.clone()
        }
        None => {
            warn!(
                "Character '{}' not found in registry, using defaults",
                character_id
            );
            MovementStats::default()
        }
    }
}

/// Spawn the player body for the selected character.
/// Runs on entering GameState::Run after character selection.
pub(crate) fn spawn_player(
    mut commands: Commands,
    selected_character: Res<SelectedCharacter>,
    registry: Option<Res<ContentRegistry>>,
    existing_player: Query<Entity, With<Player>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Don't spawn if player already exists
    if !existing_player.is_empty() {
        info!("Player already exists, skipping spawn");
        return;
    }

    let char_id = selected_character
        .character_id
        .clone()
        .unwrap_or_else(|| FALLBACK_CHARACTER_ID.to_string());
    let stats = stats_for(registry.as_deref(), &char_id);

    info!(
        "Spawning player: char={}, max_speed={}, jump_force={}, dash_speed={}, wall_run_speed={}",
        char_id, stats.max_speed, stats.jump_force, stats.dash_speed, stats.wall_run_speed
    );

    let mesh = meshes.add(Capsule3d::new(PLAYER_RADIUS, PLAYER_LENGTH));
    let material = materials.add(Color::srgb(0.9, 0.85, 0.8));

    commands
        .spawn((
            // Identity & locomotion
            (
                Player,
                MotionController::default(),
                InputSampler::default(),
                stats,
                SpeedModifiers::default(),
                SpawnPoint(PLAYER_SPAWN),
            ),
            Transform::from_translation(PLAYER_SPAWN),
            Visibility::default(),
            // Physics
            (
                RigidBody::Dynamic,
                Collider::capsule(PLAYER_RADIUS, PLAYER_LENGTH),
                LockedAxes::ROTATION_LOCKED,
                LinearVelocity::default(),
                AngularVelocity::default(),
                GravityScale(0.0), // The controller shapes gravity itself
                Friction::new(0.0),
                CollisionEventsEnabled,
                CollidingEntities::default(),
                CollisionLayers::new(
                    GameLayer::Player,
                    [GameLayer::World, GameLayer::Hostile, GameLayer::Zone],
                ),
            ),
        ))
        .with_children(|parent| {
            parent.spawn((
                VisualTilt,
                Mesh3d(mesh),
                MeshMaterial3d(material),
                Transform::default(),
            ));
        });
}
