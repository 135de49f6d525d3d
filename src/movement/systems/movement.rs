//! Movement domain: fixed-tick driver, respawn and stat replacement.

use avian3d::prelude::*;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::content::ContentRegistry;
use crate::core::{CharacterSelectedEvent, RespawnRequested};
use crate::movement::body::BodyState;
use crate::movement::systems::collisions::AvianSensor;
use crate::movement::{
    AbilityTransition, InputSampler, MotionController, MovementStats, MovementTuning, Player,
    SpawnPoint, SpeedModifiers, TransitionKind,
};

/// Bodies that fall below this height are sent back to their spawn point.
const KILL_PLANE_Y: f32 = -40.0;

fn body_state(transform: &Transform, linear: &LinearVelocity, angular: &AngularVelocity) -> BodyState {
    let (yaw, _, _) = transform.rotation.to_euler(EulerRot::YXZ);
    BodyState {
        position: transform.translation,
        yaw,
        velocity: linear.0,
        angular_velocity: angular.0,
    }
}

/// Run one locomotion tick for every player and write the result back to
/// the physics body.
pub(crate) fn advance_motion(
    time: Res<Time>,
    tuning: Res<MovementTuning>,
    spatial_query: SpatialQuery,
    mut transitions: MessageWriter<AbilityTransition>,
    mut query: Query<
        (
            Entity,
            &mut MotionController,
            &mut InputSampler,
            &MovementStats,
            &SpeedModifiers,
            &mut Transform,
            &mut LinearVelocity,
            &mut AngularVelocity,
        ),
        With<Player>,
    >,
) {
    let now = time.elapsed_secs();
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }

    for (
        entity,
        mut controller,
        mut sampler,
        stats,
        modifiers,
        mut transform,
        mut linear,
        mut angular,
    ) in &mut query
    {
        let mut body = body_state(&transform, &linear, &angular);
        let sensor = AvianSensor::new(&spatial_query, entity, &tuning);

        let report = controller.step(
            &mut body,
            &mut sampler.snapshot,
            &sensor,
            stats,
            &tuning,
            modifiers,
            now,
            dt,
        );

        linear.0 = body.velocity;
        angular.0 = body.angular_velocity;
        transform.rotation = body.rotation();

        let kinds = [
            report.dash_started.then_some(TransitionKind::DashStarted),
            report.wall_run_started.then_some(TransitionKind::WallRunStarted),
            report.wall_run_ended.map(TransitionKind::WallRunEnded),
            report.wall_jumped.then_some(TransitionKind::WallJumped),
            (report.jumped && !report.wall_jumped).then_some(TransitionKind::Jumped),
        ];
        for kind in kinds.into_iter().flatten() {
            transitions.write(AbilityTransition { entity, kind });
        }
    }
}

pub(crate) fn respawn_below_kill_plane(
    query: Query<(Entity, &Transform), With<Player>>,
    mut respawns: MessageWriter<RespawnRequested>,
) {
    for (entity, transform) in &query {
        if transform.translation.y < KILL_PLANE_Y {
            respawns.write(RespawnRequested { entity });
        }
    }
}

/// Zero velocities and teleport to the spawn point. Ability timers stay
/// as they are; an in-flight wall-jump kick is dropped.
pub(crate) fn handle_respawn(
    mut requests: MessageReader<RespawnRequested>,
    mut query: Query<(
        &mut MotionController,
        &SpawnPoint,
        &mut Transform,
        &mut LinearVelocity,
        &mut AngularVelocity,
    )>,
) {
    for request in requests.read() {
        let Ok((mut controller, spawn, mut transform, mut linear, mut angular)) =
            query.get_mut(request.entity)
        else {
            continue;
        };

        let mut body = body_state(&transform, &linear, &angular);
        controller.respawn(&mut body);

        transform.translation = spawn.0;
        linear.0 = body.velocity;
        angular.0 = body.angular_velocity;
        info!("Respawned {:?} at {:?}", request.entity, spawn.0);
    }
}

/// Replace the stat block of existing players when a character is picked.
pub(crate) fn apply_character_stats(
    mut events: MessageReader<CharacterSelectedEvent>,
    registry: Option<Res<ContentRegistry>>,
    mut query: Query<&mut MovementStats, With<Player>>,
) {
    for event in events.read() {
        let Some(stats) = registry
            .as_ref()
            .and_then(|reg| reg.characters.get(&event.character_id))
            .map(|def| def.movement.clone())
        else {
            warn!(
                "Character '{}' not found in registry, keeping current stats",
                event.character_id
            );
            continue;
        };

        for mut current in &mut query {
            *current = stats.clone();
            info!(
                "Applied stats of '{}': max_speed={}, jump_force={}",
                event.character_id, stats.max_speed, stats.jump_force
            );
        }
    }
}
