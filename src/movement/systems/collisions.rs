//! Movement domain: avian-backed environment sensor and contact handling.

use avian3d::prelude::*;
use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::movement::sensor::{EnvironmentSensor, GroundHit, WallHit, is_wall_normal};
use crate::movement::{DashKill, GameLayer, Hostile, MotionController, MovementTuning, Player};

/// [`EnvironmentSensor`] over avian's spatial queries.
///
/// Only `GameLayer::World` geometry is considered and the body itself is
/// always excluded.
pub(crate) struct AvianSensor<'a, 'w, 's> {
    spatial_query: &'a SpatialQuery<'w, 's>,
    filter: SpatialQueryFilter,
    probe: Collider,
    tuning: &'a MovementTuning,
}

impl<'a, 'w, 's> AvianSensor<'a, 'w, 's> {
    pub(crate) fn new(
        spatial_query: &'a SpatialQuery<'w, 's>,
        body: Entity,
        tuning: &'a MovementTuning,
    ) -> Self {
        Self {
            spatial_query,
            filter: SpatialQueryFilter::from_mask(GameLayer::World)
                .with_excluded_entities([body]),
            probe: Collider::sphere(tuning.wall_probe_radius),
            tuning,
        }
    }
}

impl EnvironmentSensor for AvianSensor<'_, '_, '_> {
    fn query_ground(&self, origin: Vec3) -> GroundHit {
        // Cast a short ray downward from the feet
        let ray_origin = origin - Vec3::Y * self.tuning.ground_probe_offset;
        self.spatial_query
            .cast_ray(
                ray_origin,
                Dir3::NEG_Y,
                self.tuning.ground_probe_length,
                true,
                &self.filter,
            )
            .map(|hit| GroundHit {
                grounded: true,
                normal: hit.normal,
                distance: hit.distance,
            })
            .unwrap_or_default()
    }

    fn query_wall(&self, origin: Vec3, directions: &[Vec3]) -> Option<WallHit> {
        let config = ShapeCastConfig::from_max_distance(self.tuning.wall_probe_distance);
        directions.iter().find_map(|&direction| {
            let dir = Dir3::new(direction).ok()?;
            let hit = self.spatial_query.cast_shape(
                &self.probe,
                origin,
                Quat::IDENTITY,
                dir,
                &config,
                &self.filter,
            )?;
            is_wall_normal(hit.normal1, self.tuning.wall_max_normal_y).then_some(WallHit {
                normal: hit.normal1,
                distance: hit.distance,
                direction,
            })
        })
    }

    fn height_above_ground(&self, origin: Vec3, max_distance: f32) -> Option<f32> {
        let feet = origin - Vec3::Y * self.tuning.ground_probe_offset;
        self.spatial_query
            .cast_ray(feet, Dir3::NEG_Y, max_distance, true, &self.filter)
            .map(|hit| hit.distance)
    }
}

/// Destroy hostiles in contact with a player while its dash is lethal.
///
/// Reads the current contact set every tick, so a hostile already touching
/// the body when the dash starts is caught as well as a fresh hit.
pub(crate) fn dash_kill_on_contact(
    mut commands: Commands,
    time: Res<Time>,
    players: Query<(Entity, &MotionController, &CollidingEntities), With<Player>>,
    hostiles: Query<&Transform, With<Hostile>>,
    mut kills: MessageWriter<DashKill>,
) {
    let now = time.elapsed_secs();
    let mut killed: Vec<Entity> = Vec::new();

    for (player, controller, contacts) in &players {
        if !controller.dash.is_lethal(now) {
            continue;
        }

        for &hostile in contacts.iter() {
            if killed.contains(&hostile) {
                continue;
            }
            let Ok(transform) = hostiles.get(hostile) else {
                continue;
            };

            let position = transform.translation;
            commands.entity(hostile).despawn();
            killed.push(hostile);
            kills.write(DashKill {
                player,
                hostile,
                position,
            });
            info!("Dash kill: {:?} at {:?}", hostile, position);
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::message::Messages;

    use super::*;

    fn kill_app() -> App {
        let mut app = App::new();
        app.init_resource::<Time>()
            .add_message::<DashKill>()
            .add_systems(Update, dash_kill_on_contact);
        app
    }

    /// A player already touching `hostile`, with the dash window ending at
    /// `window_until`.
    fn spawn_touching(app: &mut App, hostile: Entity, window_until: f32) -> Entity {
        let mut controller = MotionController::default();
        controller.dash.hit_window_until = window_until;
        let mut contacts = CollidingEntities::default();
        contacts.insert(hostile);
        app.world_mut().spawn((Player, controller, contacts)).id()
    }

    #[test]
    fn lethal_dash_kills_hostile_already_in_contact() {
        let mut app = kill_app();
        let hostile = app
            .world_mut()
            .spawn((Hostile, Transform::from_xyz(1.0, 0.0, 0.0)))
            .id();
        let player = spawn_touching(&mut app, hostile, 1.0);

        app.update();

        assert!(app.world().get_entity(hostile).is_err());
        let kills: Vec<DashKill> = app
            .world_mut()
            .resource_mut::<Messages<DashKill>>()
            .drain()
            .collect();
        assert_eq!(kills.len(), 1);
        assert_eq!(kills[0].player, player);
        assert_eq!(kills[0].position, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn contact_outside_the_window_is_harmless() {
        let mut app = kill_app();
        let hostile = app.world_mut().spawn((Hostile, Transform::default())).id();
        spawn_touching(&mut app, hostile, f32::NEG_INFINITY);

        app.update();

        assert!(app.world().get_entity(hostile).is_ok());
        assert_eq!(
            app.world_mut()
                .resource_mut::<Messages<DashKill>>()
                .drain()
                .count(),
            0
        );
    }
}
