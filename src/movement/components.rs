//! Movement domain: components and physics layers for locomotion.

use avian3d::prelude::*;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::movement::SpeedModifier;

/// Physics layers for collision filtering
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Static level geometry (floors, walls, ramps)
    World,
    /// Player character
    Player,
    /// Entities a dash destroys on contact
    Hostile,
    /// Trigger volumes (speed zones) - never block movement
    Zone,
}

#[derive(Component, Debug)]
pub struct Player;

/// Marker for entities killed by dashing into them.
#[derive(Component, Debug)]
pub struct Hostile;

/// Child entity carrying the cosmetic pitch/roll of the body.
#[derive(Component, Debug, Default)]
pub struct VisualTilt;

/// Where the body returns on respawn.
#[derive(Component, Debug, Clone, Copy)]
pub struct SpawnPoint(pub Vec3);

/// Trigger volume that modifies the speed cap of bodies inside it.
#[derive(Component, Debug, Clone)]
pub struct SpeedZone {
    /// Key under which the modifier is pushed; must be unique per zone.
    pub source: String,
    pub modifier: SpeedModifier,
}

/// Per-character stat block.
///
/// Supplied at character select and replaceable at runtime; the controller
/// reads it fresh every tick so a replacement applies from the next tick on.
#[derive(Component, Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MovementStats {
    pub max_speed: f32,
    pub ground_accel: f32,
    pub air_accel: f32,
    pub ground_friction: f32,
    /// Yaw rate at full steer, radians per second.
    pub turn_speed: f32,
    pub jump_force: f32,
    /// Sustained forward/backward dash speed.
    pub dash_speed: f32,
    pub dash_duration: f32,
    pub dash_cooldown: f32,
    pub side_dash_distance: f32,
    pub side_dash_duration: f32,
    pub side_dash_height: f32,
    pub wall_run_speed: f32,
    pub wall_run_duration: f32,
    pub wall_jump_up_impulse: f32,
    pub wall_jump_side_impulse: f32,
}

impl Default for MovementStats {
    fn default() -> Self {
        Self {
            max_speed: 12.0,
            ground_accel: 60.0,
            air_accel: 18.0,
            ground_friction: 40.0,
            turn_speed: 3.2,
            jump_force: 9.0,
            dash_speed: 20.0,
            dash_duration: 0.25,
            dash_cooldown: 1.0,
            side_dash_distance: 4.0,
            side_dash_duration: 0.2,
            side_dash_height: 1.0,
            wall_run_speed: 14.0,
            wall_run_duration: 1.5,
            wall_jump_up_impulse: 9.0,
            wall_jump_side_impulse: 10.0,
        }
    }
}

impl MovementStats {
    /// Sustained dash speed scaled by the burst multiplier.
    pub fn dash_burst_speed(&self, burst_multiplier: f32) -> f32 {
        self.dash_speed * burst_multiplier
    }

    /// Lateral speed that covers `side_dash_distance` in `side_dash_duration`.
    pub fn side_dash_speed(&self) -> f32 {
        if self.side_dash_duration > 0.0 {
            self.side_dash_distance / self.side_dash_duration
        } else {
            0.0
        }
    }

    /// Launch speed reaching `side_dash_height` under plain gravity.
    /// Uses physics formula: v = sqrt(2gh)
    pub fn side_dash_launch(&self, gravity: f32) -> f32 {
        (2.0 * gravity.max(0.0) * self.side_dash_height.max(0.0)).sqrt()
    }
}
