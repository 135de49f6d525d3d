//! Movement domain: tuning and input resources.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Layout of the horizontal wall probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum WallProbePattern {
    /// Evenly spaced ring of world-horizontal directions.
    Ring(u32),
    /// Body-relative forward, back, left and right.
    Cardinal,
}

/// Windows, thresholds and probe constants shared by every character.
///
/// Per-character values (speeds, durations, impulses) live in
/// [`MovementStats`](crate::movement::MovementStats) instead.
#[derive(Resource, Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MovementTuning {
    // Jump timing
    pub coyote_time: f32,
    pub jump_buffer_time: f32,
    /// Seconds after a jump during which ground hits are ignored.
    pub jump_ground_ignore: f32,
    pub jump_cooldown: f32,

    // Gravity shaping
    pub gravity: f32,
    pub fall_multiplier: f32,
    pub low_jump_multiplier: f32,
    pub terminal_velocity: f32,

    // Grip
    pub grip_max: f32,
    pub grip_min: f32,
    pub grip_fade_in: f32,
    /// Planar speed carried above the cap bleeds off at this rate.
    pub over_cap_decel: f32,

    // Ground probe
    pub ground_probe_offset: f32,
    pub ground_probe_length: f32,

    // Dash
    pub dash_burst_multiplier: f32,
    pub dash_hop: f32,
    pub dash_sustain_accel: f32,
    pub dash_boost_multiplier: f32,
    pub dash_boost_duration: f32,
    pub dash_hit_window: f32,

    // Wall probe
    pub wall_probe_pattern: WallProbePattern,
    pub wall_probe_radius: f32,
    pub wall_probe_distance: f32,
    /// Hits with a normal y above this are floors or ceilings, not walls.
    pub wall_max_normal_y: f32,

    // Wall run
    pub wall_run_min_forward_dot: f32,
    pub wall_run_min_height: f32,
    pub wall_run_cooldown: f32,
    pub wall_normal_similarity: f32,
    pub wall_run_entry_boost: f32,
    pub wall_run_entry_boost_time: f32,
    pub wall_run_accel: f32,
    pub wall_stick_accel: f32,
    pub wall_stick_max_speed: f32,
    pub wall_run_rise_time: f32,
    pub wall_run_min_rise_speed: f32,
    pub wall_run_gravity_scale: f32,
    pub wall_run_max_fall_speed: f32,
    pub wall_run_max_rise_speed: f32,
    pub wall_run_turn_rate: f32,
    pub wall_run_lean: f32,

    // Wall jump
    pub wall_jump_kick_ramp: f32,
    pub wall_jump_lock: f32,
    pub upright_lock: f32,

    // Cosmetics
    pub tilt_smoothing: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            coyote_time: 0.12,
            jump_buffer_time: 0.12,
            jump_ground_ignore: 0.1,
            jump_cooldown: 0.15,

            gravity: 25.0,
            fall_multiplier: 2.0,
            low_jump_multiplier: 2.0,
            terminal_velocity: 40.0,

            grip_max: 14.0,
            grip_min: 3.0,
            grip_fade_in: 0.2,
            over_cap_decel: 20.0,

            ground_probe_offset: 0.9,
            ground_probe_length: 0.25,

            dash_burst_multiplier: 1.6,
            dash_hop: 2.0,
            dash_sustain_accel: 90.0,
            dash_boost_multiplier: 1.35,
            dash_boost_duration: 0.6,
            dash_hit_window: 0.15,

            wall_probe_pattern: WallProbePattern::Ring(12),
            wall_probe_radius: 0.3,
            wall_probe_distance: 0.8,
            wall_max_normal_y: 0.5,

            wall_run_min_forward_dot: 0.35,
            wall_run_min_height: 1.2,
            wall_run_cooldown: 0.4,
            wall_normal_similarity: 0.85,
            wall_run_entry_boost: 1.25,
            wall_run_entry_boost_time: 0.25,
            wall_run_accel: 45.0,
            wall_stick_accel: 6.0,
            wall_stick_max_speed: 1.5,
            wall_run_rise_time: 0.35,
            wall_run_min_rise_speed: 2.5,
            wall_run_gravity_scale: 0.3,
            wall_run_max_fall_speed: 3.0,
            wall_run_max_rise_speed: 6.0,
            wall_run_turn_rate: 10.0,
            wall_run_lean: 0.3,

            wall_jump_kick_ramp: 0.12,
            wall_jump_lock: 0.3,
            upright_lock: 0.35,

            tilt_smoothing: 12.0,
        }
    }
}

/// Raw per-frame input written by the keyboard reader.
///
/// Edge flags accumulate until a fixed tick latches them into an
/// [`InputSnapshot`](crate::movement::InputSnapshot), so presses made on
/// frames without a physics step are not lost.
#[derive(Resource, Debug, Default)]
pub struct MovementInput {
    /// x = steer (+ right), y = throttle (+ forward).
    pub axis: Vec2,
    pub jump_just_pressed: bool,
    pub jump_held: bool,
    pub dash_just_pressed: bool,
}

impl MovementInput {
    /// Forget edges that have been latched.
    pub fn clear_edges(&mut self) {
        self.jump_just_pressed = false;
        self.dash_just_pressed = false;
    }
}
