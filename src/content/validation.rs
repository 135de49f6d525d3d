//! Validation for loaded stat blocks and tuning values.

use super::registry::ContentRegistry;
use crate::movement::{MovementStats, MovementTuning, WallProbePattern};

/// A validation error with context about what failed.
#[derive(Debug)]
pub struct ValidationError {
    pub source_type: &'static str,
    pub source_id: String,
    pub field: &'static str,
    pub problem: &'static str,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} '{}' field '{}' {}",
            self.source_type, self.source_id, self.field, self.problem
        )
    }
}

/// Helper macro for checking a numeric field
macro_rules! check_field {
    ($errors:expr, $source_type:expr, $source_id:expr, $owner:expr, $field:ident, $ok:expr, $problem:expr) => {
        let value = $owner.$field;
        if !value.is_finite() || !$ok(value) {
            $errors.push(ValidationError {
                source_type: $source_type,
                source_id: $source_id.to_string(),
                field: stringify!($field),
                problem: $problem,
            });
        }
    };
}

fn positive(v: f32) -> bool {
    v > 0.0
}

fn non_negative(v: f32) -> bool {
    v >= 0.0
}

fn unit_interval(v: f32) -> bool {
    (0.0..=1.0).contains(&v)
}

/// Check one stat block. Durations must be positive so every timed state
/// has an end.
pub fn validate_stats(id: &str, stats: &MovementStats) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let t = "Character";

    check_field!(errors, t, id, stats, max_speed, non_negative, "must be >= 0");
    check_field!(errors, t, id, stats, ground_accel, non_negative, "must be >= 0");
    check_field!(errors, t, id, stats, air_accel, non_negative, "must be >= 0");
    check_field!(errors, t, id, stats, ground_friction, non_negative, "must be >= 0");
    check_field!(errors, t, id, stats, turn_speed, non_negative, "must be >= 0");
    check_field!(errors, t, id, stats, jump_force, non_negative, "must be >= 0");
    check_field!(errors, t, id, stats, dash_speed, non_negative, "must be >= 0");
    check_field!(errors, t, id, stats, dash_duration, positive, "must be > 0");
    check_field!(errors, t, id, stats, dash_cooldown, non_negative, "must be >= 0");
    check_field!(errors, t, id, stats, side_dash_distance, non_negative, "must be >= 0");
    check_field!(errors, t, id, stats, side_dash_duration, positive, "must be > 0");
    check_field!(errors, t, id, stats, side_dash_height, non_negative, "must be >= 0");
    check_field!(errors, t, id, stats, wall_run_speed, non_negative, "must be >= 0");
    check_field!(errors, t, id, stats, wall_run_duration, positive, "must be > 0");
    check_field!(errors, t, id, stats, wall_jump_up_impulse, non_negative, "must be >= 0");
    check_field!(errors, t, id, stats, wall_jump_side_impulse, non_negative, "must be >= 0");

    errors
}

/// Check the tuning windows and thresholds.
pub fn validate_tuning(tuning: &MovementTuning) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let t = "MovementTuning";
    let id = "movement_tuning";

    check_field!(errors, t, id, tuning, coyote_time, non_negative, "must be >= 0");
    check_field!(errors, t, id, tuning, jump_buffer_time, non_negative, "must be >= 0");
    check_field!(errors, t, id, tuning, gravity, non_negative, "must be >= 0");
    check_field!(errors, t, id, tuning, terminal_velocity, positive, "must be > 0");
    check_field!(errors, t, id, tuning, over_cap_decel, non_negative, "must be >= 0");
    check_field!(errors, t, id, tuning, ground_probe_length, positive, "must be > 0");
    check_field!(errors, t, id, tuning, wall_probe_radius, positive, "must be > 0");
    check_field!(errors, t, id, tuning, wall_probe_distance, positive, "must be > 0");
    check_field!(errors, t, id, tuning, wall_max_normal_y, unit_interval, "must be in [0, 1]");
    check_field!(errors, t, id, tuning, wall_normal_similarity, unit_interval, "must be in [0, 1]");
    check_field!(errors, t, id, tuning, wall_run_min_forward_dot, unit_interval, "must be in [0, 1]");
    check_field!(errors, t, id, tuning, wall_run_cooldown, non_negative, "must be >= 0");
    check_field!(errors, t, id, tuning, wall_jump_kick_ramp, non_negative, "must be >= 0");
    check_field!(errors, t, id, tuning, wall_jump_lock, non_negative, "must be >= 0");

    if matches!(tuning.wall_probe_pattern, WallProbePattern::Ring(0)) {
        errors.push(ValidationError {
            source_type: t,
            source_id: id.to_string(),
            field: "wall_probe_pattern",
            problem: "ring needs at least one direction",
        });
    }

    errors
}

/// Validate every character in the registry plus the tuning.
/// Returns a list of validation errors, empty if everything is usable.
pub fn validate_content(
    registry: &ContentRegistry,
    tuning: &MovementTuning,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (id, def) in &registry.characters {
        errors.extend(validate_stats(id, &def.movement));
    }
    errors.extend(validate_tuning(tuning));
    errors
}
