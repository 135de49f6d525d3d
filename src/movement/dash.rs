//! Movement domain: forward/backward dash and lateral dodge.

use bevy::prelude::*;

use crate::movement::arbitration::{AbilityFlags, TickContext};
use crate::movement::body::{flatten, move_towards};
use crate::movement::input::DashDirection;
use crate::movement::locomotion::{plain_gravity, settle_vertical};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DashPhase {
    #[default]
    Idle,
    /// Burst then sustain along a cached direction.
    Dashing {
        direction: Vec3,
        kind: DashDirection,
        end_time: f32,
    },
    /// Single velocity overwrite, then coast until `end_time`.
    SideDashing { end_time: f32 },
}

/// Cooldown-gated dash ability.
#[derive(Debug, Clone)]
pub struct DashAbility {
    pub phase: DashPhase,
    /// Dash requests before this time are ignored.
    pub next_allowed_time: f32,
    /// Start of the post-dash speed boost, if one is running.
    pub boost_started_at: Option<f32>,
    /// Contact stays lethal until this time after a dash ends.
    pub hit_window_until: f32,
    started_at: f32,
}

impl Default for DashAbility {
    fn default() -> Self {
        Self {
            phase: DashPhase::Idle,
            next_allowed_time: f32::NEG_INFINITY,
            boost_started_at: None,
            hit_window_until: f32::NEG_INFINITY,
            started_at: f32::NEG_INFINITY,
        }
    }
}

impl DashAbility {
    pub fn is_active(&self) -> bool {
        !matches!(self.phase, DashPhase::Idle)
    }

    /// Whether touching a hostile right now destroys it.
    pub fn is_lethal(&self, now: f32) -> bool {
        self.is_active() || now < self.hit_window_until
    }

    /// Speed-cap multiplier from the post-dash boost at `now`.
    pub fn boost_multiplier(&self, now: f32, peak: f32, duration: f32) -> f32 {
        let Some(started) = self.boost_started_at else {
            return 1.0;
        };
        if duration <= 0.0 {
            return 1.0;
        }
        let progress = ((now - started) / duration).clamp(0.0, 1.0);
        if progress >= 1.0 {
            1.0
        } else {
            peak + (1.0 - peak) * progress
        }
    }

    /// Run one tick. Returns true when a dash started this tick.
    pub fn update(&mut self, ctx: &mut TickContext<'_>) -> bool {
        let now = ctx.now;

        match self.phase {
            DashPhase::Dashing { end_time, .. } | DashPhase::SideDashing { end_time }
                if now >= end_time =>
            {
                self.finish(ctx.flags, now, ctx.tuning.dash_hit_window);
            }
            _ => {}
        }

        let mut started = false;
        if let Some(direction) = ctx.input.take_dash() {
            started = self.try_start(ctx, direction);
        }

        if !started {
            self.drive(ctx);
        }

        let tuning = ctx.tuning;
        ctx.flags.speed_multiplier =
            self.boost_multiplier(now, tuning.dash_boost_multiplier, tuning.dash_boost_duration);
        if self.boost_started_at.is_some() && ctx.flags.speed_multiplier <= 1.0 {
            self.boost_started_at = None;
        }

        started
    }

    fn try_start(&mut self, ctx: &mut TickContext<'_>, direction: DashDirection) -> bool {
        let now = ctx.now;
        if self.is_active()
            || !ctx.ground.grounded
            || ctx.flags.is_wall_running
            || ctx.flags.is_kicking
            || now < self.next_allowed_time
        {
            debug!(
                "Dash ignored: active={}, grounded={}, wall_running={}, kicking={}, ready_in={:.3}",
                self.is_active(),
                ctx.ground.grounded,
                ctx.flags.is_wall_running,
                ctx.flags.is_kicking,
                (self.next_allowed_time - now).max(0.0)
            );
            return false;
        }

        let stats = ctx.stats;
        let tuning = ctx.tuning;
        let forward = flatten(ctx.body.forward()).unwrap_or(Vec3::NEG_Z);
        let right = flatten(ctx.body.right()).unwrap_or(Vec3::X);

        if direction.is_lateral() {
            let lateral = if direction == DashDirection::Left {
                -right
            } else {
                right
            };
            ctx.body.velocity = lateral * stats.side_dash_speed()
                + Vec3::Y * stats.side_dash_launch(tuning.gravity);
            self.phase = DashPhase::SideDashing {
                end_time: now + stats.side_dash_duration,
            };
            ctx.flags.is_side_dashing = true;
        } else {
            let heading = if direction == DashDirection::Backward {
                -forward
            } else {
                forward
            };
            let burst = stats.dash_burst_speed(tuning.dash_burst_multiplier);
            ctx.body.velocity = heading * burst + Vec3::Y * tuning.dash_hop;
            self.phase = DashPhase::Dashing {
                direction: heading,
                kind: direction,
                end_time: now + stats.dash_duration,
            };
            ctx.flags.is_dashing = true;
        }

        ctx.flags.suppress_base_movement = true;
        ctx.flags.suppress_jump_buffer = true;
        self.started_at = now;
        self.next_allowed_time = now + stats.dash_cooldown;
        self.boost_started_at = None;

        debug!(
            "Dash started: {:?} at t={:.3}, speed={:.2}",
            direction,
            now,
            ctx.body.velocity.length()
        );
        true
    }

    fn drive(&mut self, ctx: &mut TickContext<'_>) {
        let dt = ctx.dt;
        let tuning = ctx.tuning;
        let grounded = ctx.ground.grounded;

        match self.phase {
            DashPhase::Idle => {}
            DashPhase::Dashing { direction, .. } => {
                let planar = ctx.body.planar_velocity(Vec3::Y);
                let target = direction * ctx.stats.dash_speed;
                let planar = move_towards(planar, target, tuning.dash_sustain_accel * dt);
                let vertical = settle_vertical(
                    ctx.body.vertical_speed(Vec3::Y),
                    grounded,
                    true,
                    tuning,
                    dt,
                );
                ctx.body.set_velocity_parts(planar, Vec3::Y, vertical);
            }
            DashPhase::SideDashing { .. } => {
                let vertical = ctx.body.vertical_speed(Vec3::Y);
                let vertical = if grounded && vertical <= 0.0 {
                    0.0
                } else {
                    plain_gravity(vertical, 1.0, tuning, dt)
                };
                let planar = ctx.body.planar_velocity(Vec3::Y);
                ctx.body.set_velocity_parts(planar, Vec3::Y, vertical);
            }
        }
    }

    fn finish(&mut self, flags: &mut AbilityFlags, now: f32, hit_window: f32) {
        let duration = now - self.started_at;
        let kind = match self.phase {
            DashPhase::Dashing { kind, .. } => Some(kind),
            _ => None,
        };
        self.phase = DashPhase::Idle;
        flags.is_dashing = false;
        flags.is_side_dashing = false;
        flags.suppress_base_movement = false;
        flags.suppress_jump_buffer = false;

        self.boost_started_at = Some(now);
        self.hit_window_until = now + hit_window;
        self.next_allowed_time = self.next_allowed_time.max(now);

        debug!(
            "Dash ended: sustained={:?} at t={:.3} after {:.3}s",
            kind,
            now,
            duration
        );
    }
}
