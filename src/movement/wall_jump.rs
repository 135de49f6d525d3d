//! Movement domain: per-tick jump decision (wall jump or ground jump).

use bevy::prelude::*;

use crate::movement::arbitration::{AbilityFlags, TickContext};
use crate::movement::body::EPSILON;
use crate::movement::locomotion::{Locomotion, settle_vertical};
use crate::movement::wall_run::WallRunAbility;

/// Lateral impulse spread over a short ramp instead of a single tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kick {
    pub direction: Vec3,
    pub magnitude: f32,
    pub started_at: f32,
    pub ramp: f32,
    /// Fraction of `magnitude` already added to the body.
    pub applied: f32,
}

impl Kick {
    /// Fraction of the impulse that should have landed by `now`.
    fn target_fraction(&self, now: f32) -> f32 {
        if self.ramp <= 0.0 {
            1.0
        } else {
            ((now - self.started_at) / self.ramp).clamp(0.0, 1.0)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallJumpOutcome {
    pub wall_jumped: bool,
    pub jumped: bool,
}

#[derive(Debug, Clone)]
pub struct WallJumpAbility {
    pub kick: Option<Kick>,
    /// Jumps of either kind are refused before this time.
    pub next_allowed_time: f32,
}

impl Default for WallJumpAbility {
    fn default() -> Self {
        Self {
            kick: None,
            next_allowed_time: f32::NEG_INFINITY,
        }
    }
}

impl WallJumpAbility {
    pub fn update(
        &mut self,
        ctx: &mut TickContext<'_>,
        wall_run: &mut WallRunAbility,
        locomotion: &mut Locomotion,
    ) -> WallJumpOutcome {
        self.apply_kick(ctx, false);

        let now = ctx.now;
        let tuning = ctx.tuning;
        if ctx.flags.suppress_jump_buffer
            || !ctx.input.jump.is_buffered(now, tuning.jump_buffer_time)
            || now < self.next_allowed_time
        {
            return WallJumpOutcome::default();
        }

        if wall_run.is_running() {
            // Read the contact before tearing the run down.
            let away = wall_run.contact().and_then(|contact| contact.away());
            wall_run.force_stop(ctx.flags, now, tuning.wall_run_cooldown);
            wall_run.lock(now + tuning.wall_jump_lock);

            let planar = ctx.body.planar_velocity(Vec3::Y);
            ctx.body
                .set_velocity_parts(planar, Vec3::Y, ctx.stats.wall_jump_up_impulse);

            match away {
                Some(direction) => {
                    self.kick = Some(Kick {
                        direction,
                        magnitude: ctx.stats.wall_jump_side_impulse,
                        started_at: now,
                        ramp: tuning.wall_jump_kick_ramp,
                        applied: 0.0,
                    });
                    self.apply_kick(ctx, true);
                }
                None => {
                    self.kick = None;
                    ctx.flags.is_kicking = false;
                    warn!("Wall jump without usable wall normal; kick skipped");
                }
            }

            locomotion.lock_upright(now + tuning.upright_lock);
            locomotion.mark_jump(now);
            ctx.input.jump.consume();
            self.next_allowed_time = now + tuning.jump_cooldown;

            debug!(
                "Wall jump at t={:.3}, away={:?}, locked until {:.3}",
                now, away, wall_run.lock_until
            );
            return WallJumpOutcome {
                wall_jumped: true,
                jumped: true,
            };
        }

        if locomotion.try_jump(ctx) {
            self.next_allowed_time = now + tuning.jump_cooldown;
            return WallJumpOutcome {
                wall_jumped: false,
                jumped: true,
            };
        }

        WallJumpOutcome::default()
    }

    pub fn cancel_kick(&mut self, flags: &mut AbilityFlags) {
        self.kick = None;
        flags.is_kicking = false;
    }

    /// Add this tick's share of the in-flight kick, if any. While the kick
    /// holds the body it also carries gravity, except on the launch tick.
    fn apply_kick(&mut self, ctx: &mut TickContext<'_>, launch: bool) {
        let Some(mut kick) = self.kick.take() else {
            ctx.flags.is_kicking = false;
            return;
        };

        let direction = kick.direction;
        if !direction.is_finite() || direction.length_squared() < EPSILON {
            ctx.flags.is_kicking = false;
            return;
        }

        let fraction = kick.target_fraction(ctx.now);
        let delta = fraction - kick.applied;
        if delta > 0.0 {
            ctx.body.velocity += direction.normalize() * kick.magnitude * delta;
            kick.applied = fraction;
        }

        let holding = kick.applied < 1.0;
        ctx.flags.is_kicking = holding;
        if !holding {
            // Locomotion takes over from this tick on.
            return;
        }

        if !launch {
            let vertical = settle_vertical(
                ctx.body.vertical_speed(Vec3::Y),
                ctx.ground.grounded,
                ctx.input.jump_held,
                ctx.tuning,
                ctx.dt,
            );
            let planar = ctx.body.planar_velocity(Vec3::Y);
            ctx.body.set_velocity_parts(planar, Vec3::Y, vertical);
        }
        ctx.body.angular_velocity = Vec3::ZERO;
        self.kick = Some(kick);
    }
}
