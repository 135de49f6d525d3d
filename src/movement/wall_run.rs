//! Movement domain: wall-running along near-vertical surfaces.

use bevy::prelude::*;

use crate::movement::arbitration::{AbilityFlags, TickContext};
use crate::movement::body::{EPSILON, angle_delta, approach, flatten, yaw_of};
use crate::movement::locomotion::plain_gravity;
use crate::movement::sensor::{EnvironmentSensor, is_wall_normal, probe_directions};

/// Which side of the body the wall is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallSide {
    Left,
    Right,
}

/// Wall geometry recomputed from a fresh probe every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallContact {
    pub normal: Vec3,
    /// Unit vector along the wall, `up x normal` flipped toward intent.
    pub tangent: Vec3,
    pub side: WallSide,
}

impl WallContact {
    /// Build contact data, or `None` when the normal has no horizontal part.
    pub fn from_normal(normal: Vec3, intent: Vec3, right: Vec3) -> Option<Self> {
        let tangent = Vec3::Y.cross(normal).try_normalize()?;
        let tangent = if tangent.dot(intent) < 0.0 {
            -tangent
        } else {
            tangent
        };
        let side = if right.dot(-normal) >= 0.0 {
            WallSide::Right
        } else {
            WallSide::Left
        };
        Some(Self {
            normal,
            tangent,
            side,
        })
    }

    /// Horizontal direction pointing away from the wall.
    pub fn away(&self) -> Option<Vec3> {
        flatten(self.normal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallRunExit {
    Grounded,
    Expired,
    WallLost,
    Misaligned,
    Forced,
}

#[derive(Debug, Clone)]
pub struct WallRunAbility {
    running: bool,
    started_at: f32,
    end_time: f32,
    contact: Option<WallContact>,
    /// Entry is refused before this time (cooldown after exit).
    pub next_allowed_time: f32,
    /// Entry is refused before this time (set by wall jumps).
    pub lock_until: f32,
    last_exit: Option<WallRunExit>,
}

impl Default for WallRunAbility {
    fn default() -> Self {
        Self {
            running: false,
            started_at: f32::NEG_INFINITY,
            end_time: f32::NEG_INFINITY,
            contact: None,
            next_allowed_time: f32::NEG_INFINITY,
            lock_until: f32::NEG_INFINITY,
            last_exit: None,
        }
    }
}

impl WallRunAbility {
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn contact(&self) -> Option<&WallContact> {
        self.contact.as_ref()
    }

    /// Reason the most recent run ended, cleared when a new run starts.
    pub fn last_exit(&self) -> Option<WallRunExit> {
        self.last_exit
    }

    /// Block entry until `until`.
    pub fn lock(&mut self, until: f32) {
        self.lock_until = self.lock_until.max(until);
    }

    /// End the run now. Does nothing when not running.
    pub fn force_stop(&mut self, flags: &mut AbilityFlags, now: f32, cooldown: f32) {
        if self.running {
            self.exit(flags, now, cooldown, WallRunExit::Forced);
        }
    }

    pub fn update<S: EnvironmentSensor>(&mut self, ctx: &mut TickContext<'_>, sensor: &S) {
        if self.running {
            if let Err(reason) = self.refresh(ctx, sensor) {
                self.exit(ctx.flags, ctx.now, ctx.tuning.wall_run_cooldown, reason);
                return;
            }
        } else if !self.try_enter(ctx, sensor) {
            return;
        }
        self.drive(ctx);
    }

    fn try_enter<S: EnvironmentSensor>(&mut self, ctx: &mut TickContext<'_>, sensor: &S) -> bool {
        let now = ctx.now;
        if ctx.ground.grounded
            || now < self.next_allowed_time
            || now < self.lock_until
            || ctx.flags.any_dash()
            || ctx.flags.is_kicking
        {
            return false;
        }

        let Some(intent) = movement_intent(ctx) else {
            return false;
        };

        let tuning = ctx.tuning;
        let origin = ctx.body.position;
        let right = ctx.body.right();
        let probes = probe_directions(tuning.wall_probe_pattern, ctx.body.forward(), right);
        let Some(hit) = sensor.query_wall(origin, &probes) else {
            return false;
        };
        if !is_wall_normal(hit.normal, tuning.wall_max_normal_y) {
            return false;
        }
        let Some(contact) = WallContact::from_normal(hit.normal, intent, right) else {
            return false;
        };

        let alignment = contact.tangent.dot(intent);
        if alignment < tuning.wall_run_min_forward_dot {
            debug!(
                "Wall-run refused: alignment {:.2} < {:.2}",
                alignment, tuning.wall_run_min_forward_dot
            );
            return false;
        }

        if sensor
            .height_above_ground(origin, tuning.wall_run_min_height)
            .is_some()
        {
            return false;
        }

        self.running = true;
        self.started_at = now;
        self.end_time = now + ctx.stats.wall_run_duration;
        self.contact = Some(contact);
        self.last_exit = None;
        ctx.flags.is_wall_running = true;

        debug!(
            "Wall-run started at t={:.3}: side={:?}, alignment={:.2}",
            now, contact.side, alignment
        );
        true
    }

    /// Re-probe the tracked wall; `Err` carries the reason to stop.
    fn refresh<S: EnvironmentSensor>(
        &mut self,
        ctx: &mut TickContext<'_>,
        sensor: &S,
    ) -> Result<(), WallRunExit> {
        if ctx.ground.grounded {
            return Err(WallRunExit::Grounded);
        }
        if ctx.now >= self.end_time {
            return Err(WallRunExit::Expired);
        }
        let Some(previous) = self.contact else {
            return Err(WallRunExit::WallLost);
        };

        let tuning = ctx.tuning;
        let right = ctx.body.right();
        let mut probes = Vec::with_capacity(13);
        if let Some(toward) = previous.away() {
            probes.push(-toward);
        }
        probes.extend(probe_directions(
            tuning.wall_probe_pattern,
            ctx.body.forward(),
            right,
        ));

        let hit = sensor
            .query_wall(ctx.body.position, &probes)
            .filter(|hit| is_wall_normal(hit.normal, tuning.wall_max_normal_y))
            .ok_or(WallRunExit::WallLost)?;

        if hit.normal.dot(previous.normal) < tuning.wall_normal_similarity {
            return Err(WallRunExit::Misaligned);
        }

        let contact = WallContact::from_normal(hit.normal, previous.tangent, right)
            .ok_or(WallRunExit::WallLost)?;
        self.contact = Some(contact);
        Ok(())
    }

    fn drive(&mut self, ctx: &mut TickContext<'_>) {
        let Some(contact) = self.contact else {
            return;
        };
        let Some(away) = contact.away() else {
            return;
        };

        let now = ctx.now;
        let dt = ctx.dt;
        let tuning = ctx.tuning;
        let elapsed = now - self.started_at;

        // Tangential speed: bounded step toward the throttle-scaled target.
        let mut target = ctx.stats.wall_run_speed * ctx.input.throttle().max(0.0);
        if elapsed < tuning.wall_run_entry_boost_time {
            target *= tuning.wall_run_entry_boost;
        }
        let planar = ctx.body.planar_velocity(Vec3::Y);
        let along = approach(
            planar.dot(contact.tangent),
            target,
            tuning.wall_run_accel * dt,
        );

        // Stick: keep a small velocity into the wall.
        let outward = (planar.dot(away) - tuning.wall_stick_accel * dt)
            .max(-tuning.wall_stick_max_speed);

        let vertical = ctx.body.vertical_speed(Vec3::Y);
        let vertical = if elapsed < tuning.wall_run_rise_time {
            vertical.max(tuning.wall_run_min_rise_speed)
        } else {
            plain_gravity(vertical, tuning.wall_run_gravity_scale, tuning, dt)
        };
        let vertical = vertical.clamp(
            -tuning.wall_run_max_fall_speed,
            tuning.wall_run_max_rise_speed,
        );

        ctx.body.set_velocity_parts(
            contact.tangent * along + away * outward,
            Vec3::Y,
            vertical,
        );

        // Turn smoothly to face along the wall.
        let turn = angle_delta(ctx.body.yaw, yaw_of(contact.tangent));
        let step = turn * (1.0 - (-tuning.wall_run_turn_rate * dt).exp());
        ctx.body.yaw = angle_delta(0.0, ctx.body.yaw + step);
        ctx.body.angular_velocity = if dt > EPSILON {
            Vec3::Y * (step / dt)
        } else {
            Vec3::ZERO
        };
    }

    fn exit(&mut self, flags: &mut AbilityFlags, now: f32, cooldown: f32, reason: WallRunExit) {
        self.running = false;
        self.contact = None;
        self.next_allowed_time = now + cooldown;
        self.last_exit = Some(reason);
        flags.is_wall_running = false;
        debug!(
            "Wall-run ended at t={:.3}: {:?} after {:.3}s",
            now,
            reason,
            now - self.started_at
        );
    }
}

/// Direction the body is trying to go: wish-direction, else velocity.
fn movement_intent(ctx: &TickContext<'_>) -> Option<Vec3> {
    let forward = flatten(ctx.body.forward())?;
    let wish = ctx.input.wish_direction(forward);
    flatten(wish).or_else(|| flatten(ctx.body.velocity))
}
