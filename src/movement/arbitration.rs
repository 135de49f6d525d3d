//! Movement domain: per-tick arbitration between abilities.
//!
//! Every tick runs Dash -> Wall-Run -> Wall-Jump -> Locomotion -> cosmetics
//! against one shared [`TickContext`]. Abilities coordinate only through
//! [`AbilityFlags`]; whichever claims the body authors its velocity and yaw,
//! and the Locomotion Core stands down while any claim is held.

use bevy::prelude::*;

use crate::movement::body::BodyState;
use crate::movement::cosmetics::{Tilt, update_tilt};
use crate::movement::dash::DashAbility;
use crate::movement::input::InputSnapshot;
use crate::movement::locomotion::Locomotion;
use crate::movement::sensor::EnvironmentSensor;
use crate::movement::wall_jump::WallJumpAbility;
use crate::movement::wall_run::{WallContact, WallRunAbility, WallRunExit};
use crate::movement::{MovementStats, MovementTuning, SpeedModifiers};

/// Mutual-exclusion channel published by abilities each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbilityFlags {
    pub is_dashing: bool,
    pub is_side_dashing: bool,
    pub is_wall_running: bool,
    /// A wall-jump kick is still ramping in.
    pub is_kicking: bool,
    pub suppress_base_movement: bool,
    pub suppress_jump_buffer: bool,
    /// Post-dash boost applied to the Locomotion Core's speed cap.
    pub speed_multiplier: f32,
}

impl Default for AbilityFlags {
    fn default() -> Self {
        Self {
            is_dashing: false,
            is_side_dashing: false,
            is_wall_running: false,
            is_kicking: false,
            suppress_base_movement: false,
            suppress_jump_buffer: false,
            speed_multiplier: 1.0,
        }
    }
}

impl AbilityFlags {
    pub fn any_dash(&self) -> bool {
        self.is_dashing || self.is_side_dashing
    }

    /// Whether some ability currently owns the body's velocity.
    pub fn claims_body(&self) -> bool {
        self.suppress_base_movement || self.is_wall_running || self.is_kicking || self.any_dash()
    }

    /// At most one of dashing, wall-running and kicking may hold.
    pub fn is_exclusive(&self) -> bool {
        let claims = [self.any_dash(), self.is_wall_running, self.is_kicking];
        claims.into_iter().filter(|held| *held).count() <= 1
    }
}

/// Ground state refreshed at the start of every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundContact {
    pub grounded: bool,
    pub normal: Vec3,
    pub distance: f32,
    pub last_grounded_time: f32,
    pub landed_at: f32,
}

impl Default for GroundContact {
    fn default() -> Self {
        Self {
            grounded: false,
            normal: Vec3::Y,
            distance: f32::INFINITY,
            last_grounded_time: f32::NEG_INFINITY,
            landed_at: f32::NEG_INFINITY,
        }
    }
}

impl GroundContact {
    /// Ground normal while grounded, world up otherwise.
    pub fn up(&self) -> Vec3 {
        if self.grounded { self.normal } else { Vec3::Y }
    }
}

/// Everything an ability may read or write during one tick.
pub struct TickContext<'a> {
    pub now: f32,
    pub dt: f32,
    pub body: &'a mut BodyState,
    pub input: &'a mut InputSnapshot,
    pub flags: &'a mut AbilityFlags,
    pub ground: &'a GroundContact,
    pub stats: &'a MovementStats,
    pub tuning: &'a MovementTuning,
    pub modifiers: &'a SpeedModifiers,
}

/// Read-only summary of what happened during a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    pub dash_started: bool,
    pub wall_run_started: bool,
    /// Why a wall-run that was active at the start of the tick stopped.
    pub wall_run_ended: Option<WallRunExit>,
    pub wall_jumped: bool,
    pub jumped: bool,
}

/// The locomotion core of one body: all abilities plus their shared state.
#[derive(Component, Debug, Clone, Default)]
pub struct MotionController {
    pub dash: DashAbility,
    pub wall_run: WallRunAbility,
    pub wall_jump: WallJumpAbility,
    pub locomotion: Locomotion,
    flags: AbilityFlags,
    ground: GroundContact,
    tilt: Tilt,
}

impl MotionController {
    /// Advance one fixed tick at clock time `now`.
    #[allow(clippy::too_many_arguments)]
    pub fn step<S: EnvironmentSensor>(
        &mut self,
        body: &mut BodyState,
        input: &mut InputSnapshot,
        sensor: &S,
        stats: &MovementStats,
        tuning: &MovementTuning,
        modifiers: &SpeedModifiers,
        now: f32,
        dt: f32,
    ) -> TickReport {
        let Self {
            dash,
            wall_run,
            wall_jump,
            locomotion,
            flags,
            ground,
            tilt,
        } = self;

        locomotion.sense_ground(ground, sensor, body, tuning, now);
        input.jump.expire(now, tuning.jump_buffer_time);

        let mut ctx = TickContext {
            now,
            dt,
            body,
            input,
            flags,
            ground,
            stats,
            tuning,
            modifiers,
        };

        let mut report = TickReport {
            dash_started: dash.update(&mut ctx),
            ..default()
        };

        let was_running = wall_run.is_running();
        wall_run.update(&mut ctx, sensor);
        report.wall_run_started = !was_running && wall_run.is_running();

        let outcome = wall_jump.update(&mut ctx, wall_run, locomotion);
        report.wall_jumped = outcome.wall_jumped;
        report.jumped = outcome.jumped;
        if was_running && !wall_run.is_running() {
            report.wall_run_ended = wall_run.last_exit();
        }

        locomotion.update(&mut ctx);

        update_tilt(tilt, &ctx, wall_run, locomotion);

        debug_assert!(
            ctx.flags.is_exclusive(),
            "more than one ability claims the body: {:?}",
            ctx.flags
        );
        report
    }

    /// Zero the body's velocities and drop any in-flight kick. Ability
    /// timers are left untouched.
    pub fn respawn(&mut self, body: &mut BodyState) {
        body.halt();
        self.wall_jump.cancel_kick(&mut self.flags);
    }

    pub fn flags(&self) -> &AbilityFlags {
        &self.flags
    }

    pub fn ground(&self) -> &GroundContact {
        &self.ground
    }

    pub fn grounded(&self) -> bool {
        self.ground.grounded
    }

    pub fn ground_normal(&self) -> Vec3 {
        self.ground.normal
    }

    /// Current speed across the ground plane.
    pub fn planar_speed(&self, body: &BodyState) -> f32 {
        body.planar_velocity(self.ground.up()).length()
    }

    pub fn wall_contact(&self) -> Option<&WallContact> {
        self.wall_run.contact()
    }

    pub fn tilt(&self) -> Tilt {
        self.tilt
    }
}
