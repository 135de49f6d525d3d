//! Movement domain: locomotion core, abilities and their fixed-tick wiring.
//!
//! The core ([`MotionController::step`]) is plain Rust over [`BodyState`] and
//! an [`EnvironmentSensor`]; the systems module adapts it to avian bodies.

mod arbitration;
mod body;
mod bootstrap;
mod components;
mod cosmetics;
mod dash;
#[cfg(feature = "dev-tools")]
mod dev;
mod events;
mod input;
mod locomotion;
mod modifiers;
mod resources;
mod sensor;
mod systems;
mod wall_jump;
mod wall_run;

pub use arbitration::{AbilityFlags, GroundContact, MotionController, TickReport};
pub use body::BodyState;
pub use components::{
    GameLayer, Hostile, MovementStats, Player, SpawnPoint, SpeedZone, VisualTilt,
};
pub use cosmetics::Tilt;
pub use events::{AbilityTransition, DashKill, TransitionKind};
pub use input::{DashDirection, InputSampler, InputSnapshot};
pub use modifiers::{SpeedModifier, SpeedModifiers};
pub use resources::{MovementInput, MovementTuning, WallProbePattern};
pub use sensor::{EnvironmentSensor, GroundHit, NullSensor, WallHit};
pub use wall_run::{WallContact, WallRunExit, WallSide};

use bevy::input::InputSystems;
use bevy::prelude::*;

use crate::core::{GameState, gameplay_active};
use crate::movement::bootstrap::spawn_player;
use crate::movement::systems::{
    advance_motion, apply_character_stats, apply_visual_tilt, dash_kill_on_contact,
    handle_respawn, read_input, respawn_below_kill_plane, sample_player_input,
    track_speed_zones,
};

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MovementTuning>()
            .init_resource::<MovementInput>()
            .add_message::<DashKill>()
            .add_message::<AbilityTransition>()
            .add_systems(OnEnter(GameState::Run), spawn_player)
            .add_systems(PreUpdate, read_input.after(InputSystems))
            .add_systems(
                FixedUpdate,
                (
                    sample_player_input,
                    advance_motion,
                    dash_kill_on_contact,
                    track_speed_zones,
                    apply_visual_tilt,
                )
                    .chain()
                    .run_if(in_state(GameState::Run))
                    .run_if(gameplay_active),
            )
            .add_systems(
                Update,
                (apply_character_stats, respawn_below_kill_plane, handle_respawn).chain(),
            );

        #[cfg(feature = "dev-tools")]
        {
            use crate::movement::dev::{
                ProbeGizmos, draw_probe_gizmos, handle_dev_hotkeys, log_state_changes,
                spawn_test_course,
            };

            app.init_resource::<ProbeGizmos>()
                .add_systems(OnEnter(GameState::Run), spawn_test_course)
                .add_systems(
                    Update,
                    (handle_dev_hotkeys, draw_probe_gizmos, log_state_changes)
                        .run_if(in_state(GameState::Run)),
                );
        }
    }
}
