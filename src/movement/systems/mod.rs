//! Movement domain: system modules for the fixed-tick locomotion pipeline.

pub(crate) mod collisions;
pub(crate) mod cosmetic;
pub(crate) mod input;
pub(crate) mod movement;
pub(crate) mod zones;

pub(crate) use collisions::dash_kill_on_contact;
pub(crate) use cosmetic::apply_visual_tilt;
pub(crate) use input::{read_input, sample_player_input};
pub(crate) use movement::{
    advance_motion, apply_character_stats, handle_respawn, respawn_below_kill_plane,
};
pub(crate) use zones::track_speed_zones;
