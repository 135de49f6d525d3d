//! Core domain: events for character selection and respawning.

use bevy::ecs::message::Message;
use bevy::prelude::*;

/// Event fired when a character is selected
#[derive(Debug)]
pub struct CharacterSelectedEvent {
    pub character_id: String,
}

impl Message for CharacterSelectedEvent {}

/// Request to send a body back to its spawn point.
/// Velocities are zeroed; ability cooldowns keep running.
#[derive(Debug)]
pub struct RespawnRequested {
    pub entity: Entity,
}

impl Message for RespawnRequested {}
