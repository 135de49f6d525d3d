//! Movement domain: messages emitted by the locomotion systems.

use bevy::ecs::message::Message;
use bevy::prelude::*;

use crate::movement::wall_run::WallRunExit;

/// A dashing body destroyed a hostile on contact.
#[derive(Debug)]
pub struct DashKill {
    pub player: Entity,
    pub hostile: Entity,
    pub position: Vec3,
}

impl Message for DashKill {}

/// Per-tick ability transitions of a body, for cameras, audio and UI.
#[derive(Debug)]
pub struct AbilityTransition {
    pub entity: Entity,
    pub kind: TransitionKind,
}

impl Message for AbilityTransition {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    DashStarted,
    WallRunStarted,
    WallRunEnded(WallRunExit),
    WallJumped,
    Jumped,
}
