//! Movement domain: speed zones feeding the modifier channel.

use avian3d::prelude::*;
use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::movement::{Player, SpeedModifiers, SpeedZone};

/// Push a zone's modifier when a player enters it and pop it on exit.
pub(crate) fn track_speed_zones(
    mut collision_starts: MessageReader<CollisionStart>,
    mut collision_ends: MessageReader<CollisionEnd>,
    zones: Query<&SpeedZone>,
    mut players: Query<&mut SpeedModifiers, With<Player>>,
) {
    for event in collision_starts.read() {
        let (zone_entity, other) = if zones.contains(event.collider1) {
            (event.collider1, event.collider2)
        } else if zones.contains(event.collider2) {
            (event.collider2, event.collider1)
        } else {
            continue;
        };

        let (Ok(zone), Ok(mut modifiers)) = (zones.get(zone_entity), players.get_mut(other))
        else {
            continue;
        };
        // Overlapping colliders of one zone share a source key
        if !modifiers.contains(&zone.source) {
            debug!("Entered speed zone '{}'", zone.source);
        }
        modifiers.push(zone.source.clone(), zone.modifier);
    }

    for event in collision_ends.read() {
        let (zone_entity, other) = if zones.contains(event.collider1) {
            (event.collider1, event.collider2)
        } else if zones.contains(event.collider2) {
            (event.collider2, event.collider1)
        } else {
            continue;
        };

        let (Ok(zone), Ok(mut modifiers)) = (zones.get(zone_entity), players.get_mut(other))
        else {
            continue;
        };
        if modifiers.pop(&zone.source).is_some() {
            debug!("Left speed zone '{}'", zone.source);
        }
    }
}
