//! Movement domain: stacked speed/acceleration modifiers from collaborators.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One collaborator's contribution to the speed cap and acceleration.
///
/// Bonuses are added to the base value first, then every active factor
/// multiplies the result.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpeedModifier {
    pub speed_factor: f32,
    pub speed_bonus: f32,
    pub accel_factor: f32,
    pub accel_bonus: f32,
}

impl Default for SpeedModifier {
    fn default() -> Self {
        Self {
            speed_factor: 1.0,
            speed_bonus: 0.0,
            accel_factor: 1.0,
            accel_bonus: 0.0,
        }
    }
}

impl SpeedModifier {
    pub fn scale(factor: f32) -> Self {
        Self {
            speed_factor: factor,
            accel_factor: factor,
            ..default()
        }
    }

    pub fn bonus(speed: f32) -> Self {
        Self {
            speed_bonus: speed,
            ..default()
        }
    }
}

/// Active modifiers keyed by the collaborator that pushed them.
///
/// Pushing under an existing key replaces that collaborator's entry, so
/// each source owns exactly one slot and can remove it independently.
#[derive(Component, Debug, Clone, Default)]
pub struct SpeedModifiers {
    pub sources: HashMap<String, SpeedModifier>,
}

impl SpeedModifiers {
    pub fn push(&mut self, source: impl Into<String>, modifier: SpeedModifier) {
        self.sources.insert(source.into(), modifier);
    }

    pub fn pop(&mut self, source: &str) -> Option<SpeedModifier> {
        self.sources.remove(source)
    }

    pub fn contains(&self, source: &str) -> bool {
        self.sources.contains_key(source)
    }

    /// Effective speed cap, never negative.
    pub fn speed_cap(&self, base: f32) -> f32 {
        let bonus: f32 = self.sources.values().map(|m| m.speed_bonus).sum();
        let factor: f32 = self.sources.values().map(|m| m.speed_factor).product();
        ((base + bonus) * factor).max(0.0)
    }

    /// Effective acceleration, never negative.
    pub fn accel(&self, base: f32) -> f32 {
        let bonus: f32 = self.sources.values().map(|m| m.accel_bonus).sum();
        let factor: f32 = self.sources.values().map(|m| m.accel_factor).product();
        ((base + bonus) * factor).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stack_is_identity() {
        let mods = SpeedModifiers::default();
        assert_eq!(mods.speed_cap(12.0), 12.0);
        assert_eq!(mods.accel(60.0), 60.0);
    }

    #[test]
    fn factors_compose_by_product() {
        let mut mods = SpeedModifiers::default();
        mods.push("conveyor", SpeedModifier::scale(1.5));
        mods.push("mud", SpeedModifier::scale(0.5));
        assert!((mods.speed_cap(10.0) - 7.5).abs() < 1e-5);
        assert!((mods.accel(10.0) - 7.5).abs() < 1e-5);
    }

    #[test]
    fn sources_pop_independently() {
        let mut mods = SpeedModifiers::default();
        mods.push("conveyor", SpeedModifier::scale(2.0));
        mods.push("upgrade", SpeedModifier::bonus(3.0));
        assert!((mods.speed_cap(10.0) - 26.0).abs() < 1e-5);

        assert!(mods.pop("conveyor").is_some());
        assert!((mods.speed_cap(10.0) - 13.0).abs() < 1e-5);
        assert!(!mods.contains("conveyor"));
        assert!(mods.contains("upgrade"));

        // Popping twice is harmless
        assert!(mods.pop("conveyor").is_none());
    }

    #[test]
    fn pushing_same_source_replaces_entry() {
        let mut mods = SpeedModifiers::default();
        mods.push("zone_a", SpeedModifier::scale(2.0));
        mods.push("zone_a", SpeedModifier::scale(3.0));
        assert_eq!(mods.sources.len(), 1);
        assert!((mods.speed_cap(1.0) - 3.0).abs() < 1e-5);
    }

    #[test]
    fn negative_results_clamp_to_zero() {
        let mut mods = SpeedModifiers::default();
        mods.push("trap", SpeedModifier::bonus(-50.0));
        assert_eq!(mods.speed_cap(12.0), 0.0);

        let mut mods = SpeedModifiers::default();
        mods.push("cursed", SpeedModifier::scale(-1.0));
        assert_eq!(mods.speed_cap(12.0), 0.0);
        assert_eq!(mods.accel(60.0), 0.0);
    }
}
