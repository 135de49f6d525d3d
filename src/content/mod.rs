//! Content domain: RON-backed character data and movement tuning.

mod data;
mod loader;
mod registry;
#[cfg(test)]
mod tests;
mod validation;

pub use data::{CharacterDef, DataFile};
pub use loader::{
    CHARACTERS_FILE, ContentLoadError, TUNING_FILE, load_all_content, load_characters,
    load_tuning, parse_characters, parse_ron,
};
pub use registry::ContentRegistry;
pub use validation::{ValidationError, validate_content, validate_stats, validate_tuning};

use bevy::prelude::*;
use std::path::Path;

use crate::movement::MovementTuning;

/// Directory holding the RON data files, relative to the working directory.
pub const CONTENT_DIR: &str = "assets/data";

pub struct ContentPlugin;

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_content);
    }
}

/// Load characters and tuning, falling back to built-in defaults per file.
fn load_content(mut commands: Commands) {
    let base = Path::new(CONTENT_DIR);

    let registry = load_characters(base).unwrap_or_else(|e| {
        error!("{}", e);
        warn!("Using built-in default character");
        ContentRegistry::default()
    });
    let tuning = load_tuning(base).unwrap_or_else(|e| {
        warn!("{}; using default movement tuning", e);
        MovementTuning::default()
    });

    for problem in validate_content(&registry, &tuning) {
        warn!("Content validation: {}", problem);
    }

    info!("{}", registry.summary());
    info!("Content loaded: {} items", registry.total_count());

    commands.insert_resource(registry);
    commands.insert_resource(tuning);
}
