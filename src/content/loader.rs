//! Loader for RON content files at startup.

use ron::Options;
use std::fs;
use std::path::Path;

use super::data::*;
use super::registry::ContentRegistry;
use crate::movement::MovementTuning;

pub const CHARACTERS_FILE: &str = "characters.ron";
pub const TUNING_FILE: &str = "movement_tuning.ron";

/// Error type for content loading failures.
#[derive(Debug)]
pub struct ContentLoadError {
    pub file: String,
    pub message: String,
}

impl std::fmt::Display for ContentLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to load {}: {}", self.file, self.message)
    }
}

/// Create RON options with extensions enabled for more flexible parsing.
fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

fn read_file(path: &Path) -> Result<String, ContentLoadError> {
    fs::read_to_string(path).map_err(|e| ContentLoadError {
        file: path.display().to_string(),
        message: format!("IO error: {}", e),
    })
}

/// Parse a RON document, tagging errors with `file`.
pub fn parse_ron<T>(file: &str, contents: &str) -> Result<T, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    ron_options()
        .from_str(contents)
        .map_err(|e| ContentLoadError {
            file: file.to_string(),
            message: format!("Parse error: {}", e),
        })
}

/// Build the character registry from a `DataFile<CharacterDef>` document.
/// A duplicate id rejects the whole document.
pub fn parse_characters(file: &str, contents: &str) -> Result<ContentRegistry, ContentLoadError> {
    let data: DataFile<CharacterDef> = parse_ron(file, contents)?;

    let mut registry = ContentRegistry::default();
    for item in data.items {
        if registry.characters.contains_key(&item.id) {
            return Err(ContentLoadError {
                file: file.to_string(),
                message: format!("Duplicate character id '{}'", item.id),
            });
        }
        registry.characters.insert(item.id.clone(), item);
    }
    Ok(registry)
}

pub fn load_characters(base_path: &Path) -> Result<ContentRegistry, ContentLoadError> {
    let path = base_path.join(CHARACTERS_FILE);
    let contents = read_file(&path)?;
    parse_characters(&path.display().to_string(), &contents)
}

/// Load the tuning file (a single struct, not wrapped in DataFile).
pub fn load_tuning(base_path: &Path) -> Result<MovementTuning, ContentLoadError> {
    let path = base_path.join(TUNING_FILE);
    let contents = read_file(&path)?;
    parse_ron(&path.display().to_string(), &contents)
}

/// Load all content from assets/data/*.ron.
/// Returns errors for any files that fail to load.
pub fn load_all_content(
    base_path: &Path,
) -> Result<(ContentRegistry, MovementTuning), Vec<ContentLoadError>> {
    match (load_characters(base_path), load_tuning(base_path)) {
        (Ok(registry), Ok(tuning)) => Ok((registry, tuning)),
        (characters, tuning) => Err([characters.err(), tuning.err()]
            .into_iter()
            .flatten()
            .collect()),
    }
}
