//! Content domain: unit tests for RON parsing and validation.

use std::path::Path;

use super::{
    CONTENT_DIR, ContentLoadError, ContentRegistry, load_all_content, parse_characters, parse_ron,
    validate_content, validate_stats, validate_tuning,
};
use crate::movement::{MovementStats, MovementTuning, WallProbePattern};

const CHARACTERS: &str = r#"
(
    schema_version: 1,
    items: [
        (
            id: "character_a",
            name: "A",
            movement: (max_speed: 15.0, jump_force: 7.5),
            tags: ["fast"],
        ),
        (
            id: "character_b",
            name: "B",
        ),
    ],
)
"#;

#[test]
fn test_parse_characters_fills_missing_stats_with_defaults() {
    let registry = parse_characters("characters.ron", CHARACTERS).expect("valid RON");
    assert_eq!(registry.characters.len(), 2);

    let a = &registry.characters["character_a"].movement;
    assert_eq!(a.max_speed, 15.0);
    assert_eq!(a.jump_force, 7.5);
    assert_eq!(a.dash_speed, MovementStats::default().dash_speed);

    let b = &registry.characters["character_b"];
    assert_eq!(b.movement, MovementStats::default());
    assert!(b.tags.is_empty());
}

#[test]
fn test_parse_characters_rejects_duplicate_ids() {
    let doc = r#"(schema_version: 1, items: [(id: "x", name: "X"), (id: "x", name: "Y")])"#;
    let err = parse_characters("characters.ron", doc).expect_err("duplicate id");
    assert!(err.message.contains("Duplicate"));
}

#[test]
fn test_parse_error_names_the_file() {
    let err = parse_characters("broken.ron", "(schema_version: ").expect_err("truncated");
    let text = err.to_string();
    assert!(text.starts_with("Failed to load broken.ron"));
    assert!(text.contains("Parse error"));
}

#[test]
fn test_partial_tuning_keeps_defaults() {
    let tuning: MovementTuning =
        parse_ron("movement_tuning.ron", "(coyote_time: 0.2, wall_probe_pattern: Cardinal)")
            .expect("valid RON");
    let defaults = MovementTuning::default();

    assert_eq!(tuning.coyote_time, 0.2);
    assert_eq!(tuning.wall_probe_pattern, WallProbePattern::Cardinal);
    assert_eq!(tuning.jump_buffer_time, defaults.jump_buffer_time);
    assert_eq!(tuning.gravity, defaults.gravity);
}

#[test]
fn test_default_content_validates_clean() {
    assert!(validate_stats("default", &MovementStats::default()).is_empty());
    assert!(validate_tuning(&MovementTuning::default()).is_empty());
}

#[test]
fn test_validation_flags_bad_values() {
    let stats = MovementStats {
        dash_duration: 0.0,
        max_speed: -1.0,
        wall_run_duration: f32::NAN,
        ..MovementStats::default()
    };
    let errors = validate_stats("bad", &stats);
    let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
    assert_eq!(errors.len(), 3);
    assert!(fields.contains(&"dash_duration"));
    assert!(fields.contains(&"max_speed"));
    assert!(fields.contains(&"wall_run_duration"));

    let tuning = MovementTuning {
        wall_probe_pattern: WallProbePattern::Ring(0),
        wall_max_normal_y: 1.5,
        ..MovementTuning::default()
    };
    assert_eq!(validate_tuning(&tuning).len(), 2);
}

#[test]
fn test_shipped_content_loads_and_validates() {
    let (registry, tuning) = match load_all_content(Path::new(CONTENT_DIR)) {
        Ok(loaded) => loaded,
        Err(errors) => {
            let messages: Vec<String> = errors.iter().map(ContentLoadError::to_string).collect();
            panic!("content failed to load: {:?}", messages);
        }
    };

    assert!(registry.characters.contains_key("character_runner"));
    assert!(validate_content(&registry, &tuning).is_empty());
}

#[test]
fn test_registry_summary_counts() {
    let registry = ContentRegistry::default();
    assert_eq!(registry.total_count(), 0);
    assert!(registry.summary().contains("Characters: 0"));
}
