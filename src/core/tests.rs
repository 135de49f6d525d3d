//! Core domain: unit tests for pause sources and character selection.

use bevy::prelude::*;

use super::systems::sync_pause_clocks;
use super::{FALLBACK_CHARACTER_ID, GameplayPaused, SelectedCharacter, character_choices};
use crate::content::parse_characters;

#[test]
fn test_pause_sources_stack() {
    let mut paused = GameplayPaused::default();
    assert!(!paused.is_paused());

    paused.pause("menu");
    paused.pause("dialog");
    assert!(paused.is_paused());

    paused.unpause("menu");
    assert!(paused.is_paused());

    paused.unpause("dialog");
    assert!(!paused.is_paused());
}

fn pause_clock_app() -> App {
    let mut app = App::new();
    app.init_resource::<Time<Virtual>>()
        .init_resource::<GameplayPaused>()
        .add_systems(
            Update,
            sync_pause_clocks.run_if(resource_changed::<GameplayPaused>),
        );
    app
}

fn virtual_paused(app: &App) -> bool {
    app.world().resource::<Time<Virtual>>().is_paused()
}

#[test]
fn test_pause_stops_virtual_clock_until_last_source_clears() {
    let mut app = pause_clock_app();
    app.update();
    assert!(!virtual_paused(&app));

    app.world_mut().resource_mut::<GameplayPaused>().pause("menu");
    app.world_mut().resource_mut::<GameplayPaused>().pause("dialog");
    app.update();
    assert!(virtual_paused(&app));

    app.world_mut().resource_mut::<GameplayPaused>().unpause("menu");
    app.update();
    assert!(virtual_paused(&app), "one source still holds the pause");

    app.world_mut().resource_mut::<GameplayPaused>().unpause("dialog");
    app.update();
    assert!(!virtual_paused(&app));
}

#[test]
fn test_pause_toggle() {
    let mut paused = GameplayPaused::default();
    assert!(paused.toggle("key"));
    assert!(paused.is_paused());
    assert!(!paused.toggle("key"));
    assert!(!paused.is_paused());
}

#[test]
fn test_selected_character() {
    let mut selected = SelectedCharacter::default();
    assert!(!selected.is_selected());
    selected.select("character_runner");
    assert_eq!(selected.character_id.as_deref(), Some("character_runner"));
}

#[test]
fn test_character_choices_sorted_by_id() {
    let registry = parse_characters(
        "characters.ron",
        r#"(schema_version: 1, items: [
            (id: "character_z", name: "Zed"),
            (id: "character_a", name: "Ace"),
        ])"#,
    )
    .expect("valid RON");

    let choices = character_choices(Some(&registry));
    let ids: Vec<&str> = choices.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["character_a", "character_z"]);
    assert!(choices[0].summary.contains("Speed 12"));
}

#[test]
fn test_character_choices_fallback_without_content() {
    let choices = character_choices(None);
    assert_eq!(choices.len(), 1);
    assert_eq!(choices[0].id, FALLBACK_CHARACTER_ID);
}
