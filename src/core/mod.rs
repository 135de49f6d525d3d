//! Core domain: run flow, selection, pausing and camera.

mod events;
mod resources;
mod state;
mod systems;
#[cfg(test)]
mod tests;
mod ui;

pub use events::{CharacterSelectedEvent, RespawnRequested};
pub use resources::{GameplayPaused, SelectedCharacter, gameplay_active};
pub use state::GameState;
pub use ui::character_select::{CharacterChoice, FALLBACK_CHARACTER_ID, character_choices};

use bevy::prelude::*;

use crate::core::systems::{
    follow_player, setup_camera, sync_pause_clocks, toggle_pause, transition_to_character_select,
};
use crate::core::ui::character_select::{
    cleanup_character_select_ui, handle_character_select_click, handle_character_select_input,
    spawn_character_select_ui,
};

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .init_resource::<SelectedCharacter>()
            .init_resource::<GameplayPaused>()
            .add_message::<CharacterSelectedEvent>()
            .add_message::<RespawnRequested>()
            .add_systems(Startup, setup_camera)
            .add_systems(OnEnter(GameState::Boot), transition_to_character_select)
            .add_systems(OnEnter(GameState::CharacterSelect), spawn_character_select_ui)
            .add_systems(
                OnExit(GameState::CharacterSelect),
                cleanup_character_select_ui,
            )
            .add_systems(
                Update,
                (handle_character_select_input, handle_character_select_click)
                    .run_if(in_state(GameState::CharacterSelect)),
            )
            .add_systems(
                Update,
                (toggle_pause, follow_player).run_if(in_state(GameState::Run)),
            )
            .add_systems(
                Update,
                sync_pause_clocks
                    .after(toggle_pause)
                    .run_if(resource_changed::<GameplayPaused>),
            );
    }
}
