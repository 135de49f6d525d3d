//! Core domain: character selection UI and input handling.

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::content::ContentRegistry;
use crate::core::{CharacterSelectedEvent, GameState, SelectedCharacter};

/// Used when no content is loaded at all.
pub const FALLBACK_CHARACTER_ID: &str = "character_runner";

const CARD_COLORS: [Color; 4] = [
    Color::srgb(0.85, 0.25, 0.25),
    Color::srgb(0.3, 0.7, 0.35),
    Color::srgb(0.25, 0.5, 0.85),
    Color::srgb(0.85, 0.75, 0.25),
];

const DIGIT_KEYS: [(KeyCode, KeyCode); 9] = [
    (KeyCode::Digit1, KeyCode::Numpad1),
    (KeyCode::Digit2, KeyCode::Numpad2),
    (KeyCode::Digit3, KeyCode::Numpad3),
    (KeyCode::Digit4, KeyCode::Numpad4),
    (KeyCode::Digit5, KeyCode::Numpad5),
    (KeyCode::Digit6, KeyCode::Numpad6),
    (KeyCode::Digit7, KeyCode::Numpad7),
    (KeyCode::Digit8, KeyCode::Numpad8),
    (KeyCode::Digit9, KeyCode::Numpad9),
];

/// Marker for the character selection UI root
#[derive(Component, Debug)]
pub struct CharacterSelectUI;

/// Button for selecting a specific character
#[derive(Component, Debug)]
pub struct CharacterSelectButton {
    pub character_id: String,
}

/// One selectable character as shown on a card.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterChoice {
    pub id: String,
    pub name: String,
    pub summary: String,
}

/// Characters in display order (sorted by id so key bindings are stable).
pub fn character_choices(registry: Option<&ContentRegistry>) -> Vec<CharacterChoice> {
    let Some(registry) = registry.filter(|reg| !reg.characters.is_empty()) else {
        return vec![CharacterChoice {
            id: FALLBACK_CHARACTER_ID.to_string(),
            name: "Runner".to_string(),
            summary: "Default stats".to_string(),
        }];
    };

    let mut choices: Vec<CharacterChoice> = registry
        .characters
        .values()
        .map(|def| CharacterChoice {
            id: def.id.clone(),
            name: def.name.clone(),
            summary: format!(
                "Speed {:.0} - Jump {:.0} - Dash {:.0}",
                def.movement.max_speed, def.movement.jump_force, def.movement.dash_speed
            ),
        })
        .collect();
    choices.sort_by(|a, b| a.id.cmp(&b.id));
    choices
}

/// Colors shared by the selection screen and its hover feedback.
struct Palette;

impl Palette {
    const BACKDROP: Color = Color::srgba(0.05, 0.05, 0.1, 0.98);
    const CARD: Color = Color::srgb(0.12, 0.12, 0.18);
    const CARD_HOVER: Color = Color::srgb(0.18, 0.18, 0.25);
    const TEXT: Color = Color::srgb(0.9, 0.9, 0.9);
    const MUTED: Color = Color::srgb(0.6, 0.6, 0.7);
    const TITLE: Color = Color::srgb(0.9, 0.75, 0.3);
}

fn label(text: impl Into<String>, size: f32, color: Color) -> (Text, TextFont, TextColor) {
    (
        Text::new(text),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(color),
    )
}

fn spaced(top: f32, bottom: f32) -> Node {
    Node {
        margin: UiRect {
            top: Val::Px(top),
            bottom: Val::Px(bottom),
            ..default()
        },
        ..default()
    }
}

pub(crate) fn spawn_character_select_ui(
    mut commands: Commands,
    registry: Option<Res<ContentRegistry>>,
) {
    let choices = character_choices(registry.as_deref());
    let root = Node {
        width: Val::Percent(100.0),
        height: Val::Percent(100.0),
        position_type: PositionType::Absolute,
        flex_direction: FlexDirection::Column,
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        ..default()
    };
    let row = Node {
        flex_direction: FlexDirection::Row,
        align_items: AlignItems::Stretch,
        column_gap: Val::Px(20.0),
        ..default()
    };

    commands
        .spawn((
            CharacterSelectUI,
            root,
            BackgroundColor(Palette::BACKDROP),
            ZIndex(100),
        ))
        .with_children(|screen| {
            screen.spawn((label("SKYLINE RUNNER", 64.0, Palette::TITLE), spaced(0.0, 40.0)));

            screen.spawn(row).with_children(|cards| {
                for (slot, choice) in choices.iter().take(DIGIT_KEYS.len()).enumerate() {
                    spawn_card(cards, slot, choice);
                }
            });

            screen.spawn((
                label("1-9 or click to pick a runner", 16.0, Palette::MUTED),
                spaced(40.0, 0.0),
            ));
        });
}

fn spawn_card(cards: &mut ChildSpawnerCommands, slot: usize, choice: &CharacterChoice) {
    let accent = CARD_COLORS[slot % CARD_COLORS.len()];
    let frame = Node {
        width: Val::Px(200.0),
        min_height: Val::Px(160.0),
        flex_direction: FlexDirection::Column,
        align_items: AlignItems::Center,
        padding: UiRect::all(Val::Px(15.0)),
        border: UiRect::all(Val::Px(3.0)),
        ..default()
    };

    cards
        .spawn((
            CharacterSelectButton {
                character_id: choice.id.clone(),
            },
            Button,
            frame,
            BorderColor::all(accent.with_alpha(0.6)),
            BackgroundColor(Palette::CARD),
        ))
        .with_children(|card| {
            card.spawn((
                label(format!("[{}]", slot + 1), 14.0, Palette::MUTED),
                spaced(0.0, 10.0),
            ));
            card.spawn((
                label(choice.name.clone(), 20.0, Palette::TEXT),
                TextLayout::new_with_justify(Justify::Center),
                spaced(0.0, 8.0),
            ));
            card.spawn((
                label(choice.summary.clone(), 13.0, Palette::MUTED),
                TextLayout::new_with_justify(Justify::Center),
            ));
        });
}

pub(crate) fn cleanup_character_select_ui(
    mut commands: Commands,
    query: Query<Entity, With<CharacterSelectUI>>,
) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}

fn confirm_selection(
    character_id: &str,
    selected_character: &mut SelectedCharacter,
    char_events: &mut MessageWriter<CharacterSelectedEvent>,
    game_state: &mut NextState<GameState>,
) {
    selected_character.select(character_id);
    char_events.write(CharacterSelectedEvent {
        character_id: character_id.to_string(),
    });
    game_state.set(GameState::Run);
}

pub(crate) fn handle_character_select_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    registry: Option<Res<ContentRegistry>>,
    mut selected_character: ResMut<SelectedCharacter>,
    mut char_events: MessageWriter<CharacterSelectedEvent>,
    mut game_state: ResMut<NextState<GameState>>,
) {
    let Some(index) = DIGIT_KEYS
        .iter()
        .position(|(digit, numpad)| keyboard.just_pressed(*digit) || keyboard.just_pressed(*numpad))
    else {
        return;
    };

    let choices = character_choices(registry.as_deref());
    let Some(choice) = choices.get(index) else {
        return;
    };

    confirm_selection(
        &choice.id,
        &mut selected_character,
        &mut char_events,
        &mut game_state,
    );
    info!("Character selected via keyboard: {}", choice.id);
}

pub(crate) fn handle_character_select_click(
    mut button_query: Query<
        (&CharacterSelectButton, &Interaction, &mut BackgroundColor),
        Changed<Interaction>,
    >,
    mut selected_character: ResMut<SelectedCharacter>,
    mut char_events: MessageWriter<CharacterSelectedEvent>,
    mut game_state: ResMut<NextState<GameState>>,
) {
    for (button, interaction, mut bg_color) in &mut button_query {
        match interaction {
            Interaction::Pressed => {
                confirm_selection(
                    &button.character_id,
                    &mut selected_character,
                    &mut char_events,
                    &mut game_state,
                );
                info!("Character selected via click: {}", button.character_id);
            }
            Interaction::Hovered => *bg_color = BackgroundColor(Palette::CARD_HOVER),
            Interaction::None => *bg_color = BackgroundColor(Palette::CARD),
        }
    }
}
