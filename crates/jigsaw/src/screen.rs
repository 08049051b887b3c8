use core::time::Duration;

use bevy::prelude::*;
use bits_helpers::notice::blocking_notice;

use crate::board::PuzzleBoard;
use crate::catalog::{ImageCatalog, ImageStatus, PuzzleImage, IMAGE_CATALOG};
use crate::game::{GameSettings, GameState, NewGame, PuzzleSolved};

const PLACEHOLDER_COLOR: Color = Color::srgb(0.867, 0.867, 0.867);
const PLACEHOLDER_TEXT_COLOR: Color = Color::srgb(0.2, 0.2, 0.2);
const BUTTON_COLOR: Color = Color::srgb(0.25, 0.25, 0.3);
const BUTTON_HOVER_COLOR: Color = Color::srgb(0.35, 0.35, 0.42);

const OVERLAY_Z: f32 = 50.0;
const NOTICE_DURATION: Duration = Duration::from_secs(2);
const COMPLETION_MESSAGE: &str = "Congratulations! You solved the puzzle!";

/// Covers the board until a game is running.
#[derive(Component)]
pub struct Placeholder;

#[derive(Component)]
struct PlaceholderText;

#[derive(Component)]
pub struct CompletionNotice {
    timer: Timer,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlButton {
    Difficulty,
    Image,
    Start,
}

#[derive(Component, Debug, Clone, Copy)]
struct ControlLabel(ControlButton);

pub struct ScreenPlugin;

impl Plugin for ScreenPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_controls)
            .add_systems(OnEnter(GameState::Playing), despawn_screen::<Placeholder>)
            .add_systems(
                Update,
                (
                    try_spawn_placeholder.run_if(not(in_state(GameState::Playing))),
                    update_placeholder_text.run_if(resource_changed::<PuzzleImage>),
                    handle_controls,
                    button_feedback,
                    update_control_labels.run_if(
                        resource_changed::<GameSettings>.or(resource_changed::<ImageCatalog>),
                    ),
                    show_completion_notice,
                    expire_completion_notice,
                )
                    .chain(),
            );
    }
}

fn despawn_screen<T: Component>(mut commands: Commands, query: Query<Entity, With<T>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

fn placeholder_message(status: ImageStatus) -> &'static str {
    match status {
        ImageStatus::Failed => "The image could not be loaded",
        ImageStatus::Loading | ImageStatus::Loaded => "Load an image to start the game",
    }
}

fn try_spawn_placeholder(
    mut commands: Commands,
    board: Res<PuzzleBoard>,
    image: Res<PuzzleImage>,
    query: Query<&Placeholder>,
) {
    if !query.is_empty() {
        return;
    }

    commands
        .spawn((
            Placeholder,
            Sprite::from_color(PLACEHOLDER_COLOR, board.canvas_size()),
            Transform::from_xyz(0.0, 0.0, OVERLAY_Z),
        ))
        .with_child((
            PlaceholderText,
            Text2d::new(placeholder_message(image.status())),
            TextFont {
                font_size: 30.0,
                ..default()
            },
            TextColor(PLACEHOLDER_TEXT_COLOR),
            TextLayout::new_with_justify(JustifyText::Center),
            Transform::from_xyz(0.0, 0.0, 1.0),
        ));
}

fn update_placeholder_text(
    image: Res<PuzzleImage>,
    mut texts: Query<&mut Text2d, With<PlaceholderText>>,
) {
    for mut text in &mut texts {
        text.0 = placeholder_message(image.status()).to_owned();
    }
}

fn control_label(button: ControlButton, settings: &GameSettings, catalog: &ImageCatalog) -> String {
    match button {
        ControlButton::Difficulty => format!("Grid: {}", settings.difficulty),
        ControlButton::Image => format!(
            "Image: {}/{}",
            catalog.selected() + 1,
            IMAGE_CATALOG.len()
        ),
        ControlButton::Start => "Start".to_owned(),
    }
}

fn spawn_controls(
    mut commands: Commands,
    settings: Res<GameSettings>,
    catalog: Res<ImageCatalog>,
) {
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(12.0),
            width: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            ..default()
        })
        .with_children(|parent| {
            for button in [
                ControlButton::Difficulty,
                ControlButton::Image,
                ControlButton::Start,
            ] {
                parent
                    .spawn((
                        Button,
                        button,
                        Node {
                            width: Val::Px(180.0),
                            height: Val::Px(48.0),
                            margin: UiRect::horizontal(Val::Px(6.0)),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            ..default()
                        },
                        BackgroundColor(BUTTON_COLOR),
                    ))
                    .with_child((
                        ControlLabel(button),
                        Text::new(control_label(button, &settings, &catalog)),
                        TextFont {
                            font_size: 24.0,
                            ..default()
                        },
                        TextColor(Color::WHITE),
                    ));
            }
        });
}

fn handle_controls(
    interactions: Query<(&Interaction, &ControlButton), Changed<Interaction>>,
    mut settings: ResMut<GameSettings>,
    mut catalog: ResMut<ImageCatalog>,
    mut new_game: EventWriter<NewGame>,
) {
    for (interaction, button) in &interactions {
        if *interaction != Interaction::Pressed {
            continue;
        }
        match button {
            ControlButton::Difficulty => {
                settings.difficulty = settings.difficulty.next();
                info!("Difficulty set to {}", settings.difficulty);
            }
            ControlButton::Image => catalog.select_next(),
            ControlButton::Start => {
                new_game.send(NewGame);
            }
        }
    }
}

fn button_feedback(
    mut buttons: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<Button>)>,
) {
    for (interaction, mut background) in &mut buttons {
        background.0 = match interaction {
            Interaction::Hovered | Interaction::Pressed => BUTTON_HOVER_COLOR,
            Interaction::None => BUTTON_COLOR,
        };
    }
}

fn update_control_labels(
    settings: Res<GameSettings>,
    catalog: Res<ImageCatalog>,
    mut labels: Query<(&mut Text, &ControlLabel)>,
) {
    for (mut text, label) in &mut labels {
        text.0 = control_label(label.0, &settings, &catalog);
    }
}

fn show_completion_notice(
    mut commands: Commands,
    mut solved: EventReader<PuzzleSolved>,
    mut notices: Query<&mut CompletionNotice>,
) {
    if solved.read().last().is_none() {
        return;
    }

    blocking_notice(COMPLETION_MESSAGE);

    if let Some(mut notice) = notices.iter_mut().next() {
        notice.timer.reset();
        return;
    }

    commands.spawn((
        CompletionNotice {
            timer: Timer::new(NOTICE_DURATION, TimerMode::Once),
        },
        Text2d::new(COMPLETION_MESSAGE),
        TextFont {
            font_size: 32.0,
            ..default()
        },
        TextColor(Color::WHITE),
        TextLayout::new_with_justify(JustifyText::Center),
        Transform::from_xyz(0.0, 0.0, OVERLAY_Z + 5.0),
    ));
}

fn expire_completion_notice(
    mut commands: Commands,
    time: Res<Time>,
    mut notices: Query<(Entity, &mut CompletionNotice)>,
) {
    for (entity, mut notice) in &mut notices {
        notice.timer.tick(time.delta());
        if notice.timer.finished() {
            commands.entity(entity).despawn_recursive();
        }
    }
}
