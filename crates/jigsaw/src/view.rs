use bevy::prelude::*;
use bevy::transform::TransformSystem;

use crate::board::{PuzzleBoard, TileDraw};
use crate::catalog::PuzzleImage;
use crate::input::world_position;

const BORDER_WIDTH: f32 = 2.0;
const BORDER_COLOR: Color = Color::BLACK;
const HIGHLIGHT_COLOR: Color = Color::srgb(1.0, 0.0, 0.0);

const BACKGROUND_Z: f32 = 0.0;
const TILE_Z: f32 = 1.0;
// Later tiles are drawn over earlier ones; 6x6 stays well below the overlays.
const TILE_Z_STEP: f32 = 0.01;

#[derive(Component)]
pub struct BoardBackground;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilePiece(pub usize);

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileBorder(pub usize);

pub struct ViewPlugin;

impl Plugin for ViewPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_background).add_systems(
            PostUpdate,
            sync_board_view
                .before(TransformSystem::TransformPropagate)
                .run_if(resource_changed::<PuzzleBoard>.or(resource_changed::<PuzzleImage>)),
        );
    }
}

fn spawn_background(mut commands: Commands, board: Res<PuzzleBoard>) {
    commands.spawn((
        BoardBackground,
        Sprite::from_color(Color::NONE, board.canvas_size()),
        Transform::from_xyz(0.0, 0.0, BACKGROUND_Z),
    ));
}

/// Maps canvas-space source rects onto the image's own pixels, since the
/// picture is stretched over the whole canvas whatever its size.
fn source_scale(image: &PuzzleImage, images: &Assets<Image>, canvas_size: Vec2) -> Vec2 {
    images
        .get(image.handle())
        .map_or(Vec2::ONE, |loaded| loaded.size().as_vec2() / canvas_size)
}

fn tile_z(tile: usize) -> f32 {
    (tile as f32).mul_add(TILE_Z_STEP, TILE_Z)
}

fn piece_sprite(draw: &TileDraw, handle: &Handle<Image>, scale: Vec2) -> Sprite {
    Sprite {
        image: handle.clone(),
        rect: Some(Rect::from_corners(draw.source.min * scale, draw.source.max * scale)),
        custom_size: Some(draw.dest.size()),
        ..default()
    }
}

fn piece_transform(draw: &TileDraw, canvas_size: Vec2) -> Transform {
    Transform::from_translation(
        world_position(draw.dest.center(), canvas_size).extend(tile_z(draw.tile)),
    )
}

fn border_sprite(draw: &TileDraw) -> Sprite {
    let color = if draw.highlighted {
        HIGHLIGHT_COLOR
    } else {
        BORDER_COLOR
    };
    Sprite::from_color(color, draw.dest.size() + Vec2::splat(BORDER_WIDTH * 2.0))
}

fn border_transform(draw: &TileDraw, canvas_size: Vec2) -> Transform {
    Transform::from_translation(
        world_position(draw.dest.center(), canvas_size)
            .extend(tile_z(draw.tile) - TILE_Z_STEP / 2.0),
    )
}

fn sync_board_view(
    mut commands: Commands,
    board: Res<PuzzleBoard>,
    image: Res<PuzzleImage>,
    images: Res<Assets<Image>>,
    mut background: Query<
        &mut Sprite,
        (With<BoardBackground>, Without<TilePiece>, Without<TileBorder>),
    >,
    mut pieces: Query<(Entity, &TilePiece, &mut Sprite, &mut Transform), Without<TileBorder>>,
    mut borders: Query<(Entity, &TileBorder, &mut Sprite, &mut Transform), Without<TilePiece>>,
) {
    let canvas_size = board.canvas_size();
    let scale = source_scale(&image, &images, canvas_size);

    for mut sprite in &mut background {
        sprite.image = image.handle().clone();
        sprite.color = Color::WHITE;
    }

    let draws: Vec<TileDraw> = board.draw_list().collect();

    // A new game brings a different tile count: start over.
    if pieces.iter().count() != draws.len() {
        for (entity, ..) in &pieces {
            commands.entity(entity).despawn();
        }
        for (entity, ..) in &borders {
            commands.entity(entity).despawn();
        }
        for draw in &draws {
            commands.spawn((
                TileBorder(draw.tile),
                border_sprite(draw),
                border_transform(draw, canvas_size),
            ));
            commands.spawn((
                TilePiece(draw.tile),
                piece_sprite(draw, image.handle(), scale),
                piece_transform(draw, canvas_size),
            ));
        }
        return;
    }

    for (_, piece, mut sprite, mut transform) in &mut pieces {
        if let Some(draw) = draws.get(piece.0) {
            *sprite = piece_sprite(draw, image.handle(), scale);
            *transform = piece_transform(draw, canvas_size);
        }
    }
    for (_, border, mut sprite, mut transform) in &mut borders {
        if let Some(draw) = draws.get(border.0) {
            *sprite = border_sprite(draw);
            *transform = border_transform(draw, canvas_size);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ImageStatus;

    fn app(rows: u32) -> App {
        let mut app = App::new();
        let mut board = PuzzleBoard::default();
        board
            .configure(rows, rows, 0, &mut fastrand::Rng::with_seed(5))
            .expect("valid grid");
        app.add_plugins((MinimalPlugins, ViewPlugin))
            .init_resource::<Assets<Image>>()
            .insert_resource(board)
            .insert_resource(PuzzleImage::new(0, Handle::default(), ImageStatus::Loaded));
        app.update();
        app
    }

    fn count<T: Component>(app: &mut App) -> usize {
        app.world_mut()
            .query_filtered::<Entity, With<T>>()
            .iter(app.world())
            .count()
    }

    fn border_colors(app: &mut App) -> Vec<(usize, Color)> {
        let mut colors: Vec<(usize, Color)> = app
            .world_mut()
            .query::<(&TileBorder, &Sprite)>()
            .iter(app.world())
            .map(|(border, sprite)| (border.0, sprite.color))
            .collect();
        colors.sort_by_key(|(tile, _)| *tile);
        colors
    }

    #[test]
    fn every_tile_gets_a_piece_and_a_border() {
        let mut app = app(4);
        assert_eq!(count::<TilePiece>(&mut app), 16, "one piece per tile");
        assert_eq!(count::<TileBorder>(&mut app), 16, "one border per tile");
        assert_eq!(count::<BoardBackground>(&mut app), 1, "single background");
    }

    #[test]
    fn new_game_rebuilds_the_tiles() {
        let mut app = app(4);
        app.world_mut()
            .resource_mut::<PuzzleBoard>()
            .configure(3, 3, 0, &mut fastrand::Rng::with_seed(9))
            .expect("valid grid");
        app.update();

        assert_eq!(count::<TilePiece>(&mut app), 9, "old pieces gone");
        assert_eq!(count::<TileBorder>(&mut app), 9, "old borders gone");
    }

    #[test]
    fn pieces_follow_the_board() {
        let mut app = app(2);
        app.world_mut()
            .resource_mut::<PuzzleBoard>()
            .place_tile(0, Vec2::ZERO)
            .expect("tile exists");
        app.update();

        let translation = app
            .world_mut()
            .query::<(&TilePiece, &Transform)>()
            .iter(app.world())
            .find(|(piece, _)| piece.0 == 0)
            .map(|(_, transform)| transform.translation.truncate());
        assert_eq!(
            translation,
            Some(Vec2::new(-150.0, 150.0)),
            "top-left quarter of the board"
        );
    }

    #[test]
    fn dragged_tile_border_is_highlighted() {
        let mut app = app(2);
        {
            let mut board = app.world_mut().resource_mut::<PuzzleBoard>();
            board.place_tile(0, Vec2::ZERO).expect("tile exists");
            board.place_tile(1, Vec2::new(300.0, 0.0)).expect("tile exists");
            board.pointer_down(Vec2::new(400.0, 100.0));
        }
        app.update();

        let colors = border_colors(&mut app);
        assert_eq!(colors.len(), 4, "four borders");
        for (tile, color) in colors {
            let expected = if tile == 1 {
                HIGHLIGHT_COLOR
            } else {
                BORDER_COLOR
            };
            assert_eq!(color, expected, "border of tile {tile}");
        }
    }
}
