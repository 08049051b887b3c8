use bevy::prelude::*;
use bevy::render::camera::ScalingMode;
use bits_helpers::BitWindow;

pub mod board;
pub mod catalog;
pub mod game;
pub mod input;
mod ribbit;
pub mod screen;
pub mod view;

use catalog::CatalogPlugin;
use game::GamePlugin;
use input::InputPlugin;
use screen::ScreenPlugin;
use view::ViewPlugin;

const BACKDROP_COLOR: Color = Color::srgb(0.12, 0.12, 0.14);
// Board plus room below it for the controls.
const VIEW_SIZE: Vec2 = Vec2::new(640.0, 760.0);
const VIEW_OFFSET_Y: f32 = -50.0;

pub fn run() {
    let window = BitWindow {
        capture_pointer: true,
        ..default()
    };
    bits_helpers::get_default_app::<ribbit::Jigsaw>(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        window,
    )
    .insert_resource(ClearColor(BACKDROP_COLOR))
    .add_plugins(GamePlugin)
    .add_plugins(CatalogPlugin)
    .add_plugins(InputPlugin)
    .add_plugins(ViewPlugin)
    .add_plugins(ScreenPlugin)
    .add_systems(Startup, setup)
    .run();
}

fn setup(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        OrthographicProjection {
            scaling_mode: ScalingMode::AutoMin {
                min_width: VIEW_SIZE.x,
                min_height: VIEW_SIZE.y,
            },
            ..OrthographicProjection::default_2d()
        },
        Transform::from_xyz(0.0, VIEW_OFFSET_Y, 0.0),
    ));
}
