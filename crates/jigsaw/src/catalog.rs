use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::board::PuzzleBoard;
use crate::game::GameState;

/// Pictures the player can choose from, relative to the assets folder.
pub const IMAGE_CATALOG: [&str; 5] = [
    "images/image1.jpg",
    "images/image2.jpg",
    "images/image3.jpg",
    "images/image4.jpg",
    "images/image5.jpg",
];

/// Which catalog entry is selected.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImageCatalog {
    selected: usize,
}

impl ImageCatalog {
    pub const fn selected(&self) -> usize {
        self.selected
    }

    pub fn path(&self) -> &'static str {
        IMAGE_CATALOG
            .get(self.selected)
            .copied()
            .unwrap_or(IMAGE_CATALOG[0])
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % IMAGE_CATALOG.len();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageStatus {
    Loading,
    Loaded,
    /// Stays failed until another image is picked.
    Failed,
}

/// The picture currently used by the board.
#[derive(Resource, Debug)]
pub struct PuzzleImage {
    index: usize,
    handle: Handle<Image>,
    status: ImageStatus,
}

impl PuzzleImage {
    pub const fn new(index: usize, handle: Handle<Image>, status: ImageStatus) -> Self {
        Self {
            index,
            handle,
            status,
        }
    }

    pub const fn index(&self) -> usize {
        self.index
    }

    pub const fn handle(&self) -> &Handle<Image> {
        &self.handle
    }

    pub const fn status(&self) -> ImageStatus {
        self.status
    }

    pub fn is_loaded(&self) -> bool {
        self.status == ImageStatus::Loaded
    }
}

pub struct CatalogPlugin;

impl Plugin for CatalogPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ImageCatalog>()
            .insert_resource(PuzzleImage::new(0, Handle::default(), ImageStatus::Loading))
            .add_systems(
                Update,
                (
                    load_selected_image.run_if(resource_changed::<ImageCatalog>),
                    track_image_load.run_if(in_state(GameState::Loading)),
                )
                    .chain(),
            );
    }
}

fn load_selected_image(
    catalog: Res<ImageCatalog>,
    asset_server: Res<AssetServer>,
    mut image: ResMut<PuzzleImage>,
    mut board: ResMut<PuzzleBoard>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let path = catalog.path();
    info!("Loading puzzle image {path}");
    *image = PuzzleImage::new(
        catalog.selected(),
        asset_server.load(path),
        ImageStatus::Loading,
    );
    board.set_image(catalog.selected());
    next_state.set(GameState::Loading);
}

fn track_image_load(
    asset_server: Res<AssetServer>,
    catalog: Res<ImageCatalog>,
    mut image: ResMut<PuzzleImage>,
    board: Res<PuzzleBoard>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if image.status() != ImageStatus::Loading {
        return;
    }

    match asset_server.load_state(image.handle()) {
        LoadState::Loaded => {
            info!("Puzzle image {} ready", catalog.path());
            image.status = ImageStatus::Loaded;
            // A game in progress carries on with the new picture.
            next_state.set(if board.has_game() {
                GameState::Playing
            } else {
                GameState::Ready
            });
        }
        LoadState::Failed(err) => {
            error!("Could not load puzzle image {}: {err}", catalog.path());
            image.status = ImageStatus::Failed;
        }
        LoadState::NotLoaded | LoadState::Loading => {}
    }
}
