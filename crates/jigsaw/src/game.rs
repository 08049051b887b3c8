use bevy::prelude::*;
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::board::PuzzleBoard;
use crate::catalog::PuzzleImage;

#[derive(States, Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
    /// Waiting for the selected image.
    #[default]
    Loading,
    /// Image ready, no game started yet.
    Ready,
    Playing,
}

/// Grid sizes offered to the player; the puzzle is always square.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum Difficulty {
    #[strum(to_string = "3x3")]
    Easy,
    #[default]
    #[strum(to_string = "4x4")]
    Normal,
    #[strum(to_string = "5x5")]
    Hard,
    #[strum(to_string = "6x6")]
    Expert,
}

impl Difficulty {
    pub const fn grid_size(self) -> u32 {
        match self {
            Self::Easy => 3,
            Self::Normal => 4,
            Self::Hard => 5,
            Self::Expert => 6,
        }
    }

    /// Next option, wrapping around after the hardest.
    #[must_use]
    pub fn next(self) -> Self {
        Self::iter()
            .cycle()
            .skip_while(|difficulty| *difficulty != self)
            .nth(1)
            .unwrap_or_default()
    }
}

/// Player choices read each time a game starts.
#[derive(Resource, Debug, Default)]
pub struct GameSettings {
    pub difficulty: Difficulty,
}

#[derive(Resource, Deref, DerefMut)]
pub struct PuzzleRng(pub fastrand::Rng);

impl Default for PuzzleRng {
    fn default() -> Self {
        Self(fastrand::Rng::new())
    }
}

/// Asks for a fresh scatter with the current settings.
#[derive(Event, Debug, Clone, Copy)]
pub struct NewGame;

#[derive(Event, Debug, Clone, Copy)]
pub struct PuzzleSolved;

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .init_resource::<GameSettings>()
            .init_resource::<PuzzleRng>()
            .init_resource::<PuzzleBoard>()
            .add_event::<NewGame>()
            .add_event::<PuzzleSolved>()
            .add_systems(Update, start_new_game);
    }
}

fn start_new_game(
    mut new_games: EventReader<NewGame>,
    settings: Res<GameSettings>,
    image: Res<PuzzleImage>,
    mut rng: ResMut<PuzzleRng>,
    mut board: ResMut<PuzzleBoard>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    // Several requests in one frame still mean one new game.
    if new_games.read().last().is_none() {
        return;
    }

    if !image.is_loaded() {
        warn!("Image {} is not loaded yet, ignoring start", image.index());
        return;
    }

    let size = settings.difficulty.grid_size();
    if let Err(err) = board.configure(size, size, image.index(), &mut rng) {
        warn!("Could not start a new game: {err}");
        return;
    }
    next_state.set(GameState::Playing);
}

#[cfg(test)]
mod tests {
    use bevy::state::app::StatesPlugin;

    use super::*;
    use crate::catalog::ImageStatus;

    fn app(status: ImageStatus) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin, GamePlugin))
            .insert_resource(PuzzleImage::new(2, Handle::default(), status))
            .insert_resource(PuzzleRng(fastrand::Rng::with_seed(11)));
        app
    }

    fn state(app: &App) -> GameState {
        *app.world().resource::<State<GameState>>().get()
    }

    #[test]
    fn difficulty_cycles_through_all_sizes() {
        let sizes: Vec<u32> = core::iter::successors(Some(Difficulty::Easy), |d| {
            Some(d.next()).filter(|next| *next != Difficulty::Easy)
        })
        .map(Difficulty::grid_size)
        .collect();
        assert_eq!(sizes, vec![3, 4, 5, 6], "every option once, in order");
        assert_eq!(Difficulty::Expert.next(), Difficulty::Easy, "wraps around");
        assert_eq!(Difficulty::default().to_string(), "4x4", "label");
    }

    #[test]
    fn new_game_uses_selected_difficulty_and_image() {
        let mut app = app(ImageStatus::Loaded);
        app.world_mut().resource_mut::<GameSettings>().difficulty = Difficulty::Hard;

        app.world_mut().send_event(NewGame);
        app.update();
        app.update();

        let board = app.world().resource::<PuzzleBoard>();
        assert_eq!(board.tiles().len(), 25, "5x5 grid");
        assert_eq!(board.image(), 2, "board shows the loaded image");
        assert_eq!(state(&app), GameState::Playing, "game running");
    }

    #[test]
    fn new_game_waits_for_the_image() {
        let mut app = app(ImageStatus::Loading);

        app.world_mut().send_event(NewGame);
        app.update();
        app.update();

        assert!(
            !app.world().resource::<PuzzleBoard>().has_game(),
            "no tiles from an unloaded image"
        );
        assert_eq!(state(&app), GameState::Loading, "still waiting");
    }

    #[test]
    fn restarting_reshuffles_the_tiles() {
        let mut app = app(ImageStatus::Loaded);

        app.world_mut().send_event(NewGame);
        app.update();
        let first: Vec<Vec2> = app
            .world()
            .resource::<PuzzleBoard>()
            .tiles()
            .iter()
            .map(|tile| tile.current())
            .collect();

        app.world_mut().send_event(NewGame);
        app.update();
        let second: Vec<Vec2> = app
            .world()
            .resource::<PuzzleBoard>()
            .tiles()
            .iter()
            .map(|tile| tile.current())
            .collect();

        assert_eq!(first.len(), second.len(), "same difficulty");
        assert_ne!(first, second, "positions drawn again");
    }
}
