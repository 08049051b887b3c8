use bevy::prelude::*;
use bits_helpers::input::{world_pointer_signals, PointerSignal, PointerTracker};

use crate::board::PuzzleBoard;
use crate::game::{GameState, PuzzleSolved};

/// A pointer signal already expressed in canvas pixels.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct CanvasPointer(pub PointerSignal);

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CanvasPointer>()
            .add_systems(
                Update,
                (read_pointer, drive_board)
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(OnExit(GameState::Playing), cancel_drag);
    }
}

/// Board is centred on the world origin; the canvas has its origin top-left
/// with y growing downwards.
pub fn canvas_position(world_position: Vec2, canvas_size: Vec2) -> Vec2 {
    Vec2::new(
        world_position.x + canvas_size.x / 2.0,
        canvas_size.y / 2.0 - world_position.y,
    )
}

pub fn world_position(canvas_position: Vec2, canvas_size: Vec2) -> Vec2 {
    Vec2::new(
        canvas_position.x - canvas_size.x / 2.0,
        canvas_size.y / 2.0 - canvas_position.y,
    )
}

fn read_pointer(
    windows: Query<&Window>,
    buttons: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    camera_q: Query<(&Camera, &GlobalTransform)>,
    mut tracker: Local<PointerTracker>,
    board: Res<PuzzleBoard>,
    mut canvas_pointer: EventWriter<CanvasPointer>,
) {
    let canvas_size = board.canvas_size();
    let signals = world_pointer_signals(&buttons, &touch_input, &mut tracker, &windows, &camera_q);
    for signal in signals {
        if let Some(signal) =
            signal.map_position(|position| Some(canvas_position(position, canvas_size)))
        {
            canvas_pointer.send(CanvasPointer(signal));
        }
    }
}

fn drive_board(
    mut canvas_pointer: EventReader<CanvasPointer>,
    interactions: Query<&Interaction>,
    mut board: ResMut<PuzzleBoard>,
    mut solved: EventWriter<PuzzleSolved>,
) {
    // Presses on the controls belong to the controls.
    let over_controls = interactions
        .iter()
        .any(|interaction| *interaction != Interaction::None);

    for CanvasPointer(signal) in canvas_pointer.read() {
        match *signal {
            PointerSignal::Down(position) => {
                // Only touch the resource on a hit so the view isn't redrawn for nothing.
                if !over_controls && !board.is_dragging() && board.tile_at(position).is_some() {
                    board.pointer_down(position);
                }
            }
            PointerSignal::Move(position) => {
                if board.is_dragging() && board.bypass_change_detection().pointer_move(position) {
                    board.set_changed();
                }
            }
            PointerSignal::Up => {
                if !board.is_dragging() {
                    continue;
                }
                if let Some(drop) = board.pointer_up() {
                    if drop.solved {
                        info!("Puzzle solved");
                        solved.send(PuzzleSolved);
                    }
                }
            }
        }
    }
}

fn cancel_drag(mut board: ResMut<PuzzleBoard>) {
    if board.is_dragging() {
        board.cancel_drag();
    }
}

#[cfg(test)]
mod tests {
    use bevy::input::InputPlugin as BevyInputPlugin;
    use bevy::state::app::StatesPlugin;

    use super::*;
    use crate::board::{DragState, Tile};
    use crate::catalog::{ImageStatus, PuzzleImage};
    use crate::game::{GamePlugin, NewGame};

    #[derive(Resource, Default)]
    struct BoardChanges(usize);

    fn count_board_changes(mut changes: ResMut<BoardChanges>) {
        changes.0 += 1;
    }

    fn playing_app() -> App {
        let mut app = App::new();
        app.add_plugins((
            MinimalPlugins,
            StatesPlugin,
            BevyInputPlugin,
            GamePlugin,
            InputPlugin,
        ))
        .insert_resource(PuzzleImage::new(0, Handle::default(), ImageStatus::Loaded))
        .init_resource::<BoardChanges>()
        .add_systems(
            Update,
            count_board_changes
                .after(drive_board)
                .run_if(resource_changed::<PuzzleBoard>),
        );
        app.world_mut().send_event(NewGame);
        app.update();
        app
    }

    fn solve_all_but_first(app: &mut App) {
        let mut board = app.world_mut().resource_mut::<PuzzleBoard>();
        let homes: Vec<Vec2> = board.tiles().iter().map(Tile::correct).collect();
        for (index, home) in homes.into_iter().enumerate().skip(1) {
            board.place_tile(index, home).expect("tile exists");
        }
        board
            .place_tile(0, Vec2::new(280.0, 280.0))
            .expect("tile exists");
    }

    fn send(app: &mut App, signal: PointerSignal) {
        app.world_mut().send_event(CanvasPointer(signal));
    }

    fn solved_count(app: &App) -> usize {
        app.world().resource::<Events<PuzzleSolved>>().len()
    }

    #[test]
    fn canvas_and_world_positions_round_trip() {
        let size = Vec2::splat(600.0);
        assert_eq!(
            canvas_position(Vec2::new(-300.0, 300.0), size),
            Vec2::ZERO,
            "world top-left corner is canvas origin"
        );
        assert_eq!(
            canvas_position(Vec2::new(50.0, -100.0), size),
            Vec2::new(350.0, 400.0),
            "y flips"
        );
        assert_eq!(
            world_position(Vec2::new(350.0, 400.0), size),
            Vec2::new(50.0, -100.0),
            "inverse mapping"
        );
    }

    #[test]
    fn dragging_the_last_tile_home_reports_the_win() {
        let mut app = playing_app();
        solve_all_but_first(&mut app);

        send(&mut app, PointerSignal::Down(Vec2::new(285.0, 285.0)));
        send(&mut app, PointerSignal::Move(Vec2::new(8.0, 9.0)));
        send(&mut app, PointerSignal::Up);
        app.update();

        let board = app.world().resource::<PuzzleBoard>();
        assert_eq!(
            board.tile(0).map(Tile::current),
            Some(Vec2::ZERO),
            "tile snapped home"
        );
        assert!(!board.is_dragging(), "session closed");
        assert_eq!(solved_count(&app), 1, "one completion notice");
    }

    #[test]
    fn loose_drop_does_not_report_a_win() {
        let mut app = playing_app();
        solve_all_but_first(&mut app);

        send(&mut app, PointerSignal::Down(Vec2::new(285.0, 285.0)));
        send(&mut app, PointerSignal::Move(Vec2::new(60.0, 60.0)));
        send(&mut app, PointerSignal::Up);
        app.update();

        let board = app.world().resource::<PuzzleBoard>();
        assert_eq!(
            board.tile(0).map(Tile::current),
            Some(Vec2::new(55.0, 55.0)),
            "left where dropped"
        );
        assert_eq!(solved_count(&app), 0, "no notice");
    }

    #[test]
    fn release_without_a_drag_changes_nothing() {
        let mut app = playing_app();
        let before: Vec<Tile> = app.world().resource::<PuzzleBoard>().tiles().to_vec();

        send(&mut app, PointerSignal::Up);
        send(&mut app, PointerSignal::Move(Vec2::new(100.0, 100.0)));
        app.update();

        let board = app.world().resource::<PuzzleBoard>();
        assert_eq!(board.tiles(), before.as_slice(), "tiles untouched");
        assert_eq!(solved_count(&app), 0, "no notice");
    }

    #[test]
    fn leaving_play_closes_an_open_drag() {
        let mut app = playing_app();
        solve_all_but_first(&mut app);
        send(&mut app, PointerSignal::Down(Vec2::new(285.0, 285.0)));
        app.update();
        assert!(
            app.world().resource::<PuzzleBoard>().is_dragging(),
            "tile grabbed"
        );

        app.world_mut()
            .resource_mut::<NextState<GameState>>()
            .set(GameState::Loading);
        app.update();
        assert_eq!(
            app.world().resource::<PuzzleBoard>().drag_state(),
            DragState::Idle,
            "release missed while away must not keep the tile"
        );

        app.world_mut()
            .resource_mut::<NextState<GameState>>()
            .set(GameState::Playing);
        app.update();
        send(&mut app, PointerSignal::Move(Vec2::new(500.0, 500.0)));
        app.update();
        assert_eq!(
            app.world().resource::<PuzzleBoard>().tile(0).map(Tile::current),
            Some(Vec2::new(280.0, 280.0)),
            "later moves do not drag the old tile"
        );
    }

    #[test]
    fn press_on_a_control_does_not_grab_a_tile() {
        let mut app = playing_app();
        solve_all_but_first(&mut app);
        app.world_mut().spawn(Interaction::Pressed);

        send(&mut app, PointerSignal::Down(Vec2::new(285.0, 285.0)));
        app.update();

        assert!(
            !app.world().resource::<PuzzleBoard>().is_dragging(),
            "control press stays with the control"
        );
    }

    #[test]
    fn holding_still_leaves_the_board_unchanged() {
        let mut app = playing_app();
        solve_all_but_first(&mut app);
        send(&mut app, PointerSignal::Down(Vec2::new(285.0, 285.0)));
        app.update();
        app.world_mut().resource_mut::<BoardChanges>().0 = 0;

        for _ in 0..3 {
            send(&mut app, PointerSignal::Move(Vec2::new(285.0, 285.0)));
            app.update();
        }
        assert_eq!(
            app.world().resource::<BoardChanges>().0,
            0,
            "no redraw without movement"
        );

        send(&mut app, PointerSignal::Move(Vec2::new(300.0, 300.0)));
        app.update();
        assert_eq!(
            app.world().resource::<BoardChanges>().0,
            1,
            "real movement redraws"
        );
    }
}
