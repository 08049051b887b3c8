use bevy::prelude::*;
use thiserror::Error;

/// Size of the drawing surface, in canvas pixels.
pub const CANVAS_SIZE: Vec2 = Vec2::new(600.0, 600.0);
/// Max per-axis distance from a grid point for a dropped tile to snap onto it.
pub const SNAP_TOLERANCE: f32 = 10.0;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Grid must have at least one row and one column, got {rows}x{cols}")]
    EmptyGrid { rows: u32, cols: u32 },

    #[error("No tile with index {index}, the board has {count} tiles")]
    UnknownTile { index: usize, count: usize },
}

/// One rectangular slice of the source image.
///
/// Positions are canvas pixels of the top-left corner, y pointing down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    grid: UVec2,
    correct: Vec2,
    current: Vec2,
}

impl Tile {
    pub const fn grid_x(&self) -> u32 {
        self.grid.x
    }

    pub const fn grid_y(&self) -> u32 {
        self.grid.y
    }

    /// Home position.
    pub const fn correct(&self) -> Vec2 {
        self.correct
    }

    pub const fn current(&self) -> Vec2 {
        self.current
    }

    pub fn is_home(&self) -> bool {
        self.current == self.correct
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        tile: usize,
        /// Pointer minus tile corner when the drag started.
        offset: Vec2,
    },
}

/// What happened when a dragged tile was let go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileDrop {
    pub tile: usize,
    pub snapped: bool,
    pub solved: bool,
}

/// Everything needed to draw one tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileDraw {
    pub tile: usize,
    /// Region of the (canvas-sized) source image.
    pub source: Rect,
    /// Where it lands on the canvas.
    pub dest: Rect,
    pub highlighted: bool,
}

/// The puzzle: tile list, drag session and selected image.
///
/// Pure state, the Bevy systems only forward pointer input to it and draw
/// what it reports, so everything here runs without a window.
#[derive(Resource, Debug, Clone)]
pub struct PuzzleBoard {
    canvas_size: Vec2,
    snap_tolerance: f32,
    rows: u32,
    cols: u32,
    piece_size: Vec2,
    image: usize,
    tiles: Vec<Tile>,
    drag: DragState,
}

impl Default for PuzzleBoard {
    fn default() -> Self {
        Self::new(CANVAS_SIZE, SNAP_TOLERANCE)
    }
}

impl PuzzleBoard {
    pub const fn new(canvas_size: Vec2, snap_tolerance: f32) -> Self {
        Self {
            canvas_size,
            snap_tolerance,
            rows: 0,
            cols: 0,
            piece_size: Vec2::ZERO,
            image: 0,
            tiles: Vec::new(),
            drag: DragState::Idle,
        }
    }

    /// Slices the canvas into `rows` x `cols` tiles and scatters them.
    ///
    /// Piece sizes that don't divide the canvas evenly are kept fractional.
    pub fn configure(
        &mut self,
        rows: u32,
        cols: u32,
        image: usize,
        rng: &mut fastrand::Rng,
    ) -> Result<(), BoardError> {
        if rows == 0 || cols == 0 {
            return Err(BoardError::EmptyGrid { rows, cols });
        }

        let piece_size = self.canvas_size / Vec2::new(cols as f32, rows as f32);
        let free_space = (self.canvas_size - piece_size).max(Vec2::ZERO);

        self.tiles = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| UVec2::new(col, row)))
            .map(|grid| Tile {
                grid,
                correct: grid.as_vec2() * piece_size,
                current: Vec2::new(rng.f32(), rng.f32()) * free_space,
            })
            .collect();
        self.rows = rows;
        self.cols = cols;
        self.piece_size = piece_size;
        self.image = image;
        self.drag = DragState::Idle;

        info!(
            "New {rows}x{cols} puzzle on image {image}, pieces {}x{}",
            piece_size.x, piece_size.y
        );
        Ok(())
    }

    pub const fn canvas_size(&self) -> Vec2 {
        self.canvas_size
    }

    pub const fn snap_tolerance(&self) -> f32 {
        self.snap_tolerance
    }

    pub const fn rows(&self) -> u32 {
        self.rows
    }

    pub const fn cols(&self) -> u32 {
        self.cols
    }

    pub const fn piece_size(&self) -> Vec2 {
        self.piece_size
    }

    pub const fn image(&self) -> usize {
        self.image
    }

    /// Swaps the picture without touching tile positions.
    pub fn set_image(&mut self, image: usize) {
        self.image = image;
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    pub fn has_game(&self) -> bool {
        !self.tiles.is_empty()
    }

    pub const fn drag_state(&self) -> DragState {
        self.drag
    }

    pub const fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// The tile under an active drag.
    pub const fn highlighted(&self) -> Option<usize> {
        match self.drag {
            DragState::Dragging { tile, .. } => Some(tile),
            DragState::Idle => None,
        }
    }

    /// Puts a tile at `position` directly, outside of any drag.
    pub fn place_tile(&mut self, index: usize, position: Vec2) -> Result<(), BoardError> {
        let count = self.tiles.len();
        let tile = self
            .tiles
            .get_mut(index)
            .ok_or(BoardError::UnknownTile { index, count })?;
        tile.current = position;
        Ok(())
    }

    /// First tile, in creation order, whose box strictly contains `point`.
    pub fn tile_at(&self, point: Vec2) -> Option<usize> {
        let size = self.piece_size;
        self.tiles.iter().position(|tile| {
            point.x > tile.current.x
                && point.x < tile.current.x + size.x
                && point.y > tile.current.y
                && point.y < tile.current.y + size.y
        })
    }

    /// Starts dragging the tile under `point`. Ignored while another drag is open.
    pub fn pointer_down(&mut self, point: Vec2) -> Option<usize> {
        if self.is_dragging() {
            return None;
        }
        let index = self.tile_at(point)?;
        let tile = self.tiles.get(index)?;
        self.drag = DragState::Dragging {
            tile: index,
            offset: point - tile.current,
        };
        debug!("Picked tile {index} at {point}");
        Some(index)
    }

    /// Moves the dragged tile with the pointer, unclamped. Returns whether
    /// anything moved.
    pub fn pointer_move(&mut self, point: Vec2) -> bool {
        let DragState::Dragging { tile, offset } = self.drag else {
            return false;
        };
        let Some(tile) = self.tiles.get_mut(tile) else {
            return false;
        };
        let target = point - offset;
        if tile.current == target {
            return false;
        }
        tile.current = target;
        true
    }

    /// Drops the drag session where the tile stands, without snapping.
    pub fn cancel_drag(&mut self) -> Option<usize> {
        let tile = self.highlighted()?;
        self.drag = DragState::Idle;
        debug!("Drag of tile {tile} canceled");
        Some(tile)
    }

    /// Ends the drag: snaps the tile if close enough to a grid point, then
    /// checks for a win.
    pub fn pointer_up(&mut self) -> Option<TileDrop> {
        let DragState::Dragging { tile, .. } = self.drag else {
            return None;
        };
        self.drag = DragState::Idle;
        let snapped = self.snap(tile);
        let solved = self.is_solved();
        debug!("Dropped tile {tile}, snapped: {snapped}, solved: {solved}");
        Some(TileDrop {
            tile,
            snapped,
            solved,
        })
    }

    /// Nearest grid-aligned position to `position`, per axis.
    pub fn nearest_grid_point(&self, position: Vec2) -> Vec2 {
        (position / self.piece_size).round() * self.piece_size
    }

    fn snap(&mut self, index: usize) -> bool {
        let Some(current) = self.tiles.get(index).map(Tile::current) else {
            return false;
        };
        let target = self.nearest_grid_point(current);
        let distance = (current - target).abs();
        if distance.x >= self.snap_tolerance || distance.y >= self.snap_tolerance {
            return false;
        }
        if let Some(tile) = self.tiles.get_mut(index) {
            tile.current = target;
        }
        true
    }

    /// Every tile exactly home. A board without a game is never solved.
    pub fn is_solved(&self) -> bool {
        self.has_game() && self.tiles.iter().all(Tile::is_home)
    }

    /// Tiles in drawing order, later ones on top.
    pub fn draw_list(&self) -> impl Iterator<Item = TileDraw> + '_ {
        let size = self.piece_size;
        let highlighted = self.highlighted();
        self.tiles.iter().enumerate().map(move |(index, tile)| TileDraw {
            tile: index,
            source: Rect::from_corners(tile.correct, tile.correct + size),
            dest: Rect::from_corners(tile.current, tile.current + size),
            highlighted: highlighted == Some(index),
        })
    }
}
