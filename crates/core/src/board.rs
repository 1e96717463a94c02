//! Board module - manages the game grid
//!
//! The board is a `COLS x ROWS` grid including its border: a left wall, a
//! double right wall, a double floor and an open overflow row at the top.
//! Uses a flat array for better cache locality and zero-allocation.
//! Coordinates: (x, y) where x grows to the right and y grows downward.
//!
//! Only the interior (columns `FIRST_COL..=LAST_COL`, rows
//! `TOP_ROW..=FLOOR_ROW`) takes part in line clears and block counts. Wall
//! cells are written once by [`Board::new`] and never touched again.

use arrayvec::ArrayVec;

use crate::shapes::Shape;
use crate::types::{Cell, COLS, FIRST_COL, FLOOR_ROW, LAST_COL, PLAY_COLS, PLAY_ROWS, ROWS, TOP_ROW};

/// Total number of cells on the board
const BOARD_SIZE: usize = COLS * ROWS;

/// Row indices removed by one compaction, bottom to top
pub type ClearedRows = ArrayVec<i32, PLAY_ROWS>;

/// The game board using flat, row-major array storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Flat array of cells, row-major order (y * COLS + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a blank board: empty interior, walls on the border
    pub fn new() -> Self {
        let mut cells = [Cell::EMPTY; BOARD_SIZE];
        for x in 0..COLS {
            cells[(ROWS - 1) * COLS + x] = Cell::WALL;
            cells[(ROWS - 2) * COLS + x] = Cell::WALL;
        }
        for y in 0..ROWS {
            cells[y * COLS] = Cell::WALL;
            cells[y * COLS + COLS - 1] = Cell::WALL;
            cells[y * COLS + COLS - 2] = Cell::WALL;
        }
        Self { cells }
    }

    /// Calculate flat index from (x, y) coordinates
    ///
    /// Shapes never reach outside the walls, so an out-of-grid access means
    /// the engine state is corrupt.
    #[inline(always)]
    fn index(x: i32, y: i32) -> usize {
        assert!(
            (0..COLS as i32).contains(&x) && (0..ROWS as i32).contains(&y),
            "board access out of bounds: ({}, {})",
            x,
            y
        );
        (y as usize) * COLS + (x as usize)
    }

    #[inline(always)]
    fn interior(y: i32) -> std::ops::Range<usize> {
        let start = Self::index(FIRST_COL, y);
        start..start + PLAY_COLS
    }

    pub fn width(&self) -> usize {
        COLS
    }

    pub fn height(&self) -> usize {
        ROWS
    }

    /// Get cell at position (x, y)
    pub fn get(&self, x: i32, y: i32) -> Cell {
        self.cells[Self::index(x, y)]
    }

    /// Set cell at position (x, y). Intended for interior cells.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) {
        debug_assert!(!self.get(x, y).is_wall(), "walls are never overwritten");
        self.cells[Self::index(x, y)] = cell;
    }

    /// Whether anything (block or wall) sits at (x, y)
    pub fn occupied(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_occupied()
    }

    /// Write the shape's blocks with the pivot at (x, y)
    pub fn place(&mut self, shape: &Shape, x: i32, y: i32) {
        let cell = shape.cell();
        for (bx, by) in shape.cells_at(x, y) {
            self.set(bx, by, cell);
        }
    }

    /// Reset the shape's blocks at (x, y) to empty
    pub fn clear(&mut self, shape: &Shape, x: i32, y: i32) {
        for (bx, by) in shape.cells_at(x, y) {
            self.set(bx, by, Cell::EMPTY);
        }
    }

    /// Whether none of the shape's target cells are occupied
    pub fn fits(&self, shape: &Shape, x: i32, y: i32) -> bool {
        shape.cells_at(x, y).all(|(bx, by)| !self.occupied(bx, by))
    }

    /// Check if every interior column of row `y` is occupied
    pub fn is_row_full(&self, y: i32) -> bool {
        self.cells[Self::interior(y)]
            .iter()
            .all(|cell| cell.is_occupied())
    }

    /// Remove every full interior row and let the rows above fall
    ///
    /// Rows are scanned bottom to top with a two-pointer pass (no
    /// allocation). Freshly emptied rows appear at the top of the interior,
    /// and the overflow row is wiped. A board with no full row is left
    /// untouched. Returns the removed row indices, bottom to top.
    pub fn compact_full_rows(&mut self) -> ClearedRows {
        let mut cleared = ClearedRows::new();
        for y in (TOP_ROW..=FLOOR_ROW).rev() {
            if self.is_row_full(y) {
                cleared.push(y);
            }
        }
        if cleared.is_empty() {
            return cleared;
        }

        let mut write_y = FLOOR_ROW;
        for read_y in (TOP_ROW..=FLOOR_ROW).rev() {
            if cleared.contains(&read_y) {
                continue;
            }
            if write_y != read_y {
                let src = Self::interior(read_y);
                let dst = Self::interior(write_y).start;
                self.cells.copy_within(src, dst);
            }
            write_y -= 1;
        }

        // Everything above the last kept row, overflow row included
        for y in 0..=write_y {
            for cell in &mut self.cells[Self::interior(y)] {
                *cell = Cell::EMPTY;
            }
        }

        cleared
    }

    /// Count interior cells whose value ANDed with `mask` is nonzero
    pub fn count_masked(&self, mask: u8) -> u32 {
        (TOP_ROW..=FLOOR_ROW)
            .map(|y| {
                self.cells[Self::interior(y)]
                    .iter()
                    .filter(|cell| cell.matches(mask))
                    .count() as u32
            })
            .sum()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// One full row, walls included
    pub fn row(&self, y: i32) -> &[Cell] {
        let start = Self::index(0, y);
        &self.cells[start..start + COLS]
    }

    /// Copy raw cell values into a row-major byte grid (for snapshots)
    pub fn write_u8_grid(&self, out: &mut [[u8; COLS]; ROWS]) {
        for (y, row) in out.iter_mut().enumerate() {
            for (x, v) in row.iter_mut().enumerate() {
                *v = self.cells[y * COLS + x].raw();
            }
        }
    }

    /// Whether the cell at (x, y) lies in the playable interior
    pub fn is_interior(x: i32, y: i32) -> bool {
        (FIRST_COL..=LAST_COL).contains(&x) && (TOP_ROW..=FLOOR_ROW).contains(&y)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
