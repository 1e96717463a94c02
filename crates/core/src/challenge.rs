//! Challenge board generator
//!
//! Fills the board with challenge-flagged blocks for a level:
//!
//! - **1, 10**: left-flush triangular wedge, colours striped by column.
//!   Level 1 is solid, level 10 keeps a cell only on odd rows or odd columns.
//! - **3..=6**: vertical stripes every 3rd (levels 3, 4) or 2nd (5, 6)
//!   column over the bottom rows; lower levels in each pair are taller.
//!   Colours cycle with `(row + column) % 7`.
//! - **anything else**: random rows of short same-coloured runs. Higher
//!   levels start higher and fill more sparsely.
//!
//! Levels 7 and 8 take the random branch.

use crate::board::Board;
use crate::rng::SimpleRng;
use crate::types::{Cell, Color, CHALLENGE_MASK, FIRST_COL, FLOOR_ROW, LAST_COL};

/// Columns covered by the wedge patterns
const WEDGE_COLS: i32 = 7;

/// Highest row a random pattern may start on
const RANDOM_TOP_MIN: i32 = 6;

/// Fill rolls are drawn from `0..FILL_ROLL`
const FILL_ROLL: u32 = 99;

/// Random runs re-roll their colour after this many blocks
const RUN_RECOLOR: u32 = 3;

/// A run of this many hits is broken by a forced gap
const RUN_BREAK: u32 = 6;

/// Populate `board` for `level` and return the number of challenge blocks
///
/// Blocks are added on top of whatever the board holds; callers reset the
/// board first when starting a new page.
pub fn generate(board: &mut Board, level: u32, rng: &mut SimpleRng) -> u32 {
    match level {
        1 => wedge(board, false),
        10 => wedge(board, true),
        3..=6 => stripes(board, level),
        _ => random_fill(board, level, rng),
    }
    board.count_masked(CHALLENGE_MASK)
}

fn put(board: &mut Board, x: i32, y: i32, color_index: i32) {
    debug_assert!(Board::is_interior(x, y));
    if let Some(color) = Color::from_index(color_index as u8) {
        board.set(x, y, Cell::challenge(color));
    }
}

fn wedge(board: &mut Board, holes: bool) {
    let (keep, modulus) = if holes { (1, 2) } else { (0, 1) };
    for c in FIRST_COL..=WEDGE_COLS {
        for r in FLOOR_ROW - WEDGE_COLS - 1 + c..=FLOOR_ROW {
            if r % modulus == keep || c % modulus == keep {
                put(board, c, r, c);
            }
        }
    }
}

fn stripes(board: &mut Board, level: u32) {
    let (extra, period) = match level {
        3 => (0, 3),
        4 => (2, 3),
        5 => (1, 2),
        _ => (3, 2),
    };
    for c in FIRST_COL..=LAST_COL {
        if c % period != 0 {
            continue;
        }
        for r in FLOOR_ROW - 2 - extra..=FLOOR_ROW {
            put(board, c, r, (r + c) % 7 + 1);
        }
    }
}

fn random_fill(board: &mut Board, level: u32, rng: &mut SimpleRng) {
    let mut top = FLOOR_ROW + 5 - level.min(i32::MAX as u32) as i32;
    if top < RANDOM_TOP_MIN {
        top = RANDOM_TOP_MIN;
    }
    if top > FLOOR_ROW {
        top = FLOOR_ROW - 2;
    }
    let threshold = 25 + top as u32 * 3;

    for r in top..=FLOOR_ROW {
        let mut run = 0;
        let mut color = 1 + rng.next_range(7) as i32;
        for c in FIRST_COL..=LAST_COL {
            if threshold <= rng.next_range(FILL_ROLL) {
                continue;
            }
            run += 1;
            if run < RUN_BREAK {
                put(board, c, r, color);
                if run > RUN_RECOLOR {
                    color = 1 + rng.next_range(7) as i32;
                }
            } else {
                run = 0;
            }
        }
    }
}
