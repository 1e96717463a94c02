//! Movement primitives
//!
//! Every primitive erases the shape from its current cells, tests the
//! destination, updates the position when legal and redraws the shape where
//! it ended up. The active piece is therefore always on the board between
//! calls, and collision tests never see the piece's own cells.

use crate::board::Board;
use crate::shapes::Shape;

/// Pivot position of a piece in board coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Shift by (dx, dy) if the destination is free
fn shift(board: &mut Board, shape: &Shape, pos: &mut Position, dx: i32, dy: i32) -> bool {
    board.clear(shape, pos.x, pos.y);
    let moved = board.fits(shape, pos.x + dx, pos.y + dy);
    if moved {
        pos.x += dx;
        pos.y += dy;
    }
    board.place(shape, pos.x, pos.y);
    moved
}

pub fn move_left(board: &mut Board, shape: &Shape, pos: &mut Position) -> bool {
    shift(board, shape, pos, -1, 0)
}

pub fn move_right(board: &mut Board, shape: &Shape, pos: &mut Position) -> bool {
    shift(board, shape, pos, 1, 0)
}

/// One row of gravity
pub fn move_down(board: &mut Board, shape: &Shape, pos: &mut Position) -> bool {
    shift(board, shape, pos, 0, 1)
}

/// Whether the piece cannot move one row down (the settle trigger)
pub fn is_resting(board: &mut Board, shape: &Shape, pos: Position) -> bool {
    board.clear(shape, pos.x, pos.y);
    let resting = !board.fits(shape, pos.x, pos.y + 1);
    board.place(shape, pos.x, pos.y);
    resting
}

/// Drop the piece as far as it goes, returning the rows descended
pub fn drop(board: &mut Board, shape: &Shape, pos: &mut Position) -> u32 {
    board.clear(shape, pos.x, pos.y);
    let mut rows = 0;
    while board.fits(shape, pos.x, pos.y + 1) {
        pos.y += 1;
        rows += 1;
    }
    board.place(shape, pos.x, pos.y);
    rows
}

/// Rotate in place if the rotated shape fits at the unchanged position
///
/// The candidate is computed on a copy; `shape` is only replaced when the
/// rotation is legal.
pub fn rotate(board: &mut Board, shape: &mut Shape, pos: Position) -> bool {
    board.clear(shape, pos.x, pos.y);
    let candidate = shape.rotated();
    let rotated = board.fits(&candidate, pos.x, pos.y);
    if rotated {
        *shape = candidate;
    }
    board.place(shape, pos.x, pos.y);
    rotated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cell, Color, ShapeKind};

    #[test]
    fn move_left_stops_at_wall() {
        let mut board = Board::new();
        let shape = Shape::of(ShapeKind::O);
        let mut pos = Position::new(3, 5);
        board.place(&shape, pos.x, pos.y);

        assert!(move_left(&mut board, &shape, &mut pos));
        assert_eq!(pos, Position::new(2, 5));
        // O occupies x-1..=x, so column 0 (wall) blocks the next step
        assert!(!move_left(&mut board, &shape, &mut pos));
        assert_eq!(pos, Position::new(2, 5));
        assert!(board.occupied(1, 5));
        assert!(!board.occupied(3, 5));
    }

    #[test]
    fn failed_move_redraws_piece() {
        let mut board = Board::new();
        let shape = Shape::of(ShapeKind::T);
        let mut pos = Position::new(5, 5);
        board.set(7, 5, Cell::block(Color::Red));
        board.place(&shape, pos.x, pos.y);
        let before = board.clone();

        assert!(!move_right(&mut board, &shape, &mut pos));
        assert_eq!(board, before);
    }

    #[test]
    fn resting_on_floor() {
        let mut board = Board::new();
        let shape = Shape::of(ShapeKind::I);
        let mut pos = Position::new(5, 19);
        board.place(&shape, pos.x, pos.y);
        assert!(!is_resting(&mut board, &shape, pos));
        assert!(move_down(&mut board, &shape, &mut pos));
        assert!(is_resting(&mut board, &shape, pos));
        assert!(!move_down(&mut board, &shape, &mut pos));
        assert_eq!(pos.y, 20);
    }

    #[test]
    fn drop_counts_rows() {
        let mut board = Board::new();
        let shape = Shape::of(ShapeKind::I);
        let mut pos = Position::new(5, 1);
        board.place(&shape, pos.x, pos.y);
        assert_eq!(drop(&mut board, &shape, &mut pos), 19);
        assert_eq!(pos.y, 20);
        assert_eq!(drop(&mut board, &shape, &mut pos), 0);
    }

    #[test]
    fn blocked_rotation_keeps_shape() {
        let mut board = Board::new();
        let mut shape = Shape::of(ShapeKind::I);
        let pos = Position::new(5, 10);
        // Vertical I needs (5, 9), (5, 11), (5, 12)
        board.set(5, 11, Cell::block(Color::Green));
        board.place(&shape, pos.x, pos.y);
        let original = shape;

        assert!(!rotate(&mut board, &mut shape, pos));
        assert_eq!(shape, original);
        assert!(!shape.flipped);
    }
}
