//! Shapes module - the seven-piece catalog and its rotation rules
//!
//! Rotation is deliberately not the mathematically correct one for every
//! shape. Each type tag selects a hand-tuned rule:
//!
//! | Type | Shapes | Rule |
//! |------|--------|------|
//! | 0 | Z | alternate anti-clockwise / clockwise, starting anti-clockwise |
//! | 1, 6 | S, I | alternate clockwise / anti-clockwise, starting clockwise |
//! | 2, 4, 5 | T, L, J | always anti-clockwise |
//! | 3 | O | never rotates |
//!
//! The alternating shapes track their direction in the `flipped` bit, so two
//! successive rotations bring them back to where they started.

use crate::types::{Cell, Color, ShapeKind, NUM_BLOCKS, NUM_SHAPES};

/// Offset of a single block relative to the shape's pivot
pub type BlockOffset = (i8, i8);

/// The four block offsets of a shape
pub type ShapeBlocks = [BlockOffset; NUM_BLOCKS];

/// How a shape responds to a rotation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationRule {
    /// Alternate direction on each rotation via the flipped bit.
    Toggle { first_clockwise: bool },
    /// True 90° anti-clockwise turn every time.
    AntiClockwise,
    /// Rotation is a no-op.
    Fixed,
}

impl RotationRule {
    pub fn for_kind(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Z => RotationRule::Toggle {
                first_clockwise: false,
            },
            ShapeKind::S | ShapeKind::I => RotationRule::Toggle {
                first_clockwise: true,
            },
            ShapeKind::T | ShapeKind::L | ShapeKind::J => RotationRule::AntiClockwise,
            ShapeKind::O => RotationRule::Fixed,
        }
    }
}

/// A shape instance: catalog entry plus its live orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    pub kind: ShapeKind,
    pub color: Color,
    pub flipped: bool,
    /// Set only for blocks that belong to a challenge pattern.
    pub challenge: bool,
    pub blocks: ShapeBlocks,
}

/// Read-only catalog defaults, indexed by [`ShapeKind::index`].
///
/// ```text
///      X.X       X.X           X.X
///        X.X   X.X     X.X.X   X.X     X.X.X   X.X.X   X.X.X.X
///                        X             X           X
///
///       Z       S       T       O       L       J       I
/// ```
pub const CATALOG: [Shape; NUM_SHAPES] = [
    Shape::template(ShapeKind::Z, Color::Cyan, [(1, 0), (0, 0), (0, -1), (-1, -1)]),
    Shape::template(ShapeKind::S, Color::Green, [(1, -1), (0, -1), (0, 0), (-1, 0)]),
    Shape::template(ShapeKind::T, Color::Yellow, [(-1, 0), (0, 0), (1, 0), (0, 1)]),
    Shape::template(ShapeKind::O, Color::Blue, [(-1, -1), (0, -1), (-1, 0), (0, 0)]),
    Shape::template(ShapeKind::L, Color::Magenta, [(-1, 1), (-1, 0), (0, 0), (1, 0)]),
    Shape::template(ShapeKind::J, Color::White, [(1, 1), (1, 0), (0, 0), (-1, 0)]),
    Shape::template(ShapeKind::I, Color::Red, [(-1, 0), (0, 0), (1, 0), (2, 0)]),
];

impl Shape {
    const fn template(kind: ShapeKind, color: Color, blocks: ShapeBlocks) -> Self {
        Self {
            kind,
            color,
            flipped: false,
            challenge: false,
            blocks,
        }
    }

    /// Fresh, un-rotated copy of the catalog entry.
    pub fn of(kind: ShapeKind) -> Self {
        CATALOG[kind.index()]
    }

    /// Cell value written to the board for each block.
    pub fn cell(&self) -> Cell {
        if self.challenge {
            Cell::challenge(self.color)
        } else {
            Cell::block(self.color)
        }
    }

    /// Board coordinates of the blocks with the pivot at (x, y).
    pub fn cells_at(&self, x: i32, y: i32) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.blocks
            .iter()
            .map(move |&(dx, dy)| (x + dx as i32, y + dy as i32))
    }

    /// Candidate orientation after one rotation request.
    ///
    /// This never looks at a board; legality is checked by the caller.
    pub fn rotated(&self) -> Self {
        let mut next = *self;
        match RotationRule::for_kind(self.kind) {
            RotationRule::Toggle { first_clockwise } => {
                next.blocks = turn(&self.blocks, first_clockwise != self.flipped);
                next.flipped = !self.flipped;
            }
            RotationRule::AntiClockwise => {
                next.blocks = turn(&self.blocks, false);
            }
            RotationRule::Fixed => {}
        }
        next
    }
}

/// True 90° rotation of every offset.
///
/// Clockwise maps (x, y) to (-y, x), anti-clockwise maps (x, y) to (y, -x).
pub fn turn(blocks: &ShapeBlocks, clockwise: bool) -> ShapeBlocks {
    let mut out = *blocks;
    for block in &mut out {
        let (x, y) = *block;
        *block = if clockwise { (-y, x) } else { (y, -x) };
    }
    out
}
