//! Snapshot module - read-only engine views
//!
//! Plain serialisable copies of the board, both pieces and the round
//! statistics, filled in place by [`crate::Engine::snapshot_into`].

use serde::Serialize;

use crate::motion::Position;
use crate::shapes::Shape;
use crate::stats::RoundStats;
use crate::types::{COLS, ROWS};

/// Read-only view of a shape for presentation layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ShapeSnapshot {
    pub kind: &'static str,
    pub color: &'static str,
    pub challenge: bool,
    pub blocks: [(i8, i8); 4],
    /// Pivot on the board; `None` for the preview piece
    pub x: Option<i32>,
    pub y: Option<i32>,
}

impl ShapeSnapshot {
    pub fn from_shape(shape: &Shape, pos: Option<Position>) -> Self {
        Self {
            kind: shape.kind.as_str(),
            color: shape.color.as_str(),
            challenge: shape.challenge,
            blocks: shape.blocks,
            x: pos.map(|p| p.x),
            y: pos.map(|p| p.y),
        }
    }
}

impl Default for ShapeSnapshot {
    fn default() -> Self {
        Self::from_shape(&crate::shapes::CATALOG[0], None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EngineSnapshot {
    /// Raw cell values, walls included
    pub board: [[u8; COLS]; ROWS],
    pub current: ShapeSnapshot,
    pub next: ShapeSnapshot,
    pub mode: &'static str,
    pub level: u32,
    /// Displayed score
    pub score: i64,
    pub scaled_score: i64,
    /// Packed bias status, `-1` when disabled
    pub bias: i32,
    pub stats: RoundStats,
    pub game_over: bool,
}

impl EngineSnapshot {
    pub fn playable(&self) -> bool {
        !self.game_over
    }
}

impl Default for EngineSnapshot {
    fn default() -> Self {
        Self {
            board: [[0u8; COLS]; ROWS],
            current: ShapeSnapshot::default(),
            next: ShapeSnapshot::default(),
            mode: "traditional",
            level: 1,
            score: 0,
            scaled_score: 0,
            bias: -1,
            stats: RoundStats::default(),
            game_over: false,
        }
    }
}
