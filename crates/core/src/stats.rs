//! Round statistics
//!
//! Per-piece accumulators feeding the efficiency metric, cumulative line
//! count, and the challenge-mode block bookkeeping.

use serde::Serialize;

use crate::types::SPAWN_X;

/// Rotations a piece may use before efficiency starts to suffer
const FREE_ROTATIONS: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct RoundStats {
    /// Successful horizontal moves of the current piece
    pub moves: i32,
    /// Successful rotations of the current piece
    pub rotations: i32,
    /// Rows covered by drops of the current piece
    pub drop_count: i32,
    /// Smoothed placement efficiency
    pub efficiency: i32,
    /// Lines cleared over the whole game
    pub total_lines: u32,
    /// Lines cleared by the piece that just settled
    pub last_clear: u32,
    /// Challenge blocks when the current page was generated
    pub challenge_start: u32,
    pub challenge_blocks: u32,
    pub challenge_blocks_prev: u32,
    pub non_challenge_blocks: u32,
}

impl RoundStats {
    /// Fold the settled piece into `efficiency` and reset the per-piece counters
    ///
    /// `landing_x` is the pivot column the piece settled on. The
    /// contribution is the drop distance, plus the rotation term
    /// `min(0, 4 - rotations)`, plus the distance from the spawn column
    /// minus the moves spent; the result is averaged with the old value.
    pub fn fold_efficiency(&mut self, landing_x: i32) {
        let rotation_term = (FREE_ROTATIONS - self.rotations).min(0);
        let displacement = (landing_x - SPAWN_X).abs();
        self.efficiency += self.drop_count + rotation_term + (displacement - self.moves);
        self.efficiency >>= 1;
        self.moves = 0;
        self.rotations = 0;
        self.drop_count = 0;
    }

    /// Record a fresh challenge page
    pub fn start_challenge(&mut self, blocks: u32) {
        self.challenge_start = blocks;
        self.challenge_blocks = blocks;
        self.challenge_blocks_prev = blocks;
    }
}
