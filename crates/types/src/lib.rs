//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are pure data with no external dependencies, making them usable
//! by the engine, the session driver and any presentation layer.
//!
//! # Board Geometry
//!
//! The grid includes the cells that are out of play:
//!
//! - **Column 0**: left wall
//! - **Columns `COLS - 2` and `COLS - 1`**: double right wall (room for the I piece)
//! - **Rows `ROWS - 2` and `ROWS - 1`**: double floor
//! - **Row 0**: spawn overflow, above the visible field, never a wall
//!
//! With the reference sizing (`PLAY_COLS = 10`, `PLAY_ROWS = 20`) the grid is
//! 13 columns by 23 rows and the playable interior is columns `1..=10`,
//! rows `1..=20`.
//!
//! # Cell Encoding
//!
//! | Value | Meaning |
//! |-------|---------|
//! | `0` | empty |
//! | `1..=7` | a palette colour |
//! | `16` | wall |
//! | `0x80 | 1..=7` | challenge block of that colour |
//!
//! # Examples
//!
//! ```
//! use notint_types::{Cell, Color, GameMode, Action, COLS, ROWS};
//!
//! let cell = Cell::challenge(Color::Green);
//! assert!(cell.is_challenge());
//! assert_eq!(cell.color(), Some(Color::Green));
//!
//! assert_eq!(GameMode::from_str("zen"), Some(GameMode::Zen));
//! assert_eq!(Action::from_str("rotate"), Some(Action::Rotate));
//! assert_eq!((COLS, ROWS), (13, 23));
//! ```

use std::fmt;

/// Playable columns (interior width).
pub const PLAY_COLS: usize = 10;

/// Playable rows (interior height, excluding the spawn overflow row).
pub const PLAY_ROWS: usize = 20;

/// Total columns including the left wall and the double right wall.
pub const COLS: usize = PLAY_COLS + 3;

/// Total rows including the overflow row and the double floor.
pub const ROWS: usize = PLAY_ROWS + 3;

/// First interior column.
pub const FIRST_COL: i32 = 1;

/// Last interior column.
pub const LAST_COL: i32 = PLAY_COLS as i32;

/// Top playable row (immediately inside the spawn border).
pub const TOP_ROW: i32 = 1;

/// Lowest playable row, resting on the floor.
pub const FLOOR_ROW: i32 = PLAY_ROWS as i32;

/// Spawn column for every mode except easy.
pub const SPAWN_X: i32 = 5;

/// Spawn row.
pub const SPAWN_Y: i32 = 1;

/// Easy mode spawns in `EASY_SPAWN_MIN_X .. EASY_SPAWN_MIN_X + EASY_SPAWN_SPREAD`.
pub const EASY_SPAWN_MIN_X: i32 = 4;

/// Width of the easy mode spawn band.
pub const EASY_SPAWN_SPREAD: u32 = 5;

/// Number of shapes in the catalog.
pub const NUM_SHAPES: usize = 7;

/// Number of blocks in every shape.
pub const NUM_BLOCKS: usize = 4;

/// Lowest selectable level.
pub const MIN_LEVEL: u32 = 1;

/// Highest selectable level (challenge mode ignores it).
pub const MAX_LEVEL: u32 = 9;

/// Zen mode is played at this level.
pub const ZEN_LEVEL: u32 = 3;

/// Lines needed per automatic level raise.
pub const LINES_PER_LEVEL: u32 = 10;

/// Internal score is kept at this multiple of the displayed score.
pub const SCORE_FACTOR: i64 = 4;

/// Divisor applied to the drop score per enabled assistance option,
/// and multiplier of the challenge "wasted line" penalty.
pub const SCORE_PENALTY: i64 = 2;

/// Leftover non-challenge blocks cost this many scaled points each
/// when a challenge page is completed.
pub const LEFTOVER_PENALTY: i64 = 10;

/// Percentage of biased draws that are uniform ("lucky") instead.
pub const LUCKY_PERCENT: u32 = 15;

/// Minimum remaining count after the preferred shape changes.
pub const BIAS_RUN_MIN: u32 = 10;

/// Spread of the remaining count (`BIAS_RUN_MIN .. BIAS_RUN_MIN + BIAS_RUN_SPREAD`).
pub const BIAS_RUN_SPREAD: u32 = 20;

/// Wall sentinel value.
pub const WALL: u8 = 16;

/// Flag bit marking a challenge block.
pub const CHALLENGE_MASK: u8 = 0x80;

/// Mask matching any coloured cell, challenge or not.
pub const COLOR_MASK: u8 = 0x77;

/// Compute the scaled (internal) value of a displayed score amount.
#[inline]
pub const fn scaled(points: i64) -> i64 {
    SCORE_FACTOR * points
}

/// Compute the displayed value of an internal score (floor division).
#[inline]
pub const fn unscaled(score: i64) -> i64 {
    score.div_euclid(SCORE_FACTOR)
}

/// The seven-colour palette
///
/// Discriminants follow the classic curses colour numbers so that a
/// presentation layer can map them directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,
}

impl Color {
    /// All palette entries in discriminant order.
    pub const ALL: [Color; 7] = [
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Magenta,
        Color::Cyan,
        Color::White,
    ];

    /// Palette entry for `1..=7`, `None` otherwise.
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1..=7 => Some(Self::ALL[index as usize - 1]),
            _ => None,
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Blue => "blue",
            Color::Magenta => "magenta",
            Color::Cyan => "cyan",
            Color::White => "white",
        }
    }
}

/// The seven shapes, numbered as in the BSD tetris lineage
///
/// The discriminant is also the shape's type tag, which selects its
/// rotation rule. Letters loosely resemble the shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ShapeKind {
    Z = 0,
    S = 1,
    T = 2,
    O = 3,
    L = 4,
    J = 5,
    I = 6,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; NUM_SHAPES] = [
        ShapeKind::Z,
        ShapeKind::S,
        ShapeKind::T,
        ShapeKind::O,
        ShapeKind::L,
        ShapeKind::J,
        ShapeKind::I,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Z => "z",
            ShapeKind::S => "s",
            ShapeKind::T => "t",
            ShapeKind::O => "o",
            ShapeKind::L => "l",
            ShapeKind::J => "j",
            ShapeKind::I => "i",
        }
    }
}

/// A single board cell value
///
/// Kept as the raw byte so masked block counts are plain bitwise ANDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell(u8);

impl Cell {
    pub const EMPTY: Cell = Cell(0);
    pub const WALL: Cell = Cell(WALL);

    /// An ordinary block of the given colour.
    pub const fn block(color: Color) -> Self {
        Cell(color as u8)
    }

    /// A challenge block of the given colour.
    pub const fn challenge(color: Color) -> Self {
        Cell(CHALLENGE_MASK | color as u8)
    }

    pub const fn from_raw(raw: u8) -> Self {
        Cell(raw)
    }

    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Anything other than empty, walls included.
    pub const fn is_occupied(self) -> bool {
        self.0 != 0
    }

    pub const fn is_wall(self) -> bool {
        self.0 == WALL
    }

    pub const fn is_challenge(self) -> bool {
        self.0 & CHALLENGE_MASK != 0
    }

    /// Whether `cell & mask` is nonzero.
    pub const fn matches(self, mask: u8) -> bool {
        self.0 & mask != 0
    }

    /// Palette colour, ignoring the challenge flag. Walls and empty cells have none.
    pub fn color(self) -> Option<Color> {
        if self.is_wall() {
            return None;
        }
        Color::from_index(self.0 & !CHALLENGE_MASK)
    }
}

/// Game modes
///
/// - **Traditional**: drop score only, levels rise with cleared lines
/// - **Easy**: biased shape stream, randomised spawn column, clears score directly
/// - **Zen**: only cleared lines score, fixed level
/// - **Challenge**: clear procedurally generated challenge blocks page by page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameMode {
    #[default]
    Traditional,
    Easy,
    Zen,
    Challenge,
}

impl GameMode {
    /// Parse mode from string (case-insensitive, full name or initial)
    ///
    /// # Examples
    ///
    /// ```
    /// use notint_types::GameMode;
    ///
    /// assert_eq!(GameMode::from_str("Challenge"), Some(GameMode::Challenge));
    /// assert_eq!(GameMode::from_str("e"), Some(GameMode::Easy));
    /// assert_eq!(GameMode::from_str("speed"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "traditional" | "t" => Some(GameMode::Traditional),
            "easy" | "easytris" | "e" => Some(GameMode::Easy),
            "zen" | "z" => Some(GameMode::Zen),
            "challenge" | "c" => Some(GameMode::Challenge),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Traditional => "traditional",
            GameMode::Easy => "easy",
            GameMode::Zen => "zen",
            GameMode::Challenge => "challenge",
        }
    }

    /// Whether the show-next assistance is always on in this mode.
    pub fn forces_show_next(&self) -> bool {
        matches!(self, GameMode::Easy | GameMode::Zen)
    }

    /// Whether the level has no upper cap at selection time.
    pub fn uncapped_level(&self) -> bool {
        matches!(self, GameMode::Challenge)
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discrete player actions handled by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Shift the piece one column left
    MoveLeft,
    /// Rotate the piece according to its shape rule
    Rotate,
    /// Shift the piece one column right
    MoveRight,
    /// Drop the piece as far as it goes
    Drop,
}

impl Action {
    /// Parse action from string
    ///
    /// # Examples
    ///
    /// ```
    /// use notint_types::Action;
    ///
    /// assert_eq!(Action::from_str("left"), Some(Action::MoveLeft));
    /// assert_eq!(Action::from_str("K"), Some(Action::Rotate));
    /// assert_eq!(Action::from_str("space"), Some(Action::Drop));
    /// assert_eq!(Action::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "left" | "moveleft" | "j" => Some(Action::MoveLeft),
            "rotate" | "k" => Some(Action::Rotate),
            "right" | "moveright" | "l" => Some(Action::MoveRight),
            "drop" | "down" | "space" => Some(Action::Drop),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::MoveLeft => "left",
            Action::Rotate => "rotate",
            Action::MoveRight => "right",
            Action::Drop => "drop",
        }
    }
}

/// Result of one engine evaluation tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Evaluation {
    /// Gravity moved the piece one row down.
    Falling,
    /// The piece locked and the next one spawned.
    Settled,
    /// The next piece could not spawn. Terminal.
    GameOver,
}

impl Evaluation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Evaluation::Falling => "falling",
            Evaluation::Settled => "settled",
            Evaluation::GameOver => "game_over",
        }
    }
}

/// Commands understood by the session driver
///
/// A superset of [`Action`]: besides piece actions the player can tick
/// gravity, change assistance options, raise the level or quit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Act(Action),
    Tick,
    ShowNext,
    ToggleDotted,
    LevelUp,
    Quit,
}

impl Command {
    /// Parse a command from one line of text
    ///
    /// # Examples
    ///
    /// ```
    /// use notint_types::{Action, Command};
    ///
    /// assert_eq!(Command::from_str("drop"), Some(Command::Act(Action::Drop)));
    /// assert_eq!(Command::from_str("tick"), Some(Command::Tick));
    /// assert_eq!(Command::from_str("a"), Some(Command::LevelUp));
    /// assert_eq!(Command::from_str(""), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        if let Some(action) = Action::from_str(s) {
            return Some(Command::Act(action));
        }
        match s.trim().to_lowercase().as_str() {
            "tick" | "." => Some(Command::Tick),
            "next" | "s" => Some(Command::ShowNext),
            "dotted" | "d" => Some(Command::ToggleDotted),
            "up" | "levelup" | "a" => Some(Command::LevelUp),
            "quit" | "q" => Some(Command::Quit),
            _ => None,
        }
    }
}
