//! RNG module - shape selection with optional "lucky" bias
//!
//! Two policies share one generator:
//!
//! - **Uniform** ([`Bias::Disabled`]): every draw is uniform over the seven shapes.
//! - **Biased** ([`Bias::Lucky`], easy mode): a preferred shape is returned
//!   for a run of draws. Each draw has a `LUCKY_PERCENT` chance of being
//!   uniform instead. After each draw the remaining count is decremented;
//!   a draw made with the count already at zero picks a new preferred shape
//!   (never the same one) and a new count in
//!   `BIAS_RUN_MIN .. BIAS_RUN_MIN + BIAS_RUN_SPREAD`.
//!
//! Also provides a simple LCG so every game is reproducible from its seed.

use crate::types::{ShapeKind, BIAS_RUN_MIN, BIAS_RUN_SPREAD, LUCKY_PERCENT, NUM_SHAPES};

/// Bit offset of the preferred shape in the encoded bias status
const STATUS_SHIFT: u32 = 16;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Multiply-shift keeps the high bits; the low bits of an LCG cycle
    /// with short periods.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Roll a percentage in [0, 100)
    pub fn percent(&mut self) -> u32 {
        self.next_range(100)
    }

    /// Uniformly chosen shape
    pub fn shape(&mut self) -> ShapeKind {
        ShapeKind::ALL[self.next_range(NUM_SHAPES as u32) as usize]
    }
}

/// Selection bias state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Bias {
    #[default]
    Disabled,
    Lucky {
        preferred: ShapeKind,
        remaining: u32,
    },
}

impl Bias {
    /// Starting state for easy mode: the level names the shape that must
    /// not be preferred first. The count is zero so the first advance picks.
    pub fn for_level(level: u32) -> Self {
        let index = (level.max(1) - 1) as usize % NUM_SHAPES;
        Bias::Lucky {
            preferred: ShapeKind::ALL[index],
            remaining: 0,
        }
    }

    /// Packed form: `-1` when disabled, else `preferred << 16 | remaining`
    pub fn encode(&self) -> i32 {
        match *self {
            Bias::Disabled => -1,
            Bias::Lucky {
                preferred,
                remaining,
            } => ((preferred.index() as i32) << STATUS_SHIFT) | remaining as i32,
        }
    }

    /// Inverse of [`Bias::encode`]; `None` for malformed values
    pub fn decode(status: i32) -> Option<Self> {
        if status < 0 {
            return Some(Bias::Disabled);
        }
        let preferred = ShapeKind::from_index((status >> STATUS_SHIFT) as usize)?;
        Some(Bias::Lucky {
            preferred,
            remaining: (status & 0xffff) as u32,
        })
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Bias::Lucky { .. })
    }
}

/// Shape generator: RNG plus bias state
#[derive(Debug, Clone)]
pub struct ShapePicker {
    rng: SimpleRng,
    bias: Bias,
}

impl ShapePicker {
    /// Uniform picker with the given seed
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            bias: Bias::Disabled,
        }
    }

    pub fn bias(&self) -> Bias {
        self.bias
    }

    pub fn set_bias(&mut self, bias: Bias) {
        self.bias = bias;
    }

    /// Generator shared with the spawn column and challenge patterns
    pub fn rng_mut(&mut self) -> &mut SimpleRng {
        &mut self.rng
    }

    /// Pick a shape without advancing the bias run
    pub fn draw(&mut self) -> ShapeKind {
        match self.bias {
            Bias::Disabled => self.rng.shape(),
            Bias::Lucky { preferred, .. } => {
                if self.rng.percent() < LUCKY_PERCENT {
                    self.rng.shape()
                } else {
                    preferred
                }
            }
        }
    }

    /// Advance the bias run by one draw
    pub fn advance(&mut self) {
        let Bias::Lucky {
            preferred,
            remaining,
        } = self.bias
        else {
            return;
        };

        self.bias = if remaining == 0 {
            let mut next = self.rng.shape();
            while next == preferred {
                next = self.rng.shape();
            }
            Bias::Lucky {
                preferred: next,
                remaining: BIAS_RUN_MIN + self.rng.next_range(BIAS_RUN_SPREAD),
            }
        } else {
            Bias::Lucky {
                preferred,
                remaining: remaining - 1,
            }
        };
    }

    /// Draw then advance
    pub fn next_shape(&mut self) -> ShapeKind {
        let shape = self.draw();
        self.advance();
        shape
    }
}

impl Default for ShapePicker {
    fn default() -> Self {
        Self::new(1)
    }
}
