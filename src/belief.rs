//! Per-agent belief state over grid cells
//!
//! A [`BeliefMatrix`] is a width-by-height non-negative matrix indexed
//! `(x, y)`. For a live agent the entries over walkable cells sum to 1;
//! blocked cells are always 0; an eliminated agent's belief is the all-zero
//! matrix.

use nalgebra::DMatrix;

use crate::errors::TrackerError;
use crate::grid::{manhattan, Grid};

/// Probability distribution over grid cells for one tracked agent
#[derive(Debug, Clone, PartialEq)]
pub struct BeliefMatrix {
    pub(crate) probs: DMatrix<f64>,
}

impl BeliefMatrix {
    /// Uniform distribution over all walkable cells.
    pub fn uniform(grid: &Grid) -> Self {
        let p = 1.0 / grid.open_cell_count() as f64;
        let probs = DMatrix::from_fn(grid.width(), grid.height(), |x, y| {
            if grid.blocked(x, y) {
                0.0
            } else {
                p
            }
        });
        Self { probs }
    }

    /// All-zero matrix (the terminal belief of an eliminated agent).
    pub fn zeroed(grid: &Grid) -> Self {
        Self {
            probs: DMatrix::zeros(grid.width(), grid.height()),
        }
    }

    /// Build a belief from unnormalized per-cell weights. Blocked cells are
    /// forced to zero and the rest is normalized; a weight function that puts
    /// no mass on any walkable cell is a configuration error.
    pub fn from_fn(
        grid: &Grid,
        weight: impl Fn(usize, usize) -> f64,
    ) -> Result<Self, TrackerError> {
        let mut probs = DMatrix::from_fn(grid.width(), grid.height(), |x, y| {
            if grid.blocked(x, y) {
                0.0
            } else {
                weight(x, y).max(0.0)
            }
        });
        let total = probs.sum();
        if total <= 0.0 {
            return Err(TrackerError::Configuration {
                description: "prior belief has zero mass on walkable cells".to_string(),
            });
        }
        probs /= total;
        Ok(Self { probs })
    }

    /// Probability mass at (x, y).
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.probs[(x, y)]
    }

    /// Total probability mass.
    #[inline]
    pub fn sum(&self) -> f64 {
        self.probs.sum()
    }

    /// Whether this is the all-zero (eliminated) belief.
    pub fn is_zero(&self) -> bool {
        self.probs.iter().all(|&p| p == 0.0)
    }

    /// Most likely cell, or `None` for the all-zero belief. Ties resolve to
    /// the lowest cell index.
    pub fn argmax(&self) -> Option<(usize, usize)> {
        let mut best: Option<((usize, usize), f64)> = None;
        for y in 0..self.probs.ncols() {
            for x in 0..self.probs.nrows() {
                let p = self.probs[(x, y)];
                if p > 0.0 && best.map_or(true, |(_, bp)| p > bp) {
                    best = Some(((x, y), p));
                }
            }
        }
        best.map(|(cell, _)| cell)
    }

    /// Expected Manhattan distance from `point` under this distribution.
    pub fn expected_distance_to(&self, point: (usize, usize)) -> f64 {
        let mut acc = 0.0;
        for y in 0..self.probs.ncols() {
            for x in 0..self.probs.nrows() {
                let p = self.probs[(x, y)];
                if p > 0.0 {
                    acc += p * manhattan((x, y), point) as f64;
                }
            }
        }
        acc
    }

    /// Normalize in place, or reset to uniform over walkable cells when the
    /// total mass is at or below `epsilon` (the degenerate-evidence recovery
    /// policy). Returns `true` when a reset happened.
    pub fn normalize_or_reset(&mut self, grid: &Grid, epsilon: f64) -> bool {
        let total = self.probs.sum();
        if total > epsilon {
            self.probs /= total;
            false
        } else {
            *self = Self::uniform(grid);
            true
        }
    }

    /// The underlying probability matrix.
    #[inline]
    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.probs
    }
}
