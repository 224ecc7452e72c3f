//! Agent motion model under an avoidance policy
//!
//! Each tracked agent takes one cardinal step per tick. Moves that do not
//! decrease the Manhattan distance to the observer carry the policy's
//! avoidance strength as raw weight; moves toward the observer carry weight
//! 1. Weights are normalized per origin cell, so the model is row-stochastic
//! over every walkable origin. A fully enclosed cell self-loops with
//! probability 1.
//!
//! The model depends on the observer's current position and must be
//! recomputed each tick; within a tick it is shared read-only across all
//! tracked agents. Instead of the dense (dest, src) 4-index tensor this
//! stores each origin's outgoing edges sparsely (at most 4 neighbors or one
//! self-loop), and the prediction contraction becomes a scatter-add.

use std::str::FromStr;

use nalgebra::DMatrix;
use serde::Serialize;
use smallvec::SmallVec;

use crate::errors::TrackerError;
use crate::grid::{manhattan, Grid};

/// How strongly a tracked agent's motion favors increasing distance from the
/// observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BehaviorPolicy {
    /// No directional bias
    Confused,
    /// Mild preference for moving away
    Afraid,
    /// Strong preference for moving away
    Scared,
}

impl BehaviorPolicy {
    /// Raw weight assigned to neutral-or-away moves (toward moves weigh 1).
    #[inline]
    pub fn avoidance_strength(&self) -> f64 {
        match self {
            BehaviorPolicy::Confused => 1.0,
            BehaviorPolicy::Afraid => 2.0,
            BehaviorPolicy::Scared => 8.0,
        }
    }

    /// Policy name as used in configuration.
    pub fn name(&self) -> &'static str {
        match self {
            BehaviorPolicy::Confused => "confused",
            BehaviorPolicy::Afraid => "afraid",
            BehaviorPolicy::Scared => "scared",
        }
    }
}

impl FromStr for BehaviorPolicy {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confused" => Ok(BehaviorPolicy::Confused),
            "afraid" => Ok(BehaviorPolicy::Afraid),
            "scared" => Ok(BehaviorPolicy::Scared),
            other => Err(TrackerError::Configuration {
                description: format!(
                    "unknown behavior policy '{}' (expected confused, afraid or scared)",
                    other
                ),
            }),
        }
    }
}

/// One outgoing edge: destination cell index and transition probability.
type Edge = (usize, f64);

/// Row-stochastic one-step motion model, sparse over grid adjacency
#[derive(Debug, Clone)]
pub struct TransitionModel {
    /// Outgoing edges per source cell index; empty for blocked cells.
    rows: Vec<SmallVec<[Edge; 4]>>,
    width: usize,
    height: usize,
}

impl TransitionModel {
    /// Build the transition model for the current observer position.
    pub fn compute(grid: &Grid, observer: (usize, usize), policy: BehaviorPolicy) -> Self {
        let strength = policy.avoidance_strength();
        let mut rows = vec![SmallVec::new(); grid.width() * grid.height()];

        for (x, y) in grid.open_cells() {
            let src = grid.cell_index(x, y);
            let candidates = grid.neighbors(x, y);

            if candidates.is_empty() {
                // Enclosed cell: the agent stays put.
                rows[src].push((src, 1.0));
                continue;
            }

            let current_distance = manhattan((x, y), observer);
            let mut weights: SmallVec<[f64; 4]> = SmallVec::new();
            let mut total = 0.0;
            for &(nx, ny) in &candidates {
                let weight = if manhattan((nx, ny), observer) >= current_distance {
                    strength
                } else {
                    1.0
                };
                weights.push(weight);
                total += weight;
            }

            for (&(nx, ny), &weight) in candidates.iter().zip(weights.iter()) {
                rows[src].push((grid.cell_index(nx, ny), weight / total));
            }
        }

        Self {
            rows,
            width: grid.width(),
            height: grid.height(),
        }
    }

    /// Outgoing distribution from (x, y); empty for blocked cells.
    pub fn outgoing(&self, grid: &Grid, x: usize, y: usize) -> &[Edge] {
        &self.rows[grid.cell_index(x, y)]
    }

    /// One-step prediction: predicted(d) = Σ_s P(d | s) · prior(s), as a
    /// sparse scatter-add over outgoing edges.
    pub fn predict(&self, prior: &DMatrix<f64>) -> DMatrix<f64> {
        debug_assert_eq!(prior.nrows(), self.width);
        debug_assert_eq!(prior.ncols(), self.height);

        let mut predicted = DMatrix::zeros(self.width, self.height);
        let src_mass = prior.as_slice();
        let out = predicted.as_mut_slice();
        for (src, row) in self.rows.iter().enumerate() {
            let mass = src_mass[src];
            if mass == 0.0 {
                continue;
            }
            for &(dest, p) in row {
                out[dest] += p * mass;
            }
        }
        predicted
    }
}
