//! Range sensor observation model
//!
//! A reading is the true Manhattan distance to the agent plus zero-mean
//! integer noise from a shifted binomial: noise = Binomial(n, p) − n·p with
//! p = 0.5 and n = round(variance / (p·(1−p))) = round(4·variance). For a
//! candidate cell at true distance d, the likelihood of reading e is the
//! binomial pmf at k = e − d + n·p successes.
//!
//! Readings the model cannot explain at any walkable cell fail soft: the
//! surface degrades to uniform over walkable cells so the multiplicative
//! update downstream never produces an all-zero or NaN belief.

use nalgebra::DMatrix;

use crate::errors::TrackerError;
use crate::grid::{manhattan, Grid};

/// Tolerance for treating the success count k as integral. The binomial pmf
/// has support only on integers; readings shifted by fractional n·p fall
/// outside it.
const INTEGRALITY_TOLERANCE: f64 = 1e-9;

/// Binomial-noise range sensor
#[derive(Debug, Clone, Copy)]
pub struct SensorModel {
    trials: u64,
    success_probability: f64,
    variance: f64,
}

impl SensorModel {
    /// Create a sensor model with the given noise variance (> 0).
    pub fn new(variance: f64) -> Result<Self, TrackerError> {
        if !variance.is_finite() || variance <= 0.0 {
            return Err(TrackerError::Configuration {
                description: format!("sensor variance must be positive, got {}", variance),
            });
        }
        let p = 0.5;
        let trials = (variance / (p * (1.0 - p))).round() as u64;
        Ok(Self {
            trials,
            success_probability: p,
            variance,
        })
    }

    /// Number of binomial trials n.
    #[inline]
    pub fn trials(&self) -> u64 {
        self.trials
    }

    /// Success probability p (fixed at 0.5).
    #[inline]
    pub fn success_probability(&self) -> f64 {
        self.success_probability
    }

    /// Configured noise variance.
    #[inline]
    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// Likelihood of `evidence` given the agent sits at a cell, for every
    /// cell: P(E = evidence | X = (x, y)). Blocked cells get 0. If no
    /// walkable cell can explain the evidence the surface is uniform over
    /// walkable cells instead of all-zero.
    pub fn likelihood(
        &self,
        grid: &Grid,
        observer: (usize, usize),
        evidence: f64,
    ) -> DMatrix<f64> {
        let shift = self.trials as f64 * self.success_probability;
        let mut surface = DMatrix::zeros(grid.width(), grid.height());
        let mut total = 0.0;

        for (x, y) in grid.open_cells() {
            let d = manhattan((x, y), observer) as f64;
            let k = evidence - d + shift;
            let p = binomial_pmf(self.trials, self.success_probability, k);
            surface[(x, y)] = p;
            total += p;
        }

        if total == 0.0 {
            log::debug!(
                "evidence {} impossible at every walkable cell, falling back to uniform surface",
                evidence
            );
            let uniform = 1.0 / grid.open_cell_count() as f64;
            for (x, y) in grid.open_cells() {
                surface[(x, y)] = uniform;
            }
        }

        surface
    }
}

/// Binomial pmf at a possibly non-integral success count. Non-integral or
/// out-of-range k has zero probability.
fn binomial_pmf(n: u64, p: f64, k: f64) -> f64 {
    let rounded = k.round();
    if (k - rounded).abs() > INTEGRALITY_TOLERANCE || rounded < 0.0 || rounded > n as f64 {
        return 0.0;
    }
    let k = rounded as u64;
    // Log space keeps large n away from factorial overflow.
    let log_pmf = ln_binomial_coefficient(n, k)
        + k as f64 * p.ln()
        + (n - k) as f64 * (1.0 - p).ln();
    log_pmf.exp()
}

/// ln C(n, k), computed as a running product to stay exact for small n and
/// stable for large n.
fn ln_binomial_coefficient(n: u64, k: u64) -> f64 {
    let k = k.min(n - k);
    let mut acc = 0.0;
    for i in 1..=k {
        acc += ((n - k + i) as f64).ln() - (i as f64).ln();
    }
    acc
}
