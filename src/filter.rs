//! Discrete Bayes forward filter over per-agent beliefs
//!
//! [`BeliefFilter`] owns the grid, the sensor and behavior models, and one
//! belief matrix per tracked agent. Each call to [`step`](BeliefFilter::step)
//! advances exactly one tick: the transition model is rebuilt once from the
//! observer's current position and shared across agents, then every live
//! agent's belief is predicted, multiplied by the sensor likelihood surface
//! for its reading, and normalized. Elimination is one-way: once an agent is
//! flagged its belief is pinned at the all-zero matrix.

use serde::Serialize;

use crate::belief::BeliefMatrix;
use crate::errors::TrackerError;
use crate::grid::Grid;
use crate::sensor::SensorModel;
use crate::transition::{BehaviorPolicy, TransitionModel};

/// Default threshold below which a post-update mass sum is treated as
/// degenerate and the belief is reset to uniform. Tunable per filter via
/// [`BeliefFilter::with_epsilon`].
pub const DEFAULT_DEGENERACY_EPSILON: f64 = 1e-9;

/// Recursive belief-update filter for a fixed set of tracked agents
#[derive(Debug, Clone)]
pub struct BeliefFilter {
    grid: Grid,
    sensor: SensorModel,
    policy: BehaviorPolicy,
    epsilon: f64,
    beliefs: Vec<BeliefMatrix>,
    eliminated: Vec<bool>,
    tick: usize,
}

impl BeliefFilter {
    /// Create a filter from externally supplied prior beliefs, one per
    /// tracked agent.
    pub fn new(
        grid: Grid,
        sensor: SensorModel,
        policy: BehaviorPolicy,
        priors: Vec<BeliefMatrix>,
    ) -> Result<Self, TrackerError> {
        if priors.is_empty() {
            return Err(TrackerError::Configuration {
                description: "at least one tracked agent is required".to_string(),
            });
        }
        for (i, prior) in priors.iter().enumerate() {
            let matrix = prior.as_matrix();
            if matrix.nrows() != grid.width() || matrix.ncols() != grid.height() {
                return Err(TrackerError::InvalidInput {
                    expected: grid.width() * grid.height(),
                    actual: matrix.nrows() * matrix.ncols(),
                    context: format!("prior belief {} shape", i),
                });
            }
        }
        let eliminated = vec![false; priors.len()];
        Ok(Self {
            grid,
            sensor,
            policy,
            epsilon: DEFAULT_DEGENERACY_EPSILON,
            beliefs: priors,
            eliminated,
            tick: 0,
        })
    }

    /// Create a filter with uniform priors for `num_agents` tracked agents.
    pub fn uniform(
        grid: Grid,
        sensor: SensorModel,
        policy: BehaviorPolicy,
        num_agents: usize,
    ) -> Result<Self, TrackerError> {
        let priors = (0..num_agents)
            .map(|_| BeliefMatrix::uniform(&grid))
            .collect();
        Self::new(grid, sensor, policy, priors)
    }

    /// Override the degenerate-normalization threshold.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Advance one tick. `evidences` holds one noisy distance reading per
    /// tracked agent and `eliminated` the external elimination flags; both
    /// must match the tracked-agent count. Returns the updated beliefs.
    pub fn step(
        &mut self,
        evidences: &[f64],
        observer: (usize, usize),
        eliminated: &[bool],
    ) -> Result<&[BeliefMatrix], TrackerError> {
        if evidences.len() != self.beliefs.len() {
            return Err(TrackerError::InvalidInput {
                expected: self.beliefs.len(),
                actual: evidences.len(),
                context: "evidence count".to_string(),
            });
        }
        if eliminated.len() != self.beliefs.len() {
            return Err(TrackerError::InvalidInput {
                expected: self.beliefs.len(),
                actual: eliminated.len(),
                context: "eliminated flags".to_string(),
            });
        }

        // Shared across agents: one policy, one observer reference point.
        let transitions = TransitionModel::compute(&self.grid, observer, self.policy);

        for (i, belief) in self.beliefs.iter_mut().enumerate() {
            if eliminated[i] || self.eliminated[i] {
                if !self.eliminated[i] {
                    log::debug!("agent {} eliminated at tick {}", i, self.tick);
                }
                self.eliminated[i] = true;
                *belief = BeliefMatrix::zeroed(&self.grid);
                continue;
            }

            let predicted = transitions.predict(belief.as_matrix());
            let surface = self.sensor.likelihood(&self.grid, observer, evidences[i]);
            *belief = BeliefMatrix {
                probs: predicted.component_mul(&surface),
            };
            if belief.normalize_or_reset(&self.grid, self.epsilon) {
                log::warn!(
                    "agent {} belief degenerate at tick {} (evidence {}), reset to uniform",
                    i,
                    self.tick,
                    evidences[i]
                );
            }
        }

        self.tick += 1;
        log::trace!("tick {} complete for {} agents", self.tick, self.beliefs.len());
        Ok(&self.beliefs)
    }

    /// Current belief matrices.
    #[inline]
    pub fn beliefs(&self) -> &[BeliefMatrix] {
        &self.beliefs
    }

    /// Number of tracked agents.
    #[inline]
    pub fn num_agents(&self) -> usize {
        self.beliefs.len()
    }

    /// Whether agent `i` has been eliminated.
    #[inline]
    pub fn is_eliminated(&self, i: usize) -> bool {
        self.eliminated[i]
    }

    /// Number of completed ticks.
    #[inline]
    pub fn tick(&self) -> usize {
        self.tick
    }

    /// The grid this filter tracks over.
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The configured behavior policy.
    #[inline]
    pub fn policy(&self) -> BehaviorPolicy {
        self.policy
    }

    /// Snapshot of the filter configuration for debugging and comparison.
    pub fn config_snapshot(&self) -> TrackerConfigSnapshot {
        TrackerConfigSnapshot {
            grid_width: self.grid.width(),
            grid_height: self.grid.height(),
            open_cells: self.grid.open_cell_count(),
            behavior_policy: self.policy,
            avoidance_strength: self.policy.avoidance_strength(),
            sensor_variance: self.sensor.variance(),
            sensor_trials: self.sensor.trials(),
            sensor_success_probability: self.sensor.success_probability(),
            degeneracy_epsilon: self.epsilon,
            num_agents: self.beliefs.len(),
        }
    }
}

/// Serializable snapshot of a filter's configuration
#[derive(Debug, Clone, Serialize)]
pub struct TrackerConfigSnapshot {
    /// Grid width
    pub grid_width: usize,
    /// Grid height
    pub grid_height: usize,
    /// Number of walkable cells
    pub open_cells: usize,
    /// Configured behavior policy
    pub behavior_policy: BehaviorPolicy,
    /// Avoidance strength derived from the policy
    pub avoidance_strength: f64,
    /// Sensor noise variance
    pub sensor_variance: f64,
    /// Binomial trial count n
    pub sensor_trials: u64,
    /// Binomial success probability p
    pub sensor_success_probability: f64,
    /// Degenerate-normalization threshold
    pub degeneracy_epsilon: f64,
    /// Number of tracked agents
    pub num_agents: usize,
}

impl TrackerConfigSnapshot {
    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_filter(policy: BehaviorPolicy) -> BeliefFilter {
        let grid = Grid::open(3, 3).unwrap();
        let sensor = SensorModel::new(1.0).unwrap();
        BeliefFilter::uniform(grid, sensor, policy, 2).unwrap()
    }

    #[test]
    fn test_no_agents_rejected() {
        let grid = Grid::open(3, 3).unwrap();
        let sensor = SensorModel::new(1.0).unwrap();
        assert!(BeliefFilter::uniform(grid, sensor, BehaviorPolicy::Confused, 0).is_err());
    }

    #[test]
    fn test_prior_shape_mismatch_rejected() {
        let grid = Grid::open(3, 3).unwrap();
        let other = Grid::open(4, 4).unwrap();
        let sensor = SensorModel::new(1.0).unwrap();
        let bad_prior = BeliefMatrix::uniform(&other);
        assert!(
            BeliefFilter::new(grid, sensor, BehaviorPolicy::Confused, vec![bad_prior]).is_err()
        );
    }

    #[test]
    fn test_step_length_mismatches_rejected() {
        let mut filter = small_filter(BehaviorPolicy::Confused);
        assert!(filter.step(&[1.0], (1, 1), &[false, false]).is_err());
        assert!(filter.step(&[1.0, 2.0], (1, 1), &[false]).is_err());
    }

    #[test]
    fn test_step_keeps_beliefs_normalized() {
        let mut filter = small_filter(BehaviorPolicy::Afraid);
        for _ in 0..5 {
            filter.step(&[1.0, 2.0], (1, 1), &[false, false]).unwrap();
            for belief in filter.beliefs() {
                assert!((belief.sum() - 1.0).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_elimination_is_terminal() {
        let mut filter = small_filter(BehaviorPolicy::Confused);
        filter.step(&[1.0, 1.0], (1, 1), &[false, true]).unwrap();
        assert!(filter.beliefs()[1].is_zero());
        assert!(filter.is_eliminated(1));

        // A later false flag must not resurrect the agent.
        filter.step(&[1.0, 1.0], (1, 1), &[false, false]).unwrap();
        assert!(filter.beliefs()[1].is_zero());
        // The live agent is unaffected.
        assert!((filter.beliefs()[0].sum() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_raised_epsilon_forces_uniform_reset() {
        // With epsilon above any attainable mass sum, every update degrades
        // to the uniform recovery path.
        let mut filter = small_filter(BehaviorPolicy::Confused).with_epsilon(2.0);
        filter.step(&[1.0, 1.0], (1, 1), &[false, false]).unwrap();
        let uniform = 1.0 / 9.0;
        for belief in filter.beliefs() {
            for (x, y) in [(0usize, 0usize), (1, 1), (2, 2)] {
                assert!((belief.get(x, y) - uniform).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_impossible_evidence_never_produces_nan() {
        let mut filter = small_filter(BehaviorPolicy::Scared);
        filter.step(&[1e9, -1e9], (1, 1), &[false, false]).unwrap();
        for belief in filter.beliefs() {
            assert!(belief.as_matrix().iter().all(|p| p.is_finite()));
            assert!((belief.sum() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_config_snapshot_serializes() {
        let filter = small_filter(BehaviorPolicy::Scared);
        let json = filter.config_snapshot().to_json_pretty();
        assert!(json.contains("\"behavior_policy\": \"scared\""));
        assert!(json.contains("\"sensor_trials\": 4"));
    }
}
