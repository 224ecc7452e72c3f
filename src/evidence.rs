//! Noisy range evidence generation
//!
//! Produces the readings the filter consumes: true Manhattan distance plus a
//! zero-mean shifted binomial draw, sharing (n, p) with [`SensorModel`] so
//! generated evidence is always explainable by the sensor model (up to
//! support truncation at distance 0 near the observer).

use rand::Rng;
use rand_distr::Binomial;

use crate::errors::TrackerError;
use crate::grid::manhattan;
use crate::sensor::SensorModel;

/// Shifted-binomial noise source for distance readings
#[derive(Debug, Clone, Copy)]
pub struct EvidenceModel {
    trials: u64,
    success_probability: f64,
    noise: Binomial,
}

impl EvidenceModel {
    /// Create an evidence model with the given noise variance (> 0), using
    /// the same (n, p) derivation as [`SensorModel::new`].
    pub fn new(variance: f64) -> Result<Self, TrackerError> {
        Self::from_sensor(&SensorModel::new(variance)?)
    }

    /// Create an evidence model matching an existing sensor model.
    pub fn from_sensor(sensor: &SensorModel) -> Result<Self, TrackerError> {
        let trials = sensor.trials();
        let p = sensor.success_probability();
        let noise = Binomial::new(trials, p).map_err(|e| TrackerError::Configuration {
            description: format!("invalid binomial noise parameters: {}", e),
        })?;
        Ok(Self {
            trials,
            success_probability: p,
            noise,
        })
    }

    /// One noisy distance reading for an agent at `agent` seen from
    /// `observer`.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        observer: (usize, usize),
        agent: (usize, usize),
    ) -> f64 {
        let true_distance = manhattan(agent, observer) as f64;
        let shift = self.trials as f64 * self.success_probability;
        let draw = rng.sample(self.noise) as f64;
        true_distance + draw - shift
    }

    /// One reading per tracked agent.
    pub fn sample_all<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        observer: (usize, usize),
        agents: &[(usize, usize)],
    ) -> Vec<f64> {
        agents
            .iter()
            .map(|&agent| self.sample(rng, observer, agent))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_zero_trials_is_exact() {
        // variance 0.01 rounds to n = 0: readings equal the true distance.
        let model = EvidenceModel::new(0.01).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            let e = model.sample(&mut rng, (0, 0), (2, 3));
            assert_eq!(e, 5.0);
        }
    }

    #[test]
    fn test_noise_is_zero_mean_and_bounded() {
        let model = EvidenceModel::new(1.0).unwrap(); // n = 4, shift = 2
        let mut rng = StdRng::seed_from_u64(42);
        let true_distance = 6.0;
        let mut acc = 0.0;
        let samples = 20_000;
        for _ in 0..samples {
            let e = model.sample(&mut rng, (0, 0), (6, 0));
            // Noise support is [-2, 2] for n = 4.
            assert!(e >= true_distance - 2.0 && e <= true_distance + 2.0);
            acc += e;
        }
        let mean = acc / samples as f64;
        assert!((mean - true_distance).abs() < 0.05);
    }

    #[test]
    fn test_sample_all_matches_agent_count() {
        let model = EvidenceModel::new(1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let readings = model.sample_all(&mut rng, (0, 0), &[(1, 1), (2, 2), (3, 0)]);
        assert_eq!(readings.len(), 3);
    }
}
