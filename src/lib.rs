/*!
# Grid HMM tracker

Discrete Bayes/HMM forward filter for tracking hidden, moving agents on a
grid from noisy range readings. Each tick the filter predicts every agent's
belief through an avoidance-weighted motion model, multiplies in a
shifted-binomial range likelihood, and renormalizes, recovering to a uniform
belief when a measurement is impossible under the model.

## Modules

- [`grid`] - Static walkable/blocked map and Manhattan distance
- [`belief`] - Per-agent probability matrices over grid cells
- [`sensor`] - Binomial-noise range observation model
- [`transition`] - Behavior policies and the one-step motion model
- [`filter`] - The recursive belief-update filter
- [`evidence`] - Noisy reading generation for simulation
- [`metrics`] - Entropy and localization quality of beliefs

## Example

```rust,no_run
use grid_hmm_tracker_rs::{BehaviorPolicy, BeliefFilter, EvidenceModel, Grid, SensorModel};
use rand::SeedableRng;

let grid = Grid::open(16, 9).unwrap();
let sensor = SensorModel::new(1.0).unwrap();
let evidence = EvidenceModel::from_sensor(&sensor).unwrap();
let mut filter =
    BeliefFilter::uniform(grid, sensor, BehaviorPolicy::Afraid, 2).unwrap();

let mut rng = rand::rngs::StdRng::seed_from_u64(42);
let observer = (8, 4);
let true_positions = [(2, 2), (13, 7)];
let readings = evidence.sample_all(&mut rng, observer, &true_positions);
let beliefs = filter.step(&readings, observer, &[false, false]).unwrap();
let target = beliefs[0].argmax();
```
*/

pub mod belief;
pub mod errors;
pub mod evidence;
pub mod filter;
pub mod grid;
pub mod metrics;
pub mod sensor;
pub mod transition;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use belief::BeliefMatrix;
pub use errors::TrackerError;
pub use evidence::EvidenceModel;
pub use filter::{BeliefFilter, TrackerConfigSnapshot, DEFAULT_DEGENERACY_EPSILON};
pub use grid::{manhattan, Grid};
pub use metrics::{entropy_bits, evaluate, evaluate_all, BeliefQuality};
pub use sensor::SensorModel;
pub use transition::{BehaviorPolicy, TransitionModel};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
