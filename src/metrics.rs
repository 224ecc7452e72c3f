//! Belief quality metrics
//!
//! Read-only evaluation of the filter's output against ground truth:
//! Shannon entropy of a belief (spread), Manhattan distance from the most
//! likely cell to the true position (localization error), and the mass
//! assigned to the true cell. Eliminated agents (all-zero beliefs) are
//! skipped.

use crate::belief::BeliefMatrix;
use crate::grid::manhattan;

/// Quality of one agent's belief against its true position
#[derive(Debug, Clone, PartialEq)]
pub struct BeliefQuality {
    /// Shannon entropy in bits; lower means more concentrated
    pub entropy_bits: f64,
    /// Manhattan distance from the argmax cell to the true position
    pub localization_error: usize,
    /// Probability mass at the true cell
    pub prob_at_true: f64,
}

/// Shannon entropy of a belief in bits. Zero-probability cells contribute
/// nothing; the all-zero belief has entropy 0.
pub fn entropy_bits(belief: &BeliefMatrix) -> f64 {
    belief
        .as_matrix()
        .iter()
        .filter(|&&p| p > 0.0)
        .map(|&p| -p * p.log2())
        .sum()
}

/// Evaluate one belief against the agent's true position. Returns `None` for
/// an eliminated (all-zero) belief.
pub fn evaluate(belief: &BeliefMatrix, true_position: (usize, usize)) -> Option<BeliefQuality> {
    let peak = belief.argmax()?;
    Some(BeliefQuality {
        entropy_bits: entropy_bits(belief),
        localization_error: manhattan(peak, true_position),
        prob_at_true: belief.get(true_position.0, true_position.1),
    })
}

/// Evaluate a full belief list against true positions, skipping eliminated
/// agents.
pub fn evaluate_all(
    beliefs: &[BeliefMatrix],
    true_positions: &[(usize, usize)],
) -> Vec<Option<BeliefQuality>> {
    beliefs
        .iter()
        .zip(true_positions.iter())
        .map(|(belief, &pos)| evaluate(belief, pos))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    #[test]
    fn test_entropy_of_uniform() {
        let grid = Grid::open(4, 4).unwrap();
        let belief = BeliefMatrix::uniform(&grid);
        // 16 equal cells: log2(16) = 4 bits.
        assert!((entropy_bits(&belief) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_entropy_of_point_mass_is_zero() {
        let grid = Grid::open(4, 4).unwrap();
        let belief = BeliefMatrix::from_fn(&grid, |x, y| {
            if (x, y) == (2, 2) {
                1.0
            } else {
                0.0
            }
        })
        .unwrap();
        assert_eq!(entropy_bits(&belief), 0.0);
    }

    #[test]
    fn test_evaluate_localization() {
        let grid = Grid::open(5, 5).unwrap();
        let belief = BeliefMatrix::from_fn(&grid, |x, y| {
            if (x, y) == (1, 1) {
                10.0
            } else {
                1.0
            }
        })
        .unwrap();
        let quality = evaluate(&belief, (3, 2)).unwrap();
        assert_eq!(quality.localization_error, 3);
        assert!(quality.prob_at_true > 0.0);
    }

    #[test]
    fn test_evaluate_skips_eliminated() {
        let grid = Grid::open(3, 3).unwrap();
        let live = BeliefMatrix::uniform(&grid);
        let dead = BeliefMatrix::zeroed(&grid);
        let results = evaluate_all(&[live, dead], &[(0, 0), (1, 1)]);
        assert!(results[0].is_some());
        assert!(results[1].is_none());
    }
}
