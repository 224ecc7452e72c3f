//! Error types for tracker construction and stepping
//!
//! Degenerate measurements are not represented here: a sensor reading that is
//! impossible under the model is recovered in-band (uniform reset), and a cell
//! with no legal moves becomes a self-loop. Only misconfiguration and
//! malformed inputs surface as errors.

use std::fmt;

/// Errors that can occur while building or stepping a tracker
#[derive(Debug, Clone)]
pub enum TrackerError {
    /// Invalid configuration (unknown policy, non-positive variance, empty grid)
    Configuration {
        /// Description of the configuration issue
        description: String,
    },

    /// Input length or shape does not match the tracked state
    InvalidInput {
        /// What was expected
        expected: usize,
        /// What was received
        actual: usize,
        /// Context (e.g., "evidence count", "eliminated flags")
        context: String,
    },
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerError::Configuration { description } => {
                write!(f, "Configuration error: {}", description)
            }
            TrackerError::InvalidInput {
                expected,
                actual,
                context,
            } => {
                write!(
                    f,
                    "Invalid input for {}: expected {}, got {}",
                    context, expected, actual
                )
            }
        }
    }
}

impl std::error::Error for TrackerError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_display() {
        let err = TrackerError::Configuration {
            description: "unknown behavior policy 'angry'".to_string(),
        };
        assert!(err.to_string().contains("angry"));
    }

    #[test]
    fn test_invalid_input_display() {
        let err = TrackerError::InvalidInput {
            expected: 3,
            actual: 2,
            context: "evidence count".to_string(),
        };
        assert!(err.to_string().contains("3"));
        assert!(err.to_string().contains("2"));
        assert!(err.to_string().contains("evidence count"));
    }
}
