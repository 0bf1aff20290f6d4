//! Error types for the simulation core
//!
//! Every precondition the engine relies on is checked when the rules,
//! particle set or engine are built, so the per-step operations never fail

use thiserror::Error;

/// Crate-wide result type alias
pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Debug, Error)]
pub enum SimError {
    /// Parameter outside its allowed range (max distance, friction, dt, ...)
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// Arrays or matrices whose lengths do not line up
    #[error("shape mismatch: {what} has length {found}, expected {expected}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// Type index that does not address a row of the interaction matrix
    #[error("type index {index} out of range for {num_types} types")]
    TypeOutOfRange { index: usize, num_types: usize },

    /// Scenario file that parsed but describes an unusable setup
    #[error("scenario config: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_mismatch_names_the_array() {
        let e = SimError::ShapeMismatch {
            what: "types",
            expected: 3,
            found: 2,
        };
        let msg = format!("{e}");
        assert!(msg.contains("types"));
        assert!(msg.contains("expected 3"));
    }

    #[test]
    fn type_out_of_range_is_informative() {
        let e = SimError::TypeOutOfRange {
            index: 4,
            num_types: 3,
        };
        assert_eq!(format!("{e}"), "type index 4 out of range for 3 types");
    }
}
