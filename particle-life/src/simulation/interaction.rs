//! Interaction rules between particle types
//!
//! Holds the type x type strength matrix together with the two scalars of
//! the force law (`max_distance`, `friction`). Rules are built once, may be
//! reshaped (randomized, overwritten) while still owned, and are only ever
//! borrowed immutably by a running engine.

use nalgebra::DMatrix;
use rand::Rng;
use tracing::debug;

use crate::error::{Result, SimError};

#[derive(Debug, Clone, PartialEq)]
pub struct InteractionRules {
    num_types: usize,
    max_distance: f64,     // interaction range, force is zero at and beyond it
    friction: f64,         // velocity damping per step, in [0, 1]
    matrix: DMatrix<f64>,  // (i, j): how strongly type i reacts to type j
}

impl InteractionRules {
    /// Build rules for `num_types` types with the default matrix
    /// (same type attracts, different types repel).
    ///
    /// # Errors
    /// [`SimError::InvalidParam`] if `num_types == 0`, `max_distance` is not
    /// a positive finite number, or `friction` lies outside `[0, 1]`.
    pub fn new(num_types: usize, max_distance: f64, friction: f64) -> Result<Self> {
        if num_types == 0 {
            return Err(SimError::InvalidParam("num_types must be > 0".into()));
        }
        if !max_distance.is_finite() || max_distance <= 0.0 {
            return Err(SimError::InvalidParam(format!(
                "max_distance must be finite and > 0, got {max_distance}"
            )));
        }
        if !(0.0..=1.0).contains(&friction) {
            return Err(SimError::InvalidParam(format!(
                "friction must lie in [0, 1], got {friction}"
            )));
        }

        let mut rules = Self {
            num_types,
            max_distance,
            friction,
            matrix: DMatrix::zeros(num_types, num_types),
        };
        rules.fill_default_matrix();
        Ok(rules)
    }

    /// Replace the whole matrix.
    ///
    /// # Errors
    /// [`SimError::ShapeMismatch`] unless the matrix is `num_types x num_types`,
    /// [`SimError::InvalidParam`] if any entry is not finite.
    pub fn with_matrix(mut self, matrix: DMatrix<f64>) -> Result<Self> {
        for (what, found) in [("matrix rows", matrix.nrows()), ("matrix columns", matrix.ncols())] {
            if found != self.num_types {
                return Err(SimError::ShapeMismatch {
                    what,
                    expected: self.num_types,
                    found,
                });
            }
        }
        if !matrix.iter().all(|s| s.is_finite()) {
            return Err(SimError::InvalidParam("matrix entries must be finite".into()));
        }
        self.matrix = matrix;
        Ok(self)
    }

    /// +1.0 on the diagonal, -1.0 everywhere else.
    pub fn fill_default_matrix(&mut self) {
        let n = self.num_types;
        self.matrix = DMatrix::from_fn(n, n, |i, j| if i == j { 1.0 } else { -1.0 });
    }

    /// Overwrite every entry with a uniform sample in [-1, 1).
    ///
    /// The caller owns the random source; seed it to get reproducible runs.
    pub fn randomize_matrix<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for s in self.matrix.iter_mut() {
            *s = rng.random_range(-1.0..1.0);
        }
        debug!(num_types = self.num_types, "randomized interaction matrix");
    }

    /// Overwrite a single strength.
    pub fn set_strength(&mut self, a: usize, b: usize, strength: f64) -> Result<()> {
        self.check_type(a)?;
        self.check_type(b)?;
        if !strength.is_finite() {
            return Err(SimError::InvalidParam(format!(
                "strength ({a}, {b}) must be finite, got {strength}"
            )));
        }
        self.matrix[(a, b)] = strength;
        Ok(())
    }

    /// Strength with which type `a` reacts to type `b`.
    ///
    /// # Panics
    /// If either index is `>= num_types`. Engines validate particle types
    /// up front, so this only fires on a broken caller.
    #[inline]
    pub fn strength(&self, a: usize, b: usize) -> f64 {
        self.matrix[(a, b)]
    }

    /// Linear falloff: full `strength` at distance 0, zero at `max_distance`.
    ///
    /// The boundary is inclusive, `distance == max_distance` gives exactly 0.
    /// The sign of the result is the sign of `strength`; the caller turns it
    /// into a direction.
    #[inline]
    pub fn calculate_force_magnitude(&self, strength: f64, distance: f64) -> f64 {
        debug_assert!(distance >= 0.0, "negative distance {distance}");
        if distance >= self.max_distance {
            return 0.0;
        }
        strength * (1.0 - distance / self.max_distance)
    }

    pub fn is_symmetric(&self) -> bool {
        self.matrix == self.matrix.transpose()
    }

    pub fn num_types(&self) -> usize {
        self.num_types
    }

    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    pub fn friction(&self) -> f64 {
        self.friction
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    fn check_type(&self, index: usize) -> Result<()> {
        if index >= self.num_types {
            return Err(SimError::TypeOutOfRange {
                index,
                num_types: self.num_types,
            });
        }
        Ok(())
    }
}
