//! Core state types for the particle-life simulation.
//!
//! `ParticleSet` keeps the per-particle arrays side by side (structure of
//! arrays). All four arrays share one index space and have the same length
//! for the whole lifetime of the set: particles are never added or removed.

use nalgebra::Vector2;
use serde::Serialize;

use crate::error::{Result, SimError};

pub type NVec2 = Vector2<f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSet {
    pub(crate) positions: Vec<NVec2>,     // x
    pub(crate) velocities: Vec<NVec2>,    // v, zero at construction
    pub(crate) accelerations: Vec<NVec2>, // a, zero at construction
    pub(crate) types: Vec<usize>,         // row/column into the interaction matrix
}

impl ParticleSet {
    /// Build a particle set from positions and type labels.
    ///
    /// Velocities and accelerations start at zero. Type indices are checked
    /// against the interaction rules later, when an engine borrows the set.
    ///
    /// # Errors
    /// - [`SimError::ShapeMismatch`] if `types` and `positions` differ in length.
    /// - [`SimError::InvalidParam`] if any position component is NaN or infinite.
    pub fn new(positions: Vec<NVec2>, types: Vec<usize>) -> Result<Self> {
        if types.len() != positions.len() {
            return Err(SimError::ShapeMismatch {
                what: "types",
                expected: positions.len(),
                found: types.len(),
            });
        }
        ensure_finite("position", &positions)?;

        let n = positions.len();
        Ok(Self {
            positions,
            velocities: vec![NVec2::zeros(); n],
            accelerations: vec![NVec2::zeros(); n],
            types,
        })
    }

    /// Replace the initial velocities (all zero by default).
    pub fn with_velocities(mut self, velocities: Vec<NVec2>) -> Result<Self> {
        if velocities.len() != self.len() {
            return Err(SimError::ShapeMismatch {
                what: "velocities",
                expected: self.len(),
                found: velocities.len(),
            });
        }
        ensure_finite("velocity", &velocities)?;
        self.velocities = velocities;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[NVec2] {
        &self.positions
    }

    pub fn velocities(&self) -> &[NVec2] {
        &self.velocities
    }

    pub fn accelerations(&self) -> &[NVec2] {
        &self.accelerations
    }

    pub fn types(&self) -> &[usize] {
        &self.types
    }

    /// Check that every type label addresses a row of a `num_types` matrix.
    pub fn validate_types(&self, num_types: usize) -> Result<()> {
        match self.types.iter().find(|&&t| t >= num_types) {
            Some(&index) => Err(SimError::TypeOutOfRange { index, num_types }),
            None => Ok(()),
        }
    }

    /// Total kinetic energy, 1/2 |v|^2 summed over particles (unit mass).
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.velocities.iter().map(|v| v.norm_squared()).sum::<f64>()
    }

    /// Total momentum (unit mass).
    pub fn momentum(&self) -> NVec2 {
        self.velocities.iter().fold(NVec2::zeros(), |acc, v| acc + v)
    }

    pub fn max_speed(&self) -> f64 {
        self.velocities.iter().map(|v| v.norm()).fold(0.0, f64::max)
    }

    /// Plain-array copy of the state for serialization.
    pub fn snapshot(&self) -> ParticleSnapshot {
        ParticleSnapshot {
            positions: self.positions.iter().map(|x| [x.x, x.y]).collect(),
            velocities: self.velocities.iter().map(|v| [v.x, v.y]).collect(),
            types: self.types.clone(),
        }
    }
}

/// Serializable view of a [`ParticleSet`], written by the runner's `--output`
#[derive(Debug, Clone, Serialize)]
pub struct ParticleSnapshot {
    pub positions: Vec<[f64; 2]>,
    pub velocities: Vec<[f64; 2]>,
    pub types: Vec<usize>,
}

fn ensure_finite(what: &str, vs: &[NVec2]) -> Result<()> {
    match vs.iter().position(|v| !v.iter().all(|c| c.is_finite())) {
        Some(i) => Err(SimError::InvalidParam(format!(
            "{what} of particle {i} must be finite"
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_zeroes_velocities_and_accelerations() {
        let set = ParticleSet::new(
            vec![NVec2::new(1.0, 2.0), NVec2::new(-3.0, 0.5)],
            vec![0, 1],
        )
        .unwrap();

        assert_eq!(set.len(), 2);
        assert!(set.velocities().iter().all(|v| *v == NVec2::zeros()));
        assert!(set.accelerations().iter().all(|a| *a == NVec2::zeros()));
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let err = ParticleSet::new(vec![NVec2::zeros(); 3], vec![0, 0]).unwrap_err();
        assert!(matches!(
            err,
            SimError::ShapeMismatch { expected: 3, found: 2, .. }
        ));

        let set = ParticleSet::new(vec![NVec2::zeros(); 2], vec![0, 0]).unwrap();
        assert!(set.with_velocities(vec![NVec2::zeros()]).is_err());
    }

    #[test]
    fn non_finite_position_is_rejected() {
        let err = ParticleSet::new(vec![NVec2::new(f64::NAN, 0.0)], vec![0]).unwrap_err();
        assert!(matches!(err, SimError::InvalidParam(_)));
    }

    #[test]
    fn validate_types_reports_first_bad_index() {
        let set = ParticleSet::new(vec![NVec2::zeros(); 3], vec![0, 5, 7]).unwrap();
        assert!(set.validate_types(8).is_ok());
        assert!(matches!(
            set.validate_types(3),
            Err(SimError::TypeOutOfRange { index: 5, num_types: 3 })
        ));
    }

    #[test]
    fn diagnostics_use_unit_mass() {
        let set = ParticleSet::new(vec![NVec2::zeros(); 2], vec![0, 0])
            .unwrap()
            .with_velocities(vec![NVec2::new(3.0, 4.0), NVec2::new(-1.0, 0.0)])
            .unwrap();

        assert!((set.kinetic_energy() - 13.0).abs() < 1e-12);
        assert_eq!(set.momentum(), NVec2::new(2.0, 4.0));
        assert!((set.max_speed() - 5.0).abs() < 1e-12);
    }
}
