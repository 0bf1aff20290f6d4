//! Step-by-step driver for a particle-life run
//!
//! `SimulationEngine` borrows the interaction rules immutably and the
//! particle set mutably for the length of a run, so nothing else can touch
//! either while steps are taken. A step is a fixed pipeline:
//! distances -> forces -> accelerations -> velocities -> positions.
//! Each phase is also exposed on its own for testing.

use nalgebra::DMatrix;
use tracing::{debug, trace};

use crate::error::{Result, SimError};
use crate::simulation::forces::{accumulate_forces, pairwise_distances};
use crate::simulation::integrator::{euler_positions, euler_velocities};
use crate::simulation::interaction::InteractionRules;
use crate::simulation::states::{NVec2, ParticleSet};

pub struct SimulationEngine<'a> {
    dt: f64,
    rules: &'a InteractionRules,
    particles: &'a mut ParticleSet,
    t: f64,           // elapsed simulation time
    steps_taken: u64, // completed full steps
}

/// Summary of the particle state after a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    pub step: u64,
    pub time: f64,
    pub kinetic_energy: f64,
    pub momentum: NVec2,
    pub max_speed: f64,
}

impl<'a> SimulationEngine<'a> {
    /// Bind a timestep, rules and particles into an engine.
    ///
    /// # Errors
    /// - [`SimError::InvalidParam`] if `dt` is not positive and finite.
    /// - [`SimError::TypeOutOfRange`] if a particle's type has no row in the matrix.
    pub fn new(
        dt: f64,
        rules: &'a InteractionRules,
        particles: &'a mut ParticleSet,
    ) -> Result<Self> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SimError::InvalidParam(format!("dt must be finite and > 0, got {dt}")));
        }
        particles.validate_types(rules.num_types())?;

        debug!(
            particles = particles.len(),
            num_types = rules.num_types(),
            dt,
            max_distance = rules.max_distance(),
            friction = rules.friction(),
            "engine ready"
        );

        Ok(Self {
            dt,
            rules,
            particles,
            t: 0.0,
            steps_taken: 0,
        })
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn rules(&self) -> &InteractionRules {
        self.rules
    }

    pub fn particles(&self) -> &ParticleSet {
        &*self.particles
    }

    pub fn time(&self) -> f64 {
        self.t
    }

    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// N x N Euclidean distances between current positions.
    pub fn compute_distances(&self) -> DMatrix<f64> {
        pairwise_distances(&self.particles.positions)
    }

    /// Net force on every particle from the current positions.
    pub fn compute_total_forces(&self) -> Vec<NVec2> {
        let distances = self.compute_distances();
        let mut forces = vec![NVec2::zeros(); self.particles.len()];
        accumulate_forces(self.rules, &*self.particles, &distances, &mut forces);
        forces
    }

    /// a <- F (unit mass)
    pub fn update_accelerations(&mut self) {
        self.particles.accelerations = self.compute_total_forces();
    }

    /// v <- (v + a dt) (1 - friction)
    pub fn update_velocities(&mut self) {
        let p = &mut *self.particles;
        euler_velocities(&mut p.velocities, &p.accelerations, self.dt, self.rules.friction());
    }

    /// x <- x + v dt
    pub fn update_positions(&mut self) {
        let p = &mut *self.particles;
        euler_positions(&mut p.positions, &p.velocities, self.dt);
    }

    /// One full step: accelerations, then velocities, then positions.
    pub fn step(&mut self) {
        self.update_accelerations();
        self.update_velocities();
        self.update_positions();

        self.t += self.dt;
        self.steps_taken += 1;
        trace!(step = self.steps_taken, t = self.t, "step done");
    }

    /// Take `steps` full steps and report the final state.
    pub fn run(&mut self, steps: u64) -> StepReport {
        for _ in 0..steps {
            self.step();
        }
        let report = self.report();
        debug!(
            steps,
            t = report.time,
            kinetic_energy = report.kinetic_energy,
            "run finished"
        );
        report
    }

    pub fn report(&self) -> StepReport {
        StepReport {
            step: self.steps_taken,
            time: self.t,
            kinetic_energy: self.particles.kinetic_energy(),
            momentum: self.particles.momentum(),
            max_speed: self.particles.max_speed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(dx: f64) -> ParticleSet {
        ParticleSet::new(vec![NVec2::zeros(), NVec2::new(dx, 0.0)], vec![0, 0]).unwrap()
    }

    #[test]
    fn rejects_bad_timestep() {
        let rules = InteractionRules::new(1, 1.0, 0.0).unwrap();
        let mut p = pair(0.5);
        assert!(SimulationEngine::new(0.0, &rules, &mut p).is_err());
        assert!(SimulationEngine::new(-0.1, &rules, &mut p).is_err());
        assert!(SimulationEngine::new(f64::NAN, &rules, &mut p).is_err());
    }

    #[test]
    fn rejects_types_outside_matrix() {
        let rules = InteractionRules::new(2, 1.0, 0.0).unwrap();
        let mut p = ParticleSet::new(vec![NVec2::zeros(); 2], vec![0, 2]).unwrap();
        let err = SimulationEngine::new(0.1, &rules, &mut p).err().unwrap();
        assert!(matches!(err, SimError::TypeOutOfRange { index: 2, num_types: 2 }));
    }

    #[test]
    fn step_advances_clock() {
        let rules = InteractionRules::new(1, 1.0, 0.1).unwrap();
        let mut p = pair(0.5);
        let mut engine = SimulationEngine::new(0.25, &rules, &mut p).unwrap();

        let report = engine.run(4);
        assert_eq!(report.step, 4);
        assert_eq!(engine.steps_taken(), 4);
        assert!((engine.time() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_set_steps_without_work() {
        let rules = InteractionRules::new(3, 1.0, 0.1).unwrap();
        let mut p = ParticleSet::new(Vec::new(), Vec::new()).unwrap();
        let mut engine = SimulationEngine::new(0.1, &rules, &mut p).unwrap();

        assert_eq!(engine.compute_distances().shape(), (0, 0));
        assert!(engine.compute_total_forces().is_empty());
        let report = engine.run(3);
        assert_eq!(report.kinetic_energy, 0.0);
    }

    #[test]
    fn single_particle_feels_no_force() {
        let rules = InteractionRules::new(1, 1.0, 0.0).unwrap();
        let mut p = ParticleSet::new(vec![NVec2::new(3.0, 3.0)], vec![0]).unwrap();
        let mut engine = SimulationEngine::new(0.1, &rules, &mut p).unwrap();
        engine.step();
        assert_eq!(engine.particles().positions()[0], NVec2::new(3.0, 3.0));
    }
}
