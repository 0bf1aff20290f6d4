//! Numerical parameters for a run
//!
//! `Parameters` holds runtime settings:
//! - integration step size and number of steps,
//! - interaction range and friction (handed to `InteractionRules`),
//! - seed for random matrices and random placement

#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub dt: f64,           // time step
    pub max_distance: f64, // interaction range
    pub friction: f64,     // velocity damping per step
    pub steps: u64,        // number of steps to run
    pub seed: u64,         // deterministic seed
}
