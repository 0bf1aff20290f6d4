//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a runtime bundle
//! containing:
//! - numerical parameters (`Parameters`)
//! - interaction rules (`InteractionRules`)
//! - particle state (`ParticleSet`, velocities zero unless given)
//!
//! All randomness (random matrices, random placement) is drawn from one
//! `StdRng` seeded with `parameters.seed`, matrix first, then particles.

use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::configuration::config::{
    MatrixInit, ParticleConfig, ParticlesConfig, RandomPlacementConfig, RulesConfig, ScenarioConfig,
};
use crate::error::{Result, SimError};
use crate::simulation::engine::SimulationEngine;
use crate::simulation::interaction::InteractionRules;
use crate::simulation::params::Parameters;
use crate::simulation::states::{NVec2, ParticleSet};

/// Runtime bundle built from a [`ScenarioConfig`]
#[derive(Debug, Clone)]
pub struct Scenario {
    pub parameters: Parameters,
    pub rules: InteractionRules,
    pub particles: ParticleSet,
}

impl Scenario {
    pub fn build(cfg: ScenarioConfig) -> Result<Self> {
        // Parameters (runtime) from ParametersConfig
        let p_cfg = cfg.parameters;
        let parameters = Parameters {
            dt: p_cfg.dt,
            max_distance: p_cfg.max_distance,
            friction: p_cfg.friction,
            steps: p_cfg.steps,
            seed: p_cfg.seed,
        };

        let mut rng = StdRng::seed_from_u64(parameters.seed);

        let rules = build_rules(&cfg.rules, &parameters, &mut rng)?;
        let particles = build_particles(&cfg.particles, rules.num_types(), &mut rng)?;
        particles.validate_types(rules.num_types())?;

        debug!(
            particles = particles.len(),
            num_types = rules.num_types(),
            matrix = ?cfg.rules.matrix,
            seed = parameters.seed,
            "scenario built"
        );

        Ok(Self {
            parameters,
            rules,
            particles,
        })
    }

    /// Engine over this scenario's rules and particles.
    pub fn engine(&mut self) -> Result<SimulationEngine<'_>> {
        SimulationEngine::new(self.parameters.dt, &self.rules, &mut self.particles)
    }
}

fn build_rules(
    cfg: &RulesConfig,
    parameters: &Parameters,
    rng: &mut StdRng,
) -> Result<InteractionRules> {
    let mut rules =
        InteractionRules::new(cfg.num_types, parameters.max_distance, parameters.friction)?;

    match cfg.matrix {
        MatrixInit::Default => {}
        MatrixInit::Random => rules.randomize_matrix(rng),
        MatrixInit::Explicit => {
            let rows = cfg
                .rows
                .as_ref()
                .ok_or_else(|| SimError::Config("matrix \"explicit\" needs `rows`".into()))?;
            rules = rules.with_matrix(matrix_from_rows(rows, cfg.num_types)?)?;
        }
    }
    Ok(rules)
}

fn matrix_from_rows(rows: &[Vec<f64>], n: usize) -> Result<DMatrix<f64>> {
    if rows.len() != n {
        return Err(SimError::ShapeMismatch {
            what: "matrix rows",
            expected: n,
            found: rows.len(),
        });
    }
    if let Some(row) = rows.iter().find(|r| r.len() != n) {
        return Err(SimError::ShapeMismatch {
            what: "matrix row",
            expected: n,
            found: row.len(),
        });
    }
    Ok(DMatrix::from_fn(n, n, |i, j| rows[i][j]))
}

fn build_particles(
    cfg: &ParticlesConfig,
    num_types: usize,
    rng: &mut StdRng,
) -> Result<ParticleSet> {
    match (&cfg.explicit, &cfg.random) {
        (Some(list), None) => explicit_particles(list),
        (None, Some(placement)) => random_particles(placement, num_types, rng),
        _ => Err(SimError::Config(
            "particles need exactly one of `explicit` or `random`".into(),
        )),
    }
}

fn explicit_particles(list: &[ParticleConfig]) -> Result<ParticleSet> {
    let positions = list
        .iter()
        .map(|pc| vec2("x", &pc.x))
        .collect::<Result<Vec<_>>>()?;
    let velocities = list
        .iter()
        .map(|pc| pc.v.as_deref().map_or(Ok(NVec2::zeros()), |v| vec2("v", v)))
        .collect::<Result<Vec<_>>>()?;
    let types = list.iter().map(|pc| pc.kind).collect();

    ParticleSet::new(positions, types)?.with_velocities(velocities)
}

fn random_particles(
    cfg: &RandomPlacementConfig,
    num_types: usize,
    rng: &mut StdRng,
) -> Result<ParticleSet> {
    if !cfg.extent.is_finite() || cfg.extent <= 0.0 {
        return Err(SimError::InvalidParam(format!(
            "placement extent must be finite and > 0, got {}",
            cfg.extent
        )));
    }

    let mut positions = Vec::with_capacity(cfg.count);
    let mut types = Vec::with_capacity(cfg.count);
    for _ in 0..cfg.count {
        positions.push(NVec2::new(
            rng.random_range(0.0..cfg.extent),
            rng.random_range(0.0..cfg.extent),
        ));
        types.push(rng.random_range(0..num_types));
    }
    ParticleSet::new(positions, types)
}

fn vec2(what: &'static str, xs: &[f64]) -> Result<NVec2> {
    match xs {
        [x, y] => Ok(NVec2::new(*x, *y)),
        _ => Err(SimError::ShapeMismatch {
            what,
            expected: 2,
            found: xs.len(),
        }),
    }
}
