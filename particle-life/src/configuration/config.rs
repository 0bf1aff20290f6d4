//! Configuration types for loading particle-life scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`ParametersConfig`] – timestep, interaction range, friction, run length, seed
//! - [`RulesConfig`]      – number of types and how to fill the interaction matrix
//! - [`ParticlesConfig`]  – explicit particles, or a random placement recipe
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//!
//! ```yaml
//! parameters:
//!   dt: 0.01              # integration step
//!   max_distance: 1.0     # interaction range
//!   friction: 0.1         # velocity damping per step, in [0, 1]
//!   steps: 500            # number of steps the runner takes
//!   seed: 42              # seeds random matrices and random placement
//!
//! rules:
//!   num_types: 2
//!   matrix: "explicit"    # "default", "random" or "explicit"
//!   rows:                 # only read for "explicit"
//!     - [ 1.0, -0.5 ]
//!     - [ 0.3,  1.0 ]
//!
//! particles:
//!   explicit:
//!     - x: [ 0.0, 0.0 ]
//!       type: 0
//!     - x: [ 0.5, 0.0 ]
//!       v: [ 0.0, 0.1 ]   # optional, zero if omitted
//!       type: 1
//! ```
//!
//! or, for a random cloud:
//!
//! ```yaml
//! particles:
//!   random:
//!     count: 200
//!     extent: 10.0        # positions uniform in [0, extent)^2
//! ```
//!
//! The scenario builder validates this and maps it onto the runtime types.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

/// How the interaction matrix is filled
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub enum MatrixInit {
    #[serde(rename = "default")] // +1 on the diagonal, -1 elsewhere
    #[default]
    Default,

    #[serde(rename = "random")] // uniform in [-1, 1), seeded from parameters.seed
    Random,

    #[serde(rename = "explicit")] // taken from `rows`
    Explicit,
}

/// Numerical parameters for a scenario
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub dt: f64,           // time step size
    pub max_distance: f64, // interaction range
    pub friction: f64,     // velocity damping per step
    pub steps: u64,        // number of steps to run
    #[serde(default)]
    pub seed: u64, // deterministic seed to make runs reproducible
}

/// Particle types and their interaction matrix
#[derive(Deserialize, Debug, Clone)]
pub struct RulesConfig {
    pub num_types: usize,
    #[serde(default)]
    pub matrix: MatrixInit,
    #[serde(default)]
    pub rows: Option<Vec<Vec<f64>>>, // row i: how type i reacts to each type j
}

/// Initial state of a single particle
#[derive(Deserialize, Debug, Clone)]
pub struct ParticleConfig {
    pub x: Vec<f64>, // position [x, y]
    #[serde(default)]
    pub v: Option<Vec<f64>>, // velocity [vx, vy], zero if omitted
    #[serde(rename = "type")]
    pub kind: usize, // row of the interaction matrix
}

/// Uniform random placement with uniformly random types
#[derive(Deserialize, Debug, Clone)]
pub struct RandomPlacementConfig {
    pub count: usize,
    pub extent: f64, // side of the square [0, extent)^2
}

/// Exactly one of `explicit` / `random` must be given
#[derive(Deserialize, Debug, Clone)]
pub struct ParticlesConfig {
    pub explicit: Option<Vec<ParticleConfig>>,
    pub random: Option<RandomPlacementConfig>,
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub parameters: ParametersConfig,
    pub rules: RulesConfig,
    pub particles: ParticlesConfig,
}

impl ScenarioConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_yaml::from_reader(reader)?)
    }
}
