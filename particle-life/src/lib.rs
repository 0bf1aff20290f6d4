pub mod error;
pub mod simulation;
pub mod configuration;
pub mod benchmark;

pub use error::{Result, SimError};

pub use simulation::states::{NVec2, ParticleSet, ParticleSnapshot};
pub use simulation::interaction::InteractionRules;
pub use simulation::engine::{SimulationEngine, StepReport};
pub use simulation::params::Parameters;
pub use simulation::scenario::Scenario;

pub use configuration::config::{
    MatrixInit, ParametersConfig, ParticleConfig, ParticlesConfig, RandomPlacementConfig,
    RulesConfig, ScenarioConfig,
};

pub use benchmark::benchmark::bench_step;
