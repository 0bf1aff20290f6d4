pub mod states;
pub mod params;
pub mod interaction;
pub mod forces;
pub mod integrator;
pub mod engine;
pub mod scenario;
