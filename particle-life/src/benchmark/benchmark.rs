use std::time::Instant;

use crate::error::Result;
use crate::simulation::engine::SimulationEngine;
use crate::simulation::interaction::InteractionRules;
use crate::simulation::states::{NVec2, ParticleSet};

/// Time force evaluation and a full step for increasing particle counts.
/// Prints CSV so the output can be pasted straight into a spreadsheet.
pub fn bench_step() -> Result<()> {
    let ns = [100, 200, 400, 800, 1600];
    let steps = 3; // full steps timed per size, after one warm-up step

    println!("N,forces_ms,step_ms");

    for n in ns {
        let rules = make_rules()?;
        let mut particles = make_particles(n, rules.num_types())?;
        let mut engine = SimulationEngine::new(0.01, &rules, &mut particles)?;

        // Warm-up
        engine.step();

        let t0 = Instant::now();
        let forces = engine.compute_total_forces();
        let ms_forces = t0.elapsed().as_secs_f64() * 1000.0;
        debug_assert_eq!(forces.len(), n);

        let t1 = Instant::now();
        for _ in 0..steps {
            engine.step();
        }
        let ms_step = t1.elapsed().as_secs_f64() * 1000.0 / steps as f64;

        println!("{},{:.6},{:.6}", n, ms_forces, ms_step);
    }
    Ok(())
}

/// Deterministic placement on a scrambled disc, types assigned round-robin
fn make_particles(n: usize, num_types: usize) -> Result<ParticleSet> {
    let positions = (0..n)
        .map(|i| {
            let i_f = i as f64;
            NVec2::new((i_f * 0.37).sin() * 5.0, (i_f * 0.13).cos() * 5.0)
        })
        .collect();
    let types = (0..n).map(|i| i % num_types).collect();

    ParticleSet::new(positions, types)
}

fn make_rules() -> Result<InteractionRules> {
    InteractionRules::new(4, 1.5, 0.1)
}
