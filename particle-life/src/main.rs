use particle_life::{bench_step, Scenario, ScenarioConfig};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Headless 2D particle-life runner")]
struct Args {
    /// Scenario file; bare names are looked up in the crate's `scenarios/` dir
    #[arg(short = 'c', long, default_value = "clusters.yaml")]
    scenario: String,

    /// Override `parameters.steps` from the scenario
    #[arg(short, long)]
    steps: Option<u64>,

    /// Log a progress line every N steps (0 = only at the end)
    #[arg(long, default_value_t = 100)]
    report_every: u64,

    /// Write the final particle state as YAML
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Run the step benchmark instead of a scenario
    #[arg(long)]
    bench: bool,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }
}

// resolve here to keep main clean
fn scenario_path(name: &str) -> PathBuf {
    let direct = PathBuf::from(name);
    if direct.exists() {
        return direct;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(name)
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    if args.bench {
        bench_step()?;
        return Ok(());
    }

    let path = scenario_path(&args.scenario);
    let cfg = ScenarioConfig::from_path(&path)
        .with_context(|| format!("failed to load scenario {}", path.display()))?;
    let mut scenario = Scenario::build(cfg).context("invalid scenario")?;

    let total = args.steps.unwrap_or(scenario.parameters.steps);
    info!(
        scenario = %path.display(),
        particles = scenario.particles.len(),
        num_types = scenario.rules.num_types(),
        steps = total,
        "starting run"
    );

    {
        let mut engine = scenario.engine()?;
        let chunk = if args.report_every == 0 { total } else { args.report_every };

        let mut done = 0;
        while done < total {
            let n = chunk.min(total - done);
            let report = engine.run(n);
            done += n;
            info!(
                step = report.step,
                t = report.time,
                kinetic_energy = report.kinetic_energy,
                momentum_x = report.momentum.x,
                momentum_y = report.momentum.y,
                max_speed = report.max_speed,
                "progress"
            );
        }
    }

    if let Some(out) = &args.output {
        let writer = BufWriter::new(
            File::create(out).with_context(|| format!("failed to create {}", out.display()))?,
        );
        serde_yaml::to_writer(writer, &scenario.particles.snapshot())?;
        info!(output = %out.display(), "wrote final state");
    }

    Ok(())
}
