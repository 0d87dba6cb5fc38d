use swarmphys::{bench_frames, Scenario, ScenarioConfig};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(about = "Run a swarm scenario headless and print the final layout")]
struct Args {
    /// Scenario file (YAML); a name not found as given is looked up in the
    /// crate's `scenarios/` directory
    #[arg(default_value = "demo.yaml")]
    scenario: PathBuf,

    /// Frames to run, overriding the scenario's own count
    #[arg(short, long)]
    frames: Option<u32>,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Time frames over growing swarm sizes instead of running a scenario
    #[arg(long)]
    bench: bool,
}

fn resolve_scenario(path: &Path) -> PathBuf {
    if path.is_absolute() || path.exists() {
        return path.to_path_buf();
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(path)
}

// load here to keep main clean
fn load_scenario(path: &Path) -> Result<ScenarioConfig> {
    let path = resolve_scenario(path);
    let text = fs::read_to_string(&path)
        .with_context(|| format!("failed to read scenario {}", path.display()))?;
    let cfg = ScenarioConfig::from_yaml(&text)
        .with_context(|| format!("failed to parse scenario {}", path.display()))?;
    Ok(cfg)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", args.log_level);
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    if args.bench {
        bench_frames();
        return Ok(());
    }

    let cfg = load_scenario(&args.scenario)?;
    let frames = args.frames.unwrap_or(cfg.frames);
    let mut scenario = Scenario::build(&cfg).context("invalid scenario")?;

    let ran = scenario.run(frames);
    info!(frames = ran; "Simulation finished");

    let live: Vec<_> = scenario
        .files
        .iter()
        .copied()
        .chain(scenario.people.ids())
        .collect();
    for id in live {
        let node = &scenario.nodes[id];
        println!("{} {} {:.3} {:.3}", node.name, node.kind.as_str(), node.x.x, node.x.y);
    }

    Ok(())
}
