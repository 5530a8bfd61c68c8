use std::path::PathBuf;

use clap::Parser;

use schnapsen_bench::config::{ResolvedOutputs, TournamentConfig};
use schnapsen_bench::logging::init_logging;
use schnapsen_bench::tournament::{ExternalEngine, TournamentRunner};

/// Round-robin tournament harness for Schnapsen bots.
#[derive(Debug, Parser)]
#[command(
    name = "schnapsen-bench",
    author,
    version,
    about = "Reproducible Schnapsen round-robin tournaments"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/tournament.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of games per pair of agents.
    #[arg(long, value_name = "COUNT")]
    repeats: Option<usize>,

    /// Override the tournament RNG seed.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration (no games are played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = TournamentConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(repeats) = cli.repeats {
        config.repeats = repeats;
    }

    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let agent_count = config.agents.len();
    let repeats = config.repeats;

    println!(
        "Loaded configuration '{run_id}' with {agent_count} agents ({repeats} games per pair)"
    );

    let _logging_guard = init_logging(&config.logging, &outputs)?;
    let mut engine = ExternalEngine::new(config.engine.clone());
    let runner = TournamentRunner::new(config)?;

    if cli.validate_only {
        println!("Validation-only mode: tournament execution skipped.");
        return Ok(());
    }

    println!("Playing {} games:", runner.total_games());
    let summary = runner.run(&mut engine)?;
    println!(
        "Tournament complete for '{run_id}': {} games, points {}",
        summary.games_played,
        summary.tally_line()
    );

    if let Some(path) = outputs.summary_json.as_ref() {
        summary.write_json(path)?;
        println!("Summary: {}", path.display());
    }

    Ok(())
}
