//! Scoreboard CLI
//!
//! Reads contest commands from stdin (or `--input`) and answers on stdout,
//! or runs seeded freeze/scroll scenarios with `--scenario`.

use clap::Parser;
use scoreboard_env::StdoutOutput;
use scoreboard_sim::{BoardExport, ScenarioConfig, ScenarioId, ScenarioResult, ScenarioRunner, Session};
use std::fs::File;
use std::io::{self, BufReader};
use tracing::{debug, error, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// ICPC scoreboard with freeze and scroll
#[derive(Parser, Debug)]
#[command(name = "scoreboard-sim")]
#[command(about = "Run an ICPC scoreboard from commands or seeded scenarios", long_about = None)]
struct Args {
    /// Read commands from this file instead of stdin
    #[arg(short, long)]
    input: Option<String>,

    /// Scenario to run (quiet, late_surge, photo_finish, frozen_wall, all)
    #[arg(short = 'S', long)]
    scenario: Option<String>,

    /// Master seed for scenarios (0 = random from time)
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Number of consecutive seeds to run per scenario
    #[arg(long, default_value = "1")]
    seeds: usize,

    /// Teams per generated scenario
    #[arg(long, default_value = "8")]
    teams: usize,

    /// Problems per generated scenario
    #[arg(long, default_value = "6")]
    problems: usize,

    /// Submissions per generated scenario
    #[arg(long, default_value = "150")]
    submissions: usize,

    /// Print the generated command script instead of running it
    #[arg(long)]
    emit_script: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON summary for scenario runs
    #[arg(long)]
    json: bool,

    /// Export the final board to a JSON file
    #[arg(long)]
    export: Option<String>,
}

fn init_logging(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else if args.scenario.is_some() {
        Level::INFO
    } else {
        Level::WARN
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Plays the command protocol over stdin or a file.
fn run_protocol(args: &Args) -> io::Result<()> {
    let mut session = Session::new(StdoutOutput::new());
    match &args.input {
        Some(path) => session.run(BufReader::new(File::open(path)?))?,
        None => session.run(io::stdin().lock())?,
    };

    if let Some(export_path) = &args.export {
        let overtakes: Vec<_> = session
            .last_scroll()
            .map(|report| report.overtakes().cloned().collect())
            .unwrap_or_default();
        let source = args.input.as_deref().unwrap_or("stdin");
        let export = BoardExport::new(
            source,
            session.contest().duration(),
            &session.contest().scoreboard(),
            &overtakes,
        );
        export.write_to_file(export_path)?;
        info!("Exported final board to {}", export_path);
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(&args);

    let Some(scenario_arg) = args.scenario.as_deref() else {
        if let Err(e) = run_protocol(&args) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        return;
    };

    let scenarios: Vec<ScenarioId> = if scenario_arg == "all" {
        ScenarioId::all()
    } else {
        vec![scenario_arg.parse().unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            eprintln!("Available scenarios: quiet, late_surge, photo_finish, frozen_wall, all");
            std::process::exit(1);
        })]
    };

    let base_seed = if args.seed == 0 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    } else {
        args.seed
    };

    let base_config = ScenarioConfig::default()
        .with_teams(args.teams)
        .with_problems(args.problems)
        .with_submissions(args.submissions);

    if args.emit_script {
        let config = base_config.with_seed(base_seed);
        for scenario in &scenarios {
            for command in scoreboard_sim::scenarios::generate(*scenario, &config) {
                println!("{}", command);
            }
        }
        return;
    }

    if args.export.is_some() && (scenarios.len() > 1 || args.seeds > 1) {
        eprintln!("Error: --export only supports a single scenario and seed");
        std::process::exit(1);
    }

    let mut all_results: Vec<ScenarioResult> = Vec::new();
    for seed_offset in 0..args.seeds.max(1) {
        let seed = base_seed.wrapping_add(seed_offset as u64);
        let runner = ScenarioRunner::new(base_config.clone().with_seed(seed));
        let config = runner.config();
        debug!(
            "Seed {}: {} teams, {} problems, {} submissions over {} minutes",
            config.seed, config.teams, config.problems, config.submissions, config.duration
        );

        for scenario in &scenarios {
            let result = runner.run(*scenario);
            if !args.json {
                if result.passed {
                    info!(
                        "✓ {} (seed={}) PASSED: {} disclosures, {} overtakes",
                        scenario.name(),
                        seed,
                        result.metrics.disclosures,
                        result.metrics.overtakes
                    );
                } else {
                    error!(
                        "✗ {} (seed={}) FAILED: {}",
                        scenario.name(),
                        seed,
                        result.failure_reason.as_deref().unwrap_or("unknown")
                    );
                }
            }
            all_results.push(result);
        }
    }

    if let (Some(export_path), Some(result)) = (&args.export, all_results.first()) {
        match BoardExport::from_result(result).write_to_file(export_path) {
            Ok(()) => info!("Exported final board to {}", export_path),
            Err(e) => error!("Failed to write export: {:?}", e),
        }
    }

    let total = all_results.len();
    let failed_count = all_results.iter().filter(|r| !r.passed).count();

    if args.json {
        let summary = serde_json::json!({
            "total": total,
            "passed": total - failed_count,
            "failed": failed_count,
            "results": all_results.iter().map(|r| {
                serde_json::json!({
                    "scenario": r.scenario.name(),
                    "seed": r.seed,
                    "duration": r.duration,
                    "passed": r.passed,
                    "submissions": r.metrics.submissions,
                    "withheld": r.metrics.withheld,
                    "scrolls": r.metrics.scrolls,
                    "disclosures": r.metrics.disclosures,
                    "overtakes": r.metrics.overtakes,
                    "failure_reason": r.failure_reason,
                })
            }).collect::<Vec<_>>(),
        });
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{}", text),
            Err(e) => error!("Failed to encode summary: {}", e),
        }
    } else if failed_count == 0 {
        info!("All {} scenario runs passed", total);
    } else {
        error!("{}/{} scenario runs failed", failed_count, total);
    }

    if failed_count > 0 {
        std::process::exit(1);
    }
}
