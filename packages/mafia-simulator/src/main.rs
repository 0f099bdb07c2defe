//! Mafia simulator CLI: plays bot games in memory through the engine.
//!
//! Useful for checking role balance and for soaking the resolver with
//! random inputs.

mod metrics;
mod output;
mod simulator;
mod types;

use std::collections::BTreeMap;
use std::time::Instant;

use clap::Parser;
use mafia::domain::rules::{MAX_PLAYERS, MIN_PLAYERS};
use metrics::{build_game_metrics, winner_label, GameConfig};
use output::OutputWriter;
use simulator::{GameResult, Simulator};
use tracing::{info, warn};
use types::{BotKind, OutputFormat};

#[derive(Parser)]
#[command(name = "mafia-simulator")]
#[command(about = "In-memory Mafia game simulator")]
struct Args {
    /// Number of games to simulate
    #[arg(short, long, default_value = "1")]
    games: u32,

    /// Players per game
    #[arg(short, long, default_value = "8")]
    players: usize,

    /// Bot behaviour for every seat
    #[arg(long, default_value = "random")]
    bots: BotKind,

    /// Base seed; game N uses seed + N. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Show output summary and file paths
    #[arg(long)]
    show_output: bool,

    /// Emit engine logs as JSON, filtered by RUST_LOG
    #[arg(long)]
    json_logs: bool,

    /// Output directory for results
    #[arg(long, default_value = "./simulation-results")]
    output_dir: String,

    /// Output format
    #[arg(long, default_value = "jsonl")]
    output_format: OutputFormat,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.json_logs {
        mafia::telemetry::init_tracing();
    } else {
        let filter = if args.verbose {
            "debug"
        } else if args.show_output {
            "info"
        } else {
            "warn"
        };
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&args.players) {
        return Err(format!(
            "--players must be between {MIN_PLAYERS} and {MAX_PLAYERS}, got {}",
            args.players
        )
        .into());
    }

    if args.show_output {
        info!(
            games = args.games,
            players = args.players,
            bots = args.bots.name(),
            "Starting simulator"
        );
    }

    let mut output_writer = OutputWriter::new(&args.output_dir, &args.output_format)?;
    let base_seed = args.seed.unwrap_or_else(rand::random);

    let start = Instant::now();
    let mut results = Vec::new();
    let mut errors = 0;

    for game_num in 1..=args.games {
        let game_start = Instant::now();
        let game_seed = base_seed.wrapping_add(u64::from(game_num));

        match Simulator::new(game_seed, args.players, args.bots).simulate_game() {
            Ok(result) => {
                let duration_ms = game_start.elapsed().as_secs_f64() * 1000.0;
                let metrics = build_game_metrics(
                    game_num,
                    game_seed,
                    GameConfig {
                        players: args.players,
                        bots: args.bots,
                        total_games: args.games,
                    },
                    &result,
                    duration_ms,
                );
                if let Err(e) = output_writer.write_game(&metrics) {
                    warn!("Failed to write metrics for game {}: {}", game_num, e);
                }
                if args.verbose {
                    info!(
                        game = game_num,
                        winner = %winner_label(result.verdict),
                        rounds = result.rounds.len(),
                        "Game completed"
                    );
                }
                results.push(result);
            }
            Err(e) => {
                errors += 1;
                warn!("Game {} failed: {}", game_num, e);
            }
        }
    }

    let elapsed = start.elapsed();
    let (jsonl_path, csv_path) = output_writer.output_paths();
    let jsonl_path = jsonl_path.cloned();
    let csv_path = csv_path.cloned();
    output_writer.finish()?;

    if args.show_output {
        if let Some(path) = jsonl_path {
            info!("Detailed results written to: {}", path.display());
        }
        if let Some(path) = csv_path {
            info!("Summary CSV written to: {}", path.display());
        }
        print_summary(&results, errors, elapsed, args.games);
    }

    Ok(())
}

fn print_summary(results: &[GameResult], errors: u32, elapsed: std::time::Duration, total: u32) {
    println!("\n=== Simulation Summary ===");
    println!("Games completed: {}/{}", results.len(), total);
    if errors > 0 {
        println!("Errors: {errors}");
    }
    println!("Total time: {elapsed:?}");
    if results.is_empty() {
        return;
    }
    println!(
        "Average time per game: {:?}",
        elapsed / results.len() as u32
    );

    let mut outcomes: BTreeMap<String, u32> = BTreeMap::new();
    for result in results {
        *outcomes.entry(winner_label(result.verdict)).or_default() += 1;
    }
    let avg_rounds =
        results.iter().map(|r| r.rounds.len()).sum::<usize>() as f64 / results.len() as f64;

    println!("\n=== Outcomes ===");
    for (label, count) in &outcomes {
        let pct = f64::from(*count) / results.len() as f64 * 100.0;
        println!("{label}: {count} ({pct:.1}%)");
    }
    println!("Average windows per game: {avg_rounds:.1}");
}
