use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use rally_score::config::Config;
use rally_score::scoring::{self, ScoringEngine};
use rally_score::standings;

const EXIT_SUCCESS: i32 = 0;
const EXIT_CONFIG: i32 = 4;
const EXIT_STANDINGS: i32 = 5;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Points for a match between two ranked players
    Points {
        /// Winner's ranking (1 = best)
        winner_ranking: i64,
        /// Loser's ranking (1 = best)
        loser_ranking: i64,
        /// Set score, shown in the explanation (e.g. "3-1")
        #[arg(short, long, default_value = "")]
        score: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Placement points for a final standing
    Placement {
        athlete: String,
        /// Final placement (1 = champion)
        placement: u32,
        /// Number of players in the draw
        participants: u32,
        /// Tournament format, shown in the explanation
        #[arg(short, long, default_value = "")]
        format: String,
        #[arg(long)]
        json: bool,
    },
    /// Describe the configured scoring rules
    Describe,
    /// Check the scoring configuration for problems
    Validate,
    /// Score a match using rankings from the standings file and record it
    Record {
        winner: String,
        loser: String,
        #[arg(short, long, default_value = "")]
        score: String,
        #[arg(long)]
        json: bool,
    },
    /// Award placement points and record them in the standings file
    Award {
        athlete: String,
        placement: u32,
        participants: u32,
        #[arg(short, long, default_value = "")]
        format: String,
        #[arg(long)]
        json: bool,
    },
    /// Show the current ranking table
    Standings,
}

#[derive(Parser, Debug)]
#[command(name = "rally-score")]
#[command(about = "Table tennis ranking points calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/rally-score/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to standings file (overrides the config file)
    #[arg(long, global = true)]
    standings: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("rally_score=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize result: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    }
}

fn standings_path(cli_path: Option<&str>, config: &Config) -> PathBuf {
    if let Some(p) = cli_path {
        return PathBuf::from(p);
    }
    if let Some(ref p) = config.standings {
        return p.clone();
    }
    match standings::get_standings_path() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Standings error: {}", e);
            std::process::exit(EXIT_STANDINGS);
        }
    }
}

fn load_standings_or_exit(path: &std::path::Path) -> standings::Standings {
    match standings::load_standings(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Standings error: {:#}", e);
            std::process::exit(EXIT_STANDINGS);
        }
    }
}

fn save_standings_or_exit(path: &std::path::Path, s: &standings::Standings) {
    if let Err(e) = standings::save_standings(path, s) {
        eprintln!("Standings error: {:#}", e);
        std::process::exit(EXIT_STANDINGS);
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match rally_score::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Some(ref name) = config.tournament {
        tracing::debug!(tournament = %name, "loaded scoring config");
    }

    let validation = scoring::validate_scoring(&config.scoring);
    if let Err(ref errors) = validation {
        for error in errors {
            tracing::warn!("{}", error);
        }
    }

    let engine = ScoringEngine::new(&config.scoring);
    let use_colors = rally_score::output::should_use_colors();

    match cli.command {
        Commands::Points {
            winner_ranking,
            loser_ranking,
            score,
            json,
        } => {
            let result = engine.calculate_points(&score, winner_ranking, loser_ranking);
            if json {
                print_json(&result);
            } else {
                println!(
                    "{}",
                    rally_score::output::format_match_result(&result, use_colors)
                );
            }
        }
        Commands::Placement {
            athlete,
            placement,
            participants,
            format,
            json,
        } => {
            let result =
                engine.calculate_placement_points(&athlete, placement, participants, &format);
            if json {
                print_json(&result);
            } else {
                println!(
                    "{}",
                    rally_score::output::format_placement_result(&result, use_colors)
                );
            }
        }
        Commands::Describe => {
            let lines = scoring::describe_rules(engine.rules());
            println!("{}", rally_score::output::format_lines(&lines));
        }
        Commands::Validate => match validation {
            Ok(()) => println!("Scoring config is valid."),
            Err(errors) => {
                eprintln!("Scoring config errors:");
                for error in errors {
                    eprintln!("  - {}", error);
                }
                std::process::exit(EXIT_CONFIG);
            }
        },
        Commands::Record {
            winner,
            loser,
            score,
            json,
        } => {
            if winner == loser {
                eprintln!("Winner and loser must be different athletes.");
                std::process::exit(EXIT_CONFIG);
            }

            let path = standings_path(cli.standings.as_deref(), &config);
            let mut table = load_standings_or_exit(&path);

            let winner_ranking = table.ranking_of(&winner);
            let loser_ranking = table.ranking_of(&loser);
            let result = engine.calculate_points(&score, winner_ranking, loser_ranking);
            table.apply_match(&winner, &loser, &result);
            save_standings_or_exit(&path, &table);

            if json {
                print_json(&result);
            } else {
                println!(
                    "{} (#{}) def. {} (#{})",
                    winner, winner_ranking, loser, loser_ranking
                );
                println!(
                    "{}",
                    rally_score::output::format_match_result(&result, use_colors)
                );
            }
        }
        Commands::Award {
            athlete,
            placement,
            participants,
            format,
            json,
        } => {
            let path = standings_path(cli.standings.as_deref(), &config);
            let mut table = load_standings_or_exit(&path);

            let result =
                engine.calculate_placement_points(&athlete, placement, participants, &format);
            table.apply_placement(&result);
            save_standings_or_exit(&path, &table);

            if json {
                print_json(&result);
            } else {
                println!(
                    "{}",
                    rally_score::output::format_placement_result(&result, use_colors)
                );
            }
        }
        Commands::Standings => {
            let path = standings_path(cli.standings.as_deref(), &config);
            let table = load_standings_or_exit(&path);
            println!(
                "{}",
                rally_score::output::format_standings(&table, use_colors)
            );
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
