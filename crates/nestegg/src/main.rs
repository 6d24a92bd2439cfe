//! Command-line front end for the nestegg projection engine
//!
//! Profiles are JSON documents deserialized into
//! [`nestegg_core::HouseholdProfile`]. Logging never includes account
//! balances or other profile contents, only run metadata.

mod report;

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use nestegg_core::HouseholdProfile;
use nestegg_core::analysis::TaxAnalyzer;
use nestegg_core::simulation::{EngineConfig, run_simulation};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "nestegg")]
#[command(about = "Retirement projection and tax analysis")]
struct Args {
    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the Monte Carlo projection for a household profile
    Simulate {
        /// Path to the JSON household profile
        profile: PathBuf,

        /// Random seed; the same seed always reproduces the same run
        #[arg(short, long, default_value_t = 0)]
        seed: u64,

        /// First simulated tax year
        #[arg(short, long, default_value_t = 2026)]
        year: i16,

        /// Emit the full result as JSON instead of a report
        #[arg(long)]
        json: bool,
    },
    /// Produce a current-year tax snapshot and ranked recommendations
    Analyze {
        /// Path to the JSON household profile
        profile: PathBuf,

        /// Tax year to analyze
        #[arg(short, long, default_value_t = 2026)]
        year: i16,

        /// Realized long-term capital gains to include
        #[arg(short, long, default_value_t = 0.0)]
        gains: f64,

        /// Emit the snapshot as JSON instead of a report
        #[arg(long)]
        json: bool,
    },
}

fn load_profile(path: &PathBuf) -> color_eyre::Result<HouseholdProfile> {
    let contents = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read profile {}", path.display()))?;
    let profile: HouseholdProfile = serde_json::from_str(&contents)
        .wrap_err_with(|| format!("failed to parse profile {}", path.display()))?;
    Ok(profile)
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(args.log_level.clone())),
        )
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Simulate {
            profile,
            seed,
            year,
            json,
        } => {
            let household = load_profile(&profile)?;
            let config = EngineConfig {
                seed,
                as_of_year: year,
            };
            tracing::info!(seed, year, trials = household.clamped_trials(), "starting run");
            let result = run_simulation(&household, &config)?;
            tracing::info!(
                success_rate = result.success_rate,
                horizon_years = result.horizon_years,
                "run complete"
            );
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", report::render_simulation(&result));
            }
        }
        Command::Analyze {
            profile,
            year,
            gains,
            json,
        } => {
            let household = load_profile(&profile)?;
            household.validate(year)?;
            let analyzer = TaxAnalyzer::new(&household, year);
            let snapshot = analyzer.snapshot(gains);
            let recommendations = analyzer.recommendations();
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print!("{}", report::render_snapshot(&snapshot, &recommendations));
            }
        }
    }

    Ok(())
}
