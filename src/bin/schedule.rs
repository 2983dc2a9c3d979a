//! Schedule Tool CLI
//!
//! Validates candidate schedules, records them as versions and reports
//! track distribution and changes between versions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use conference_schedule::{
    track_stats, Catalog, Schedule, ScheduleConfig, SwapExtractor, Validator, VersionStore,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schedule-tool")]
#[command(about = "Validate, score and version conference schedules")]
struct Cli {
    /// Config file (defaults to schedule.toml lookup)
    #[arg(short, long)]
    config: Option<String>,

    /// Session catalog JSON (overrides config)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Version store file (overrides config)
    #[arg(long)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a schedule against all hard constraints
    Validate {
        /// Schedule JSON file
        schedule: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show per-slot track distribution
    Stats {
        /// Schedule JSON file
        schedule: PathBuf,
    },

    /// List speakers with more than one session
    Speakers,

    /// Validate a schedule and append it as a new version
    Save {
        /// Schedule JSON file
        schedule: PathBuf,
        /// Version label
        #[arg(short, long)]
        label: Option<String>,
        /// Version description
        #[arg(short, long)]
        description: Option<String>,
        /// Store even if validation fails
        #[arg(long)]
        force: bool,
    },

    /// List stored versions
    History,

    /// Show cells changed against the previous version
    Diff {
        /// Version to inspect (defaults to latest)
        #[arg(short, long)]
        version: Option<u64>,
    },

    /// Extract and validate a swap proposal from $ISSUE_BODY
    Swap {
        /// Where to write the proposed schedule
        #[arg(short, long, default_value = "output/schedule.json")]
        output: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = ScheduleConfig::load_from(cli.config.as_deref())?;
    let catalog_path = cli.catalog.unwrap_or_else(|| config.catalog_path());
    let store_path = cli.store.unwrap_or_else(|| config.store_path());
    let validator = Validator::new(&config.layout);

    match cli.command {
        Commands::Validate { schedule, json } => {
            let catalog = Catalog::from_json_file(&catalog_path)?;
            let schedule = Schedule::from_json_file(&schedule)?;
            let report = validator.validate(&schedule, &catalog);

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if report.is_ok() {
                println!("✅ PASS: All hard constraints satisfied");
            } else {
                println!("❌ FAIL: Constraint violations:");
                for message in report.messages() {
                    println!("  - {}", message);
                }
            }

            if !report.is_ok() {
                std::process::exit(1);
            }
            Ok(())
        }

        Commands::Stats { schedule } => {
            let catalog = Catalog::from_json_file(&catalog_path)?;
            let schedule = Schedule::from_json_file(&schedule)?;
            let stats = track_stats(&schedule, &catalog);

            for slot in &stats.slots {
                let label = config
                    .layout
                    .slot(&slot.slot)
                    .map(|s| s.label.as_str())
                    .unwrap_or("");
                let doubled: Vec<String> = slot
                    .doubled()
                    .map(|(track, n)| format!("{} x{}", track, n))
                    .collect();
                if doubled.is_empty() {
                    println!("  {} {}: {} unique tracks", slot.slot, label, slot.unique_tracks());
                } else {
                    println!(
                        "  {} {}: {} unique tracks  doubled: {}",
                        slot.slot,
                        label,
                        slot.unique_tracks(),
                        doubled.join(", ")
                    );
                }
            }
            println!("  Total track doublings: {}", stats.total_doublings);
            Ok(())
        }

        Commands::Speakers => {
            let catalog = Catalog::from_json_file(&catalog_path)?;
            let conflicts = catalog.multi_session_speakers();
            println!(
                "{} sessions, {} multi-session speakers",
                catalog.len(),
                conflicts.len()
            );
            for conflict in &conflicts {
                println!("  {}: {}", conflict.speaker, conflict.session_ids.join(", "));
            }
            println!();
            for (track, count) in catalog.track_counts() {
                println!("  {}: {}", track, count);
            }
            Ok(())
        }

        Commands::Save { schedule, label, description, force } => {
            let catalog = Catalog::from_json_file(&catalog_path)?;
            let schedule = Schedule::from_json_file(&schedule)?;
            let report = validator.validate(&schedule, &catalog);

            if !report.is_ok() {
                for message in report.messages() {
                    println!("  - {}", message);
                }
                if !(force || config.validation.store_invalid) {
                    println!("❌ Schedule is invalid; not saved (use --force to store anyway)");
                    std::process::exit(1);
                }
                warn!(violations = report.violations.len(), "storing invalid schedule");
            }

            let mut store = VersionStore::open(&store_path)?;
            let version = store.append(schedule, label.as_deref(), description.as_deref())?;
            println!("✅ Saved as {}", version);
            Ok(())
        }

        Commands::History => {
            let store = VersionStore::open(&store_path)?;
            if store.is_empty() {
                println!("No versions stored in {:?}", store.path());
                return Ok(());
            }

            for version in store.versions() {
                let changed = store.diff_with_previous(version.version)?.len();
                println!(
                    "  {}  [{}]  {} cells changed",
                    version,
                    version.schedule.fingerprint().short(),
                    changed
                );
                if !version.description.is_empty() {
                    println!("      {}", version.description);
                }
            }
            Ok(())
        }

        Commands::Diff { version } => {
            let store = VersionStore::open(&store_path)?;
            let number = match version {
                Some(n) => n,
                None => store.latest().ok_or("No versions stored")?.version,
            };

            let cells = store.diff_with_previous(number)?;
            println!("🔍 v{}: {} cells changed", number, cells.len());
            for cell in &cells {
                let room = config
                    .layout
                    .room(cell.position)
                    .map(|r| r.display_name())
                    .unwrap_or_else(|| format!("position {}", cell.position));
                println!("  {} / {}", cell.slot, room);
            }
            Ok(())
        }

        Commands::Swap { output } => {
            let body = std::env::var("ISSUE_BODY").unwrap_or_default();
            if body.is_empty() {
                return Err("ISSUE_BODY environment variable is empty".into());
            }

            let schedule = SwapExtractor::new()?.extract(&body)?;
            let catalog = Catalog::from_json_file(&catalog_path)?;
            let report = validator.validate(&schedule, &catalog);
            if !report.is_ok() {
                eprintln!("Validation failed:");
                for message in report.messages() {
                    eprintln!("  - {}", message);
                }
                std::process::exit(1);
            }
            println!("✅ Validation passed");

            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&output, schedule.to_json_pretty()?)?;
            println!("Schedule written to {:?}", output);
            Ok(())
        }
    }
}
