use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lockbox_migrate::config::{DEFAULT_CONFIG_FILE, FileConfig};
use lockbox_migrate::history;
use lockbox_migrate::runner::Runner;

const DEFAULT_DATABASE: &str = "./data/lockbox.db";

#[derive(Parser)]
#[command(name = "lockbox-migrate")]
#[command(about = "Schema migration runner for the Lockbox vault database", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the SQLite database (created if missing)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// TOML config file; defaults to ./lockbox-migrate.toml when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending change-sets in ascending order
    Up {
        /// Stop after this change-set (inclusive)
        #[arg(long)]
        to: Option<String>,
    },

    /// Roll back applied change-sets; one step unless --to is given
    Down {
        /// Roll back until this change-set is the newest applied one
        #[arg(long)]
        to: Option<String>,
    },

    /// Show applied and pending change-sets
    Status {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn load_file_config(flag: Option<&Path>) -> anyhow::Result<FileConfig> {
    match flag {
        Some(path) => FileConfig::load(path).map_err(Into::into),
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.exists() {
                FileConfig::load(default).map_err(Into::into)
            } else {
                Ok(FileConfig::default())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `status --json` stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("lockbox_migrate=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let file = load_file_config(cli.config.as_deref())?;
    let database = cli
        .database
        .or_else(|| file.database.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE));
    if let Some(parent) = database.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }

    let mut runner = Runner::open(&database, history::history(), file.settings())?;

    match cli.command {
        Commands::Up { to } => {
            let summary = runner.up(to.as_deref())?;
            for id in &summary.changesets {
                println!("applied  {id}");
            }
            if summary.is_empty() {
                println!("database is up to date");
            } else {
                println!("applied {} change-set(s)", summary.changesets.len());
            }
        }
        Commands::Down { to } => {
            let summary = runner.down(to.as_deref())?;
            for id in &summary.changesets {
                println!("reverted {id}");
            }
            if summary.is_empty() {
                println!("nothing to revert");
            } else {
                println!("reverted {} change-set(s)", summary.changesets.len());
            }
        }
        Commands::Status { json } => {
            let report = runner.status()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for cs in &report.changesets {
                    match (&cs.applied_at, &cs.product_version) {
                        (Some(at), Some(version)) => println!(
                            "applied  {}  {} (v{version})",
                            cs.id,
                            at.format("%Y-%m-%d %H:%M:%S")
                        ),
                        _ => println!("pending  {}", cs.id),
                    }
                }
                for id in &report.orphaned {
                    println!("orphaned {id}  (not in this history)");
                }
            }
        }
    }

    Ok(())
}
