//! dblob CLI - Command line interface for durable_blob
//!
//! Writes, reads and verifies crash-resistant blob files from the shell.

use anyhow::Context;
use clap::{Parser, Subcommand};
use durable_blob::{DurableStore, SlotPair, StoreConfig};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dblob")]
#[command(about = "Crash-resistant persistence of a single byte blob")]
#[command(version)]
struct Cli {
    /// Path to a JSON config file (default: ~/.config/dblob/config.json if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// fsync the staged file and its directory on write
    #[arg(long)]
    sync: bool,

    /// Output format for status output (json or text)
    #[arg(short, long, default_value = "json")]
    format: OutputFormat,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Store data in the primary slot, staging it in the backup slot
    Write {
        /// Primary slot path
        primary: PathBuf,
        /// Backup slot path (default: primary path plus the configured suffix)
        #[arg(short, long)]
        backup: Option<PathBuf>,
        /// Read data from this file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Print the stored data, falling back to the backup slot if needed
    Read {
        /// Primary slot path
        primary: PathBuf,
        /// Backup slot path (default: primary path plus the configured suffix)
        #[arg(short, long)]
        backup: Option<PathBuf>,
        /// Write data to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check both slots and report their state
    Verify {
        /// Primary slot path
        primary: PathBuf,
        /// Backup slot path (default: primary path plus the configured suffix)
        #[arg(short, long)]
        backup: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    let mut config = StoreConfig::load_or_default(cli.config.as_deref())?;
    if cli.sync {
        config.sync_writes = true;
    }
    let store = DurableStore::with_config(config);

    match cli.command {
        Commands::Write {
            primary,
            backup,
            input,
        } => {
            let slots = slot_pair(&store, primary, backup);
            let data = match &input {
                Some(path) => std::fs::read(path)
                    .with_context(|| format!("Failed to read input {}", path.display()))?,
                None => {
                    let mut buf = Vec::new();
                    std::io::stdin().read_to_end(&mut buf)?;
                    buf
                }
            };
            store.write(&data, &slots)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "primary": slots.primary().display().to_string(),
                    "bytes": data.len(),
                    "checksum": durable_blob::Digest::compute(&data).to_hex()
                }),
            )?;
        }

        Commands::Read {
            primary,
            backup,
            output: out,
        } => {
            let slots = slot_pair(&store, primary, backup);
            let data = store.read(&slots)?;
            match out {
                Some(path) => write_output_file(&path, &data)?,
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(&data)?;
                    stdout.flush()?;
                }
            }
        }

        Commands::Verify { primary, backup } => {
            let slots = slot_pair(&store, primary, backup);
            let report = store.inspect(&slots);
            let served_from = report.served_from();
            let mut value = serde_json::to_value(&report)?;
            value["served_from"] = serde_json::to_value(served_from)?;
            output(&cli.format, &value)?;
            if served_from.is_none() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn slot_pair(store: &DurableStore, primary: PathBuf, backup: Option<PathBuf>) -> SlotPair {
    match backup {
        Some(backup) => SlotPair::new(primary, backup),
        None => store.slots(primary),
    }
}

fn write_output_file(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    std::fs::write(path, data).with_context(|| format!("Failed to write {}", path.display()))
}

fn output(format: &OutputFormat, value: &serde_json::Value) -> anyhow::Result<()> {
    let text = match format {
        OutputFormat::Json => serde_json::to_string(value)?,
        OutputFormat::Text => serde_json::to_string_pretty(value)?,
    };
    println!("{}", text);
    Ok(())
}
