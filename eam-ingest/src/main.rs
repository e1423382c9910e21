//! eam-ingest - artist parsing and normalization CLI
//!
//! `parse` prints how individual artist strings are interpreted;
//! `normalize` runs the normalization pass over a raw concert export.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use eam_ingest::{normalize_file, parse_artist_entry};
use std::path::PathBuf;
use tracing::info;

/// Command-line arguments for eam-ingest
#[derive(Parser, Debug)]
#[command(name = "eam-ingest")]
#[command(about = "Parse and normalize concert artist entries")]
#[command(version)]
struct Args {
    /// TOML config file (defaults to ~/.config/eam/config.toml)
    #[arg(long, global = true, env = "EAM_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show how artist strings are parsed
    Parse {
        /// Raw artist entries, e.g. "Outlaw Festival: Bob Dylan and Willie Nelson"
        #[arg(required = true)]
        entries: Vec<String>,
    },

    /// Normalize a raw concert export
    Normalize {
        /// Raw records (JSON array with an ARTISTS field)
        #[arg(short, long)]
        input: PathBuf,

        /// Name mapping CSV (original_name,canonical_name)
        #[arg(short, long)]
        mapping: PathBuf,

        /// Output file for normalized records
        #[arg(short, long)]
        output: PathBuf,

        /// Number of unmapped artists to list
        #[arg(long, default_value = "20")]
        top: usize,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = eam_common::config::load_config(args.config.as_deref())
        .context("Failed to load configuration")?;
    eam_common::logging::init_tracing(&config.logging, args.log_level.as_deref())?;

    match args.command {
        Command::Parse { entries } => {
            for entry in &entries {
                let parsed = parse_artist_entry(entry);
                println!("Input: {}", entry);
                match &parsed.festival_name {
                    Some(festival) => println!("  Festival: {}", festival),
                    None if parsed.artists.is_empty() => println!("  (no artists)"),
                    None => {}
                }
                for artist in &parsed.artists {
                    println!("  - {} [{}]", artist.name, artist.role);
                }
            }
        }
        Command::Normalize {
            input,
            mapping,
            output,
            top,
        } => {
            let stats = normalize_file(&input, &mapping, &output)
                .with_context(|| format!("Failed to normalize {}", input.display()))?;

            println!("Normalization complete:");
            println!("  Records processed: {}", stats.records);
            println!("  Total artist entries processed: {}", stats.total_artist_entries());
            println!("  Mapped to canonical names: {}", stats.mapped_count);
            println!("  Opener entries: {}", stats.opener_count);
            println!("  Festivals/multi-artist shows: {}", stats.festival_count);
            println!("  Total multi-artist concerts: {}", stats.multi_artist_count);
            println!("  Unmapped artist variations: {}", stats.unmapped.len());

            let unmapped = stats.top_unmapped(top);
            if !unmapped.is_empty() {
                println!("\nTop {} unmapped artists:", unmapped.len());
                for (name, count) in unmapped {
                    println!("  {:3}x - {}", count, name);
                }
            }

            info!("Wrote {}", output.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_config_flag_reads_env() {
        let command = Args::command();
        let config = command
            .get_arguments()
            .find(|arg| arg.get_id() == "config")
            .unwrap();
        assert_eq!(config.get_env(), Some(std::ffi::OsStr::new("EAM_CONFIG")));
        assert!(config.is_global_set());
    }
}
