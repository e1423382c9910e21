//! eam-openers - missing opener detection CLI
//!
//! `scan` runs detection over a normalized concert file and prints a
//! report; `detect` and `setlist` look up a single artist and date.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use eam_common::config::resolve_setlistfm_api_key;
use eam_openers::models::report::ScanReport;
use eam_openers::models::setlist::extract_songs;
use eam_openers::services::concert_scanner::{
    load_concerts, parse_concert_date, scan_concerts, select_concerts,
};
use eam_openers::{OpenerDetector, SetlistFmClient};
use std::path::PathBuf;
use tracing::info;

/// Command-line arguments for eam-openers
#[derive(Parser, Debug)]
#[command(name = "eam-openers")]
#[command(about = "Detect opening acts missing from concert records using setlist.fm")]
#[command(version)]
struct Args {
    /// TOML config file (defaults to ~/.config/eam/config.toml)
    #[arg(long, global = true, env = "EAM_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// setlist.fm API key (overrides SETLISTFM_API_KEY and the config file)
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan single-headliner concerts for missing openers
    Scan {
        /// Normalized concerts (JSON array)
        #[arg(short, long)]
        concerts: PathBuf,

        /// Only scan this concert
        #[arg(long)]
        concert_id: Option<String>,

        /// Maximum number of concerts to scan (newest first)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Write the JSON report here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Detect openers for one headliner and date
    Detect {
        #[arg(short, long)]
        artist: String,

        /// Concert date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
    },

    /// Print the setlist for one artist and date
    Setlist {
        #[arg(short, long)]
        artist: String,

        /// Concert date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = eam_common::config::load_config(args.config.as_deref())
        .context("Failed to load configuration")?;
    eam_common::logging::init_tracing(&config.logging, args.log_level.as_deref())?;

    let api_key = resolve_setlistfm_api_key(args.api_key.as_deref(), &config)?;
    let client = SetlistFmClient::from_config(&api_key, &config)
        .context("Failed to create setlist.fm client")?;

    info!(
        "setlist.fm client ready ({}, {:?} between requests)",
        config.setlistfm_base_url,
        client.min_interval()
    );

    match args.command {
        Command::Scan {
            concerts,
            concert_id,
            limit,
            output,
        } => {
            let all = load_concerts(&concerts)
                .with_context(|| format!("Failed to load {}", concerts.display()))?;
            let selected = select_concerts(&all, concert_id.as_deref(), limit)?;
            info!("Scanning {} of {} concerts", selected.len(), all.len());

            let detector = OpenerDetector::new(client);
            let (results, tally) = scan_concerts(&detector, &selected).await;
            let report = ScanReport::new(tally, results);

            print!("{}", report.render_text());

            if let Some(path) = output {
                report
                    .write_json(&path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("\nReport written to {}", path.display());
            }
        }
        Command::Detect { artist, date } => {
            let date = parse_concert_date(&date)?;
            let detector = OpenerDetector::new(client);
            let openers = detector.detect_openers(&artist, date).await;

            if openers.is_empty() {
                println!("No openers detected for {} on {}", artist, date);
            }
            for opener in &openers {
                println!(
                    "{} - {} songs, {}% ({})",
                    opener.artist_name, opener.song_count, opener.confidence, opener.confidence_label
                );
                if let Some(url) = &opener.setlist_url {
                    println!("  {}", url);
                }
            }
        }
        Command::Setlist { artist, date } => {
            let date = parse_concert_date(&date)?;
            let setlist = client
                .find_setlist_for_concert(&artist, date)
                .await
                .with_context(|| format!("setlist.fm lookup failed for {}", artist))?;

            let Some(setlist) = setlist else {
                println!("No setlist found for {} on {}", artist, date);
                return Ok(());
            };

            println!("{} @ {} ({})", setlist.artist.name, setlist.venue.name, date);
            if let Some(tour) = setlist.tour_name() {
                println!("Tour: {}", tour);
            }
            for song in extract_songs(&setlist) {
                let mut line = format!("{:3}. {}", song.position, song.name);
                if let Some(cover) = &song.cover {
                    line.push_str(&format!(" ({} cover)", cover));
                }
                if song.tape {
                    line.push_str(" [tape]");
                }
                if song.encore > 0 {
                    line.push_str(&format!(" [{}]", song.set_name));
                }
                println!("{}", line);
            }
            if let Some(url) = &setlist.url {
                println!("{}", url);
            }
        }
    }

    Ok(())
}
