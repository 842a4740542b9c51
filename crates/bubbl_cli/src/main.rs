//! bubbl CLI
//!
//! Pack album mosaics and replay bubble layout scenarios.

use anyhow::{Context, Result};
use bubbl_core::Size;
use bubbl_layout::MosaicPacker;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod scenario;

use scenario::{Replay, Scenario};

#[derive(Parser)]
#[command(name = "bubbl")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Chat bubble layout toolkit", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Layout configuration file (defaults to ./bubbl.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack media items into an album grid
    Mosaic {
        /// Item sizes as WIDTHxHEIGHT, or a bare aspect ratio
        #[arg(required = true)]
        items: Vec<String>,

        /// Width of the album
        #[arg(short = 'W', long, default_value = "320")]
        width: f32,

        /// Maximum height of the album (unbounded when omitted)
        #[arg(short = 'H', long)]
        height: Option<f32>,
    },

    /// Replay a scenario file and print one JSON frame per line
    Replay {
        /// Scenario file
        scenario: PathBuf,

        /// Print only the final frame
        #[arg(long)]
        last: bool,
    },

    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cwd = std::env::current_dir()?;
    let layout = config::load(cli.config.as_deref(), &cwd)?;

    match cli.command {
        Commands::Mosaic {
            items,
            width,
            height,
        } => cmd_mosaic(&layout, &items, width, height),

        Commands::Replay { scenario, last } => cmd_replay(&layout, &scenario, last),

        Commands::Config => cmd_config(&layout),
    }
}

fn cmd_mosaic(
    layout: &bubbl_layout::LayoutConfig,
    items: &[String],
    width: f32,
    height: Option<f32>,
) -> Result<()> {
    let sizes = items
        .iter()
        .map(|item| parse_item(item))
        .collect::<Result<Vec<_>>>()?;

    let packer = MosaicPacker::new(layout.mosaic);
    let mosaic = packer.pack(&sizes, width, height.unwrap_or(f32::INFINITY));
    info!(
        "Packed {} items into {} rows ({}x{})",
        sizes.len(),
        mosaic.rows.len(),
        mosaic.size.width,
        mosaic.size.height
    );

    println!("{}", serde_json::to_string_pretty(&mosaic)?);
    Ok(())
}

fn cmd_replay(layout: &bubbl_layout::LayoutConfig, path: &Path, last: bool) -> Result<()> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let scenario =
        Scenario::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))?;

    info!("Replaying {} steps from {}", scenario.steps.len(), path.display());
    let frames = Replay::new(layout, &scenario).run(&scenario.steps);
    info!("Recorded {} frames", frames.len());

    let frames = if last {
        frames.last().into_iter().collect::<Vec<_>>()
    } else {
        frames.iter().collect()
    };
    for frame in frames {
        println!("{}", serde_json::to_string(frame)?);
    }
    Ok(())
}

fn cmd_config(layout: &bubbl_layout::LayoutConfig) -> Result<()> {
    print!("{}", config::to_toml(layout)?);
    Ok(())
}

/// Parse `WIDTHxHEIGHT` or a bare aspect ratio
fn parse_item(item: &str) -> Result<Size> {
    let parse = |text: &str| -> Result<f32> {
        text.trim()
            .parse::<f32>()
            .with_context(|| format!("Invalid number '{}' in item '{}'", text, item))
    };

    match item.split_once(['x', 'X']) {
        Some((w, h)) => Ok(Size::new(parse(w)?, parse(h)?)),
        None => Ok(Size::new(parse(item)?, 1.0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item() {
        assert_eq!(parse_item("1920x1080").unwrap(), Size::new(1920.0, 1080.0));
        assert_eq!(parse_item("3X4").unwrap(), Size::new(3.0, 4.0));
        assert_eq!(parse_item("1.5").unwrap(), Size::new(1.5, 1.0));
        assert!(parse_item("wide").is_err());
        assert!(parse_item("10x").is_err());
    }

    #[test]
    fn test_cli_parses_mosaic() {
        let cli = Cli::try_parse_from(["bubbl", "mosaic", "4x3", "1", "-W", "280"]).unwrap();
        match cli.command {
            Commands::Mosaic {
                items,
                width,
                height,
            } => {
                assert_eq!(items, vec!["4x3", "1"]);
                assert_eq!(width, 280.0);
                assert_eq!(height, None);
            }
            _ => panic!("expected mosaic"),
        }
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::try_parse_from(["bubbl", "config", "--verbose", "--config", "a.toml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("a.toml")));
        assert!(matches!(cli.command, Commands::Config));
    }
}
