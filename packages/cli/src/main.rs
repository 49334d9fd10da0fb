#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the district environmental health index.
//!
//! `build` fuses the three domain documents into the index document.
//! `summarize` produces a domain document from per-postcode sample CSVs.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use env_health_index::output::write_json;
use env_health_index::pipeline::run;
use env_health_index::samples::{summarize_air, summarize_greenspace, summarize_noise};
use env_health_index::{IndexConfig, InputPaths};
use env_health_index_models::FusedIndex;

#[derive(Parser)]
#[command(name = "env_health", about = "District environmental health index")]
struct Cli {
    /// TOML file overriding the default configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fuse the air, noise, and greenspace documents into the index
    Build {
        /// Air district records (JSON)
        #[arg(long)]
        air: PathBuf,

        /// Noise district records (JSON)
        #[arg(long)]
        noise: PathBuf,

        /// Greenspace district records (JSON)
        #[arg(long)]
        greenspace: PathBuf,

        /// Where to write the index document
        #[arg(long, default_value = "env_health_index.json")]
        output: PathBuf,

        /// Write compact JSON regardless of the config
        #[arg(long)]
        compact: bool,
    },
    /// Build a domain document from per-postcode samples
    Summarize {
        #[command(subcommand)]
        domain: SummarizeDomain,
    },
}

#[derive(Subcommand)]
enum SummarizeDomain {
    /// Postcode pollutant samples (CSV)
    Air {
        #[arg(long)]
        samples: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// Postcode rail and road noise samples (CSV)
    Noise {
        #[arg(long)]
        samples: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// Postcode access distances and greenspace site areas (CSV)
    Greenspace {
        #[arg(long)]
        samples: PathBuf,
        #[arg(long)]
        sites: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let mut config = IndexConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Build {
            air,
            noise,
            greenspace,
            output,
            compact,
        } => {
            if compact {
                config.output.pretty = false;
            }
            let paths = InputPaths {
                air,
                noise,
                greenspace,
            };
            let fused = run(&paths, &output, &config)?;
            print_summary(&fused, &output);
        }
        Commands::Summarize { domain } => summarize(domain, &config)?,
    }

    Ok(())
}

fn summarize(domain: SummarizeDomain, config: &IndexConfig) -> Result<(), Box<dyn std::error::Error>> {
    let pretty = config.output.pretty;

    let (count, output) = match domain {
        SummarizeDomain::Air { samples, output } => {
            let records = summarize_air(open(&samples)?, &config.samples)?;
            write_json(&output, &records, pretty)?;
            (records.len(), output)
        }
        SummarizeDomain::Noise { samples, output } => {
            let records = summarize_noise(open(&samples)?, &config.samples)?;
            write_json(&output, &records, pretty)?;
            (records.len(), output)
        }
        SummarizeDomain::Greenspace {
            samples,
            sites,
            output,
        } => {
            let records = summarize_greenspace(open(&samples)?, open(&sites)?, &config.samples)?;
            write_json(&output, &records, pretty)?;
            (records.len(), output)
        }
    };

    println!("Summarized {count} districts to {}", output.display());
    Ok(())
}

fn open(path: &Path) -> Result<BufReader<File>, Box<dyn std::error::Error>> {
    let file = File::open(path).map_err(|e| format!("Failed to open {}: {e}", path.display()))?;
    Ok(BufReader::new(file))
}

fn print_summary(fused: &[FusedIndex], output: &Path) {
    let mut bands: BTreeMap<String, usize> = BTreeMap::new();
    for index in fused {
        *bands.entry(index.score_band.to_string()).or_default() += 1;
    }

    println!("Wrote {} districts to {}", fused.len(), output.display());
    for (band, count) in &bands {
        println!("  {band}: {count}");
    }
}
