use std::path::PathBuf;

use _model::Franchise;
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::{config::Config, refinery::compare::Columns};

mod config;
mod error;
mod refinery;
mod stores;
mod table;
mod utils;

#[derive(Debug, Parser)]
#[command(name = "storemap", about = "Franchise store listings and district cleanup")]
struct Cli {
    /// YAML config file (defaults to ./storemap.yaml when present)
    #[arg(long, global = true, env = "STOREMAP_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for fetched store listings, overriding the config
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Fetch store listings; every franchise when none is given
    Fetch { franchise: Option<Franchise> },

    /// Split store addresses and sort rows by known district
    Filter {
        /// Directory holding the store CSVs (defaults to the output directory)
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Reference districts (시군구명, optionally 시도명)
        #[arg(long, default_value = "sample.csv")]
        sample: PathBuf,
        /// Rows with an unknown district
        #[arg(long, default_value = "fail.csv")]
        fail: PathBuf,
    },

    /// Copy a column from B into A where two key columns match
    Compare {
        #[arg(long, default_value = "hu.csv")]
        a: PathBuf,
        #[arg(long, default_value = "extracted_sig_data.csv")]
        b: PathBuf,
        /// Write here instead of overwriting A
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long, num_args = 2, default_values = ["prov", "area"])]
        a_keys: Vec<String>,
        #[arg(long, num_args = 2, default_values = ["prov", "SIG_KOR_NM"])]
        b_keys: Vec<String>,
        #[arg(long, default_value = "SIG_CD")]
        source: String,
        #[arg(long, default_value = "sig_cd")]
        target: String,
    },

    /// Distinct normalized (province, district) pairs of a bulk dataset folder
    UniqueAreas {
        folder: PathBuf,
        #[arg(long, default_value = "unique_cities_normalized.csv")]
        output: PathBuf,
    },

    /// Rows of a bulk dataset folder whose business name contains a keyword
    Collect {
        folder: PathBuf,
        #[arg(long, default_value = "issac.csv")]
        output: PathBuf,
        #[arg(long, default_value = "이삭토스트")]
        keyword: String,
    },

    /// Store counts, ratios and densities per district
    Ratios {
        /// Filtered listings (defaults to <output-dir>/filter)
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Land and population per district
        #[arg(long, default_value = "hu.csv")]
        hu: PathBuf,
        #[arg(long, default_value = "ratios.csv")]
        output: PathBuf,
        /// Fold `XX시 YY구` into `XX시` outside metropolitan cities
        #[arg(long)]
        merge_wards: bool,
        /// Sources summed for the ratio column, overriding the config
        #[arg(long, num_args = 1..)]
        numerator: Option<Vec<String>>,
        /// Sources summed below the line, overriding the config
        #[arg(long, num_args = 1..)]
        denominator: Option<Vec<String>>,
    },

    /// Rewrite a CSV as UTF-8 with a signature
    Reencode {
        #[arg(default_value = "hu.csv")]
        input: PathBuf,
        /// Defaults to <input>-utf8.csv
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(x) = cli.output_dir {
        config.output_dir = x;
    }

    match cli.command {
        Command::Fetch { franchise } => {
            let franchises = match franchise {
                Some(x) => vec![x],
                None => Franchise::all(),
            };
            stores::main(franchises, &config)?;
        }
        Command::Filter { dir, sample, fail } => {
            let dir = config.stores_dir(dir);
            refinery::filter::run(&dir, &sample, &fail, &config.aliases()?)?;
        }
        Command::Compare {
            a,
            b,
            output,
            a_keys,
            b_keys,
            source,
            target,
        } => {
            let columns = Columns {
                a_keys: [a_keys[0].clone(), a_keys[1].clone()],
                b_keys: [b_keys[0].clone(), b_keys[1].clone()],
                source,
                target,
            };
            refinery::compare::run(&a, &b, output.as_deref(), &columns)?;
        }
        Command::UniqueAreas { folder, output } => {
            refinery::unique_areas::run(&folder, &output, &config.aliases()?, config.bulk.threads)?;
        }
        Command::Collect {
            folder,
            output,
            keyword,
        } => {
            refinery::collect::run(&folder, &output, &keyword, config.bulk.threads)?;
        }
        Command::Ratios {
            dir,
            hu,
            output,
            merge_wards,
            numerator,
            denominator,
        } => {
            let dir = dir.unwrap_or_else(|| config.stores_dir(None).join("filter"));
            let mut ratios = config.ratios.clone();
            if let Some(x) = numerator {
                ratios.numerator = x;
            }
            if let Some(x) = denominator {
                ratios.denominator = x;
            }
            refinery::ratios::run(&dir, &hu, &output, &ratios, merge_wards)?;
        }
        Command::Reencode { input, output } => {
            let output = output.unwrap_or_else(|| refinery::reencode::default_output(&input));
            refinery::reencode::run(&input, &output)?;
        }
    }

    Ok(())
}
