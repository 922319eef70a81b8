use anyhow::Result;
use clap::{Parser, Subcommand};
use cnpj2parquet::config::{LogConfig, RuntimeConfig};
use cnpj2parquet::jobs::{ExportJob, ExtractJob};
use cnpj2parquet::source::{parse_dataset, HttpTransport, SourceIndex};
use cnpj2parquet_core::{DatasetType, Projection};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

/// Convert the CNPJ business registry archives to Parquet
#[derive(Parser)]
#[command(name = "cnpj2parquet")]
#[command(version)]
#[command(about = "Convert the CNPJ business registry archives to Parquet", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short = 'v', long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download (if needed) and convert one archive of a dataset
    Extract {
        /// Zero-based archive index within the dataset
        #[arg(long, allow_negative_numbers = true)]
        part: i64,

        /// Dataset code: est, emp, soc, sim
        #[arg(long)]
        datatype: String,

        /// Download the archive even if it is already on disk
        #[arg(long)]
        update: bool,

        /// Maximum rows per Parquet part (overrides config file)
        #[arg(long, value_name = "ROWS")]
        batch_size: Option<usize>,
    },
    /// Join establishments with companies and write one projection
    Export {
        /// Establishments Parquet file or directory of parts
        #[arg(long, value_name = "PATH")]
        establishments: PathBuf,

        /// Companies Parquet file or directory of parts
        #[arg(long, value_name = "PATH")]
        companies: PathBuf,

        /// Output label
        #[arg(long)]
        label: String,

        /// merged, names or summary-info
        #[arg(long, default_value = "merged")]
        projection: Projection,
    },
    /// List the archives published for each dataset
    Links {
        /// Restrict the listing to one dataset code
        #[arg(long)]
        datatype: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    // Step 1: Load configuration (file, then environment)
    let mut config = match RuntimeConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            // Still report through the default subscriber
            cnpj2parquet::init_tracing(&LogConfig::default());
            return Err(err.context("Failed to load configuration"));
        }
    };

    // Step 2: Apply CLI overrides (highest priority)
    if let Some(level) = &cli.log_level {
        config.log.level = level.clone();
    }

    // Step 3: Initialize tracing before any job logs
    cnpj2parquet::init_tracing(&config.log);
    for warning in config.warnings() {
        warn!("{}", warning);
    }

    match cli.command {
        Commands::Extract {
            part,
            datatype,
            update,
            batch_size,
        } => run_extract(&config, &datatype, part, update, batch_size),
        Commands::Export {
            establishments,
            companies,
            label,
            projection,
        } => {
            let job = ExportJob::new(establishments, companies, label, projection, &config)?;
            let report = job.run()?;
            info!("Exported {} rows to {}", report.rows, report.output.display());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Links { datatype } => run_links(&config, datatype.as_deref()),
    }
}

fn run_extract(
    config: &RuntimeConfig,
    datatype: &str,
    part: i64,
    update: bool,
    batch_size: Option<usize>,
) -> Result<ExitCode> {
    if batch_size == Some(0) {
        anyhow::bail!("--batch-size must be greater than 0");
    }

    let job = ExtractJob::from_args(datatype, part, update, batch_size, config)?;
    let transport = HttpTransport::new()?;
    let report = job.run(&transport)?;

    if report.succeeded() {
        info!(
            "Wrote {} rows of {} part {} into {} file(s), {} member(s) skipped",
            report.rows,
            report.dataset,
            report.part,
            report.parts.len(),
            report.skipped.len()
        );
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn run_links(config: &RuntimeConfig, datatype: Option<&str>) -> Result<ExitCode> {
    let only: Option<DatasetType> = datatype.map(parse_dataset).transpose()?;

    let transport = HttpTransport::new()?;
    let index = SourceIndex::discover(&transport, &config.source.base_url)?;

    for (dataset, links) in index.iter() {
        if only.is_some_and(|d| d != dataset) {
            continue;
        }
        println!("{} ({}): {} part(s)", dataset, dataset.code(), links.len());
        for (part, link) in links.iter().enumerate() {
            println!("  {:>3}  {}", part, link.url);
        }
    }

    Ok(ExitCode::SUCCESS)
}
