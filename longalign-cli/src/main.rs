use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;

mod commands;
mod config;
mod error;

use config::{Config, OutputFormat};
use error::CliError;

#[derive(Parser)]
#[command(name = "longalign")]
#[command(about = "longalign - seed-and-extend alignment of long sequences")]
#[command(version)]
#[command(long_about = "
longalign aligns long query sequences against a reference without global dynamic
programming: random unique seeds are grown into exact matches and the gaps between
them are reported as inserts, deletions or mismatches.

Examples:
  longalign align --ref genome.fa --qry contigs.fa --out regions.tsv
  longalign align --ref genome.fa --qry reads.fq.gz --format json --seed 7
  longalign config --out longalign.toml
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable deterministic mode for reproducible results
    #[arg(long, global = true)]
    pub deterministic: bool,

    /// Number of threads to use
    #[arg(short, long, global = true)]
    pub threads: Option<usize>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Align every query record against the first reference record
    Align {
        /// Reference sequence file (FASTA/FASTQ, optionally gzipped)
        #[arg(long, required = true)]
        r#ref: PathBuf,

        /// Query sequence file (FASTA/FASTQ, optionally gzipped)
        #[arg(long, required = true)]
        qry: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Output format
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Random seed for seed sampling
        #[arg(long)]
        seed: Option<u64>,

        /// Initial seed length
        #[arg(long)]
        seed_length: Option<usize>,

        /// Random seed positions sampled per seed length
        #[arg(long)]
        max_tries: Option<usize>,

        /// Upper bound on work queue iterations per query
        #[arg(long)]
        max_iterations: Option<usize>,

        /// Align the reverse strand of each query
        #[arg(long)]
        reverse_complement: bool,

        /// Resolve short unseedable regions with local alignment
        #[arg(long)]
        short_region_fallback: bool,
    },

    /// Print an example configuration file
    Config {
        /// Write the example to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn setup_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_secs()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = Config::load(cli.config.as_deref())?;

    let threads = cli.threads.unwrap_or(config.general.threads);
    if threads == 0 {
        return Err(CliError::invalid_argument("--threads must be at least 1").into());
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .context("Failed to set thread count")?;

    match cli.command {
        Commands::Align {
            r#ref,
            qry,
            out,
            format,
            seed,
            seed_length,
            max_tries,
            max_iterations,
            reverse_complement,
            short_region_fallback,
        } => {
            commands::align::execute(
                &config,
                cli.deterministic,
                r#ref,
                qry,
                out,
                format,
                seed,
                seed_length,
                max_tries,
                max_iterations,
                reverse_complement,
                short_region_fallback,
            )?;
        }

        Commands::Config { out } => match out {
            Some(path) => {
                Config::default().save_to_file(&path)?;
                log::info!("Wrote example configuration to {}", path.display());
            }
            None => print!("{}", Config::example_toml()?),
        },
    }

    Ok(())
}
