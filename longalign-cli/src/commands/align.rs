//! Align command implementation - seed-and-extend every query against the reference

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use longalign_core::io::FastaParser;
use longalign_core::nucleotide::is_complement;
use longalign_core::{
    AlignerParams, AlignmentRegion, AlignmentReport, LocalShortRegionAligner, LongSequenceAligner, Sequence,
    ShortRegionAligner,
};

use crate::config::{Config, OutputFormat};
use crate::error::CliError;

/// Fixed seed used in deterministic mode when none is given
const DETERMINISTIC_SEED: u64 = 42;

/// Alignment of one query record
#[derive(Debug, Serialize)]
pub struct QueryAlignment {
    pub query_id: String,
    pub reference_id: String,
    pub reverse_complement: bool,
    #[serde(flatten)]
    pub report: AlignmentReport,
}

#[allow(clippy::too_many_arguments)]
pub fn execute(
    config: &Config,
    deterministic: bool,
    reference: PathBuf,
    query: PathBuf,
    output: Option<PathBuf>,
    format: Option<OutputFormat>,
    seed: Option<u64>,
    seed_length: Option<usize>,
    max_tries: Option<usize>,
    max_iterations: Option<usize>,
    reverse_complement: bool,
    short_region_fallback: bool,
) -> Result<()> {
    log::info!("Reference: {}", reference.display());
    log::info!("Query: {}", query.display());

    let params = build_params(
        config,
        deterministic || config.general.deterministic,
        seed,
        seed_length,
        max_tries,
        max_iterations,
    )?;
    log::info!(
        "Seed length {}, {} tries per length, rng seed {}",
        params.default_seed_length,
        params.maximum_seeding_tries,
        params.rng_seed.map_or_else(|| "random".to_string(), |s| s.to_string())
    );

    log::info!("Loading reference sequence");
    let reference_sequences = load_fasta(&reference).context("Failed to load reference sequences")?;
    log::info!("Loading query sequences");
    let query_sequences = load_fasta(&query).context("Failed to load query sequences")?;

    let reference_sequence = reference_sequences
        .first()
        .ok_or_else(|| CliError::empty_input(reference.clone()))?;
    if reference_sequences.len() > 1 {
        log::warn!(
            "{} reference records found, aligning against the first ({})",
            reference_sequences.len(),
            reference_sequence.id
        );
    }
    log::info!(
        "Aligning {} query sequences against {} ({} bp)",
        query_sequences.len(),
        reference_sequence.id,
        reference_sequence.len()
    );

    let fallback = short_region_fallback.then(LocalShortRegionAligner::new);
    if let Some(aligner) = &fallback {
        log::info!("Short region fallback enabled ({})", aligner.name());
    }

    let alignments = query_sequences
        .par_iter()
        .enumerate()
        .map(|(index, query_sequence)| {
            align_record(
                reference_sequence,
                query_sequence,
                &params,
                index,
                reverse_complement,
                fallback.as_ref().map(|a| a as &(dyn ShortRegionAligner<u8> + Sync)),
            )
        })
        .collect::<Result<Vec<_>>>()?;

    let region_count: usize = alignments.iter().map(|a| a.report.regions.len()).sum();
    log::info!("Found {} regions across {} queries", region_count, alignments.len());

    let mut writer: Box<dyn Write> = match &output {
        Some(path) => {
            log::info!("Writing output to {}", path.display());
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };

    let written = match format.unwrap_or(config.output.format) {
        OutputFormat::Tsv => write_tsv(&mut writer, &alignments),
        OutputFormat::Json => write_json(&mut writer, &alignments),
    };
    written.context("Failed to write alignment output")?;
    writer.flush().context("Failed to flush alignment output")?;

    log::info!("Alignment completed successfully");
    Ok(())
}

fn load_fasta(path: &Path) -> Result<Vec<Sequence>> {
    let sequences = FastaParser::parse_file(path)
        .with_context(|| format!("Failed to parse FASTA/FASTQ file: {}", path.display()))?;
    if sequences.is_empty() {
        return Err(CliError::empty_input(path.to_path_buf()).into());
    }
    Ok(sequences)
}

/// CLI arguments, then config, then defaults
fn build_params(
    config: &Config,
    deterministic: bool,
    seed: Option<u64>,
    seed_length: Option<usize>,
    max_tries: Option<usize>,
    max_iterations: Option<usize>,
) -> Result<AlignerParams> {
    let mut params = config.align.clone();
    if let Some(length) = seed_length {
        params.default_seed_length = length;
    }
    if let Some(tries) = max_tries {
        params.maximum_seeding_tries = tries;
    }
    if max_iterations.is_some() {
        params.max_iterations = max_iterations;
    }
    params.rng_seed = seed.or(params.rng_seed);
    if deterministic && params.rng_seed.is_none() {
        log::info!("Running in deterministic mode");
        params.rng_seed = Some(DETERMINISTIC_SEED);
    }

    params
        .validate()
        .map_err(|e| CliError::invalid_argument(e.to_string()))?;
    Ok(params)
}

/// Align one query record with its own aligner; a fixed seed is offset by
/// the record index so results do not depend on scheduling.
fn align_record(
    reference: &Sequence,
    query: &Sequence,
    params: &AlignerParams,
    index: usize,
    reverse_complement: bool,
    fallback: Option<&(dyn ShortRegionAligner<u8> + Sync)>,
) -> Result<QueryAlignment> {
    let mut params = params.clone();
    params.rng_seed = params.rng_seed.map(|seed| seed.wrapping_add(index as u64));
    let mut aligner = LongSequenceAligner::new(params)?;

    let result = if reverse_complement {
        // Reversed query against complementary bases is its reverse strand
        let reversed: Vec<u8> = query.data.iter().rev().copied().collect();
        run_aligner(&mut aligner, &reference.data, &reversed, is_complement, fallback)
    } else {
        run_aligner(&mut aligner, &reference.data, &query.data, |a: &u8, b: &u8| a == b, fallback)
    };
    let report = result.with_context(|| format!("Failed to align {} against {}", query.id, reference.id))?;

    log::debug!(
        "{}: {} regions, {} unaligned parts",
        query.id,
        report.regions.len(),
        report.unaligned.len()
    );

    Ok(QueryAlignment {
        query_id: query.id.clone(),
        reference_id: reference.id.clone(),
        reverse_complement,
        report,
    })
}

fn run_aligner<F>(
    aligner: &mut LongSequenceAligner,
    reference: &[u8],
    query: &[u8],
    eq: F,
    fallback: Option<&(dyn ShortRegionAligner<u8> + Sync)>,
) -> longalign_core::AlignResult<AlignmentReport>
where
    F: Fn(&u8, &u8) -> bool,
{
    match fallback {
        Some(short_aligner) => aligner.align_detailed_with(reference, query, eq, short_aligner),
        None => aligner.align_detailed_by(reference, query, eq),
    }
}

fn position(value: Option<usize>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// One line per region; inclusive coordinates, `-` for an absent axis
fn write_tsv<W: Write>(writer: &mut W, alignments: &[QueryAlignment]) -> std::io::Result<()> {
    writeln!(
        writer,
        "query_id\tkind\treference_start\treference_end\tquery_start\tquery_end\tlength"
    )?;
    for alignment in alignments {
        for region in &alignment.report.regions {
            write_region(writer, &alignment.query_id, region)?;
        }
    }
    Ok(())
}

fn write_region<W: Write>(writer: &mut W, query_id: &str, region: &AlignmentRegion) -> std::io::Result<()> {
    writeln!(
        writer,
        "{}\t{}\t{}\t{}\t{}\t{}\t{}",
        query_id,
        region.kind(),
        region.reference_start(),
        position(region.reference_end()),
        position(region.query_start()),
        position(region.query_end()),
        region.length()
    )
}

fn write_json<W: Write>(writer: &mut W, alignments: &[QueryAlignment]) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, alignments)?;
    writeln!(writer)
}
