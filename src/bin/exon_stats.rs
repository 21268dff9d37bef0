use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use flate2::read::GzDecoder;
use serde::Serialize;

use exonic::cli;
use exonic::config::ParserConfig;
use exonic::exons::{ExonIntronStats, compute_exon_intron_stats, find_cds};
use exonic::genbank::{GenbankParser, GenbankRecord};
use exonic::strand::Strand;

#[derive(Parser)]
#[command(
    name = "exon_stats",
    about = "Report exon and intron statistics of GenBank records"
)]
struct Cli {
    /// GenBank flat files, plain or gzip-compressed (.gz)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Path to the JSON parser configuration file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Print one JSON object per record on stdout
    #[arg(long)]
    json: bool,

    /// Include the record sequence in the output
    #[arg(long)]
    sequence: bool,
}

/// Statistics of one record plus the metadata the caller attaches.
#[derive(Serialize)]
struct GeneReport<'a> {
    accession: &'a str,
    definition: Option<&'a str>,
    strand: Option<Strand>,
    #[serde(flatten)]
    stats: ExonIntronStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    sequence: Option<String>,
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let start = Instant::now();
    let cli_args = Cli::parse();

    cli::banner("Exon/Intron Statistics");

    // ── Configuration ────────────────────────────────────
    cli::section("Configuration");

    let config = match &cli_args.config {
        Some(path) => {
            cli::kv("Config", &path.display().to_string());
            ParserConfig::from_file(path)?
        }
        None => ParserConfig::default(),
    };
    cli::kv(
        "Metadata",
        if config.parse_metadata { "parsed" } else { "skipped" },
    );
    cli::kv(
        "Bad features",
        if config.strict_features { "fail" } else { "skip" },
    );
    cli::kv("Inputs", &cli_args.inputs.len().to_string());

    eprintln!();

    // ── Records ──────────────────────────────────────────
    cli::section("Records");

    let mut records = 0;
    let mut failures = 0;
    for path in &cli_args.inputs {
        match process_file(path, config, &cli_args) {
            Ok(count) => records += count,
            Err(e) => {
                failures += 1;
                cli::warning(&format!("{}: {e:#}", path.display()));
            }
        }
    }

    cli::print_summary(start, records, failures);
    Ok(())
}

fn open_input(path: &Path) -> Result<Box<dyn BufRead>> {
    let file =
        File::open(path).with_context(|| format!("failed to open: {}", path.display()))?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// `NM_000518.gb.gz` -> `NM_000518`
fn accession_from_path(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .and_then(|name| name.split('.').next().map(str::to_string))
        .unwrap_or_default()
}

fn process_file(path: &Path, config: ParserConfig, args: &Cli) -> Result<usize> {
    let mut parser = GenbankParser::with_config(open_input(path)?, config);
    let fallback_accession = accession_from_path(path);

    let mut count = 0;
    for record in parser.records() {
        let record = record.with_context(|| format!("failed to parse: {}", path.display()))?;
        let stats = compute_exon_intron_stats(&record.features, &record.sequence)
            .with_context(|| format!("failed to resolve exons in: {}", path.display()))?;
        report(&record, stats, &fallback_accession, args)?;
        count += 1;
    }
    Ok(count)
}

fn report(
    record: &GenbankRecord,
    stats: ExonIntronStats,
    fallback_accession: &str,
    args: &Cli,
) -> Result<()> {
    let metadata = record.metadata.as_ref();
    let gene = GeneReport {
        accession: metadata
            .and_then(|m| m.accession())
            .unwrap_or(fallback_accession),
        definition: metadata.and_then(|m| m.definition()),
        strand: find_cds(&record.features).map(|cds| cds.location.strand()),
        stats,
        sequence: args
            .sequence
            .then(|| record.sequence.to_uppercase().to_string()),
    };

    if args.json {
        println!("{}", serde_json::to_string(&gene)?);
        return Ok(());
    }

    let strand = gene
        .strand
        .map_or_else(|| "no CDS".to_string(), |s| s.to_string());
    cli::kv(
        gene.accession,
        &format!(
            "{} exons ({} bp), {} introns ({} bp), strand {strand}",
            stats.exons, stats.exons_length, stats.introns, stats.introns_length
        ),
    );
    if let Some(sequence) = &gene.sequence {
        cli::kv("", sequence);
    }
    Ok(())
}
