use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use prettybib_check::dedup::{CollisionGroup, FuzzyClusterer};
use prettybib_check::validation::{CheckLog, Diagnostic};
use prettybib_check::{CheckContext, FieldIndexes, IssnCache, Lookups, check_database};
use prettybib_core::error::ExitCode;
use prettybib_core::formats::parse_bibtex_strict;
use prettybib_core::{AppConfig, BibWriter, CitationDatabase, parse_bibtex};

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "prettybib",
    about = "Check, repair and format a BibTeX database",
    version,
    long_about = None
)]
struct Cli {
    /// Input file, stdin when omitted.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output file, stdout when omitted.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Search for missing information to fix the database.
    #[arg(long)]
    try_fix: bool,

    /// Never query online services.
    #[arg(long)]
    offline: bool,

    /// BibTeX files with known papers.
    #[arg(long, num_args = 1..)]
    anthologies: Vec<PathBuf>,

    /// Config file instead of the default location.
    /// Also honored via PRETTYBIB_CONFIG.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only check that the input parses and echo it back.
    #[arg(long)]
    validate_only: bool,

    /// Print check diagnostics as JSON.
    #[arg(long)]
    json: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("cannot read stdin")?;
            Ok(buffer)
        }
    }
}

fn write_output(path: Option<&Path>, contents: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, contents)
            .with_context(|| format!("cannot write {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(contents.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

// ─── Reporting ──────────────────────────────────────────────────────────────

fn print_diagnostics(log: &CheckLog, json: bool) -> Result<()> {
    if json {
        let diagnostics: &[Diagnostic] = log.diagnostics();
        eprintln!("{}", serde_json::to_string_pretty(diagnostics)?);
        return Ok(());
    }
    for diagnostic in log.diagnostics() {
        if diagnostic.is_error() {
            eprintln!("error: {diagnostic}");
        } else {
            eprintln!("{diagnostic}");
        }
    }
    Ok(())
}

fn print_collisions(label: &str, groups: &[CollisionGroup]) {
    for group in groups {
        eprintln!("{}", group.describe(label));
        for (value, ids) in &group.members {
            eprintln!(" * '{}' ({})", value, ids.join(", "));
        }
    }
}

/// Collision groups per report label, each index clustered at its own
/// configured threshold.
fn near_duplicates(
    config: &AppConfig,
    indexes: &FieldIndexes,
) -> Vec<(&'static str, Vec<CollisionGroup>)> {
    [
        ("Authors", config.check.author_threshold, &indexes.authors),
        ("Journals", config.check.journal_threshold, &indexes.journals),
        (
            "Booktitles (proceedings)",
            config.check.booktitle_threshold,
            &indexes.booktitles,
        ),
    ]
    .into_iter()
    .map(|(label, threshold, index)| (label, FuzzyClusterer::new(threshold).cluster(index)))
    .collect()
}

fn report_near_duplicates(config: &AppConfig, indexes: &FieldIndexes) {
    for (label, groups) in near_duplicates(config, indexes) {
        print_collisions(label, &groups);
    }
}

// ─── Commands ───────────────────────────────────────────────────────────────

/// Echoes the input when every record parses, prints nothing otherwise.
fn validate_only(input: &str, output: Option<&Path>) -> Result<()> {
    match parse_bibtex_strict(input) {
        Ok(_) => write_output(output, input),
        Err(e) => {
            warn!("{}", e);
            std::process::exit(ExitCode::GeneralError as i32);
        }
    }
}

async fn run(cli: Cli, input: String) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    if cli.try_fix {
        config.check.try_fix = true;
    }
    if cli.offline {
        config.lookup.enabled = false;
    }

    let mut anthologies = cli.anthologies.clone();
    anthologies.extend(config.anthologies.paths.iter().cloned());
    let mut citations = CitationDatabase::new();
    let loaded = citations.load_anthologies(&anthologies);
    info!(
        "{} known papers from {} anthologies",
        loaded,
        anthologies.len()
    );

    let mut database = parse_bibtex(&input);
    for skipped in &database.skipped {
        warn!("line {}: {}", skipped.line, skipped.message);
    }

    let lookups = Lookups::from_config(&config.lookup, &AppConfig::cache_dir())?;
    let mut ctx = CheckContext::new(&citations, lookups)
        .with_issn_cache(IssnCache::from_entries(&database.entries));
    let indexes = check_database(&mut ctx, &mut database.entries, config.check.try_fix).await;

    print_diagnostics(&ctx.log, cli.json)?;
    report_near_duplicates(&config, &indexes);
    eprintln!(
        "checked {} entries, skipped {} records",
        database.entries.len(),
        database.skipped.len()
    );

    let writer = BibWriter::new()
        .with_indent(config.output.indent.clone())
        .with_align_values(config.output.align_values);
    write_output(cli.output.as_deref(), &writer.write_database(&database))
}

// ─── Main ────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let input = read_input(cli.input.as_deref())?;
    if cli.validate_only {
        return validate_only(&input, cli.output.as_deref());
    }
    run(cli, input).await
}
