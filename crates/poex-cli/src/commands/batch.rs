//! Batch processing command for many purchase order documents.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::Local;
use clap::Args;
use console::style;
use futures_util::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error};

use poex_core::models::config::PoexConfig;
use poex_core::ExtractionResult;

use crate::input::{discover, DocumentSource};
use crate::table::RowTable;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input directory, file, ZIP archive or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output file
    #[arg(short, long, default_value = "po_extracted.csv")]
    output: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: TableFormat,

    /// Also write a per-document summary CSV
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Number of documents processed concurrently
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Keep duplicate rows
    #[arg(long)]
    no_dedupe: bool,

    /// Keep discovery order instead of sorting by document number
    #[arg(long)]
    no_sort: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum TableFormat {
    /// Delimited text with a header row
    Csv,
    /// JSON array of row objects
    Json,
}

/// Outcome of processing a single document.
struct DocumentOutcome {
    name: String,
    result: Result<ExtractionResult, String>,
    processing_time_ms: u64,
}

impl DocumentOutcome {
    fn status(&self) -> &'static str {
        match &self.result {
            Ok(r) if r.rows.is_empty() => "empty",
            Ok(_) => "success",
            Err(_) => "error",
        }
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = Arc::new(super::load_config(config_path)?);

    // A stale output from an earlier run must not survive an empty batch
    if args.output.exists() {
        fs::remove_file(&args.output)?;
        debug!("Removed previous output {}", args.output.display());
    }

    let sources = discover(&args.input)?;
    if sources.is_empty() {
        anyhow::bail!("No PDF or text documents found in: {}", args.input);
    }

    println!(
        "{} Found {} documents to process",
        style("ℹ").blue(),
        sources.len()
    );

    let pb = ProgressBar::new(sources.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents",
            )
            .unwrap()
            .progress_chars("=>-"),
    );

    let outcomes = process_all(sources, config.clone(), args.jobs, &pb).await;
    pb.finish_and_clear();

    let mut table = RowTable::new();
    for outcome in &outcomes {
        if let Ok(result) = &outcome.result {
            table.extend(result.rows.iter().cloned());
        }
    }
    let extracted = table.len();

    let dedupe = config.output.deduplicate && !args.no_dedupe;
    let removed = if dedupe { table.deduplicate() } else { 0 };
    if config.output.sort_by_document && !args.no_sort {
        table.sort_by_document();
    }

    if let Some(summary_path) = &args.summary {
        write_summary(summary_path, &outcomes)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    if table.is_empty() {
        println!(
            "{} No rows extracted, {} not written",
            style("⚠").yellow(),
            args.output.display()
        );
    } else {
        write_table(&table, &args.output, args.format, config.output.delimiter)?;
        println!(
            "{} Wrote {} rows to {}",
            style("✓").green(),
            table.len(),
            args.output.display()
        );
    }

    print_summary(&outcomes, extracted, removed, start);
    Ok(())
}

/// Process documents on the blocking pool, `jobs` at a time, keeping discovery order.
async fn process_all(
    sources: Vec<DocumentSource>,
    config: Arc<PoexConfig>,
    jobs: usize,
    pb: &ProgressBar,
) -> Vec<DocumentOutcome> {
    stream::iter(sources.into_iter().map(|source| {
        let config = config.clone();
        let pb = pb.clone();
        let name = source.to_string();
        async move {
            let task_name = name.clone();
            let task = tokio::task::spawn_blocking(move || {
                let outcome = process_document(task_name, &source, &config);
                pb.inc(1);
                outcome
            });
            task.await.unwrap_or_else(|e| {
                error!("Worker for {} panicked: {}", name, e);
                DocumentOutcome {
                    name,
                    result: Err(format!("worker failed: {e}")),
                    processing_time_ms: 0,
                }
            })
        }
    }))
    .buffered(jobs.max(1))
    .collect()
    .await
}

fn process_document(
    name: String,
    source: &DocumentSource,
    config: &PoexConfig,
) -> DocumentOutcome {
    let start = Instant::now();

    let result = match super::extract_document(source, config) {
        Ok(result) => {
            debug!("{}: {} rows", name, result.rows.len());
            Ok(result)
        }
        Err(e) => {
            error!("Failed to process {}: {:#}", name, e);
            Err(format!("{e:#}"))
        }
    };

    DocumentOutcome {
        name,
        result,
        processing_time_ms: start.elapsed().as_millis() as u64,
    }
}

fn write_table(
    table: &RowTable,
    path: &Path,
    format: TableFormat,
    delimiter: char,
) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = fs::File::create(path)?;
    match format {
        TableFormat::Csv => table.write_csv(file, delimiter),
        TableFormat::Json => table.write_json(std::io::BufWriter::new(file)),
    }
}

fn write_summary(path: &Path, outcomes: &[DocumentOutcome]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    let processed_at = Local::now().to_rfc3339();

    wtr.write_record([
        "filename",
        "status",
        "document_number",
        "rows",
        "lines",
        "processing_time_ms",
        "processed_at",
        "message",
    ])?;

    for outcome in outcomes {
        let time = outcome.processing_time_ms.to_string();
        match &outcome.result {
            Ok(result) => wtr.write_record([
                outcome.name.as_str(),
                outcome.status(),
                result.header.document_number.as_str(),
                &result.rows.len().to_string(),
                &result.line_count.to_string(),
                &time,
                &processed_at,
                &result.warnings.join("; "),
            ])?,
            Err(message) => wtr.write_record([
                outcome.name.as_str(),
                outcome.status(),
                "",
                "0",
                "0",
                &time,
                &processed_at,
                message.as_str(),
            ])?,
        }
    }

    wtr.flush()?;
    Ok(())
}

fn print_summary(outcomes: &[DocumentOutcome], extracted: usize, removed: usize, start: Instant) {
    let failed: Vec<_> = outcomes.iter().filter(|o| o.result.is_err()).collect();
    let empty: Vec<_> = outcomes.iter().filter(|o| o.status() == "empty").collect();

    println!();
    println!(
        "{} Processed {} documents in {:?}",
        style("✓").green(),
        outcomes.len(),
        start.elapsed()
    );
    println!(
        "   {} rows extracted, {} duplicates removed",
        style(extracted).green(),
        removed
    );
    println!(
        "   {} documents without rows, {} failed",
        style(empty.len()).yellow(),
        style(failed.len()).red()
    );

    if !empty.is_empty() {
        println!();
        println!("{}", style("Documents without rows:").yellow());
        for outcome in &empty {
            let reason = outcome
                .result
                .as_ref()
                .map(|r| r.warnings.join("; "))
                .unwrap_or_default();
            println!("  - {}: {}", outcome.name, reason);
        }
    }

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed documents:").red());
        for outcome in &failed {
            println!(
                "  - {}: {}",
                outcome.name,
                outcome.result.as_ref().err().map(String::as_str).unwrap_or("unknown error")
            );
        }
    }
}
