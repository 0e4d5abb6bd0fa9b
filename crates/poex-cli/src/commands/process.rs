//! Process command - extract item rows from a single purchase order.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use rust_decimal::Decimal;
use tracing::info;

use poex_core::ExtractionResult;

use crate::table::RowTable;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let source = super::single_source(&args.input)?;

    info!("Processing file: {}", source);

    let result = super::extract_document(&source, &config)?;

    for warning in &result.warnings {
        eprintln!("{} {}: {}", style("⚠").yellow(), source, warning);
    }

    let output = format_result(&result, args.format, config.output.delimiter)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        print!("{}", output);
    }

    Ok(())
}

fn format_result(
    result: &ExtractionResult,
    format: OutputFormat,
    delimiter: char,
) -> anyhow::Result<String> {
    let mut table = RowTable::new();
    table.extend(result.rows.iter().cloned());

    let mut buf = Vec::new();
    match format {
        OutputFormat::Json => table.write_json(&mut buf)?,
        OutputFormat::Csv => table.write_csv(&mut buf, delimiter)?,
        OutputFormat::Text => return Ok(format_text(result)),
    }

    Ok(String::from_utf8(buf)?)
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

fn format_text(result: &ExtractionResult) -> String {
    let header = &result.header;
    let mut output = String::new();

    let _ = writeln!(output, "Purchase Order: {}", or_dash(&header.document_number));
    let _ = writeln!(output, "Issue Date:     {}", or_dash(&header.issue_date));
    let _ = writeln!(output, "Payment Term:   {}", or_dash(&header.payment_term));
    let _ = writeln!(output, "Ship Via:       {}", or_dash(&header.ship_via));
    let _ = writeln!(output, "FOB:            {}", or_dash(&header.fob));
    let _ = writeln!(output, "Buyer:          {}", or_dash(&header.buyer));
    let _ = writeln!(output, "Requisition:    {}", or_dash(&header.requisition_number));
    let _ = writeln!(output, "Requisitioner:  {}", or_dash(&header.requisitioner));
    let _ = writeln!(output);

    let _ = writeln!(output, "Items ({}):", result.rows.len());
    for row in &result.rows {
        let _ = writeln!(
            output,
            "  {:>4}  {} {} @ {} = {}  (due {})",
            or_dash(&row.item_code),
            or_dash(&row.quantity),
            or_dash(&row.unit_of_measure),
            or_dash(&row.price),
            or_dash(&row.total),
            or_dash(&row.delivery_date),
        );
        if !row.description.is_empty() {
            let _ = writeln!(output, "        {}", row.description);
        }
    }

    let total: Decimal = result.rows.iter().filter_map(|r| r.total_value()).sum();
    let _ = writeln!(output);
    let _ = writeln!(output, "Total: {}", total);
    let _ = writeln!(output, "Lines: {}  Time: {}ms", result.line_count, result.processing_time_ms);

    output
}
