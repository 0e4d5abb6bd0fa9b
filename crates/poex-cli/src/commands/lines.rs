//! Lines command - show the normalized line sequence of a document.

use std::path::PathBuf;

use clap::Args;
use console::style;

use poex_core::order::normalize_pages;

/// Arguments for the lines command.
#[derive(Args)]
pub struct LinesArgs {
    /// Input file (PDF or text)
    #[arg(required = true)]
    input: PathBuf,
}

pub async fn run(args: LinesArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let source = super::single_source(&args.input)?;

    let pages = super::read_pages(&source, &config)?;
    let lines = normalize_pages(&pages);

    for (index, line) in lines.iter().enumerate() {
        println!("{} {}", style(format!("{index:>4}")).dim(), line);
    }

    eprintln!(
        "{} {} lines from {} pages",
        style("ℹ").blue(),
        lines.len(),
        pages.len()
    );

    Ok(())
}
