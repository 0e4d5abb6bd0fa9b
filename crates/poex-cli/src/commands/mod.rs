//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod lines;
pub mod process;

use std::path::Path;

use tracing::debug;

use poex_core::models::config::PoexConfig;
use poex_core::pdf::{DocumentReader, Page};
use poex_core::{ExtractionResult, OrderExtractor, PurchaseOrderParser};

use crate::input::DocumentSource;

/// Load configuration from an explicit path, else the user config file, else defaults.
pub(crate) fn load_config(config_path: Option<&str>) -> anyhow::Result<PoexConfig> {
    if let Some(path) = config_path {
        return Ok(PoexConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        Ok(PoexConfig::from_file(&default_path)?)
    } else {
        Ok(PoexConfig::default())
    }
}

/// Open a document with the reader matching its kind.
pub(crate) fn open_document(
    source: &DocumentSource,
    config: &PoexConfig,
) -> anyhow::Result<Box<dyn DocumentReader>> {
    let data = source.read()?;
    let mut reader = source.kind().reader(&config.pdf);
    reader.load(&data)?;
    debug!("Loaded {} ({} pages)", source, reader.page_count());
    Ok(reader)
}

/// Read a document's pages.
pub(crate) fn read_pages(
    source: &DocumentSource,
    config: &PoexConfig,
) -> anyhow::Result<Vec<Page>> {
    let reader = open_document(source, config)?;
    Ok(reader.read_pages()?)
}

/// Run the full extraction pipeline on one document.
pub(crate) fn extract_document(
    source: &DocumentSource,
    config: &PoexConfig,
) -> anyhow::Result<ExtractionResult> {
    let reader = open_document(source, config)?;
    let parser = PurchaseOrderParser::with_config(&config.extraction);
    Ok(parser.extract(reader.as_ref())?)
}

/// Resolve a single-document argument into a source.
pub(crate) fn single_source(path: &Path) -> anyhow::Result<DocumentSource> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    let kind = crate::input::DocumentKind::from_path(path).ok_or_else(|| {
        anyhow::anyhow!(
            "Unsupported file format: {}",
            path.extension().and_then(|e| e.to_str()).unwrap_or("")
        )
    })?;

    Ok(DocumentSource::File {
        path: path.to_path_buf(),
        kind,
    })
}
