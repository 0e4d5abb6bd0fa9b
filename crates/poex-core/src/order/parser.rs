//! Document-level purchase order parser.

use std::time::Instant;

use tracing::{debug, info, warn};

use super::block::extract_item;
use super::header::extract_header;
use super::normalize::normalize_pages;
use super::segment::segment_blocks;
use super::OrderExtractor;
use crate::error::Result;
use crate::models::config::ExtractionConfig;
use crate::models::order::{HeaderFields, ItemRow};
use crate::pdf::{DocumentReader, Page};

/// Result of extracting one document.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Header fields shared by all rows.
    pub header: HeaderFields,
    /// One row per item block, in discovery order.
    pub rows: Vec<ItemRow>,
    /// Number of normalized lines the document produced.
    pub line_count: usize,
    /// Reasons the document yielded no rows.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Heuristic purchase order parser.
///
/// Holds configuration only; every call starts from fresh state.
#[derive(Debug, Clone)]
pub struct PurchaseOrderParser {
    /// Prefix prepended to the document number digits.
    document_prefix: String,
}

impl PurchaseOrderParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self::with_config(&ExtractionConfig::default())
    }

    /// Create a parser from extraction settings.
    pub fn with_config(config: &ExtractionConfig) -> Self {
        Self {
            document_prefix: config.document_prefix.clone(),
        }
    }

    /// Set the document number prefix.
    pub fn with_document_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.document_prefix = prefix.into();
        self
    }

    /// Parse a document from its pages' positioned fragments.
    pub fn parse_pages(&self, pages: &[Page]) -> ExtractionResult {
        let start = Instant::now();
        let lines = normalize_pages(pages);
        let mut result = self.parse_lines(&lines);
        result.processing_time_ms = start.elapsed().as_millis() as u64;
        result
    }

    /// Parse a document from its normalized line sequence.
    pub fn parse_lines(&self, lines: &[String]) -> ExtractionResult {
        let start = Instant::now();
        let mut warnings = Vec::new();

        info!("Parsing purchase order from {} lines", lines.len());

        let header = extract_header(lines, &self.document_prefix);
        debug!(
            "Header: number={:?} issued={:?} terms={:?}",
            header.document_number, header.issue_date, header.payment_term
        );

        let rows: Vec<ItemRow> = match segment_blocks(lines) {
            Ok(blocks) => blocks.iter().map(|block| extract_item(block, &header)).collect(),
            Err(e) => {
                warn!("No rows can be extracted from {:?}: {}", header.document_number, e);
                warnings.push(e.to_string());
                Vec::new()
            }
        };

        debug!("Extracted {} rows for {:?}", rows.len(), header.document_number);

        ExtractionResult {
            header,
            rows,
            line_count: lines.len(),
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

impl Default for PurchaseOrderParser {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderExtractor for PurchaseOrderParser {
    fn extract(&self, reader: &dyn DocumentReader) -> Result<ExtractionResult> {
        let pages = reader.read_pages()?;
        Ok(self.parse_pages(&pages))
    }
}
