//! Purchase order field extraction module.

pub mod block;
pub mod header;
pub mod normalize;
mod parser;
pub mod rules;
pub mod segment;

pub use block::{extract_block, extract_item, BlockExtraction};
pub use header::extract_header;
pub use normalize::normalize_pages;
pub use parser::{ExtractionResult, PurchaseOrderParser};
pub use segment::{segment_blocks, ItemBlock};

use crate::error::Result;
use crate::pdf::DocumentReader;

/// Trait for extractors turning a loaded document into purchase order rows.
pub trait OrderExtractor {
    /// Extract all item rows from a loaded document.
    fn extract(&self, reader: &dyn DocumentReader) -> Result<ExtractionResult>;
}
