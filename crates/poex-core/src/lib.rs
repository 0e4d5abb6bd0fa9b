//! Core library for purchase order extraction.
//!
//! This crate provides:
//! - PDF reading into positioned text fragments (lopdf + pdf-extract)
//! - Line normalization into reading order
//! - Heuristic header and line-item field extraction
//! - Purchase order row models and pipeline configuration

pub mod error;
pub mod models;
pub mod order;
pub mod pdf;

pub use error::{PoexError, Result};
pub use models::config::PoexConfig;
pub use models::order::{HeaderFields, ItemRow};
pub use order::{ExtractionResult, OrderExtractor, PurchaseOrderParser};
pub use pdf::{DocumentReader, Page, PdfExtractor, PlainTextReader, TextFragment};
