//! Error types for the poex-core library.

use thiserror::Error;

/// Main error type for the poex library.
#[derive(Error, Debug)]
pub enum PoexError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),
}

/// Errors raised while reading a document into text fragments.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the document.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from the document.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted with a non-empty password.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The document is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Conditions under which a readable document yields no item rows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The "Unit Cost" / "Extended Cost" header pair never occurs.
    #[error("no item table found (missing \"Unit Cost\" / \"Extended Cost\" header)")]
    NoTableFound,

    /// The table header was found but no item block follows it.
    #[error("item table contains no blocks")]
    NoItems,
}

/// Result type for the poex library.
pub type Result<T> = std::result::Result<T, PoexError>;
