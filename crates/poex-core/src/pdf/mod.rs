//! Document reading: turning files into positioned text fragments.

mod extractor;
mod text;

pub use extractor::PdfExtractor;
pub use text::PlainTextReader;

use crate::error::PdfError;

/// Result type for document reading operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// A positioned run of text on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFragment {
    /// Vertical origin, growing downward from the top of the page.
    pub y: f64,
    /// Horizontal origin, growing rightward from the left edge.
    pub x: f64,
    /// Text payload (may contain line breaks).
    pub text: String,
}

impl TextFragment {
    pub fn new(y: f64, x: f64, text: impl Into<String>) -> Self {
        Self {
            y,
            x,
            text: text.into(),
        }
    }
}

/// Fragments of a single page, in no particular order.
#[derive(Debug, Clone, Default)]
pub struct Page {
    /// Page number (1-indexed).
    pub number: u32,
    /// Text fragments found on this page.
    pub fragments: Vec<TextFragment>,
}

/// Trait for document readers producing positioned text.
pub trait DocumentReader {
    /// Load a document from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the loaded document.
    fn page_count(&self) -> u32;

    /// Read the text fragments of every page, in page order.
    fn read_pages(&self) -> Result<Vec<Page>>;
}
