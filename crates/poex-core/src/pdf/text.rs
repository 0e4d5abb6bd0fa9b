//! Reader for documents that are already plain text.

use super::{DocumentReader, Page, Result, TextFragment};
use crate::error::PdfError;

/// Reads UTF-8 text as a reading-ordered document.
///
/// Form feeds separate pages. Each text line becomes one fragment whose vertical
/// position is its line index, so normalization keeps the original order.
#[derive(Debug, Default)]
pub struct PlainTextReader {
    pages: Vec<String>,
}

impl PlainTextReader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentReader for PlainTextReader {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let text = std::str::from_utf8(data).map_err(|e| PdfError::Parse(e.to_string()))?;
        self.pages = text.split('\x0c').map(str::to_string).collect();
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn read_pages(&self) -> Result<Vec<Page>> {
        let pages = self
            .pages
            .iter()
            .enumerate()
            .map(|(idx, text)| Page {
                number: idx as u32 + 1,
                fragments: text
                    .lines()
                    .enumerate()
                    .map(|(row, line)| TextFragment::new(row as f64, 0.0, line))
                    .collect(),
            })
            .collect();
        Ok(pages)
    }
}
