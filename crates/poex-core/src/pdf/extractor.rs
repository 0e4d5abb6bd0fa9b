//! PDF text layout recovery using lopdf and pdf-extract.

use lopdf::Document;
use pdf_extract::{MediaBox, OutputDev, OutputError, Transform};
use tracing::{debug, trace};

use super::{DocumentReader, Page, Result, TextFragment};
use crate::error::PdfError;
use crate::models::config::PdfConfig;

/// PDF reader producing positioned text fragments.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
    config: PdfConfig,
}

impl PdfExtractor {
    /// Create a new PDF extractor with default layout settings.
    pub fn new() -> Self {
        Self::with_config(PdfConfig::default())
    }

    /// Create a PDF extractor with custom layout settings.
    pub fn with_config(config: PdfConfig) -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
            config,
        }
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentReader for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract reads from bytes, so keep the decrypted form
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn read_pages(&self) -> Result<Vec<Page>> {
        if self.document.is_none() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }

        let doc = pdf_extract::Document::load_mem(&self.raw_data)
            .map_err(|e| PdfError::Parse(e.to_string()))?;

        let mut collector = FragmentCollector::new(&self.config);
        pdf_extract::output_doc(&doc, &mut collector)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

        let pages = collector.finish();
        debug!(
            "Collected {} fragments from {} pages",
            pages.iter().map(|p| p.fragments.len()).sum::<usize>(),
            pages.len()
        );
        Ok(pages)
    }
}

/// A contiguous run of glyphs emitted by one text-showing operator.
#[derive(Debug, Clone)]
struct Run {
    y: f64,
    x: f64,
    end: f64,
    height: f64,
    text: String,
}

struct PageState {
    number: u32,
    top: f64,
    left: f64,
    runs: Vec<Run>,
}

/// Receives glyphs from pdf-extract and groups them into fragments per page.
struct FragmentCollector {
    baseline_tolerance: f64,
    merge_gap_ratio: f64,
    max_pages: usize,
    current: Option<PageState>,
    run: Option<Run>,
    pages: Vec<Page>,
}

impl FragmentCollector {
    fn new(config: &PdfConfig) -> Self {
        Self {
            baseline_tolerance: config.baseline_tolerance,
            merge_gap_ratio: config.merge_gap_ratio,
            max_pages: config.max_pages,
            current: None,
            run: None,
            pages: Vec::new(),
        }
    }

    fn flush_run(&mut self) {
        if let (Some(run), Some(page)) = (self.run.take(), self.current.as_mut()) {
            if !run.text.trim().is_empty() {
                page.runs.push(run);
            }
        }
    }

    fn finish(mut self) -> Vec<Page> {
        self.flush_run();
        if let Some(page) = self.current.take() {
            self.pages.push(build_page(page, self.baseline_tolerance, self.merge_gap_ratio));
        }
        self.pages
    }
}

impl OutputDev for FragmentCollector {
    fn begin_page(
        &mut self,
        page_num: u32,
        media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> std::result::Result<(), OutputError> {
        if self.max_pages > 0 && page_num as usize > self.max_pages {
            trace!("Skipping page {} (max_pages = {})", page_num, self.max_pages);
            self.current = None;
            return Ok(());
        }
        self.current = Some(PageState {
            number: page_num,
            top: media_box.ury,
            left: media_box.llx,
            runs: Vec::new(),
        });
        Ok(())
    }

    fn end_page(&mut self) -> std::result::Result<(), OutputError> {
        self.flush_run();
        if let Some(page) = self.current.take() {
            self.pages.push(build_page(page, self.baseline_tolerance, self.merge_gap_ratio));
        }
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        _font_size: f64,
        char: &str,
    ) -> std::result::Result<(), OutputError> {
        let Some(page) = self.current.as_ref() else {
            return Ok(());
        };

        // trm already carries the font size; width is in text space units
        let x = trm.m31 - page.left;
        let y = page.top - trm.m32;
        let height = (trm.m11 * trm.m22).abs().sqrt();
        let advance = width * trm.m11.abs();

        match self.run.as_mut() {
            Some(run) => {
                run.text.push_str(char);
                run.end = x + advance;
            }
            None => {
                self.run = Some(Run {
                    y,
                    x,
                    end: x + advance,
                    height,
                    text: char.to_string(),
                });
            }
        }
        Ok(())
    }

    fn begin_word(&mut self) -> std::result::Result<(), OutputError> {
        self.flush_run();
        Ok(())
    }

    fn end_word(&mut self) -> std::result::Result<(), OutputError> {
        self.flush_run();
        Ok(())
    }

    fn end_line(&mut self) -> std::result::Result<(), OutputError> {
        self.flush_run();
        Ok(())
    }
}

/// Merge runs sharing a baseline and lying close together into fragments.
fn build_page(page: PageState, baseline_tolerance: f64, merge_gap_ratio: f64) -> Page {
    let mut runs = page.runs;
    runs.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));

    // Group into baseline bands, then order each band left to right
    let mut bands: Vec<Vec<Run>> = Vec::new();
    for run in runs {
        match bands.last_mut() {
            Some(band) if (run.y - band[0].y).abs() <= baseline_tolerance => band.push(run),
            _ => bands.push(vec![run]),
        }
    }

    let mut fragments: Vec<TextFragment> = Vec::new();
    for mut band in bands {
        band.sort_by(|a, b| a.x.total_cmp(&b.x));

        let mut merged: Option<Run> = None;
        for run in band {
            merged = match merged.take() {
                Some(mut prev) => {
                    let gap = run.x - prev.end;
                    let limit = merge_gap_ratio * prev.height.max(run.height);
                    if gap <= limit {
                        if gap > 0.1 * prev.height && !prev.text.ends_with(' ') {
                            prev.text.push(' ');
                        }
                        prev.text.push_str(&run.text);
                        prev.end = prev.end.max(run.end);
                        Some(prev)
                    } else {
                        fragments.push(TextFragment::new(prev.y, prev.x, prev.text));
                        Some(run)
                    }
                }
                None => Some(run),
            };
        }
        if let Some(last) = merged {
            fragments.push(TextFragment::new(last.y, last.x, last.text));
        }
    }

    trace!("Page {}: {} fragments", page.number, fragments.len());
    Page {
        number: page.number,
        fragments,
    }
}
