//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

/// Main configuration for the poex pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PoexConfig {
    /// PDF reading configuration.
    pub pdf: PdfConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Table export configuration.
    pub output: OutputConfig,
}

/// PDF reading configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to read per document (0 = unlimited).
    pub max_pages: usize,

    /// Maximum vertical distance (points) between runs sharing a baseline.
    pub baseline_tolerance: f64,

    /// Runs on one baseline closer than this many glyph heights merge into one fragment.
    ///
    /// A word space is about 0.6 em in monospace fonts, so values below that split
    /// words set as separate runs ("Ground" "Net30") into separate lines.
    pub merge_gap_ratio: f64,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 0,
            baseline_tolerance: 2.0,
            merge_gap_ratio: 1.0,
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Prefix prepended to the document's first digit run.
    pub document_prefix: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            document_prefix: "PO".to_string(),
        }
    }
}

/// Table export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Drop rows identical in every column (first occurrence kept).
    pub deduplicate: bool,

    /// Sort rows by document number.
    pub sort_by_document: bool,

    /// CSV field delimiter.
    pub delimiter: char,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            deduplicate: true,
            sort_by_document: true,
            delimiter: ',',
        }
    }
}

impl PoexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
