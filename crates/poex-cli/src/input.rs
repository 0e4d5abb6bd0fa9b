//! Input discovery: directories, glob patterns, single files and ZIP archives.

use std::collections::HashSet;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Component, Path, PathBuf};

use glob::{glob, Pattern};
use tracing::{debug, warn};
use zip::ZipArchive;

use poex_core::models::config::PdfConfig;
use poex_core::pdf::{DocumentReader, PdfExtractor, PlainTextReader};

/// Largest archive entry read into memory.
const MAX_ENTRY_SIZE: u64 = 256 * 1024 * 1024;

/// Archive metadata folders that never hold real documents.
const MACOS_METADATA_DIR: &str = "__MACOSX";

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Text,
}

impl DocumentKind {
    /// Detect the kind from a file name's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" => Some(Self::Text),
            _ => None,
        }
    }

    /// Create a reader able to load this kind of document.
    pub fn reader(self, config: &PdfConfig) -> Box<dyn DocumentReader> {
        match self {
            Self::Pdf => Box::new(PdfExtractor::with_config(config.clone())),
            Self::Text => Box::new(PlainTextReader::new()),
        }
    }
}

/// A document to process, on disk or unpacked from an archive.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    File {
        path: PathBuf,
        kind: DocumentKind,
    },
    Archived {
        archive: PathBuf,
        entry: PathBuf,
        kind: DocumentKind,
        data: Vec<u8>,
    },
}

impl DocumentSource {
    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::File { kind, .. } | Self::Archived { kind, .. } => *kind,
        }
    }

    /// Read the document's bytes.
    pub fn read(&self) -> std::io::Result<Vec<u8>> {
        match self {
            Self::File { path, .. } => fs::read(path),
            Self::Archived { data, .. } => Ok(data.clone()),
        }
    }
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File { path, .. } => write!(f, "{}", path.display()),
            Self::Archived { archive, entry, .. } => {
                write!(f, "{}!{}", archive.display(), entry.display())
            }
        }
    }
}

/// Collect every supported document named by `input`.
///
/// `input` may be a directory (walked recursively), a single file, or a glob
/// pattern. ZIP archives met along the way are expanded in memory.
pub fn discover(input: &str) -> anyhow::Result<Vec<DocumentSource>> {
    let path = Path::new(input);

    let candidates: Vec<PathBuf> = if path.is_dir() {
        let pattern = format!("{}/**/*", Pattern::escape(input.trim_end_matches('/')));
        glob(&pattern)?.filter_map(|r| r.ok()).collect()
    } else if path.is_file() {
        vec![path.to_path_buf()]
    } else {
        glob(input)?.filter_map(|r| r.ok()).collect()
    };

    let mut seen = HashSet::new();
    let mut sources = Vec::new();

    for candidate in candidates {
        if !candidate.is_file()
            || is_macos_metadata(&candidate)
            || !seen.insert(candidate.clone())
        {
            continue;
        }

        if is_zip(&candidate) {
            match expand_zip(&candidate) {
                Ok(entries) => sources.extend(entries),
                Err(e) => warn!("Failed to read archive {}: {}", candidate.display(), e),
            }
            continue;
        }

        if let Some(kind) = DocumentKind::from_path(&candidate) {
            sources.push(DocumentSource::File { path: candidate, kind });
        }
    }

    debug!("Discovered {} documents from {}", sources.len(), input);
    Ok(sources)
}

/// Read every supported document inside a ZIP archive into memory.
pub fn expand_zip(path: &Path) -> anyhow::Result<Vec<DocumentSource>> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(BufReader::new(file))?;
    let mut sources = Vec::new();

    for i in 0..archive.len() {
        let mut zip_file = match archive.by_index(i) {
            Ok(f) => f,
            Err(e) => {
                warn!("Skipping entry {} of {}: {}", i, path.display(), e);
                continue;
            }
        };

        if zip_file.is_dir() {
            continue;
        }

        let raw_name = zip_file.name().to_string();
        let Some(entry) = sanitize_path(&raw_name) else {
            warn!("Skipping invalid path: {raw_name}");
            continue;
        };
        if is_macos_metadata(&entry) {
            continue;
        }

        let Some(kind) = DocumentKind::from_path(&entry) else {
            debug!("Skipping unsupported archive entry {}", entry.display());
            continue;
        };

        if zip_file.size() > MAX_ENTRY_SIZE {
            warn!("Skipping {} in {}: {} bytes", entry.display(), path.display(), zip_file.size());
            continue;
        }

        let mut data = Vec::with_capacity(zip_file.size() as usize);
        zip_file.read_to_end(&mut data)?;

        sources.push(DocumentSource::Archived {
            archive: path.to_path_buf(),
            entry,
            kind,
            data,
        });
    }

    debug!("Expanded {} documents from {}", sources.len(), path.display());
    Ok(sources)
}

/// Keep only normal components of an archive path (no "..", roots or drives).
fn sanitize_path(name: &str) -> Option<PathBuf> {
    let mut sanitized = PathBuf::new();
    for component in Path::new(name).components() {
        if let Component::Normal(part) = component {
            sanitized.push(part);
        }
    }

    if sanitized.as_os_str().is_empty() {
        None
    } else {
        Some(sanitized)
    }
}

fn is_zip(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("zip"))
}

fn is_macos_metadata(path: &Path) -> bool {
    path.components()
        .any(|c| c.as_os_str() == MACOS_METADATA_DIR)
}
