//! Reading-order line reconstruction from positioned fragments.

use tracing::debug;

use crate::pdf::{Page, TextFragment};

/// Build the document's line sequence.
///
/// Fragments are ordered top-to-bottom, then left-to-right within each page, and
/// pages are concatenated in order. Each fragment ends a line; the result holds
/// only trimmed, non-empty lines.
pub fn normalize_pages(pages: &[Page]) -> Vec<String> {
    let mut full_text = String::new();

    for page in pages {
        let mut fragments: Vec<&TextFragment> = page.fragments.iter().collect();
        fragments.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));

        for fragment in fragments {
            full_text.push_str(&fragment.text);
            full_text.push('\n');
        }
    }

    let lines: Vec<String> = full_text
        .split(is_line_break)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    debug!("Normalized {} pages into {} lines", pages.len(), lines.len());
    lines
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n'
            | '\r'
            | '\x0b'
            | '\x0c'
            | '\x1c'
            | '\x1d'
            | '\x1e'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}
