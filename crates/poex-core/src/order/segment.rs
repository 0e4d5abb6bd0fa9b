//! Item table segmentation.

use tracing::{debug, trace};

use super::rules::patterns::{EXTENDED_COST, PURE_DIGITS, TOTAL_ANCHOR, UNIT_COST};
use crate::error::ExtractionError;

/// Lines describing one purchase order line item.
///
/// The first line is always a pure digit run (the item code).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemBlock {
    pub lines: Vec<String>,
}

impl ItemBlock {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }
}

/// Split the item table body into per-item blocks.
///
/// The body starts after the first adjacent "Unit Cost" / "Extended Cost" pair;
/// a repeated "Extended Cost" right after the pair is skipped. Every pure digit
/// line opens a new block and "TOTAL" closes the last one and ends the table.
/// Lines before the first digit line belong to no block and are dropped, as is an
/// open block when the document ends without "TOTAL".
pub fn segment_blocks(lines: &[String]) -> Result<Vec<ItemBlock>, ExtractionError> {
    let start = lines
        .windows(2)
        .position(|pair| pair[0] == UNIT_COST && pair[1] == EXTENDED_COST)
        .ok_or(ExtractionError::NoTableFound)?;

    let mut body = &lines[start + 2..];
    if body.first().is_some_and(|line| line == EXTENDED_COST) {
        body = &body[1..];
    }

    let mut blocks = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut terminated = false;

    for line in body {
        if line.trim().to_uppercase() == TOTAL_ANCHOR {
            if !current.is_empty() {
                blocks.push(ItemBlock::new(std::mem::take(&mut current)));
            }
            terminated = true;
            break;
        }

        if PURE_DIGITS.is_match(line) {
            if !current.is_empty() {
                blocks.push(ItemBlock::new(std::mem::take(&mut current)));
            }
            current.push(line.clone());
        } else if current.is_empty() {
            trace!("Dropping line outside any item block: {:?}", line);
        } else {
            current.push(line.clone());
        }
    }

    if !terminated && !current.is_empty() {
        debug!(
            "Item table has no TOTAL line; dropping unterminated block of {} lines",
            current.len()
        );
    }

    if blocks.is_empty() {
        return Err(ExtractionError::NoItems);
    }

    debug!("Segmented {} item blocks", blocks.len());
    Ok(blocks)
}
