//! Anchor tokens and regex patterns for purchase order extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// First line of the table header pair.
pub const UNIT_COST: &str = "Unit Cost";

/// Second line of the table header pair; may repeat once as a wrap artifact.
pub const EXTENDED_COST: &str = "Extended Cost";

/// Table column header closing the requisition block (compared upper-cased).
pub const ITEM_ANCHOR: &str = "ITEM";

/// Line ending the item table (compared upper-cased).
pub const TOTAL_ANCHOR: &str = "TOTAL";

/// Currency token after which a block's description begins (compared upper-cased).
pub const CURRENCY_ANCHOR: &str = "USD";

lazy_static! {
    // Any run of digits
    pub static ref DIGIT_RUN: Regex = Regex::new(r"\d+").unwrap();

    // A line made only of digits
    pub static ref PURE_DIGITS: Regex = Regex::new(r"^\d+$").unwrap();

    // Date with a four-digit year, anywhere in the line
    pub static ref FULL_DATE: Regex = Regex::new(r"\d{1,2}/\d{1,2}/\d{4}").unwrap();

    // Line starting with a date, two- or four-digit year
    pub static ref LEADING_DATE: Regex = Regex::new(r"^\d{1,2}/\d{1,2}/\d{2,4}").unwrap();

    // Payment term ("Net30", "NET 45", ...)
    pub static ref NET_TERM: Regex = Regex::new(r"(?i)Net\s*\d+").unwrap();

    // Quantity followed by an optional unit of measure ("2 EA")
    pub static ref QUANTITY_UOM: Regex = Regex::new(r"^(\d+)\s+(\w+)?").unwrap();

    // Decimal-point amount ("10.50")
    pub static ref DECIMAL_NUMBER: Regex = Regex::new(r"\d+\.\d+").unwrap();
}
