//! Purchase order row models.
//!
//! Every field is a plain string and an empty string means "not found". Missing
//! fields are common on real documents and are never treated as errors.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Document-level fields shared by every item row of one purchase order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeaderFields {
    /// First digit run of the document, prefixed (e.g. "PO4500012345").
    #[serde(rename = "Document Number")]
    pub document_number: String,

    /// First `D/D/YYYY` date of the document.
    #[serde(rename = "PO Issue Date")]
    pub issue_date: String,

    /// "Net <days>" token.
    #[serde(rename = "Payment Term")]
    pub payment_term: String,

    /// Line directly above the payment term line.
    #[serde(rename = "Ship Via")]
    pub ship_via: String,

    /// Text preceding the payment term on its line.
    #[serde(rename = "FOB")]
    pub fob: String,

    /// Buyer code (digits).
    #[serde(rename = "Buyer")]
    pub buyer: String,

    /// Requisition number (digits).
    #[serde(rename = "Requisition Number")]
    pub requisition_number: String,

    /// Requisitioner name.
    #[serde(rename = "Requisitioner")]
    pub requisitioner: String,
}

/// One output record: a line item combined with its document's header fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemRow {
    #[serde(flatten)]
    pub header: HeaderFields,

    #[serde(rename = "Part/Description")]
    pub description: String,

    #[serde(rename = "Item Code")]
    pub item_code: String,

    #[serde(rename = "Delivery Date")]
    pub delivery_date: String,

    #[serde(rename = "Unit of Measure")]
    pub unit_of_measure: String,

    #[serde(rename = "Quantity")]
    pub quantity: String,

    #[serde(rename = "Price")]
    pub price: String,

    #[serde(rename = "Total")]
    pub total: String,
}

impl ItemRow {
    /// Export column names, in output order.
    pub const COLUMNS: [&'static str; 15] = [
        "Document Number",
        "Part/Description",
        "Item Code",
        "PO Issue Date",
        "Delivery Date",
        "Ship Via",
        "FOB",
        "Unit of Measure",
        "Quantity",
        "Price",
        "Total",
        "Payment Term",
        "Buyer",
        "Requisition Number",
        "Requisitioner",
    ];

    /// Field values in [`ItemRow::COLUMNS`] order.
    pub fn to_record(&self) -> [&str; 15] {
        [
            self.header.document_number.as_str(),
            self.description.as_str(),
            self.item_code.as_str(),
            self.header.issue_date.as_str(),
            self.delivery_date.as_str(),
            self.header.ship_via.as_str(),
            self.header.fob.as_str(),
            self.unit_of_measure.as_str(),
            self.quantity.as_str(),
            self.price.as_str(),
            self.total.as_str(),
            self.header.payment_term.as_str(),
            self.header.buyer.as_str(),
            self.header.requisition_number.as_str(),
            self.header.requisitioner.as_str(),
        ]
    }

    /// Unit price as a decimal, if present and well-formed.
    pub fn price_value(&self) -> Option<Decimal> {
        parse_amount(&self.price)
    }

    /// Line total as a decimal, if present and well-formed.
    pub fn total_value(&self) -> Option<Decimal> {
        parse_amount(&self.total)
    }
}

fn parse_amount(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s).ok()
}
