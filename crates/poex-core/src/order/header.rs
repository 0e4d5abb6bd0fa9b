//! Header field extraction: document number, terms and requisition block.
//!
//! Header fields come from contextual proximity to anchor lines. A field that
//! cannot be located stays an empty string.

use tracing::trace;

use super::rules::patterns::*;
use crate::models::order::HeaderFields;

/// Payment and shipping terms found around the "Net <days>" line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Terms {
    pub issue_date: String,
    pub payment_term: String,
    pub ship_via: String,
    pub fob: String,
}

/// Fields stacked directly above the "ITEM" table header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requisition {
    pub buyer: String,
    pub requisition_number: String,
    pub requisitioner: String,
}

/// Distance above "ITEM" of the buyer line.
///
/// Indexed by [requisitioner found][requisition number found]: each optional row
/// that is present pushes the buyer one line further up.
const BUYER_OFFSETS: [[usize; 2]; 2] = [[1, 2], [3, 3]];

/// Extract all header fields of a document.
pub fn extract_header(lines: &[String], document_prefix: &str) -> HeaderFields {
    let terms = extract_terms(lines);
    let requisition = extract_requisition(lines);

    HeaderFields {
        document_number: extract_document_number(lines, document_prefix),
        issue_date: terms.issue_date,
        payment_term: terms.payment_term,
        ship_via: terms.ship_via,
        fob: terms.fob,
        buyer: requisition.buyer,
        requisition_number: requisition.requisition_number,
        requisitioner: requisition.requisitioner,
    }
}

/// The document's first digit run behind `prefix`, or "" if it has no digits.
pub fn extract_document_number(lines: &[String], prefix: &str) -> String {
    lines
        .iter()
        .find_map(|line| DIGIT_RUN.find(line))
        .map(|m| format!("{}{}", prefix, m.as_str()))
        .unwrap_or_default()
}

/// Scan forward for the issue date and the first payment term line.
///
/// The scan stops at the first "Net <days>" match; the issue date is the first
/// full date seen up to and including that line.
pub fn extract_terms(lines: &[String]) -> Terms {
    let mut terms = Terms::default();

    for (i, line) in lines.iter().enumerate() {
        if terms.issue_date.is_empty() {
            if let Some(m) = FULL_DATE.find(line) {
                terms.issue_date = m.as_str().to_string();
            }
        }

        let Some(net) = NET_TERM.find(line) else {
            continue;
        };

        terms.payment_term = net.as_str().to_string();
        terms.fob = line[..net.start()].trim().to_string();

        if let Some(above) = i.checked_sub(1).map(|j| lines[j].trim()) {
            if !LEADING_DATE.is_match(above) && !PURE_DIGITS.is_match(above) {
                terms.ship_via = above.to_string();
            }
        }

        trace!("Payment term {:?} on line {}", terms.payment_term, i);
        break;
    }

    terms
}

/// Read buyer, requisition number and requisitioner above the "ITEM" line.
pub fn extract_requisition(lines: &[String]) -> Requisition {
    let Some(item_idx) = lines
        .iter()
        .position(|line| line.trim().to_uppercase() == ITEM_ANCHOR)
    else {
        return Requisition::default();
    };

    let above = |offset: usize| {
        item_idx
            .checked_sub(offset)
            .map(|j| lines[j].trim())
            .unwrap_or("")
    };

    let name = above(1);
    let requisitioner = if !name.is_empty()
        && !LEADING_DATE.is_match(name)
        && !PURE_DIGITS.is_match(name)
        && !NET_TERM.is_match(name)
    {
        name.to_string()
    } else {
        String::new()
    };

    let number = above(2);
    let requisition_number = if PURE_DIGITS.is_match(number) {
        number.to_string()
    } else {
        String::new()
    };

    let offset = buyer_offset(!requisitioner.is_empty(), !requisition_number.is_empty());
    let candidate = above(offset);
    let buyer = if PURE_DIGITS.is_match(candidate) {
        candidate.to_string()
    } else {
        String::new()
    };

    trace!("ITEM on line {}, buyer offset {}", item_idx, offset);
    Requisition {
        buyer,
        requisition_number,
        requisitioner,
    }
}

/// Lines above "ITEM" at which the buyer code is expected.
pub fn buyer_offset(found_requisitioner: bool, found_requisition_number: bool) -> usize {
    BUYER_OFFSETS[found_requisitioner as usize][found_requisition_number as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_document_number_is_first_digit_run() {
        let doc = lines(&["Purchase Order", "No. 4500123 rev 2", "Page 1"]);
        assert_eq!(extract_document_number(&doc, "PO"), "PO4500123");
    }

    #[test]
    fn test_document_number_without_digits() {
        let doc = lines(&["Purchase Order", "Acme Corp"]);
        assert_eq!(extract_document_number(&doc, "PO"), "");
    }

    #[test]
    fn test_terms_from_net_line() {
        let doc = lines(&["Purchase Order 77", "07/14/2023", "Ground Net30", "Net 60"]);
        let terms = extract_terms(&doc);

        assert_eq!(terms.issue_date, "07/14/2023");
        assert_eq!(terms.payment_term, "Net30");
        assert_eq!(terms.fob, "Ground");
        // Line above is a date
        assert_eq!(terms.ship_via, "");
    }

    #[test]
    fn test_ship_via_from_line_above() {
        let doc = lines(&["UPS Ground", "Destination NET 45"]);
        let terms = extract_terms(&doc);

        assert_eq!(terms.payment_term, "NET 45");
        assert_eq!(terms.fob, "Destination");
        assert_eq!(terms.ship_via, "UPS Ground");
    }

    #[test]
    fn test_ship_via_rejects_digits_and_short_dates() {
        assert_eq!(extract_terms(&lines(&["12345", "Origin Net10"])).ship_via, "");
        assert_eq!(extract_terms(&lines(&["1/2/24", "Origin Net10"])).ship_via, "");
        // Net line at the very top has no line above
        assert_eq!(extract_terms(&lines(&["Net10"])).ship_via, "");
    }

    #[test]
    fn test_issue_date_scan_stops_at_payment_term() {
        let doc = lines(&["Order 5", "Prepaid Net15", "01/02/2024"]);
        let terms = extract_terms(&doc);

        assert_eq!(terms.payment_term, "Net15");
        assert_eq!(terms.issue_date, "");
    }

    #[test]
    fn test_no_payment_term_keeps_issue_date() {
        let doc = lines(&["Order 5", "Dated 3/9/2024", "4/1/2024"]);
        let terms = extract_terms(&doc);

        assert_eq!(terms.issue_date, "3/9/2024");
        assert_eq!(terms.payment_term, "");
        assert_eq!(terms.fob, "");
    }

    #[test]
    fn test_full_requisition_block() {
        let doc = lines(&["Buyer", "017", "556677", "Jane Doe", "ITEM", "Description"]);
        let req = extract_requisition(&doc);

        assert_eq!(
            req,
            Requisition {
                buyer: "017".to_string(),
                requisition_number: "556677".to_string(),
                requisitioner: "Jane Doe".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_requisitioner_shifts_buyer_up_two() {
        let doc = lines(&["Buyer", "017", "556677", "ITEM"]);
        let req = extract_requisition(&doc);

        assert_eq!(req.requisitioner, "");
        assert_eq!(req.requisition_number, "017");
        assert_eq!(req.buyer, "017");
    }

    #[test]
    fn test_buyer_directly_above_item() {
        let doc = lines(&["Buyer", "Code", "017", "item"]);
        let req = extract_requisition(&doc);

        assert_eq!(req.requisitioner, "");
        assert_eq!(req.requisition_number, "");
        assert_eq!(req.buyer, "017");
    }

    #[test]
    fn test_requisitioner_rejects_dates_and_terms() {
        assert_eq!(extract_requisition(&lines(&["x", "7/1/2024", "ITEM"])).requisitioner, "");
        assert_eq!(extract_requisition(&lines(&["x", "Net 30", "ITEM"])).requisitioner, "");
    }

    #[test]
    fn test_item_at_top_of_document() {
        assert_eq!(extract_requisition(&lines(&["ITEM", "1"])), Requisition::default());
        assert_eq!(extract_requisition(&lines(&["no anchor", "1"])), Requisition::default());
    }

    #[test]
    fn test_buyer_offset_table() {
        assert_eq!(buyer_offset(false, false), 1);
        assert_eq!(buyer_offset(false, true), 2);
        assert_eq!(buyer_offset(true, false), 3);
        assert_eq!(buyer_offset(true, true), 3);
    }

    #[test]
    fn test_extract_header_combines_passes() {
        let doc = lines(&[
            "PURCHASE ORDER 4500012345",
            "07/14/2023",
            "FedEx",
            "Destination Net30",
            "017",
            "889900",
            "Pat Lee",
            "ITEM",
        ]);
        let header = extract_header(&doc, "PO");

        assert_eq!(header.document_number, "PO4500012345");
        assert_eq!(header.issue_date, "07/14/2023");
        assert_eq!(header.ship_via, "FedEx");
        assert_eq!(header.fob, "Destination");
        assert_eq!(header.payment_term, "Net30");
        assert_eq!(header.buyer, "017");
        assert_eq!(header.requisition_number, "889900");
        assert_eq!(header.requisitioner, "Pat Lee");
    }
}
