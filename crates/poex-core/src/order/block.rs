//! Per-block item field extraction.
//!
//! Rules run in a fixed order over a comma-stripped copy of the block. A rule
//! that claims a line hides it from every later rule of the same block.

use tracing::trace;

use super::rules::patterns::{CURRENCY_ANCHOR, DECIMAL_NUMBER, FULL_DATE, QUANTITY_UOM};
use super::rules::{BlockRule, ClaimSet};
use super::segment::ItemBlock;
use crate::models::order::{HeaderFields, ItemRow};

/// The block's first line, claimed unconditionally.
pub struct ItemCodeRule;

/// First "<digits> [unit]" line.
pub struct QuantityRule;

/// First and last decimal amount over all unclaimed lines. Claims nothing.
pub struct AmountRule;

/// First full date.
pub struct DeliveryDateRule;

/// Everything after the first "USD" line, or after the item code without one.
pub struct DescriptionRule;

/// Block rules in application order.
pub static BLOCK_RULES: [&dyn BlockRule; 5] = [
    &ItemCodeRule,
    &QuantityRule,
    &AmountRule,
    &DeliveryDateRule,
    &DescriptionRule,
];

impl BlockRule for ItemCodeRule {
    fn name(&self) -> &'static str {
        "item_code"
    }

    fn apply(&self, lines: &[String], claims: &mut ClaimSet, row: &mut ItemRow) {
        if let Some(first) = lines.first() {
            row.item_code = first.clone();
            claims.claim(0, self.name());
        }
    }
}

impl BlockRule for QuantityRule {
    fn name(&self) -> &'static str {
        "quantity"
    }

    fn apply(&self, lines: &[String], claims: &mut ClaimSet, row: &mut ItemRow) {
        let found = claims.unclaimed(lines).find_map(|(index, line)| {
            QUANTITY_UOM.captures(line).map(|caps| {
                let quantity = caps[1].to_string();
                let unit = caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default();
                (index, quantity, unit)
            })
        });

        if let Some((index, quantity, unit)) = found {
            row.quantity = quantity;
            row.unit_of_measure = unit;
            claims.claim(index, self.name());
        }
    }
}

impl BlockRule for AmountRule {
    fn name(&self) -> &'static str {
        "amount"
    }

    fn apply(&self, lines: &[String], claims: &mut ClaimSet, row: &mut ItemRow) {
        let amounts: Vec<&str> = claims
            .unclaimed(lines)
            .flat_map(|(_, line)| DECIMAL_NUMBER.find_iter(line).map(|m| m.as_str()))
            .collect();

        if let (Some(first), Some(last)) = (amounts.first(), amounts.last()) {
            row.price = first.to_string();
            row.total = last.to_string();
        }
    }
}

impl BlockRule for DeliveryDateRule {
    fn name(&self) -> &'static str {
        "delivery_date"
    }

    fn apply(&self, lines: &[String], claims: &mut ClaimSet, row: &mut ItemRow) {
        let found = claims.unclaimed(lines).find_map(|(index, line)| {
            FULL_DATE
                .find(line)
                .map(|m| (index, m.as_str().to_string()))
        });

        if let Some((index, date)) = found {
            row.delivery_date = date;
            claims.claim(index, self.name());
        }
    }
}

impl BlockRule for DescriptionRule {
    fn name(&self) -> &'static str {
        "description"
    }

    fn apply(&self, lines: &[String], claims: &mut ClaimSet, row: &mut ItemRow) {
        let anchor = claims
            .unclaimed(lines)
            .find(|(_, line)| line.to_uppercase().contains(CURRENCY_ANCHOR))
            .map(|(index, _)| index);

        // Falls back to every line after the item code, including amounts and
        // quantities the earlier rules already read
        let start = match anchor {
            Some(index) => {
                claims.claim(index, self.name());
                index + 1
            }
            None => 1,
        };

        row.description = lines.get(start..).unwrap_or_default().join(" ").trim().to_string();
    }
}

/// Result of running the rules over one block.
#[derive(Debug, Clone)]
pub struct BlockExtraction {
    /// Extracted row.
    pub row: ItemRow,
    /// Which rule claimed which line of the comma-stripped block.
    pub claims: ClaimSet,
}

/// Extract one item row from a block, with the document's header fields.
pub fn extract_item(block: &ItemBlock, header: &HeaderFields) -> ItemRow {
    extract_block(block, header).row
}

/// Extract one item row and report the lines each rule claimed.
pub fn extract_block(block: &ItemBlock, header: &HeaderFields) -> BlockExtraction {
    let lines: Vec<String> = block.lines.iter().map(|line| line.replace(',', "")).collect();

    let mut claims = ClaimSet::new();
    let mut row = ItemRow {
        header: header.clone(),
        ..Default::default()
    };

    for rule in BLOCK_RULES.iter() {
        rule.apply(&lines, &mut claims, &mut row);
    }

    trace!(
        "Block {:?}: qty={:?} uom={:?} price={:?} total={:?}",
        row.item_code, row.quantity, row.unit_of_measure, row.price, row.total
    );

    BlockExtraction { row, claims }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn block(items: &[&str]) -> ItemBlock {
        ItemBlock::new(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_fields_from_typical_block() {
        let b = block(&[
            "3",
            "100 EA",
            "12/01/2024",
            "USD",
            "1,250.00",
            "125,000.00",
            "Bearing, sealed 6204",
        ]);
        let row = extract_item(&b, &HeaderFields::default());

        assert_eq!(row.item_code, "3");
        assert_eq!(row.quantity, "100");
        assert_eq!(row.unit_of_measure, "EA");
        assert_eq!(row.delivery_date, "12/01/2024");
        assert_eq!(row.price, "1250.00");
        assert_eq!(row.total, "125000.00");
        assert_eq!(row.description, "1250.00 125000.00 Bearing sealed 6204");
    }

    #[test]
    fn test_header_fields_are_copied() {
        let header = HeaderFields {
            document_number: "PO9".to_string(),
            buyer: "017".to_string(),
            ..Default::default()
        };
        let row = extract_item(&block(&["1", "Nut"]), &header);

        assert_eq!(row.header, header);
    }

    #[test]
    fn test_quantity_without_unit() {
        let row = extract_item(&block(&["1", "5 @", "Pins"]), &HeaderFields::default());
        assert_eq!(row.quantity, "5");
        assert_eq!(row.unit_of_measure, "");
    }

    #[test]
    fn test_bare_number_is_not_a_quantity() {
        let row = extract_item(&block(&["1", "Pins", "5"]), &HeaderFields::default());
        assert_eq!(row.quantity, "");
        assert_eq!(row.description, "Pins 5");
    }

    #[test]
    fn test_no_usd_falls_back_to_all_but_item_code() {
        let row = extract_item(&block(&["7", "Gasket", "4 PC", "2.50"]), &HeaderFields::default());

        assert_eq!(row.description, "Gasket 4 PC 2.50");
        assert_eq!(row.price, "2.50");
        assert_eq!(row.total, "2.50");
    }

    #[test]
    fn test_usd_on_last_line_gives_empty_description() {
        let row = extract_item(&block(&["7", "Gasket", "Amount in usd"]), &HeaderFields::default());
        assert_eq!(row.description, "");
    }

    #[test]
    fn test_missing_fields_stay_empty() {
        let row = extract_item(&block(&["12"]), &HeaderFields::default());

        assert_eq!(row.item_code, "12");
        assert_eq!(row.quantity, "");
        assert_eq!(row.price, "");
        assert_eq!(row.total, "");
        assert_eq!(row.delivery_date, "");
        assert_eq!(row.description, "");
    }

    #[test]
    fn test_amounts_share_a_line() {
        let row = extract_item(&block(&["1", "3 EA", "4.00 12.00"]), &HeaderFields::default());
        assert_eq!(row.price, "4.00");
        assert_eq!(row.total, "12.00");
    }

    #[test]
    fn test_quantity_line_amounts_are_not_prices() {
        // "2 EA 9.99" is claimed by the quantity rule before amounts are read
        let b = block(&["1", "2 EA 9.99", "USD", "5.00"]);
        let row = extract_item(&b, &HeaderFields::default());
        assert_eq!(row.quantity, "2");
        assert_eq!(row.price, "5.00");
        assert_eq!(row.total, "5.00");
    }

    #[test]
    fn test_repeated_quantity_line_still_yields_amounts() {
        let b = block(&["1", "2 EA 3.00", "2 EA 3.00", "USD"]);
        let extraction = extract_block(&b, &HeaderFields::default());

        assert_eq!(extraction.claims.claimed_by("quantity"), vec![1]);
        assert_eq!(extraction.row.price, "3.00");
        assert_eq!(extraction.row.total, "3.00");
    }

    #[test]
    fn test_claimed_lines_are_disjoint() {
        let b = block(&["4", "10 BX", "1/15/2025", "usd", "3.00", "30.00", "Screws"]);
        let extraction = extract_block(&b, &HeaderFields::default());
        let claims = &extraction.claims;

        assert_eq!(claims.claimed_by("item_code"), vec![0]);
        assert_eq!(claims.claimed_by("quantity"), vec![1]);
        assert_eq!(claims.claimed_by("delivery_date"), vec![2]);
        assert_eq!(claims.claimed_by("description"), vec![3]);
        assert!(claims.claimed_by("amount").is_empty());
        assert!(!claims.is_claimed(4) && !claims.is_claimed(5) && !claims.is_claimed(6));
    }

    #[test]
    fn test_date_on_quantity_line_is_not_reused() {
        let b = block(&["1", "6 EA 2/2/2025", "3/3/2025"]);
        let row = extract_item(&b, &HeaderFields::default());

        assert_eq!(row.quantity, "6");
        assert_eq!(row.delivery_date, "3/3/2025");
    }

    #[test]
    fn test_repeated_extraction_is_identical() {
        let b = block(&["2", "1 LOT", "USD", "99.95", "Service kit"]);
        let header = HeaderFields::default();
        assert_eq!(extract_item(&b, &header), extract_item(&b, &header));
    }
}
