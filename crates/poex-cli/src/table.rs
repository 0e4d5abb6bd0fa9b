//! Row table: collects item rows from many documents and serializes them.

use std::collections::HashSet;
use std::io::Write;

use poex_core::ItemRow;

/// Accumulated item rows of a batch, in insertion order.
#[derive(Debug, Default)]
pub struct RowTable {
    rows: Vec<ItemRow>,
}

impl RowTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append rows after the ones already collected.
    pub fn extend(&mut self, rows: impl IntoIterator<Item = ItemRow>) {
        self.rows.extend(rows);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Drop rows equal to an earlier row on all columns. Returns the number removed.
    pub fn deduplicate(&mut self) -> usize {
        let before = self.rows.len();
        let mut seen = HashSet::with_capacity(before);
        self.rows.retain(|row| seen.insert(row.clone()));
        before - self.rows.len()
    }

    /// Stable sort by document number; rows of one document keep their order.
    pub fn sort_by_document(&mut self) {
        self.rows
            .sort_by(|a, b| a.header.document_number.cmp(&b.header.document_number));
    }

    /// Write the table as delimited text with a header row.
    pub fn write_csv<W: Write>(&self, writer: W, delimiter: char) -> anyhow::Result<()> {
        if !delimiter.is_ascii() {
            anyhow::bail!("CSV delimiter must be a single ASCII character, got {:?}", delimiter);
        }

        let mut wtr = csv::WriterBuilder::new()
            .delimiter(delimiter as u8)
            .from_writer(writer);

        wtr.write_record(ItemRow::COLUMNS)?;
        for row in &self.rows {
            wtr.write_record(row.to_record())?;
        }

        wtr.flush()?;
        Ok(())
    }

    /// Write the table as a pretty-printed JSON array of objects.
    pub fn write_json<W: Write>(&self, mut writer: W) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(&mut writer, &self.rows)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}
