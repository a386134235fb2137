// ============================================================
// TABLE
// ============================================================
// Column-oriented representation of parsed delimited text

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// Column map built from one uploaded file, keyed by header name.
///
/// Column order follows the header; the column set is fixed once the
/// header is read. Duplicate header names share a single column, so that
/// column receives one cell per occurrence per row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    names: Vec<String>,
    columns: HashMap<String, Vec<String>>,
}

impl Table {
    /// Initialize one empty column per header name, preserving order.
    pub fn with_columns(names: &[String]) -> Self {
        let mut table = Table::default();
        for name in names {
            if !table.columns.contains_key(name) {
                table.names.push(name.clone());
            }
            table.columns.entry(name.clone()).or_default();
        }
        table
    }

    /// Append a cell to the named column. Names outside the header set
    /// are ignored; the column set never grows after construction.
    pub fn push(&mut self, name: &str, value: String) {
        if let Some(cells) = self.columns.get_mut(name) {
            cells.push(value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.names.len()
    }

    /// Header names in header order, duplicates collapsed.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, name: &str) -> Option<&[String]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Number of data rows, taken from the first column.
    pub fn row_count(&self) -> usize {
        self.names
            .first()
            .and_then(|name| self.columns.get(name))
            .map_or(0, Vec::len)
    }

    /// Reassemble the data rows by zipping the columns back by index.
    pub fn rows(&self) -> Vec<Vec<String>> {
        (0..self.row_count())
            .map(|i| {
                self.names
                    .iter()
                    .filter_map(|name| self.columns.get(name))
                    .filter_map(|cells| cells.get(i))
                    .cloned()
                    .collect()
            })
            .collect()
    }
}

// Serializes as a JSON object in header order, the shape the table-QA
// provider expects under its "table" key.
impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.names.len()))?;
        for name in &self.names {
            map.serialize_entry(name, &self.columns[name])?;
        }
        map.end()
    }
}
