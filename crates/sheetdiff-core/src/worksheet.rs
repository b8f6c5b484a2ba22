//! Worksheet type

use std::collections::HashMap;

use crate::cell::{Cell, CellAddress};
use crate::error::Result;

/// A worksheet (single named sheet in a workbook)
///
/// Cells are keyed by address. A missing key means the cell is unused; a
/// present cell whose value is the empty string is still a present cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Worksheet {
    /// Sheet name
    name: String,
    /// Non-empty cells keyed by address
    cells: HashMap<CellAddress, Cell>,
}

impl Worksheet {
    /// Create a new, empty worksheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            cells: HashMap::new(),
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    // === Cell Access ===

    /// Get a cell by address
    pub fn cell(&self, address: CellAddress) -> Option<&Cell> {
        self.cells.get(&address)
    }

    /// Get a cell by A1-style reference (e.g. "B2")
    pub fn cell_by_ref(&self, reference: &str) -> Result<Option<&Cell>> {
        let addr = CellAddress::parse(reference)?;
        Ok(self.cells.get(&addr))
    }

    /// Get the comparison text of a cell, if present
    pub fn value(&self, address: CellAddress) -> Option<&str> {
        self.cells.get(&address).map(|c| c.value.as_str())
    }

    /// Check whether a cell exists at the given address
    pub fn contains(&self, address: CellAddress) -> bool {
        self.cells.contains_key(&address)
    }

    /// Iterate over all cells in unspecified order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    /// Iterate over all occupied addresses in unspecified order
    pub fn addresses(&self) -> impl Iterator<Item = CellAddress> + '_ {
        self.cells.keys().copied()
    }

    /// Number of occupied cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Check if the sheet has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    // === Cell Modification ===

    /// Insert a cell, replacing any existing cell at the same address.
    ///
    /// Returns the replaced cell, if any.
    pub fn insert_cell(&mut self, cell: Cell) -> Option<Cell> {
        self.cells.insert(cell.address, cell)
    }

    /// Set a plain value at the given address
    pub fn set_value<S: Into<String>>(&mut self, address: CellAddress, value: S) {
        self.insert_cell(Cell::new(address, value));
    }

    /// Set a plain value by 1-based row and column
    pub fn set_value_at<S: Into<String>>(&mut self, row: u32, col: u32, value: S) -> Result<()> {
        let addr = CellAddress::new(row, col)?;
        self.set_value(addr, value);
        Ok(())
    }

    // === Extent ===

    /// Bounding box of all occupied cells as (top-left, bottom-right)
    pub fn used_range(&self) -> Option<(CellAddress, CellAddress)> {
        let mut iter = self.cells.keys();
        let first = *iter.next()?;
        let (mut min_row, mut min_col) = (first.row, first.col);
        let (mut max_row, mut max_col) = (first.row, first.col);

        for addr in iter {
            min_row = min_row.min(addr.row);
            min_col = min_col.min(addr.col);
            max_row = max_row.max(addr.row);
            max_col = max_col.max(addr.col);
        }

        Some((
            CellAddress {
                row: min_row,
                col: min_col,
            },
            CellAddress {
                row: max_row,
                col: max_col,
            },
        ))
    }

    /// Number of rows spanned by the used range (0 when empty)
    pub fn row_count(&self) -> u32 {
        self.used_range()
            .map(|(start, end)| end.row - start.row + 1)
            .unwrap_or(0)
    }

    /// Number of columns spanned by the used range (0 when empty)
    pub fn column_count(&self) -> u32 {
        self.used_range()
            .map(|(start, end)| end.col - start.col + 1)
            .unwrap_or(0)
    }
}
