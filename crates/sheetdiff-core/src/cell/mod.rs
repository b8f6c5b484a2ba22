//! Cell-related types
//!
//! This module contains:
//! - [`CellAddress`] - A cell's location (row, column), 1-based
//! - [`Cell`] - The text a loader extracted for one cell

mod address;

pub use address::CellAddress;

/// A single non-empty cell of a worksheet.
///
/// `value` is the canonical text the comparison runs on. `formatted` and
/// `formula` are carried for display only and never affect a diff.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    /// Location of the cell
    pub address: CellAddress,
    /// Canonical display text used for comparison
    pub value: String,
    /// Formatted display string, when the source provides one
    pub formatted: Option<String>,
    /// Formula source (e.g. `=SUM(A1:A3)`), when the cell holds a formula
    pub formula: Option<String>,
}

impl Cell {
    /// Create a cell holding a plain value
    pub fn new<S: Into<String>>(address: CellAddress, value: S) -> Self {
        Self {
            address,
            value: value.into(),
            formatted: None,
            formula: None,
        }
    }

    /// Attach a formatted display string
    pub fn with_formatted<S: Into<String>>(mut self, formatted: S) -> Self {
        self.formatted = Some(formatted.into());
        self
    }

    /// Attach the formula source
    pub fn with_formula<S: Into<String>>(mut self, formula: S) -> Self {
        self.formula = Some(formula.into());
        self
    }

    /// Text to show for this cell: the formatted string if present, else the value
    pub fn display_text(&self) -> &str {
        self.formatted.as_deref().unwrap_or(&self.value)
    }

    /// Check if the cell holds a formula
    pub fn is_formula(&self) -> bool {
        self.formula.is_some()
    }
}
