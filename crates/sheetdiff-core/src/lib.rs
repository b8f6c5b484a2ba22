//! # sheetdiff-core
//!
//! Workbook model and comparison engine for sheetdiff.
//!
//! This crate provides:
//! - [`CellAddress`] and [`Cell`] - Cell addressing and extracted cell text
//! - [`Workbook`], [`Worksheet`] - The in-memory snapshot a loader produces
//! - [`compare_workbooks`], [`compare_sheets`] - The diff engine
//! - [`ComparisonStatistics`], [`WorkbookStatistics`] - Change counts
//!
//! The engine is a pure function of its two inputs: it performs no I/O,
//! never mutates the workbooks and cannot fail.
//!
//! ## Example
//!
//! ```rust
//! use sheetdiff_core::{compare_sheets, Worksheet};
//!
//! let mut old = Worksheet::new("Sheet1");
//! old.set_value_at(1, 1, "A1").unwrap();
//!
//! let mut new = Worksheet::new("Sheet1");
//! new.set_value_at(1, 1, "A1").unwrap();
//! new.set_value_at(1, 2, "B1").unwrap();
//!
//! let result = compare_sheets(&old, &new);
//! assert_eq!(result.statistics().added_cells, 1);
//! assert_eq!(result.statistics().unchanged_cells, 1);
//! assert_eq!(result.statistics().total_cells, 2);
//! ```

pub mod cell;
pub mod diff;
pub mod error;
pub mod workbook;
pub mod worksheet;

// Re-exports for convenience
pub use cell::{Cell, CellAddress};
pub use diff::{
    added_sheet, compare_sheets, compare_workbooks, compare_workbooks_with, deleted_sheet,
    CellDiff, CompareOptions, ComparisonStatistics, DiffType, SheetDiffResult, SheetStatus,
    WorkbookStatistics,
};
pub use error::{Error, Result};
pub use workbook::Workbook;
pub use worksheet::Worksheet;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u32 = 16_384;
