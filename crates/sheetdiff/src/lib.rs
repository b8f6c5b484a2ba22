//! # sheetdiff
//!
//! Compare two versions of a spreadsheet workbook and report, per worksheet
//! and per cell, what was added, deleted or modified.
//!
//! ## Features
//!
//! - Read XLSX/XLSM workbooks and CSV files
//! - Match worksheets by name, cells by address
//! - Per-sheet and workbook-wide change statistics
//! - Load both sides concurrently; compare sheets on rayon with `parallel`
//!
//! ## Example
//!
//! ```rust,no_run
//! use sheetdiff::prelude::*;
//!
//! let comparison = compare_files("budget_old.xlsx", "budget_new.xlsx")?;
//!
//! for sheet in &comparison.results {
//!     for diff in sheet.changes() {
//!         println!("{}!{} {}", sheet.sheet_name(), diff.address, diff.diff_type);
//!     }
//! }
//! println!("{:.1}% changed", comparison.statistics().cells.change_percentage());
//! # Ok::<(), sheetdiff::LoadError>(())
//! ```

pub mod compare;
pub mod loader;
pub mod prelude;

pub use compare::{compare_files, compare_files_with, compare_sheet_files, Comparison};
pub use loader::{load_pair, FileLoader, Format, LoadError, LoadOptions, WorkbookLoader};

// Re-export core types
pub use sheetdiff_core::{
    added_sheet, compare_sheets, compare_workbooks, compare_workbooks_with, deleted_sheet, Cell,
    CellAddress, CellDiff, CompareOptions, ComparisonStatistics, DiffType, Error, Result,
    SheetDiffResult, SheetStatus, Workbook, WorkbookStatistics, Worksheet, MAX_COLS, MAX_ROWS,
};

// Re-export I/O types
pub use sheetdiff_csv::{CsvError, CsvReadOptions, CsvReader};
pub use sheetdiff_xlsx::{XlsxError, XlsxReader};
