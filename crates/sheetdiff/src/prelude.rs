//! Prelude module - common imports for sheetdiff users
//!
//! ```rust
//! use sheetdiff::prelude::*;
//! ```

pub use crate::{
    // Comparison
    compare_files,
    compare_sheets,
    compare_workbooks,
    CellDiff,
    CompareOptions,
    Comparison,
    ComparisonStatistics,
    DiffType,
    SheetDiffResult,
    SheetStatus,
    WorkbookStatistics,

    // Model
    Cell,
    CellAddress,
    Workbook,
    Worksheet,

    // Loading
    FileLoader,
    LoadError,
    LoadOptions,
    WorkbookLoader,
};
