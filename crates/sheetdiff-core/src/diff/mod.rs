//! Workbook comparison engine
//!
//! Sheets are matched by exact name. The output lists the sheets present in
//! both workbooks first, then the sheets only the old workbook has, then the
//! sheets only the new workbook has; each group is sorted by name. Within a
//! sheet every occupied address gets one [`CellDiff`], ordered by row and
//! then column.
//!
//! ```rust
//! use sheetdiff_core::{compare_workbooks, CellAddress, DiffType, Workbook, Worksheet};
//!
//! let mut old = Workbook::empty();
//! let mut sheet = Worksheet::new("Sheet1");
//! sheet.set_value_at(1, 1, "Old").unwrap();
//! old.add_worksheet(sheet).unwrap();
//!
//! let mut new = Workbook::empty();
//! let mut sheet = Worksheet::new("Sheet1");
//! sheet.set_value_at(1, 1, "New").unwrap();
//! new.add_worksheet(sheet).unwrap();
//!
//! let results = compare_workbooks(&old, &new);
//! let diff = &results[0].cell_diffs()[0];
//! assert_eq!(diff.diff_type, DiffType::Modified);
//! assert_eq!(diff.old_value.as_deref(), Some("Old"));
//! assert_eq!(diff.new_value.as_deref(), Some("New"));
//! ```

mod sheet;
mod statistics;

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::cell::CellAddress;
use crate::workbook::Workbook;
use crate::worksheet::Worksheet;

pub use sheet::{added_sheet, compare_sheets, deleted_sheet};
pub use statistics::{ComparisonStatistics, WorkbookStatistics};

/// How a single cell changed between the two workbooks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DiffType {
    /// Present only in the new sheet
    Added,
    /// Present only in the old sheet
    Deleted,
    /// Present in both, text differs
    Modified,
    /// Present in both, text identical
    Unchanged,
}

impl DiffType {
    /// Whether this classification counts as a change
    pub fn is_change(self) -> bool {
        !matches!(self, DiffType::Unchanged)
    }

    /// Lowercase name, as used in reports
    pub fn as_str(self) -> &'static str {
        match self {
            DiffType::Added => "added",
            DiffType::Deleted => "deleted",
            DiffType::Modified => "modified",
            DiffType::Unchanged => "unchanged",
        }
    }
}

impl fmt::Display for DiffType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The classification of one cell address
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CellDiff {
    /// Cell location
    pub address: CellAddress,
    /// Change classification
    pub diff_type: DiffType,
    /// Old text; `None` only for [`DiffType::Added`]
    pub old_value: Option<String>,
    /// New text; `None` only for [`DiffType::Deleted`]
    pub new_value: Option<String>,
}

impl CellDiff {
    /// Create a cell diff from its parts
    pub fn new(
        address: CellAddress,
        diff_type: DiffType,
        old_value: Option<String>,
        new_value: Option<String>,
    ) -> Self {
        Self {
            address,
            diff_type,
            old_value,
            new_value,
        }
    }

    /// Classify one address from the old and new cell text.
    ///
    /// Returns `None` when the cell exists on neither side. Text is compared
    /// byte for byte with no trimming or numeric coercion.
    pub fn classify(
        address: CellAddress,
        old: Option<&str>,
        new: Option<&str>,
    ) -> Option<Self> {
        let diff_type = match (old, new) {
            (None, None) => return None,
            (None, Some(_)) => DiffType::Added,
            (Some(_), None) => DiffType::Deleted,
            (Some(o), Some(n)) if o != n => DiffType::Modified,
            (Some(_), Some(_)) => DiffType::Unchanged,
        };
        Some(Self::new(
            address,
            diff_type,
            old.map(str::to_owned),
            new.map(str::to_owned),
        ))
    }
}

/// Where a sheet result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SheetStatus {
    /// The sheet exists in both workbooks
    Matched,
    /// The sheet exists only in the old workbook
    Deleted,
    /// The sheet exists only in the new workbook
    Added,
}

impl SheetStatus {
    /// Lowercase name, as used in reports
    pub fn as_str(self) -> &'static str {
        match self {
            SheetStatus::Matched => "matched",
            SheetStatus::Deleted => "deleted",
            SheetStatus::Added => "added",
        }
    }
}

impl fmt::Display for SheetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All cell classifications and statistics for one sheet name
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SheetDiffResult {
    sheet_name: String,
    status: SheetStatus,
    cell_diffs: Vec<CellDiff>,
    statistics: ComparisonStatistics,
}

impl SheetDiffResult {
    fn new(sheet_name: &str, status: SheetStatus) -> Self {
        Self {
            sheet_name: sheet_name.to_owned(),
            status,
            cell_diffs: Vec::new(),
            statistics: ComparisonStatistics::default(),
        }
    }

    /// Name of the sheet
    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Whether the sheet was matched, deleted or added
    pub fn status(&self) -> SheetStatus {
        self.status
    }

    /// Cell diffs in ascending (row, column) order
    pub fn cell_diffs(&self) -> &[CellDiff] {
        &self.cell_diffs
    }

    /// Classification counts
    pub fn statistics(&self) -> &ComparisonStatistics {
        &self.statistics
    }

    /// Iterate over the diffs that are not [`DiffType::Unchanged`]
    pub fn changes(&self) -> impl Iterator<Item = &CellDiff> {
        self.cell_diffs.iter().filter(|d| d.diff_type.is_change())
    }

    /// Check if any cell changed
    pub fn has_changes(&self) -> bool {
        self.statistics.changed_cells() > 0
    }

    /// Look up the diff for one address
    pub fn diff_at(&self, address: CellAddress) -> Option<&CellDiff> {
        self.cell_diffs
            .binary_search_by_key(&address, |d| d.address)
            .ok()
            .map(|i| &self.cell_diffs[i])
    }

    /// Largest row and largest column of any diff, for grid layout
    pub fn extent(&self) -> Option<(u32, u32)> {
        let max_row = self.cell_diffs.last()?.address.row;
        let max_col = self.cell_diffs.iter().map(|d| d.address.col).max()?;
        Some((max_row, max_col))
    }
}

/// Options for [`compare_workbooks_with`]
#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// Compare matched sheets on the rayon thread pool.
    ///
    /// Only honored when the `parallel` feature is enabled. Output order is
    /// identical either way.
    pub parallel: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            parallel: cfg!(feature = "parallel"),
        }
    }
}

/// Compare two workbooks with default options
pub fn compare_workbooks(old: &Workbook, new: &Workbook) -> Vec<SheetDiffResult> {
    compare_workbooks_with(old, new, &CompareOptions::default())
}

/// Compare two workbooks, producing one result per sheet name in either.
///
/// Order: sheets in both (by name), then old-only sheets (by name), then
/// new-only sheets (by name). Names are compared exactly and sorted by
/// their natural string order.
pub fn compare_workbooks_with(
    old: &Workbook,
    new: &Workbook,
    options: &CompareOptions,
) -> Vec<SheetDiffResult> {
    let old_sheets: HashMap<&str, &Worksheet> =
        old.worksheets().map(|ws| (ws.name(), ws)).collect();
    let new_sheets: HashMap<&str, &Worksheet> =
        new.worksheets().map(|ws| (ws.name(), ws)).collect();

    let old_names: BTreeSet<&str> = old_sheets.keys().copied().collect();
    let new_names: BTreeSet<&str> = new_sheets.keys().copied().collect();

    let pairs: Vec<(&Worksheet, &Worksheet)> = old_names
        .intersection(&new_names)
        .map(|name| (old_sheets[name], new_sheets[name]))
        .collect();

    log::debug!(
        "comparing {} common, {} deleted, {} added sheets",
        pairs.len(),
        old_names.difference(&new_names).count(),
        new_names.difference(&old_names).count()
    );

    let mut results = compare_pairs(&pairs, options);

    results.extend(
        old_names
            .difference(&new_names)
            .map(|name| deleted_sheet(old_sheets[name])),
    );
    results.extend(
        new_names
            .difference(&old_names)
            .map(|name| added_sheet(new_sheets[name])),
    );

    results
}

#[cfg(feature = "parallel")]
fn compare_pairs(
    pairs: &[(&Worksheet, &Worksheet)],
    options: &CompareOptions,
) -> Vec<SheetDiffResult> {
    use rayon::prelude::*;

    if options.parallel && pairs.len() > 1 {
        // Indexed collect keeps the input order
        pairs
            .par_iter()
            .map(|(old, new)| compare_sheets(old, new))
            .collect()
    } else {
        pairs
            .iter()
            .map(|(old, new)| compare_sheets(old, new))
            .collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn compare_pairs(
    pairs: &[(&Worksheet, &Worksheet)],
    options: &CompareOptions,
) -> Vec<SheetDiffResult> {
    if options.parallel {
        log::debug!("parallel comparison requested but the `parallel` feature is disabled");
    }
    pairs
        .iter()
        .map(|(old, new)| compare_sheets(old, new))
        .collect()
}
