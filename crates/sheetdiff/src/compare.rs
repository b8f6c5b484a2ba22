//! Comparing workbooks straight from disk

use std::path::Path;

use sheetdiff_core::{
    compare_sheets, compare_workbooks_with, CompareOptions, SheetDiffResult, SheetStatus,
    Workbook, WorkbookStatistics,
};

use crate::loader::{load_pair, FileLoader, LoadError, WorkbookLoader};

/// Both loaded workbooks together with their per-sheet diff
#[derive(Debug, Clone)]
pub struct Comparison {
    /// The baseline workbook
    pub old: Workbook,
    /// The workbook compared against the baseline
    pub new: Workbook,
    /// One result per sheet: common sheets, then deleted, then added
    pub results: Vec<SheetDiffResult>,
}

impl Comparison {
    /// Compare two workbooks that are already in memory
    pub fn new(old: Workbook, new: Workbook, options: &CompareOptions) -> Self {
        let results = compare_workbooks_with(&old, &new, options);
        Self { old, new, results }
    }

    /// Aggregate counts over every sheet
    pub fn statistics(&self) -> WorkbookStatistics {
        WorkbookStatistics::from_results(&self.results)
    }

    /// True if any sheet was added, deleted or has changed cells
    pub fn has_changes(&self) -> bool {
        self.results
            .iter()
            .any(|r| r.status() != SheetStatus::Matched || r.has_changes())
    }

    /// Result for a sheet by exact name
    pub fn sheet(&self, name: &str) -> Option<&SheetDiffResult> {
        self.results.iter().find(|r| r.sheet_name() == name)
    }
}

/// Load and compare two workbook files with the default loader and options
pub fn compare_files<P, Q>(old: P, new: Q) -> Result<Comparison, LoadError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    compare_files_with(&FileLoader::new(), old, new, &CompareOptions::default())
}

/// Load two workbooks concurrently with `loader`, then compare them.
///
/// If both loads fail the error for `old` is returned.
pub fn compare_files_with<L, P, Q>(
    loader: &L,
    old: P,
    new: Q,
    options: &CompareOptions,
) -> Result<Comparison, LoadError>
where
    L: WorkbookLoader + Sync + ?Sized,
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let (old, new) = load_pair(loader, old, new);
    Ok(Comparison::new(old?, new?, options))
}

/// Load one named worksheet from each file and compare just that pair
pub fn compare_sheet_files<L, P, Q>(
    loader: &L,
    old: P,
    new: Q,
    name: &str,
) -> Result<SheetDiffResult, LoadError>
where
    L: WorkbookLoader + ?Sized,
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let old = loader.load_sheet(old.as_ref(), name)?;
    let new = loader.load_sheet(new.as_ref(), name)?;
    Ok(compare_sheets(&old, &new))
}
