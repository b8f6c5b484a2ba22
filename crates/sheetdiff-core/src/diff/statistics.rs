//! Change statistics, per sheet and per workbook

use super::{DiffType, SheetDiffResult, SheetStatus};

/// Classification counts for one sheet comparison.
///
/// `total_cells` is the size of the address union the comparison walked, so
/// for a result built by the engine it always equals the sum of the four
/// per-type counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ComparisonStatistics {
    /// Number of addresses present in either sheet
    pub total_cells: usize,
    /// Cells present only in the new sheet
    pub added_cells: usize,
    /// Cells present only in the old sheet
    pub deleted_cells: usize,
    /// Cells present in both with different text
    pub modified_cells: usize,
    /// Cells present in both with identical text
    pub unchanged_cells: usize,
}

impl ComparisonStatistics {
    /// Count one classified cell
    pub fn record(&mut self, diff_type: DiffType) {
        match diff_type {
            DiffType::Added => self.added_cells += 1,
            DiffType::Deleted => self.deleted_cells += 1,
            DiffType::Modified => self.modified_cells += 1,
            DiffType::Unchanged => self.unchanged_cells += 1,
        }
    }

    /// Added + deleted + modified
    pub fn changed_cells(&self) -> usize {
        self.added_cells + self.deleted_cells + self.modified_cells
    }

    /// Share of changed cells in percent; exactly `0.0` for an empty comparison
    pub fn change_percentage(&self) -> f64 {
        if self.total_cells == 0 {
            return 0.0;
        }
        self.changed_cells() as f64 / self.total_cells as f64 * 100.0
    }

    /// Check that the per-type counters add up to `total_cells`
    pub fn is_consistent(&self) -> bool {
        self.changed_cells() + self.unchanged_cells == self.total_cells
    }

    /// Add another sheet's counts to these
    pub fn merge(&mut self, other: &ComparisonStatistics) {
        self.total_cells += other.total_cells;
        self.added_cells += other.added_cells;
        self.deleted_cells += other.deleted_cells;
        self.modified_cells += other.modified_cells;
        self.unchanged_cells += other.unchanged_cells;
    }
}

/// Roll-up of a whole workbook comparison
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WorkbookStatistics {
    /// Sheets present in both workbooks
    pub sheets_compared: usize,
    /// Sheets present only in the old workbook
    pub sheets_deleted: usize,
    /// Sheets present only in the new workbook
    pub sheets_added: usize,
    /// Sheets with at least one changed cell
    pub sheets_changed: usize,
    /// Cell counts summed over every sheet
    pub cells: ComparisonStatistics,
}

impl WorkbookStatistics {
    /// Aggregate a set of sheet results
    pub fn from_results(results: &[SheetDiffResult]) -> Self {
        let mut stats = Self::default();
        for result in results {
            match result.status() {
                SheetStatus::Matched => stats.sheets_compared += 1,
                SheetStatus::Deleted => stats.sheets_deleted += 1,
                SheetStatus::Added => stats.sheets_added += 1,
            }
            if result.has_changes() {
                stats.sheets_changed += 1;
            }
            stats.cells.merge(result.statistics());
        }
        stats
    }

    /// Total number of sheet results
    pub fn sheet_count(&self) -> usize {
        self.sheets_compared + self.sheets_deleted + self.sheets_added
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_percentage() {
        let stats = ComparisonStatistics {
            total_cells: 100,
            added_cells: 10,
            deleted_cells: 5,
            modified_cells: 15,
            unchanged_cells: 70,
        };
        assert_eq!(stats.changed_cells(), 30);
        assert!((stats.change_percentage() - 30.0).abs() < 1e-9);
        assert!(stats.is_consistent());
    }

    #[test]
    fn test_change_percentage_zero_total() {
        let stats = ComparisonStatistics::default();
        assert_eq!(stats.change_percentage(), 0.0);
        assert!(!stats.change_percentage().is_nan());
    }

    #[test]
    fn test_change_percentage_all_changed() {
        let stats = ComparisonStatistics {
            total_cells: 50,
            added_cells: 20,
            deleted_cells: 15,
            modified_cells: 15,
            unchanged_cells: 0,
        };
        assert_eq!(stats.change_percentage(), 100.0);
    }

    #[test]
    fn test_record() {
        let mut stats = ComparisonStatistics::default();
        stats.record(DiffType::Added);
        stats.record(DiffType::Added);
        stats.record(DiffType::Modified);
        stats.record(DiffType::Unchanged);
        assert_eq!(stats.added_cells, 2);
        assert_eq!(stats.modified_cells, 1);
        assert_eq!(stats.unchanged_cells, 1);
        assert_eq!(stats.deleted_cells, 0);
        assert_eq!(stats.changed_cells(), 3);
    }

    #[test]
    fn test_merge() {
        let mut a = ComparisonStatistics {
            total_cells: 3,
            added_cells: 1,
            deleted_cells: 0,
            modified_cells: 1,
            unchanged_cells: 1,
        };
        let b = ComparisonStatistics {
            total_cells: 2,
            added_cells: 0,
            deleted_cells: 2,
            modified_cells: 0,
            unchanged_cells: 0,
        };
        a.merge(&b);
        assert_eq!(a.total_cells, 5);
        assert_eq!(a.deleted_cells, 2);
        assert!(a.is_consistent());
    }
}
