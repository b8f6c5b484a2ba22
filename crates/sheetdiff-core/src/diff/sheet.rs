//! Cell matching and classification within one worksheet

use crate::cell::CellAddress;
use crate::worksheet::Worksheet;

use super::{CellDiff, DiffType, SheetDiffResult, SheetStatus};

/// Compare two worksheets cell by cell.
///
/// Every address present in either sheet yields exactly one [`CellDiff`],
/// in ascending (row, column) order. The result is named after `old`.
pub fn compare_sheets(old: &Worksheet, new: &Worksheet) -> SheetDiffResult {
    let mut addresses: Vec<CellAddress> = old
        .addresses()
        .chain(new.addresses().filter(|addr| !old.contains(*addr)))
        .collect();
    addresses.sort_unstable();

    let mut result = SheetDiffResult::new(old.name(), SheetStatus::Matched);
    result.statistics.total_cells = addresses.len();
    result.cell_diffs.reserve(addresses.len());

    for address in addresses {
        if let Some(diff) = CellDiff::classify(address, old.value(address), new.value(address)) {
            result.statistics.record(diff.diff_type);
            result.cell_diffs.push(diff);
        }
    }

    debug_assert!(result.statistics.is_consistent());
    log::debug!(
        "compared sheet '{}': {} cells, {} changed",
        result.sheet_name(),
        result.statistics.total_cells,
        result.statistics.changed_cells()
    );

    result
}

/// Build the result for a sheet that exists only in the old workbook
pub fn deleted_sheet(old: &Worksheet) -> SheetDiffResult {
    one_sided(old, SheetStatus::Deleted)
}

/// Build the result for a sheet that exists only in the new workbook
pub fn added_sheet(new: &Worksheet) -> SheetDiffResult {
    one_sided(new, SheetStatus::Added)
}

fn one_sided(sheet: &Worksheet, status: SheetStatus) -> SheetDiffResult {
    let mut cells: Vec<_> = sheet.cells().collect();
    cells.sort_unstable_by_key(|cell| cell.address);

    let mut result = SheetDiffResult::new(sheet.name(), status);
    result.statistics.total_cells = cells.len();
    result.cell_diffs.reserve(cells.len());

    for cell in cells {
        let value = Some(cell.value.clone());
        let diff = match status {
            SheetStatus::Added => CellDiff::new(cell.address, DiffType::Added, None, value),
            _ => CellDiff::new(cell.address, DiffType::Deleted, value, None),
        };
        result.statistics.record(diff.diff_type);
        result.cell_diffs.push(diff);
    }

    log::debug!(
        "sheet '{}' only in {} workbook: {} cells",
        sheet.name(),
        if status == SheetStatus::Added { "new" } else { "old" },
        result.statistics.total_cells
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn addr(row: u32, col: u32) -> CellAddress {
        CellAddress::new(row, col).unwrap()
    }

    fn sheet(name: &str, cells: &[((u32, u32), &str)]) -> Worksheet {
        let mut ws = Worksheet::new(name);
        for ((row, col), value) in cells {
            ws.set_value(addr(*row, *col), *value);
        }
        ws
    }

    #[test]
    fn test_detects_added_cell() {
        let old = sheet("Sheet1", &[((1, 1), "A1")]);
        let new = sheet("Sheet1", &[((1, 1), "A1"), ((1, 2), "B1")]);

        let result = compare_sheets(&old, &new);
        assert_eq!(result.statistics().added_cells, 1);
        assert_eq!(result.statistics().unchanged_cells, 1);
        assert_eq!(
            result.diff_at(addr(1, 2)),
            Some(&CellDiff::new(
                addr(1, 2),
                DiffType::Added,
                None,
                Some("B1".into())
            ))
        );
    }

    #[test]
    fn test_detects_deleted_cell() {
        let old = sheet("Sheet1", &[((1, 1), "A1"), ((1, 2), "B1")]);
        let new = sheet("Sheet1", &[((1, 1), "A1")]);

        let result = compare_sheets(&old, &new);
        assert_eq!(result.statistics().deleted_cells, 1);
        assert_eq!(result.statistics().unchanged_cells, 1);

        let deleted = result.diff_at(addr(1, 2)).unwrap();
        assert_eq!(deleted.diff_type, DiffType::Deleted);
        assert_eq!(deleted.old_value.as_deref(), Some("B1"));
        assert_eq!(deleted.new_value, None);
    }

    #[test]
    fn test_mixed_statistics() {
        let old = sheet("Sheet1", &[((1, 1), "A1"), ((1, 2), "B1"), ((2, 1), "A2")]);
        let new = sheet(
            "Sheet1",
            &[((1, 1), "A1_Modified"), ((1, 3), "C1_Added"), ((2, 1), "A2")],
        );

        let result = compare_sheets(&old, &new);
        let stats = result.statistics();
        assert_eq!(stats.total_cells, 4);
        assert_eq!(stats.modified_cells, 1);
        assert_eq!(stats.deleted_cells, 1);
        assert_eq!(stats.added_cells, 1);
        assert_eq!(stats.unchanged_cells, 1);
        assert_eq!(stats.changed_cells(), 3);
        assert!((stats.change_percentage() - 75.0).abs() < 0.01);

        let order: Vec<_> = result.cell_diffs().iter().map(|d| d.address).collect();
        assert_eq!(order, vec![addr(1, 1), addr(1, 2), addr(1, 3), addr(2, 1)]);
    }

    #[test]
    fn test_comparison_is_exact() {
        let old = sheet("S", &[((1, 1), "1"), ((1, 2), "abc"), ((1, 3), "")]);
        let new = sheet("S", &[((1, 1), "1.0"), ((1, 2), "abc "), ((1, 3), "")]);

        let result = compare_sheets(&old, &new);
        assert_eq!(result.statistics().modified_cells, 2);
        assert_eq!(result.statistics().unchanged_cells, 1);
        assert_eq!(
            result.diff_at(addr(1, 3)).unwrap().diff_type,
            DiffType::Unchanged
        );
    }

    #[test]
    fn test_empty_string_against_missing_is_a_change() {
        let old = sheet("S", &[((2, 2), "")]);
        let new = sheet("S", &[]);

        let result = compare_sheets(&old, &new);
        assert_eq!(result.statistics().deleted_cells, 1);
        assert_eq!(
            result.diff_at(addr(2, 2)).unwrap().old_value.as_deref(),
            Some("")
        );
    }

    #[test]
    fn test_result_named_after_old_sheet() {
        let result = compare_sheets(&sheet("Empty1", &[]), &sheet("Empty2", &[]));
        assert_eq!(result.sheet_name(), "Empty1");
        assert!(result.cell_diffs().is_empty());
        assert_eq!(result.statistics().total_cells, 0);
    }

    #[test]
    fn test_deleted_sheet() {
        let old = sheet("Gone", &[((2, 1), "b"), ((1, 1), "a")]);
        let result = deleted_sheet(&old);

        assert_eq!(result.status(), SheetStatus::Deleted);
        assert_eq!(result.statistics().deleted_cells, 2);
        assert_eq!(result.statistics().total_cells, 2);
        assert_eq!(
            result.cell_diffs(),
            &[
                CellDiff::new(addr(1, 1), DiffType::Deleted, Some("a".into()), None),
                CellDiff::new(addr(2, 1), DiffType::Deleted, Some("b".into()), None),
            ]
        );
    }

    #[test]
    fn test_added_sheet() {
        let new = sheet("Fresh", &[((1, 2), "y"), ((1, 1), "x")]);
        let result = added_sheet(&new);

        assert_eq!(result.status(), SheetStatus::Added);
        assert_eq!(result.statistics().added_cells, 2);
        assert_eq!(
            result.cell_diffs(),
            &[
                CellDiff::new(addr(1, 1), DiffType::Added, None, Some("x".into())),
                CellDiff::new(addr(1, 2), DiffType::Added, None, Some("y".into())),
            ]
        );
    }
}
