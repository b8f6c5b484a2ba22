//! Rendering comparison results for the terminal

use std::io::{self, Write};
use std::path::Path;

use serde_json::{json, Value};
use sheetdiff::{CellDiff, ComparisonStatistics, SheetDiffResult, WorkbookStatistics};

/// What to include in a report
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    /// Also list unchanged cells
    pub all: bool,
}

fn selected<'a>(
    result: &'a SheetDiffResult,
    options: ReportOptions,
) -> impl Iterator<Item = &'a CellDiff> {
    result
        .cell_diffs()
        .iter()
        .filter(move |d| options.all || d.diff_type.is_change())
}

fn counts(stats: &ComparisonStatistics) -> String {
    format!(
        "{} cells: {} added, {} deleted, {} modified, {} unchanged ({:.1}% changed)",
        stats.total_cells,
        stats.added_cells,
        stats.deleted_cells,
        stats.modified_cells,
        stats.unchanged_cells,
        stats.change_percentage()
    )
}

fn quoted(value: Option<&str>) -> String {
    match value {
        Some(v) => format!("{:?}", v),
        None => "-".to_string(),
    }
}

/// Plain text report, one line per cell
pub fn write_text<W: Write>(
    out: &mut W,
    old: &Path,
    new: &Path,
    results: &[SheetDiffResult],
    options: ReportOptions,
) -> io::Result<()> {
    writeln!(out, "--- {}", old.display())?;
    writeln!(out, "+++ {}", new.display())?;

    for result in results {
        writeln!(out)?;
        writeln!(
            out,
            "[{}] {}: {}",
            result.sheet_name(),
            result.status(),
            counts(result.statistics())
        )?;

        for diff in selected(result, options) {
            let detail = match (diff.old_value.as_deref(), diff.new_value.as_deref()) {
                (Some(old), Some(new)) if old != new => {
                    format!("{} -> {}", quoted(Some(old)), quoted(Some(new)))
                }
                (old, None) => quoted(old),
                (_, new) => quoted(new),
            };
            writeln!(
                out,
                "  {:<8} {:<9} {}",
                diff.address.to_string(),
                diff.diff_type.as_str(),
                detail
            )?;
        }
    }

    let stats = WorkbookStatistics::from_results(results);
    writeln!(out)?;
    writeln!(
        out,
        "{} sheets ({} compared, {} deleted, {} added, {} with changes)",
        stats.sheet_count(),
        stats.sheets_compared,
        stats.sheets_deleted,
        stats.sheets_added,
        stats.sheets_changed
    )?;
    writeln!(out, "{}", counts(&stats.cells))?;
    Ok(())
}

fn statistics_json(stats: &ComparisonStatistics) -> Value {
    json!({
        "total_cells": stats.total_cells,
        "added_cells": stats.added_cells,
        "deleted_cells": stats.deleted_cells,
        "modified_cells": stats.modified_cells,
        "unchanged_cells": stats.unchanged_cells,
        "changed_cells": stats.changed_cells(),
        "change_percentage": stats.change_percentage(),
    })
}

/// Machine-readable report
pub fn to_json(
    old: &Path,
    new: &Path,
    results: &[SheetDiffResult],
    options: ReportOptions,
) -> Value {
    let sheets: Vec<Value> = results
        .iter()
        .map(|result| {
            let cells: Vec<Value> = selected(result, options)
                .map(|diff| {
                    json!({
                        "cell": diff.address.to_string(),
                        "row": diff.address.row,
                        "col": diff.address.col,
                        "type": diff.diff_type,
                        "old": diff.old_value,
                        "new": diff.new_value,
                    })
                })
                .collect();

            json!({
                "name": result.sheet_name(),
                "status": result.status(),
                "statistics": statistics_json(result.statistics()),
                "cells": cells,
            })
        })
        .collect();

    let stats = WorkbookStatistics::from_results(results);
    json!({
        "old": old.display().to_string(),
        "new": new.display().to_string(),
        "sheets": sheets,
        "summary": {
            "sheets_compared": stats.sheets_compared,
            "sheets_deleted": stats.sheets_deleted,
            "sheets_added": stats.sheets_added,
            "sheets_changed": stats.sheets_changed,
            "cells": statistics_json(&stats.cells),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sheetdiff::{compare_workbooks, Workbook, Worksheet};

    fn results() -> Vec<SheetDiffResult> {
        let mut old = Workbook::empty();
        let mut sheet = Worksheet::new("Data");
        sheet.set_value_at(1, 1, "same").unwrap();
        sheet.set_value_at(1, 2, "before").unwrap();
        sheet.set_value_at(2, 1, "gone").unwrap();
        old.add_worksheet(sheet).unwrap();

        let mut new = Workbook::empty();
        let mut sheet = Worksheet::new("Data");
        sheet.set_value_at(1, 1, "same").unwrap();
        sheet.set_value_at(1, 2, "after").unwrap();
        sheet.set_value_at(3, 3, "fresh").unwrap();
        new.add_worksheet(sheet).unwrap();

        compare_workbooks(&old, &new)
    }

    fn text(options: ReportOptions) -> String {
        let mut out = Vec::new();
        write_text(
            &mut out,
            Path::new("a.xlsx"),
            Path::new("b.xlsx"),
            &results(),
            options,
        )
        .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_text_lists_changes_only() {
        let report = text(ReportOptions::default());

        assert!(report.starts_with("--- a.xlsx\n+++ b.xlsx\n"));
        assert!(report.contains("[Data] matched: 4 cells: 1 added, 1 deleted, 1 modified, 1 unchanged (75.0% changed)"));
        assert!(report.contains("  B1       modified  \"before\" -> \"after\"\n"));
        assert!(report.contains("  A2       deleted   \"gone\"\n"));
        assert!(report.contains("  C3       added     \"fresh\"\n"));
        assert!(!report.contains("unchanged   "));
        assert!(report.contains("1 sheets (1 compared, 0 deleted, 0 added, 1 with changes)"));
    }

    #[test]
    fn test_text_all_includes_unchanged() {
        let report = text(ReportOptions { all: true });
        assert!(report.contains("  A1       unchanged \"same\"\n"));
    }

    #[test]
    fn test_json_shape() {
        let value = to_json(
            Path::new("a.xlsx"),
            Path::new("b.xlsx"),
            &results(),
            ReportOptions::default(),
        );

        assert_eq!(value["old"], "a.xlsx");
        let sheet = &value["sheets"][0];
        assert_eq!(sheet["name"], "Data");
        assert_eq!(sheet["status"], "matched");
        assert_eq!(sheet["statistics"]["changed_cells"], 3);
        assert_eq!(sheet["statistics"]["change_percentage"], 75.0);

        let cells = sheet["cells"].as_array().unwrap();
        assert_eq!(cells.len(), 3);
        assert_eq!(
            cells[0],
            json!({
                "cell": "B1",
                "row": 1,
                "col": 2,
                "type": "modified",
                "old": "before",
                "new": "after",
            })
        );
        assert_eq!(cells[1]["old"], "gone");
        assert_eq!(cells[1]["new"], Value::Null);
        assert_eq!(value["summary"]["cells"]["total_cells"], 4);
    }
}
