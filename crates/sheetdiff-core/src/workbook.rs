//! Workbook type - the loaded snapshot of one spreadsheet file

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::{Error, Result};
use crate::worksheet::Worksheet;

/// A workbook snapshot produced by a loader.
///
/// Worksheets keep workbook order. Sheet names are unique (exact,
/// case-sensitive match); [`Workbook::add_worksheet`] is the only way in and
/// enforces that.
#[derive(Debug, Clone)]
pub struct Workbook {
    /// Source file path
    path: PathBuf,
    /// Worksheets in workbook order
    worksheets: Vec<Worksheet>,
    /// When the snapshot was taken
    loaded_at: DateTime<Local>,
}

impl Workbook {
    /// Create an empty workbook for the given source path, stamped now
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            worksheets: Vec::new(),
            loaded_at: Local::now(),
        }
    }

    /// Create an empty workbook with no source path
    pub fn empty() -> Self {
        Self::new(PathBuf::new())
    }

    /// Source file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Set the source file path
    pub fn set_path<P: Into<PathBuf>>(&mut self, path: P) {
        self.path = path.into();
    }

    /// When the snapshot was taken
    pub fn loaded_at(&self) -> DateTime<Local> {
        self.loaded_at
    }

    /// Get the number of worksheets
    pub fn sheet_count(&self) -> usize {
        self.worksheets.len()
    }

    /// Check if the workbook has no worksheets
    pub fn is_empty(&self) -> bool {
        self.worksheets.is_empty()
    }

    /// Get a worksheet by index
    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.worksheets.get(index)
    }

    /// Get a mutable worksheet by index
    pub fn worksheet_mut(&mut self, index: usize) -> Option<&mut Worksheet> {
        self.worksheets.get_mut(index)
    }

    /// Get a worksheet by exact name
    pub fn worksheet_by_name(&self, name: &str) -> Option<&Worksheet> {
        self.worksheets.iter().find(|ws| ws.name() == name)
    }

    /// Iterate over all worksheets in workbook order
    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.worksheets.iter()
    }

    /// Iterate over sheet names in workbook order
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.worksheets.iter().map(|ws| ws.name())
    }

    /// Add a worksheet at the end of the workbook
    pub fn add_worksheet(&mut self, worksheet: Worksheet) -> Result<usize> {
        self.validate_sheet_name(worksheet.name())?;
        let index = self.worksheets.len();
        self.worksheets.push(worksheet);
        Ok(index)
    }

    /// Add a new empty worksheet with the given name
    pub fn add_worksheet_with_name(&mut self, name: &str) -> Result<usize> {
        self.add_worksheet(Worksheet::new(name))
    }

    /// Remove a worksheet by name and return it
    pub fn take_worksheet(&mut self, name: &str) -> Result<Worksheet> {
        let index = self
            .worksheets
            .iter()
            .position(|ws| ws.name() == name)
            .ok_or_else(|| Error::SheetNotFound(name.into()))?;
        Ok(self.worksheets.remove(index))
    }

    fn validate_sheet_name(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidSheetName("Sheet name cannot be empty".into()));
        }

        // Exact match: names are the case-sensitive key sheets are diffed by
        if self.worksheets.iter().any(|ws| ws.name() == name) {
            return Err(Error::DuplicateSheetName(name.into()));
        }

        Ok(())
    }
}

impl Default for Workbook {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_workbook() {
        let wb = Workbook::new("book.xlsx");
        assert_eq!(wb.path(), Path::new("book.xlsx"));
        assert!(wb.is_empty());
        assert_eq!(wb.sheet_count(), 0);
    }

    #[test]
    fn test_add_worksheets_keeps_order() {
        let mut wb = Workbook::empty();
        assert_eq!(wb.add_worksheet_with_name("Zeta").unwrap(), 0);
        assert_eq!(wb.add_worksheet_with_name("Alpha").unwrap(), 1);

        let names: Vec<_> = wb.sheet_names().collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut wb = Workbook::empty();
        wb.add_worksheet_with_name("Sheet1").unwrap();

        assert_eq!(
            wb.add_worksheet_with_name("Sheet1"),
            Err(Error::DuplicateSheetName("Sheet1".into()))
        );
        assert_eq!(wb.sheet_count(), 1);
    }

    #[test]
    fn test_names_differing_in_case_are_distinct() {
        let mut wb = Workbook::empty();
        wb.add_worksheet_with_name("Sheet1").unwrap();
        wb.add_worksheet_with_name("SHEET1").unwrap();
        assert_eq!(wb.sheet_count(), 2);
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut wb = Workbook::empty();
        assert!(matches!(
            wb.add_worksheet_with_name(""),
            Err(Error::InvalidSheetName(_))
        ));
    }

    #[test]
    fn test_worksheet_by_name() {
        let mut wb = Workbook::empty();
        wb.add_worksheet_with_name("Data").unwrap();

        assert!(wb.worksheet_by_name("Data").is_some());
        assert!(wb.worksheet_by_name("data").is_none());
    }

    #[test]
    fn test_take_worksheet() {
        let mut wb = Workbook::empty();
        wb.add_worksheet_with_name("A").unwrap();
        wb.add_worksheet_with_name("B").unwrap();

        let b = wb.take_worksheet("B").unwrap();
        assert_eq!(b.name(), "B");
        assert_eq!(wb.sheet_count(), 1);
        assert_eq!(
            wb.take_worksheet("Missing").unwrap_err(),
            Error::SheetNotFound("Missing".into())
        );
    }
}
