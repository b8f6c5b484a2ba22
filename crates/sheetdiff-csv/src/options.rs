//! CSV options

/// Options for reading CSV files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvReadOptions {
    /// Field delimiter (default: comma)
    pub delimiter: u8,
    /// Quote character (default: double quote)
    pub quote: u8,
    /// Name given to the single worksheet (default: `Sheet1`)
    pub sheet_name: String,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            sheet_name: "Sheet1".to_string(),
        }
    }
}

impl CsvReadOptions {
    /// Options for tab-separated files
    pub fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            ..Self::default()
        }
    }

    /// Set the worksheet name
    pub fn with_sheet_name<S: Into<String>>(mut self, name: S) -> Self {
        self.sheet_name = name.into();
        self
    }
}
