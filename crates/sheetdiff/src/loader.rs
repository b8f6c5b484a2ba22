//! Loading workbooks from disk
//!
//! [`FileLoader`] picks a reader from the file extension. Anything that can
//! produce a [`Workbook`] can stand in for it by implementing
//! [`WorkbookLoader`].
//!
//! # Example
//!
//! ```rust,no_run
//! use sheetdiff::{load_pair, FileLoader};
//!
//! let loader = FileLoader::new();
//! let (old, new) = load_pair(&loader, "report_v1.xlsx", "report_v2.xlsx");
//! let (old, new) = (old?, new?);
//! println!("{} vs {} sheets", old.sheet_count(), new.sheet_count());
//! # Ok::<(), sheetdiff::LoadError>(())
//! ```

use std::path::{Path, PathBuf};
use std::thread;

use sheetdiff_core::{Workbook, Worksheet};
use sheetdiff_csv::{CsvError, CsvReadOptions, CsvReader};
use sheetdiff_xlsx::{XlsxError, XlsxReader};
use thiserror::Error;

/// Errors raised while turning a file into a [`Workbook`]
#[derive(Debug, Error)]
pub enum LoadError {
    /// The path does not exist
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The workbook has no worksheet with this exact name
    #[error("Worksheet '{name}' not found in {}", path.display())]
    SheetNotFound { path: PathBuf, name: String },

    /// No reader handles this file extension
    #[error("Unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// The XLSX reader failed
    #[error("Failed to read XLSX file {}", path.display())]
    Xlsx { path: PathBuf, source: XlsxError },

    /// The CSV reader failed
    #[error("Failed to read CSV file {}", path.display())]
    Csv { path: PathBuf, source: CsvError },
}

impl LoadError {
    /// The file the error refers to
    pub fn path(&self) -> &Path {
        match self {
            LoadError::NotFound(path) | LoadError::UnsupportedFormat(path) => path,
            LoadError::SheetNotFound { path, .. }
            | LoadError::Xlsx { path, .. }
            | LoadError::Csv { path, .. } => path,
        }
    }
}

/// File formats [`FileLoader`] can read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Office Open XML workbook (`.xlsx`, `.xlsm`)
    Xlsx,
    /// Comma separated values (`.csv`), one worksheet
    Csv,
}

impl Format {
    /// Detect the format from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match extension.as_deref() {
            Some("xlsx") | Some("xlsm") => Some(Format::Xlsx),
            Some("csv") => Some(Format::Csv),
            _ => None,
        }
    }

    /// Short lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Xlsx => "xlsx",
            Format::Csv => "csv",
        }
    }
}

/// Options for [`FileLoader`]
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// How CSV files are parsed
    pub csv: CsvReadOptions,
}

/// Something that turns a path into a [`Workbook`].
pub trait WorkbookLoader {
    /// Load every worksheet of the workbook at `path`
    fn load(&self, path: &Path) -> Result<Workbook, LoadError>;

    /// Load one worksheet by exact name
    fn load_sheet(&self, path: &Path, name: &str) -> Result<Worksheet, LoadError> {
        let mut workbook = self.load(path)?;
        workbook
            .take_worksheet(name)
            .map_err(|_| LoadError::SheetNotFound {
                path: path.to_path_buf(),
                name: name.to_string(),
            })
    }
}

/// Loader that dispatches on the file extension
#[derive(Debug, Clone, Default)]
pub struct FileLoader {
    options: LoadOptions,
}

impl FileLoader {
    /// Create a loader with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader with custom options
    pub fn with_options(options: LoadOptions) -> Self {
        Self { options }
    }

    fn format(&self, path: &Path) -> Result<Format, LoadError> {
        if !path.exists() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }
        Format::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat(path.to_path_buf()))
    }
}

impl WorkbookLoader for FileLoader {
    fn load(&self, path: &Path) -> Result<Workbook, LoadError> {
        let format = self.format(path)?;
        log::debug!("loading {} as {}", path.display(), format.as_str());

        let workbook = match format {
            Format::Xlsx => XlsxReader::read_file(path).map_err(|e| xlsx_error(path, e))?,
            Format::Csv => {
                CsvReader::read_workbook_file(path, &self.options.csv).map_err(|source| {
                    LoadError::Csv {
                        path: path.to_path_buf(),
                        source,
                    }
                })?
            }
        };

        log::debug!(
            "loaded {}: {} worksheets",
            path.display(),
            workbook.sheet_count()
        );
        Ok(workbook)
    }

    fn load_sheet(&self, path: &Path, name: &str) -> Result<Worksheet, LoadError> {
        match self.format(path)? {
            Format::Xlsx => XlsxReader::read_sheet_file(path, name).map_err(|e| xlsx_error(path, e)),
            Format::Csv => {
                let mut workbook = self.load(path)?;
                workbook
                    .take_worksheet(name)
                    .map_err(|_| LoadError::SheetNotFound {
                        path: path.to_path_buf(),
                        name: name.to_string(),
                    })
            }
        }
    }
}

fn xlsx_error(path: &Path, error: XlsxError) -> LoadError {
    match error {
        XlsxError::SheetNotFound(name) => LoadError::SheetNotFound {
            path: path.to_path_buf(),
            name,
        },
        source => LoadError::Xlsx {
            path: path.to_path_buf(),
            source,
        },
    }
}

/// Load two workbooks concurrently.
///
/// Each side fails or succeeds on its own; both results are returned.
pub fn load_pair<L, P, Q>(
    loader: &L,
    old: P,
    new: Q,
) -> (Result<Workbook, LoadError>, Result<Workbook, LoadError>)
where
    L: WorkbookLoader + Sync + ?Sized,
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let (old, new) = (old.as_ref(), new.as_ref());

    thread::scope(|scope| {
        let old_handle = scope.spawn(|| loader.load(old));
        let new_result = loader.load(new);
        let old_result = match old_handle.join() {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        };
        (old_result, new_result)
    })
}
