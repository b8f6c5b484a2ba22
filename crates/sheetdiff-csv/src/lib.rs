//! # sheetdiff-csv
//!
//! CSV loader for sheetdiff. A CSV file loads as a workbook with a single
//! worksheet whose cells hold the raw field text.

mod error;
mod options;
mod reader;

pub use error::{CsvError, CsvResult};
pub use options::CsvReadOptions;
pub use reader::CsvReader;
