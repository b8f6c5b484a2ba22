//! # sheetdiff-xlsx
//!
//! XLSX (Office Open XML) loader for sheetdiff.
//!
//! Reads every worksheet of a workbook into a [`sheetdiff_core::Workbook`],
//! reducing each cell to the text the diff engine compares.

pub mod error;
pub mod reader;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
