//! CSV reader

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::CsvResult;
use crate::options::CsvReadOptions;
use sheetdiff_core::{CellAddress, Workbook, Worksheet};

/// CSV file reader
pub struct CsvReader;

impl CsvReader {
    /// Read CSV file into a workbook holding one worksheet
    pub fn read_workbook_file<P: AsRef<Path>>(
        path: P,
        options: &CsvReadOptions,
    ) -> CsvResult<Workbook> {
        let path = path.as_ref();
        let worksheet = Self::read_file(path, options)?;

        let mut workbook = Workbook::new(path);
        workbook.add_worksheet(worksheet)?;
        Ok(workbook)
    }

    /// Read CSV file into a worksheet
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<Worksheet> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file), options)
    }

    /// Read CSV from a reader into a worksheet.
    ///
    /// Every record is data (there is no header row). Record `n` lands on
    /// row `n`, field `m` on column `m`, both 1-based. Fields are kept
    /// verbatim and empty fields produce no cell.
    pub fn read<R: Read>(reader: R, options: &CsvReadOptions) -> CsvResult<Worksheet> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut worksheet = Worksheet::new(options.sheet_name.as_str());
        let mut records = 0usize;

        for (row_idx, result) in csv_reader.records().enumerate() {
            let record = result?;
            let row = u32::try_from(row_idx + 1).unwrap_or(u32::MAX);

            for (col_idx, field) in record.iter().enumerate() {
                if field.is_empty() {
                    continue;
                }
                let col = u32::try_from(col_idx + 1).unwrap_or(u32::MAX);
                worksheet.set_value(CellAddress::new(row, col)?, field);
            }

            records += 1;
        }

        log::debug!(
            "read {} csv records into '{}': {} cells",
            records,
            worksheet.name(),
            worksheet.cell_count()
        );
        Ok(worksheet)
    }
}
