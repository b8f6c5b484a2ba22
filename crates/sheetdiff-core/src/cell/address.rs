//! Cell address type

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A cell address, 1-based in both dimensions.
///
/// Addresses order by row first, then column, which is the order diff
/// results are reported in. The derived `Ord` relies on the field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellAddress {
    /// Row number (1-based)
    pub row: u32,
    /// Column number (1-based, A=1, B=2, ..., XFD=16384)
    pub col: u32,
}

impl CellAddress {
    /// Create a cell address from 1-based row and column numbers.
    ///
    /// # Examples
    /// ```
    /// use sheetdiff_core::CellAddress;
    ///
    /// let addr = CellAddress::new(2, 3).unwrap();
    /// assert_eq!(addr.to_string(), "C2");
    /// assert!(CellAddress::new(0, 1).is_err());
    /// ```
    pub fn new(row: u32, col: u32) -> Result<Self> {
        if row == 0 || col == 0 {
            return Err(Error::InvalidAddress(format!(
                "row and column are 1-based, got ({}, {})",
                row, col
            )));
        }
        if row > MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS));
        }
        if col > MAX_COLS {
            return Err(Error::ColumnOutOfBounds(col, MAX_COLS));
        }
        Ok(Self { row, col })
    }

    /// Parse a cell address from A1-style notation.
    ///
    /// `$` markers are accepted and ignored; absolute references carry no
    /// meaning for comparison.
    ///
    /// # Examples
    /// ```
    /// use sheetdiff_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("B3").unwrap();
    /// assert_eq!((addr.row, addr.col), (3, 2));
    ///
    /// let addr = CellAddress::parse("$AA$10").unwrap();
    /// assert_eq!((addr.row, addr.col), (10, 27));
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidAddress("empty address".into()));
        }

        let bytes = s.as_bytes();
        let mut pos = 0;

        if bytes.get(pos) == Some(&b'$') {
            pos += 1;
        }

        let col_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            pos += 1;
        }
        if pos == col_start {
            return Err(Error::InvalidAddress(format!(
                "no column letters in '{}'",
                s
            )));
        }
        let col = Self::letters_to_column(&s[col_start..pos])?;

        if bytes.get(pos) == Some(&b'$') {
            pos += 1;
        }

        let row_str = &s[pos..];
        if row_str.is_empty() {
            return Err(Error::InvalidAddress(format!("no row number in '{}'", s)));
        }
        let row: u32 = row_str
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("invalid row number in '{}'", s)))?;

        Self::new(row, col)
    }

    /// Convert a 1-based column number to letters (1 = A, 26 = Z, 27 = AA)
    pub fn column_to_letters(col: u32) -> String {
        let mut result = String::new();
        let mut n = col;

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Convert column letters to a 1-based column number (A = 1, AA = 27)
    pub fn letters_to_column(letters: &str) -> Result<u32> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidAddress(format!(
                    "invalid column letter '{}'",
                    c
                )));
            }
            col = col.saturating_mul(26) + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
            if col > MAX_COLS {
                return Err(Error::ColumnOutOfBounds(col, MAX_COLS));
            }
        }

        Ok(col)
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", Self::column_to_letters(self.col), self.row)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
