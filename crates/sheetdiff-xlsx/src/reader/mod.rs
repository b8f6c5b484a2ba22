//! XLSX reader

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use sheetdiff_core::{Cell, CellAddress, Error as CoreError, Workbook, Worksheet};

type Archive<R> = zip::ZipArchive<R>;

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this format to encode special characters in XML:
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
fn decode_excel_escapes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '_' {
            result.push(c);
            continue;
        }

        let mut hex_chars = String::new();
        let mut saw_x = false;
        let mut decoded = None;

        if chars.peek() == Some(&'x') {
            chars.next();
            saw_x = true;

            while hex_chars.len() < 4 {
                match chars.peek() {
                    Some(ch) if ch.is_ascii_hexdigit() => {
                        hex_chars.push(*ch);
                        chars.next();
                    }
                    _ => break,
                }
            }

            if hex_chars.len() == 4 && chars.peek() == Some(&'_') {
                chars.next();
                decoded = u32::from_str_radix(&hex_chars, 16)
                    .ok()
                    .and_then(char::from_u32);
            }
        }

        match decoded {
            Some(ch) => result.push(ch),
            None => {
                // Not an escape, put back what was consumed
                result.push('_');
                if saw_x {
                    result.push('x');
                    result.push_str(&hex_chars);
                }
            }
        }
    }

    result
}

/// Render a stored number the way a spreadsheet shows it in General format.
///
/// Integral values lose their fractional part (`30.0` becomes `30`). Text
/// that is not a number is passed through. Values with more significant
/// digits than an `f64` holds keep their stored digits.
fn number_text(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(n) if n == 0.0 => "0".to_string(),
        Ok(n) if n.is_finite() && significant_digits(trimmed) <= F64_EXACT_DIGITS => n.to_string(),
        Ok(n) if n.is_finite() => strip_zero_fraction(trimmed).to_string(),
        _ => raw.to_string(),
    }
}

/// Decimal digits that always survive a trip through `f64`
const F64_EXACT_DIGITS: usize = 15;

/// Significant digits in the mantissa of a decimal literal
fn significant_digits(number: &str) -> usize {
    let mantissa = number
        .split(|c| c == 'e' || c == 'E')
        .next()
        .unwrap_or(number);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    digits.trim_start_matches('0').trim_end_matches('0').len()
}

/// Drop trailing fractional zeros (`12.50` becomes `12.5`, `7.000` becomes `7`)
fn strip_zero_fraction(number: &str) -> &str {
    if !number.contains('.') || number.contains(|c| c == 'e' || c == 'E') {
        return number;
    }
    number.trim_end_matches('0').trim_end_matches('.')
}

/// Reduce a `<v>` payload to comparison text according to the cell type
fn cell_text(cell_type: Option<&str>, raw: &str, shared_strings: &[String]) -> XlsxResult<String> {
    let text = match cell_type {
        // Shared string
        Some("s") => {
            let idx: usize = raw
                .trim()
                .parse()
                .map_err(|_| XlsxError::Parse(format!("Invalid shared string index: {}", raw)))?;
            shared_strings.get(idx).cloned().ok_or_else(|| {
                XlsxError::Parse(format!("Shared string index {} out of bounds", idx))
            })?
        }

        // Boolean
        Some("b") => {
            if raw == "1" || raw.eq_ignore_ascii_case("true") {
                "TRUE".to_string()
            } else {
                "FALSE".to_string()
            }
        }

        // Error literal, e.g. #DIV/0!
        Some("e") => raw.to_string(),

        // Inline or formula string
        Some("str") | Some("inlineStr") => decode_excel_escapes(raw),

        // ISO 8601 date
        Some("d") => raw.to_string(),

        // Number (default type or explicit "n")
        None | Some("n") => number_text(raw),

        Some(other) => {
            log::debug!("unknown cell type '{}', keeping raw text", other);
            raw.to_string()
        }
    };

    Ok(text)
}

/// First attribute named `key`, unescaped
fn attribute(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// Tracks the current row so cells without an `r` attribute still get an address
#[derive(Debug, Default)]
struct RowCursor {
    row: u32,
    next_col: u32,
}

impl RowCursor {
    fn start_row(&mut self, e: &BytesStart) -> XlsxResult<()> {
        self.row = match attribute(e, b"r") {
            Some(r) => r
                .parse()
                .map_err(|_| XlsxError::Parse(format!("Invalid row number '{}'", r)))?,
            None => self.row + 1,
        };
        self.next_col = 1;
        Ok(())
    }

    fn cell_address(&mut self, e: &BytesStart) -> XlsxResult<CellAddress> {
        let address = match attribute(e, b"r") {
            Some(r) => CellAddress::parse(&r).map_err(|err| {
                XlsxError::Parse(format!("Invalid cell reference '{}': {}", r, err))
            })?,
            None => CellAddress::new(self.row, self.next_col.max(1))?,
        };
        self.next_col = address.col + 1;
        Ok(address)
    }
}

/// A `<c>` element being assembled
#[derive(Debug)]
struct PendingCell {
    address: CellAddress,
    cell_type: Option<String>,
    value: Option<String>,
    formula: Option<String>,
}

impl PendingCell {
    fn new(address: CellAddress, cell_type: Option<String>) -> Self {
        Self {
            address,
            cell_type,
            value: None,
            formula: None,
        }
    }

    /// Build the cell, or `None` for a cell with neither value nor formula
    fn into_cell(self, shared_strings: &[String]) -> XlsxResult<Option<Cell>> {
        let text = match self.value {
            Some(raw) => cell_text(self.cell_type.as_deref(), &raw, shared_strings)?,
            // Formula without a cached result
            None if self.formula.is_some() => String::new(),
            None => return Ok(None),
        };

        let mut cell = Cell::new(self.address, text);
        if let Some(f) = self.formula.filter(|f| !f.is_empty()) {
            // Ensure formula starts with '='
            cell = if f.starts_with('=') {
                cell.with_formula(f)
            } else {
                cell.with_formula(format!("={}", f))
            };
        }
        Ok(Some(cell))
    }
}

/// Where character data inside a `<c>` element goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextTarget {
    None,
    Value,
    Formula,
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a workbook from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut workbook = Self::read(BufReader::new(file))?;
        workbook.set_path(path);
        Ok(workbook)
    }

    /// Read a workbook from a reader
    ///
    /// Worksheets appear in the order `xl/workbook.xml` lists them.
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Workbook> {
        let mut archive = Self::open_archive(reader)?;
        let shared_strings = Self::read_shared_strings(&mut archive)?;
        let parts = Self::sheet_parts(&mut archive)?;

        let mut workbook = Workbook::empty();
        for (name, path) in parts {
            let worksheet = Self::read_worksheet(&mut archive, &name, &path, &shared_strings)?;
            workbook.add_worksheet(worksheet)?;
        }

        log::debug!("read {} worksheets", workbook.sheet_count());
        Ok(workbook)
    }

    /// Read a single worksheet by exact name from a file path
    pub fn read_sheet_file<P: AsRef<Path>>(path: P, name: &str) -> XlsxResult<Worksheet> {
        let file = File::open(path)?;
        Self::read_sheet(BufReader::new(file), name)
    }

    /// Read a single worksheet by exact name, skipping every other sheet part
    pub fn read_sheet<R: Read + Seek>(reader: R, name: &str) -> XlsxResult<Worksheet> {
        let mut archive = Self::open_archive(reader)?;
        let path = Self::sheet_parts(&mut archive)?
            .into_iter()
            .find(|(sheet_name, _)| sheet_name == name)
            .map(|(_, path)| path)
            .ok_or_else(|| XlsxError::SheetNotFound(name.to_string()))?;

        let shared_strings = Self::read_shared_strings(&mut archive)?;
        Self::read_worksheet(&mut archive, name, &path, &shared_strings)
    }

    fn open_archive<R: Read + Seek>(reader: R) -> XlsxResult<Archive<R>> {
        let mut archive = zip::ZipArchive::new(reader)?;

        // Verify this is an XLSX file
        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        Ok(archive)
    }

    /// Worksheet names paired with their part paths, in workbook order
    fn sheet_parts<R: Read + Seek>(archive: &mut Archive<R>) -> XlsxResult<Vec<(String, String)>> {
        let sheets = Self::read_workbook_xml(archive)?;
        let targets = Self::read_workbook_rels(archive)?;

        let mut seen = HashSet::new();
        for (name, _) in &sheets {
            if !seen.insert(name.as_str()) {
                return Err(CoreError::DuplicateSheetName(name.clone()).into());
            }
        }

        let parts = sheets
            .into_iter()
            .filter_map(|(name, r_id)| match targets.get(&r_id) {
                Some(path) => Some((name, path.clone())),
                None => {
                    // Chart sheets and dangling ids have no worksheet part
                    log::warn!("skipping sheet '{}': no worksheet part for {}", name, r_id);
                    None
                }
            })
            .collect();

        Ok(parts)
    }

    /// Read the shared strings table
    fn read_shared_strings<R: Read + Seek>(archive: &mut Archive<R>) -> XlsxResult<Vec<String>> {
        let mut strings = Vec::new();

        let file = match archive.by_name("xl/sharedStrings.xml") {
            Ok(f) => f,
            Err(_) => return Ok(strings), // No shared strings is valid
        };

        // Whitespace inside <t> is significant, so no trimming here
        let mut xml_reader = Reader::from_reader(BufReader::new(file));

        let mut buf = Vec::new();
        let mut current_string = String::new();
        let mut in_si = false;
        let mut in_t = false;
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current_string.clear();
                    }
                    b"rPh" => in_phonetic = true,
                    b"t" if in_si && !in_phonetic => in_t = true,
                    _ => {}
                },
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"si" => {
                        strings.push(decode_excel_escapes(&current_string));
                        current_string.clear();
                        in_si = false;
                    }
                    b"rPh" => in_phonetic = false,
                    b"t" => in_t = false,
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.name().as_ref() == b"si" => {
                    strings.push(String::new());
                }
                Ok(Event::Text(e)) if in_t => {
                    current_string.push_str(&e.unescape()?);
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        log::trace!("read {} shared strings", strings.len());
        Ok(strings)
    }

    /// Read workbook.xml to get sheet names and rIds
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut Archive<R>,
    ) -> XlsxResult<Vec<(String, String)>> {
        let file = archive
            .by_name("xl/workbook.xml")
            .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.name().as_ref() == b"sheet" => {
                    let name = attribute(&e, b"name");
                    let r_id = attribute(&e, b"r:id");
                    if let (Some(name), Some(r_id)) = (name, r_id) {
                        sheets.push((name, r_id));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Read workbook.xml.rels to get worksheet part paths
    fn read_workbook_rels<R: Read + Seek>(
        archive: &mut Archive<R>,
    ) -> XlsxResult<HashMap<String, String>> {
        let file = archive
            .by_name("xl/_rels/workbook.xml.rels")
            .map_err(|_| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let id = attribute(&e, b"Id");
                    let target = attribute(&e, b"Target");
                    let rel_type = attribute(&e, b"Type");

                    // Only include worksheet relationships
                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        if rel_type.ends_with("/worksheet") {
                            // Target is relative to xl/ folder unless absolute
                            let full_path = match target.strip_prefix('/') {
                                Some(absolute) => absolute.to_string(),
                                None => format!("xl/{}", target),
                            };
                            rels.insert(id, full_path);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Read one worksheet part into a [`Worksheet`]
    fn read_worksheet<R: Read + Seek>(
        archive: &mut Archive<R>,
        name: &str,
        path: &str,
        shared_strings: &[String],
    ) -> XlsxResult<Worksheet> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

        // Whitespace inside <v> and <t> is significant, so no trimming here
        let mut xml_reader = Reader::from_reader(BufReader::new(file));

        let mut worksheet = Worksheet::new(name);
        let mut buf = Vec::new();
        let mut cursor = RowCursor::default();
        let mut pending: Option<PendingCell> = None;
        let mut target = TextTarget::None;
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"row" => cursor.start_row(&e)?,
                    b"c" => {
                        let address = cursor.cell_address(&e)?;
                        pending = Some(PendingCell::new(address, attribute(&e, b"t")));
                    }
                    b"v" => {
                        if let Some(cell) = pending.as_mut() {
                            cell.value.get_or_insert_with(String::new);
                            target = TextTarget::Value;
                        }
                    }
                    b"f" => {
                        if let Some(cell) = pending.as_mut() {
                            cell.formula.get_or_insert_with(String::new);
                            target = TextTarget::Formula;
                        }
                    }
                    b"rPh" => in_phonetic = true,
                    // <t> inside an inline string <is>
                    b"t" if !in_phonetic => {
                        if let Some(cell) = pending.as_mut() {
                            cell.cell_type = Some("inlineStr".to_string());
                            cell.value.get_or_insert_with(String::new);
                            target = TextTarget::Value;
                        }
                    }
                    _ => {}
                },
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"c" => {
                        if let Some(cell) = pending.take() {
                            if let Some(cell) = cell.into_cell(shared_strings)? {
                                worksheet.insert_cell(cell);
                            }
                        }
                        target = TextTarget::None;
                    }
                    b"v" | b"f" | b"t" => target = TextTarget::None,
                    b"rPh" => in_phonetic = false,
                    _ => {}
                },
                Ok(Event::Text(e)) if target != TextTarget::None => {
                    let text = e.unescape()?;
                    if let Some(cell) = pending.as_mut() {
                        let slot = match target {
                            TextTarget::Formula => &mut cell.formula,
                            _ => &mut cell.value,
                        };
                        slot.get_or_insert_with(String::new).push_str(&text);
                    }
                }
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"row" => cursor.start_row(&e)?,
                    // Value-less cell (style only), still occupies a column
                    b"c" => {
                        cursor.cell_address(&e)?;
                    }
                    b"t" if !in_phonetic => {
                        if let Some(cell) = pending.as_mut() {
                            cell.cell_type = Some("inlineStr".to_string());
                            cell.value.get_or_insert_with(String::new);
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        log::debug!(
            "read worksheet '{}' from {}: {} cells",
            name,
            path,
            worksheet.cell_count()
        );
        Ok(worksheet)
    }
}
