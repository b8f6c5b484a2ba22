//! Reading XLSX packages from disk

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use sheetdiff_xlsx::{XlsxError, XlsxReader};

fn write_package(dir: &Path, file_name: &str, sheets: &[(&str, &str)]) -> PathBuf {
    let path = dir.join(file_name);
    let mut zip = zip::ZipWriter::new(File::create(&path).unwrap());
    let options = zip::write::SimpleFileOptions::default();

    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(br#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#)
        .unwrap();

    let mut workbook = String::from(r#"<workbook xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#);
    let mut rels = String::from("<Relationships>");
    for (i, (name, _)) in sheets.iter().enumerate() {
        workbook.push_str(&format!(
            r#"<sheet name="{name}" sheetId="{n}" r:id="rId{n}"/>"#,
            n = i + 1
        ));
        rels.push_str(&format!(
            r#"<Relationship Id="rId{n}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="/xl/worksheets/sheet{n}.xml"/>"#,
            n = i + 1
        ));
    }
    workbook.push_str("</sheets></workbook>");
    rels.push_str("</Relationships>");

    zip.start_file("xl/workbook.xml", options).unwrap();
    zip.write_all(workbook.as_bytes()).unwrap();
    zip.start_file("xl/_rels/workbook.xml.rels", options)
        .unwrap();
    zip.write_all(rels.as_bytes()).unwrap();

    for (i, (_, body)) in sheets.iter().enumerate() {
        zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)
            .unwrap();
        zip.write_all(format!("<worksheet><sheetData>{}</sheetData></worksheet>", body).as_bytes())
            .unwrap();
    }

    zip.finish().unwrap();
    path
}

#[test]
fn read_file_records_path_and_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_package(
        dir.path(),
        "people.xlsx",
        &[(
            "People",
            "<row r=\"1\"><c r=\"A1\" t=\"inlineStr\"><is><t>Alice</t></is></c><c r=\"B1\"><v>30.0</v></c></row>",
        )],
    );

    let workbook = XlsxReader::read_file(&path).unwrap();

    assert_eq!(workbook.path(), path.as_path());
    let ws = workbook.worksheet_by_name("People").unwrap();
    assert_eq!(ws.cell_by_ref("A1").unwrap().unwrap().value, "Alice");
    assert_eq!(ws.cell_by_ref("B1").unwrap().unwrap().value, "30");
}

#[test]
fn read_sheet_file_picks_one_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_package(
        dir.path(),
        "two.xlsx",
        &[
            ("One", "<row r=\"1\"><c r=\"A1\"><v>1</v></c></row>"),
            ("Two", "<row r=\"3\"><c r=\"C3\"><v>2</v></c></row>"),
        ],
    );

    let ws = XlsxReader::read_sheet_file(&path, "Two").unwrap();
    assert_eq!(ws.name(), "Two");
    assert_eq!(ws.cell_count(), 1);
    assert_eq!(ws.cell_by_ref("C3").unwrap().unwrap().value, "2");
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = XlsxReader::read_file(dir.path().join("absent.xlsx"));
    assert!(matches!(result, Err(XlsxError::Io(_))));
}

#[test]
fn duplicate_sheet_names_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_package(dir.path(), "dup.xlsx", &[("Same", ""), ("Same", "")]);

    let result = XlsxReader::read_file(&path);
    assert!(matches!(
        result,
        Err(XlsxError::Core(sheetdiff_core::Error::DuplicateSheetName(_)))
    ));
}
