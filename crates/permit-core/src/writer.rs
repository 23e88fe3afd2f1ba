//! Writers for the merged output artifacts
//!
//! The merged table is serialized twice: comma-delimited text with a UTF-8
//! byte-order marker, and a minimal single-sheet spreadsheet workbook with
//! every cell stored as an inline string. Neither output carries an index
//! column; the header row is the first row of both.

use crate::error::Result;
use crate::table::Table;
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Byte-order marker written ahead of the CSV output so spreadsheet
/// applications detect UTF-8
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

const CONTENT_TYPES_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
<Default Extension=\"xml\" ContentType=\"application/xml\"/>\
<Override PartName=\"/xl/workbook.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml\"/>\
<Override PartName=\"/xl/worksheets/sheet1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>\
</Types>";

const ROOT_RELS_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
<Relationship Id=\"rId1\" \
Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" \
Target=\"xl/workbook.xml\"/>\
</Relationships>";

const WORKBOOK_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<workbook xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" \
xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\">\
<sheets><sheet name=\"Sheet1\" sheetId=\"1\" r:id=\"rId1\"/></sheets>\
</workbook>";

const WORKBOOK_RELS_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
<Relationship Id=\"rId1\" \
Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet\" \
Target=\"worksheets/sheet1.xml\"/>\
</Relationships>";

/// Write the table as comma-delimited text with a UTF-8 byte-order marker
pub fn write_csv<W: Write>(table: &Table, mut writer: W) -> Result<()> {
    writer.write_all(UTF8_BOM)?;

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(table.column_names())?;
    for index in 0..table.row_count() {
        csv_writer.write_record(table.row_text(index))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the table as `merged.csv`-style output to a file path
pub fn write_csv_file<P: AsRef<Path>>(table: &Table, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_csv(table, BufWriter::new(file))
}

/// Write the table as a single-sheet spreadsheet workbook
pub fn write_xlsx<W: Write + Seek>(table: &Table, writer: W) -> Result<()> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default();

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(CONTENT_TYPES_XML.as_bytes())?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(ROOT_RELS_XML.as_bytes())?;

    zip.start_file("xl/workbook.xml", options)?;
    zip.write_all(WORKBOOK_XML.as_bytes())?;

    zip.start_file("xl/_rels/workbook.xml.rels", options)?;
    zip.write_all(WORKBOOK_RELS_XML.as_bytes())?;

    zip.start_file("xl/worksheets/sheet1.xml", options)?;
    zip.write_all(worksheet_xml(table).as_bytes())?;

    zip.finish()?.flush()?;
    Ok(())
}

/// Write the table as `merged.xlsx`-style output to a file path
pub fn write_xlsx_file<P: AsRef<Path>>(table: &Table, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_xlsx(table, BufWriter::new(file))
}

fn worksheet_xml(table: &Table) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <worksheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">\
         <sheetData>",
    );

    // Header cells are written even when empty so the sheet keeps its width
    xml.push_str("<row r=\"1\">");
    for (column, name) in table.column_names().iter().enumerate() {
        push_cell(&mut xml, column, 1, name);
    }
    xml.push_str("</row>");

    for index in 0..table.row_count() {
        let row = index + 2;
        xml.push_str(&format!("<row r=\"{}\">", row));
        for (column, value) in table.row_text(index).iter().enumerate() {
            if !value.is_empty() {
                push_cell(&mut xml, column, row, value);
            }
        }
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

fn push_cell(xml: &mut String, column: usize, row: usize, value: &str) {
    xml.push_str(&format!(
        "<c r=\"{}{}\" t=\"inlineStr\"><is><t>{}</t></is></c>",
        col_letter(column),
        row,
        escape_xml(value)
    ));
}

/// Convert a 0-based column index to a spreadsheet column letter (A, B, ..., Z, AA, ...)
fn col_letter(column: usize) -> String {
    let mut letters = String::new();
    let mut n = column;
    loop {
        letters.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::merge;
    use crate::normalize::normalize;
    use crate::reader::{read_csv_bytes, read_csv_str};
    use crate::schema::SOURCE_COLUMN;
    use calamine::{open_workbook_auto_from_rs, Data, Reader};
    use std::io::Cursor;

    fn merged_fixture() -> Table {
        let a = normalize(read_csv_str("אזור,מספר עצים\nצפון,3\n", "a.csv").unwrap());
        let b = normalize(read_csv_str("אזור,מספר\nדרום,7\n", "b.csv").unwrap());
        merge(vec![(a, "a.csv".to_string()), (b, "b.csv".to_string())]).unwrap()
    }

    #[test]
    fn test_csv_output_starts_with_bom() {
        let mut buffer = Vec::new();
        write_csv(&merged_fixture(), &mut buffer).unwrap();
        assert_eq!(&buffer[..3], UTF8_BOM);
    }

    #[test]
    fn test_csv_round_trip() {
        let merged = merged_fixture();
        let mut buffer = Vec::new();
        write_csv(&merged, &mut buffer).unwrap();

        let reread = read_csv_bytes(&buffer, "merged.csv").unwrap();
        assert_eq!(reread.column_names(), merged.column_names());
        assert_eq!(reread.row_count(), merged.row_count());
        for index in 0..merged.row_count() {
            assert_eq!(reread.row_text(index), merged.row_text(index));
        }
    }

    #[test]
    fn test_xlsx_round_trip_through_calamine() {
        let merged = merged_fixture();
        let mut buffer = Cursor::new(Vec::new());
        write_xlsx(&merged, &mut buffer).unwrap();
        buffer.set_position(0);

        let mut workbook = open_workbook_auto_from_rs(buffer).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Sheet1"]);

        let range = workbook.worksheet_range("Sheet1").unwrap();
        let mut rows = range.rows();

        let header: Vec<String> = rows
            .next()
            .unwrap()
            .iter()
            .map(|c| match c {
                Data::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();
        assert_eq!(header, merged.column_names());

        let first: Vec<String> = rows
            .next()
            .unwrap()
            .iter()
            .map(|c| match c {
                Data::String(s) => s.clone(),
                Data::Empty => String::new(),
                other => other.to_string(),
            })
            .collect();
        assert_eq!(first, merged.row_text(0));
    }

    #[test]
    fn test_xlsx_bytes_decode_back_through_reader() {
        let merged = merged_fixture();
        let mut buffer = Cursor::new(Vec::new());
        write_xlsx(&merged, &mut buffer).unwrap();

        let reread =
            crate::reader::read_table_bytes(&buffer.into_inner(), "merged.xlsx").unwrap();
        assert_eq!(reread.column_names(), merged.column_names());
        assert_eq!(reread.row_count(), merged.row_count());
        for index in 0..merged.row_count() {
            assert_eq!(reread.row_text(index), merged.row_text(index));
        }
    }

    #[test]
    fn test_xlsx_source_column_present() {
        let merged = merged_fixture();
        let names = merged.column_names();
        assert_eq!(names.last().copied(), Some(SOURCE_COLUMN));

        let mut buffer = Cursor::new(Vec::new());
        write_xlsx(&merged, &mut buffer).unwrap();
        buffer.set_position(0);
        let mut workbook = open_workbook_auto_from_rs(buffer).unwrap();
        let range = workbook.worksheet_range("Sheet1").unwrap();
        // 22 header cells, 2 data rows
        assert_eq!(range.height(), 3);
        assert_eq!(range.width(), 22);
    }

    #[test]
    fn test_xml_special_characters_escaped() {
        let table = read_csv_str("a\n\"x < y & z\"\n", "a.csv").unwrap();
        let xml = worksheet_xml(&table);
        assert!(xml.contains("x &lt; y &amp; z"));
        assert!(!xml.contains("x < y"));
    }

    #[test]
    fn test_col_letter() {
        assert_eq!(col_letter(0), "A");
        assert_eq!(col_letter(21), "V");
        assert_eq!(col_letter(25), "Z");
        assert_eq!(col_letter(26), "AA");
        assert_eq!(col_letter(701), "ZZ");
        assert_eq!(col_letter(702), "AAA");
    }
}
