use csvgrid_sheet::{parse, CsvOptions, Delimiter, LineTerminator, Sheet};
use tempfile::tempdir;

/// Cells that need every kind of quoting
const AWKWARD: [&str; 8] = [
    "plain",
    "",
    "28\"",
    "\"",
    "Räuber\r\nHotzenplotz",
    "line\nbreak",
    "  padded  ",
    "a,b;c|d~e:f\tg h",
];

fn awkward_sheet(has_header_row: bool) -> Sheet {
    let mut sheet = Sheet::new(has_header_row);
    if has_header_row {
        sheet.add_header_row(["one", "two, three", "four \"4\""]).unwrap();
    }
    // none of these starts and ends with a quote, so cleaning keeps them as is
    for chunk in AWKWARD.chunks(3) {
        sheet.add_row(chunk).unwrap();
    }
    sheet
}

fn reparse(sheet: &Sheet, delimiter: Delimiter) -> Sheet {
    let text: Vec<String> = sheet.get_formatted_sheet(delimiter).collect();
    parse(&text.join("\n"), sheet.has_header_row(), delimiter).unwrap()
}

#[test]
fn test_awkward_cells_survive() {
    let sheet = awkward_sheet(false);
    assert_eq!(sheet.get(0, 0).unwrap(), "plain");
    assert_eq!(sheet.get(1, 1).unwrap(), "Räuber\r\nHotzenplotz");
    assert_eq!(sheet.get(1, 2).unwrap(), "a,b;c|d~e:f\tg h");
}

#[test]
fn test_roundtrip_every_delimiter() {
    for has_header_row in [false, true] {
        let sheet = awkward_sheet(has_header_row);
        for delimiter in Delimiter::ALL {
            assert_eq!(
                reparse(&sheet, delimiter),
                sheet,
                "delimiter {delimiter}, header {has_header_row}"
            );
        }
    }
}

#[test]
fn test_roundtrip_sheets_without_rows() {
    let named = Sheet::blank_with_headers(["x", "y"], 0).unwrap();
    assert_eq!(named.to_csv_string(), "x,y\n");
    assert_eq!(reparse(&named, Delimiter::Comma), named);

    // no columns means no header line either
    let empty = Sheet::blank_with_headers(Vec::<String>::new(), 3).unwrap();
    assert_eq!(empty.to_csv_string(), "");
    assert_eq!(reparse(&empty, Delimiter::Comma), empty);
    assert!(reparse(&empty, Delimiter::Comma).has_header_row());
}

#[test]
fn test_roundtrip_ragged_input() {
    let sheet = parse("a\nb,c,d\n,\n", false, Delimiter::Comma).unwrap();
    assert_eq!(reparse(&sheet, Delimiter::Semicolon), sheet);
}

#[test]
fn test_roundtrip_through_files() {
    let dir = tempdir().unwrap();
    let sheet = awkward_sheet(true);

    for terminator in [LineTerminator::Lf, LineTerminator::CrLf] {
        let options = CsvOptions::default()
            .with_delimiter(Delimiter::Semicolon)
            .with_headers(true)
            .with_line_terminator(terminator);
        let path = dir.path().join("out.csv");

        sheet.save_as_csv_with_options(&path, options.clone()).unwrap();
        let loaded = Sheet::from_csv_with_options(&path, options).unwrap();
        assert_eq!(loaded, sheet, "{terminator:?}");
    }
}

#[test]
fn test_roundtrip_other_encoding() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("latin.csv");
    let mut sheet = Sheet::blank_with_headers(["Stadt", "Größe"], 1).unwrap();
    sheet.set(0, 0, "Köln").unwrap();
    sheet.set(1, 0, "groß").unwrap();

    let options = CsvOptions::default()
        .with_headers(true)
        .with_encoding_label("latin1")
        .unwrap();
    sheet.save_as_csv_with_options(&path, options.clone()).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.contains(&0xF6), "ö is a single byte in windows-1252");

    let loaded = Sheet::from_csv_with_options(&path, options).unwrap();
    assert_eq!(loaded, sheet);
}

#[test]
fn test_facade_read_write() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("facade.csv");
    let sheet = parse("id,name\n1,\"Doe, Jane\"\n", true, Delimiter::Comma).unwrap();

    csvgrid_sheet::write(&path, &sheet).unwrap();
    let loaded = csvgrid_sheet::read(&path, true).unwrap();
    assert_eq!(loaded, sheet);
    assert_eq!(loaded.get_by_name("name", 0).unwrap(), "Doe, Jane");
}
