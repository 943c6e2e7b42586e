//! Delimiter-separated text parsing and a column-oriented spreadsheet model
//!
//! Reads CSV-like text (comma, tab, semicolon, pipe, colon, tilde or space
//! delimited) with quoted cells, escaped quotes and multi-line cells into a
//! [`Sheet`], lets callers reshape it, and writes it back deterministically.
//!
//! # Examples
//!
//! ## Parsing text
//!
//! ```
//! use csvgrid_sheet::{parse, Delimiter};
//!
//! let sheet = parse("47,\"28\"\"\",John\n23,\"4,2\",Jane\n", false, Delimiter::Comma).unwrap();
//!
//! assert_eq!(sheet.row_count(), 2);
//! assert_eq!(sheet.column_count(), 3);
//! assert_eq!(sheet.get(1, 0).unwrap(), "28\"");
//! assert_eq!(sheet.get(1, 1).unwrap(), "4,2");
//! ```
//!
//! ## Named columns
//!
//! ```
//! use csvgrid_sheet::{Delimiter, Sheet};
//!
//! let mut sheet = Sheet::new(true);
//! sheet.add_header_row(["Name", "Age"]).unwrap();
//! sheet.add_row(["Alice", "30"]).unwrap();
//! // a wider row adds a placeholder column
//! sheet.add_row(["Bob", "25", "LA"]).unwrap();
//!
//! assert_eq!(sheet.column_names().unwrap(), ["Name", "Age", "Undefined"]);
//! assert_eq!(sheet.get_by_name("Undefined", 0).unwrap(), "");
//!
//! let lines: Vec<String> = sheet.get_formatted_sheet(Delimiter::Semicolon).collect();
//! assert_eq!(lines, ["Name;Age;Undefined", "Alice;30;", "Bob;25;LA"]);
//! ```
//!
//! ## Loading from a file
//!
//! ```no_run
//! use csvgrid_sheet::{CsvOptions, Delimiter, Sheet};
//!
//! let options = CsvOptions::default()
//!     .with_delimiter(Delimiter::Semicolon)
//!     .with_headers(true)
//!     .with_encoding_label("windows-1252")
//!     .unwrap();
//! let sheet = Sheet::from_csv_with_options("data.csv", options).unwrap();
//! sheet.save_as_csv("copy.csv").unwrap();
//! ```

mod a1_notation;
mod cell;
mod csv;
mod delimiter;
mod error;
mod json;
mod parser;
mod sheet;

/// Re-export A1 notation helpers.
pub use a1_notation::{column_index_to_letters, parse_a1, parse_column_letters};
/// Re-export cell normalization.
pub use cell::{clean as clean_cell, format as format_cell};
/// Re-export CSV options and the default-option entry points.
pub use csv::{read, write, CsvOptions, LineTerminator};
/// Re-export delimiter policy.
pub use delimiter::Delimiter;
/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export the parser.
pub use parser::{parse, parse_with_char};
/// Re-export sheet type.
pub use sheet::{Sheet, MAX_COUNT, PLACEHOLDER_COLUMN_NAME};
/// Re-export the text encoding type used by `CsvOptions`.
pub use encoding_rs::Encoding;
