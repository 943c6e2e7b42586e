use crate::delimiter::Delimiter;
use crate::error::{Result, SheetError};
use crate::parser;
use crate::sheet::Sheet;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, trace, warn};

/// Line terminator used when writing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineTerminator {
    /// `\r\n` on Windows, `\n` elsewhere
    #[default]
    Platform,
    Lf,
    CrLf,
}

impl LineTerminator {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LineTerminator::Platform if cfg!(windows) => "\r\n",
            LineTerminator::Platform | LineTerminator::Lf => "\n",
            LineTerminator::CrLf => "\r\n",
        }
    }
}

/// CSV reader/writer options
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter (default: ',')
    pub delimiter: Delimiter,
    /// Whether the first row contains headers
    pub has_headers: bool,
    /// Text encoding of the file (default: UTF-8)
    pub encoding: &'static Encoding,
    /// Line terminator for writing (default: platform)
    pub line_terminator: LineTerminator,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            delimiter: Delimiter::Comma,
            has_headers: false,
            encoding: UTF_8,
            line_terminator: LineTerminator::Platform,
        }
    }
}

impl CsvOptions {
    /// Create options for TSV (tab-separated values)
    #[must_use]
    pub fn tsv() -> Self {
        CsvOptions {
            delimiter: Delimiter::Tab,
            ..Default::default()
        }
    }

    /// Set the delimiter
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the delimiter from a character, rejecting characters off the whitelist
    pub fn with_delimiter_char(self, delimiter: char) -> Result<Self> {
        Ok(self.with_delimiter(Delimiter::from_char(delimiter)?))
    }

    /// Set whether the first row contains headers
    #[must_use]
    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    /// Set the text encoding
    #[must_use]
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Set the text encoding by its WHATWG label (e.g. "utf-8", "latin1", "windows-1252")
    pub fn with_encoding_label(self, label: &str) -> Result<Self> {
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| SheetError::UnknownEncoding(label.to_string()))?;
        Ok(self.with_encoding(encoding))
    }

    /// Set the line terminator used when writing
    #[must_use]
    pub fn with_line_terminator(mut self, line_terminator: LineTerminator) -> Self {
        self.line_terminator = line_terminator;
        self
    }
}

/// Read a CSV file with default options (comma, UTF-8)
pub fn read<P: AsRef<Path>>(path: P, has_headers: bool) -> Result<Sheet> {
    Sheet::from_csv_with_options(path, CsvOptions::default().with_headers(has_headers))
}

/// Write a sheet to a CSV file with default options (comma, UTF-8)
pub fn write<P: AsRef<Path>>(path: P, sheet: &Sheet) -> Result<()> {
    sheet.save_as_csv(path)
}

impl Sheet {
    /// Load a headerless sheet from a comma-separated UTF-8 file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_csv_with_options(path, CsvOptions::default())
    }

    /// Load a sheet from a CSV file with custom options
    pub fn from_csv_with_options<P: AsRef<Path>>(path: P, options: CsvOptions) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), delimiter = %options.delimiter, "reading csv file");
        let file = File::open(path)?;
        Self::from_csv_reader(file, options)
    }

    /// Load a sheet from a CSV string
    pub fn from_csv_str(content: &str) -> Result<Self> {
        Self::from_csv_str_with_options(content, CsvOptions::default())
    }

    /// Load a sheet from a CSV string with custom options. The encoding
    /// option does not apply; the text is already decoded.
    pub fn from_csv_str_with_options(content: &str, options: CsvOptions) -> Result<Self> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let sheet = parser::parse(content, options.has_headers, options.delimiter)?;
        debug!(
            columns = sheet.column_count(),
            rows = sheet.row_count(),
            "parsed csv"
        );
        Ok(sheet)
    }

    /// Load a sheet from a reader. The whole input is read and decoded
    /// before parsing starts.
    pub fn from_csv_reader<R: Read>(mut reader: R, options: CsvOptions) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let text = decode(&bytes, options.encoding);
        Self::from_csv_str_with_options(&text, options)
    }

    /// Save the sheet to a comma-separated UTF-8 file
    pub fn save_as_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.save_as_csv_with_options(path, CsvOptions::default())
    }

    /// Save the sheet to a CSV file with custom options
    pub fn save_as_csv_with_options<P: AsRef<Path>>(
        &self,
        path: P,
        options: CsvOptions,
    ) -> Result<()> {
        let path = path.as_ref();
        debug!(path = %path.display(), delimiter = %options.delimiter, "writing csv file");
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        self.write_csv(writer, options)
    }

    /// Write the sheet to a writer as CSV, one terminated line per row
    pub fn write_csv<W: Write>(&self, mut writer: W, options: CsvOptions) -> Result<()> {
        let terminator = options.line_terminator.as_str();
        let mut lines = 0usize;

        for mut line in self.get_formatted_sheet(options.delimiter) {
            line.push_str(terminator);
            writer.write_all(&encode(&line, options.encoding)?)?;
            lines += 1;
        }

        writer.flush()?;
        trace!(lines, encoding = options.encoding.name(), "csv written");
        Ok(())
    }

    /// Convert the sheet to a CSV string
    #[must_use]
    pub fn to_csv_string(&self) -> String {
        self.to_csv_string_with_options(&CsvOptions::default())
    }

    /// Convert the sheet to a CSV string with custom options. The encoding
    /// option does not apply.
    #[must_use]
    pub fn to_csv_string_with_options(&self, options: &CsvOptions) -> String {
        let terminator = options.line_terminator.as_str();
        self.get_formatted_sheet(options.delimiter)
            .fold(String::new(), |mut out, line| {
                out.push_str(&line);
                out.push_str(terminator);
                out
            })
    }

    /// Convert the sheet to a TSV string
    #[must_use]
    pub fn to_tsv_string(&self) -> String {
        self.to_csv_string_with_options(&CsvOptions::tsv())
    }
}

/// Decode file bytes. A byte order mark overrides the configured encoding.
fn decode(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        warn!(
            encoding = used.name(),
            "input contains malformed sequences; replaced with U+FFFD"
        );
    }
    trace!(bytes = bytes.len(), encoding = used.name(), "decoded input");
    text.into_owned()
}

fn encode(text: &str, encoding: &'static Encoding) -> Result<Vec<u8>> {
    // encoding_rs only encodes into ASCII-compatible encodings
    if encoding == UTF_16LE {
        return Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect());
    }
    if encoding == UTF_16BE {
        return Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect());
    }

    let (bytes, _, had_errors) = encoding.encode(text);
    if had_errors {
        return Err(SheetError::Encoding {
            encoding: encoding.name(),
        });
    }
    Ok(bytes.into_owned())
}
