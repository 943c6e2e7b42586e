//! Character-level CSV scanner.
//!
//! The input is scanned once, front to back, with a single cursor. Every row
//! that is recognized is handed to a [`Sheet`] immediately; the sheet does the
//! cell cleaning, so quoted cells leave the scanner with their quotes and
//! doubled quotes intact.

use crate::delimiter::Delimiter;
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;

const QUOTE: char = '"';

/// Number of characters quoted before the offset in error messages
const EXCERPT_LEN: usize = 5;

/// Parse delimiter-separated text into a sheet.
///
/// With `has_header_row`, the first row becomes the header names. A quoted
/// cell may span lines; a final line without a terminator is still a row,
/// while a terminator at the very end does not start another one.
pub fn parse(text: &str, has_header_row: bool, delimiter: Delimiter) -> Result<Sheet> {
    Parser::new(text, has_header_row, delimiter).run()
}

/// Like [`parse`], but the delimiter is given as a character and checked
/// against the whitelist first.
pub fn parse_with_char(text: &str, has_header_row: bool, delimiter: char) -> Result<Sheet> {
    parse(text, has_header_row, Delimiter::from_char(delimiter)?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// At the first character of a cell; decides quoted vs unquoted
    CellStart,
    ScanningUnquotedCell,
    ScanningQuotedCell,
    /// After a closing quote; only blanks may precede the next delimiter
    AwaitingDelimiterAfterQuote,
    RowEnd,
}

/// What the cursor is looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookahead {
    EndOfInput,
    Delimiter,
    /// LF or CRLF, with its length in characters
    LineTerminator(usize),
    Char(char),
}

struct Parser {
    text: Vec<char>,
    pos: usize,
    delimiter: char,
    sheet: Sheet,
    header_pending: bool,
    cells: Vec<String>,
    cell: String,
    cell_offset: usize,
}

impl Parser {
    fn new(text: &str, has_header_row: bool, delimiter: Delimiter) -> Self {
        Parser {
            text: text.chars().collect(),
            pos: 0,
            delimiter: delimiter.as_char(),
            sheet: Sheet::new(has_header_row),
            header_pending: has_header_row,
            cells: Vec::new(),
            cell: String::new(),
            cell_offset: 0,
        }
    }

    fn run(mut self) -> Result<Sheet> {
        while !self.at_end() {
            let cells = self.scan_row()?;
            self.commit_row(cells)?;
        }
        Ok(self.sheet)
    }

    /// Scan one row, including its line terminator
    fn scan_row(&mut self) -> Result<Vec<String>> {
        let mut state = ScanState::CellStart;
        while state != ScanState::RowEnd {
            state = self.step(state)?;
        }
        Ok(std::mem::take(&mut self.cells))
    }

    fn step(&mut self, state: ScanState) -> Result<ScanState> {
        match state {
            ScanState::CellStart => Ok(self.cell_start()),
            ScanState::ScanningUnquotedCell => Ok(self.scan_unquoted()),
            ScanState::ScanningQuotedCell => self.scan_quoted(),
            ScanState::AwaitingDelimiterAfterQuote => self.await_delimiter(),
            ScanState::RowEnd => Ok(ScanState::RowEnd),
        }
    }

    fn commit_row(&mut self, cells: Vec<String>) -> Result<()> {
        if self.header_pending {
            self.header_pending = false;
            self.sheet.add_header_row(cells)
        } else {
            self.sheet.add_row(cells)
        }
    }

    // ===== Transitions =====

    fn cell_start(&mut self) -> ScanState {
        self.cell_offset = self.pos;
        match self.opening_quote_len() {
            Some(len) => {
                self.pos += len;
                self.cell.push(QUOTE);
                ScanState::ScanningQuotedCell
            }
            None => ScanState::ScanningUnquotedCell,
        }
    }

    fn scan_unquoted(&mut self) -> ScanState {
        match self.lookahead() {
            Lookahead::EndOfInput => {
                self.finish_cell();
                ScanState::RowEnd
            }
            Lookahead::Delimiter => {
                self.finish_cell();
                self.pos += 1;
                ScanState::CellStart
            }
            Lookahead::LineTerminator(len) => {
                self.finish_cell();
                self.pos += len;
                ScanState::RowEnd
            }
            Lookahead::Char(c) => {
                self.cell.push(c);
                self.pos += 1;
                ScanState::ScanningUnquotedCell
            }
        }
    }

    fn scan_quoted(&mut self) -> Result<ScanState> {
        let Some(&c) = self.text.get(self.pos) else {
            return Err(self.unclosed_cell());
        };

        if c != QUOTE {
            self.cell.push(c);
            self.pos += 1;
            return Ok(ScanState::ScanningQuotedCell);
        }

        if self.text.get(self.pos + 1) == Some(&QUOTE) {
            // escaped quote, unescaped later by the sheet
            self.cell.push_str("\"\"");
            self.pos += 2;
            return Ok(ScanState::ScanningQuotedCell);
        }

        self.cell.push(QUOTE);
        self.pos += 1;
        self.finish_cell();
        Ok(ScanState::AwaitingDelimiterAfterQuote)
    }

    fn await_delimiter(&mut self) -> Result<ScanState> {
        match self.lookahead() {
            Lookahead::EndOfInput => Ok(ScanState::RowEnd),
            Lookahead::LineTerminator(len) => {
                self.pos += len;
                Ok(ScanState::RowEnd)
            }
            Lookahead::Delimiter => {
                self.pos += 1;
                Ok(ScanState::CellStart)
            }
            Lookahead::Char(' ' | '\t') => {
                self.pos += 1;
                Ok(ScanState::AwaitingDelimiterAfterQuote)
            }
            Lookahead::Char(_) => Err(self.text_outside_quotes()),
        }
    }

    // ===== Helpers =====

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn finish_cell(&mut self) {
        self.cells.push(std::mem::take(&mut self.cell));
    }

    fn lookahead(&self) -> Lookahead {
        match self.text.get(self.pos) {
            None => Lookahead::EndOfInput,
            Some(&c) if c == self.delimiter => Lookahead::Delimiter,
            Some('\n') => Lookahead::LineTerminator(1),
            Some('\r') if self.text.get(self.pos + 1) == Some(&'\n') => {
                Lookahead::LineTerminator(2)
            }
            Some(&c) => Lookahead::Char(c),
        }
    }

    /// Length of the opening quote marker at the cursor, if there is one.
    /// A space right before the quote belongs to the marker, unless space is
    /// the delimiter.
    fn opening_quote_len(&self) -> Option<usize> {
        match (self.text.get(self.pos), self.text.get(self.pos + 1)) {
            (Some(&QUOTE), _) => Some(1),
            (Some(' '), Some(&QUOTE)) if self.delimiter != ' ' => Some(2),
            _ => None,
        }
    }

    fn excerpt_before(&self, offset: usize) -> Option<String> {
        (offset > EXCERPT_LEN).then(|| self.text[offset - EXCERPT_LEN..offset].iter().collect())
    }

    fn text_outside_quotes(&self) -> SheetError {
        let message = match self.excerpt_before(self.pos) {
            Some(before) => format!(
                "text outside of double quotes in a double-quoted cell (after '{before}' at index: {})",
                self.pos
            ),
            None => format!(
                "text outside of double quotes in a double-quoted cell (index: {})",
                self.pos
            ),
        };
        SheetError::InvalidCsv {
            message,
            offset: self.pos,
        }
    }

    fn unclosed_cell(&self) -> SheetError {
        let offset = self.cell_offset;
        let message = match self.excerpt_before(offset) {
            Some(before) => format!(
                "cell does not close properly (opened after '{before}' at index: {offset})"
            ),
            None => format!("cell does not close properly (opened at index: {offset})"),
        };
        SheetError::InvalidCsv { message, offset }
    }
}
