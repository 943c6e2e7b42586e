//! Cell normalization: the storage form and the output form of a cell.
//!
//! Cells are stored unquoted with single quotes. The parser hands over raw
//! cells that may still carry their wrapping quote pair and doubled quotes;
//! [`clean`] turns those into the storage form. [`format`] goes the other way
//! when a sheet is written out.

use crate::delimiter::Delimiter;
use std::borrow::Cow;

const QUOTE: char = '"';
const ESCAPED_QUOTE: &str = "\"\"";

/// Convert a raw cell into its stored value.
///
/// A cell that begins and ends with a quote (and is at least two characters
/// long) loses that quote pair, and every doubled quote inside collapses to a
/// single one. Anything else is stored verbatim, including surrounding spaces.
#[must_use]
pub fn clean(raw: &str) -> String {
    if raw.len() >= 2 && raw.starts_with(QUOTE) && raw.ends_with(QUOTE) {
        raw[1..raw.len() - 1].replace(ESCAPED_QUOTE, "\"")
    } else {
        raw.to_string()
    }
}

/// Whether a stored value has to be quoted to survive re-parsing
#[must_use]
pub fn needs_quotes(cell: &str, delimiter: Delimiter) -> bool {
    let delimiter = delimiter.as_char();
    cell.chars()
        .any(|c| c == QUOTE || c == '\n' || c == '\r' || c == delimiter)
}

/// Convert a stored value into its output form for the given delimiter.
///
/// The value is wrapped in quotes, with inner quotes doubled, iff it contains
/// a quote, a line break or the delimiter. Otherwise it is returned as is.
#[must_use]
pub fn format(cell: &str, delimiter: Delimiter) -> Cow<'_, str> {
    if !needs_quotes(cell, delimiter) {
        return Cow::Borrowed(cell);
    }

    let mut out = String::with_capacity(cell.len() + 2);
    out.push(QUOTE);
    for c in cell.chars() {
        if c == QUOTE {
            out.push(QUOTE);
        }
        out.push(c);
    }
    out.push(QUOTE);
    Cow::Owned(out)
}
