//! Spreadsheet cell addresses: column letters followed by a 1-based row
//! number, e.g. `B7` or `aa12`.

use crate::error::{Result, SheetError};

const LETTERS: usize = 26;

/// Split an address such as `"AB12"` into a 0-based column index and the
/// 1-based row number. Letters are case-insensitive.
pub fn parse_a1(notation: &str) -> Result<(usize, usize)> {
    let invalid = || SheetError::InvalidCellNotation(notation.to_string());

    let digits_at = notation.find(|c: char| c.is_ascii_digit()).ok_or_else(invalid)?;
    let (letters, digits) = notation.split_at(digits_at);
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let col = parse_column_letters(letters).map_err(|_| invalid())?;
    match digits.parse::<usize>() {
        Ok(0) | Err(_) => Err(invalid()),
        Ok(row_number) => Ok((col, row_number)),
    }
}

/// Column letters to a 0-based index: `A` is 0, `Z` is 25, `AA` is 26
pub fn parse_column_letters(letters: &str) -> Result<usize> {
    let invalid = || SheetError::InvalidCellNotation(letters.to_string());
    if letters.is_empty() {
        return Err(invalid());
    }

    letters
        .bytes()
        .try_fold(0usize, |acc, b| {
            let b = b.to_ascii_uppercase();
            if !b.is_ascii_uppercase() {
                return None;
            }
            acc.checked_mul(LETTERS)?
                .checked_add(usize::from(b - b'A') + 1)
        })
        .map(|n| n - 1)
        .ok_or_else(invalid)
}

/// 0-based index to column letters, the inverse of [`parse_column_letters`]
pub fn column_index_to_letters(col: usize) -> String {
    // u128 so that `usize::MAX + 1` does not overflow
    let mut remaining = col as u128 + 1;
    let mut letters = Vec::new();

    while remaining > 0 {
        remaining -= 1;
        letters.push(b'A' + (remaining % LETTERS as u128) as u8);
        remaining /= LETTERS as u128;
    }

    letters.iter().rev().map(|&b| char::from(b)).collect()
}
