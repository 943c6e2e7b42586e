use thiserror::Error;

/// Errors that can occur while parsing, editing or saving a sheet
#[derive(Error, Debug)]
pub enum SheetError {
    // ===== Configuration =====
    #[error("Invalid delimiter {0:?}: must be one of tab, space, ',', ';', '|', '~', ':'")]
    InvalidDelimiter(char),

    #[error("Argument '{name}' must not be blank")]
    BlankArgument { name: &'static str },

    // ===== Structural =====
    #[error("Row index out of bounds: {index} (sheet has {count} rows)")]
    RowIndexOutOfBounds { index: usize, count: usize },

    #[error("Column index out of bounds: {index} (sheet has {count} columns)")]
    ColumnIndexOutOfBounds { index: usize, count: usize },

    #[error("Column not found: {name}")]
    ColumnNotFound { name: String },

    #[error("Sheet has no header row")]
    NoHeaderRow,

    #[error("Duplicate column name: {name}")]
    DuplicateColumnName { name: String },

    #[error("Header row was already initialized")]
    HeaderAlreadyInitialized,

    #[error("Sheet does not have columns yet")]
    NoColumns,

    #[error("{what} count exceeds limit")]
    CapacityExceeded { what: &'static str },

    #[error("Invalid cell notation: {0}")]
    InvalidCellNotation(String),

    // ===== Content =====
    #[error("Invalid CSV: {message}")]
    InvalidCsv { message: String, offset: usize },

    // ===== I/O =====
    #[error("Unknown text encoding: {0}")]
    UnknownEncoding(String),

    #[error("Text cannot be represented in {encoding}")]
    Encoding { encoding: &'static str },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SheetError {
    /// A precondition of the call was violated (bad delimiter, blank argument)
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SheetError::InvalidDelimiter(_) | SheetError::BlankArgument { .. }
        )
    }

    /// The call does not fit the current shape of the sheet
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            SheetError::RowIndexOutOfBounds { .. }
                | SheetError::ColumnIndexOutOfBounds { .. }
                | SheetError::ColumnNotFound { .. }
                | SheetError::NoHeaderRow
                | SheetError::DuplicateColumnName { .. }
                | SheetError::HeaderAlreadyInitialized
                | SheetError::NoColumns
                | SheetError::CapacityExceeded { .. }
                | SheetError::InvalidCellNotation(_)
        )
    }

    /// The input text is not well-formed CSV
    #[must_use]
    pub fn is_content(&self) -> bool {
        matches!(self, SheetError::InvalidCsv { .. })
    }
}

pub type Result<T> = std::result::Result<T, SheetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_are_disjoint() {
        let errors = [
            SheetError::InvalidDelimiter('\n'),
            SheetError::BlankArgument { name: "name" },
            SheetError::NoHeaderRow,
            SheetError::RowIndexOutOfBounds { index: 3, count: 2 },
            SheetError::InvalidCsv {
                message: "x".to_string(),
                offset: 0,
            },
        ];

        for error in &errors {
            let categories = [
                error.is_configuration(),
                error.is_structural(),
                error.is_content(),
            ];
            assert_eq!(categories.iter().filter(|c| **c).count(), 1, "{error}");
        }
    }

    #[test]
    fn test_display() {
        let error = SheetError::ColumnIndexOutOfBounds { index: 5, count: 2 };
        assert_eq!(
            error.to_string(),
            "Column index out of bounds: 5 (sheet has 2 columns)"
        );
    }
}
