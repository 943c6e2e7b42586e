use crate::a1_notation::{column_index_to_letters, parse_a1};
use crate::cell;
use crate::delimiter::Delimiter;
use crate::error::{Result, SheetError};
use std::collections::HashMap;

/// Name given to columns that are created without one
pub const PLACEHOLDER_COLUMN_NAME: &str = "Undefined";

/// Largest number of rows or columns a sheet can hold
pub const MAX_COUNT: usize = i32::MAX as usize - 1;

/// One column of the sheet, cells top to bottom
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Column {
    cells: Vec<String>,
}

impl Column {
    fn blank(rows: usize) -> Self {
        Column {
            cells: vec![String::new(); rows],
        }
    }
}

/// Whether the sheet names its columns
#[derive(Debug, Clone, PartialEq, Eq)]
enum HeaderMode {
    Headerless,
    Headered(ColumnNames),
}

/// Column names of a headered sheet.
///
/// `names[i]` is the display name of column `i`; `lookup` maps each name back
/// to its index. Names are non-empty and unique.
///
/// `next_suffix` holds, per base name, a suffix below which every
/// `base_N` is taken. It stays true while names are only added and is
/// dropped whenever a name is freed.
#[derive(Debug, Clone, Default)]
struct ColumnNames {
    names: Vec<String>,
    lookup: HashMap<String, usize>,
    next_suffix: HashMap<String, usize>,
}

impl ColumnNames {
    fn index_of(&self, name: &str) -> Option<usize> {
        self.lookup.get(name).copied()
    }

    fn contains(&self, name: &str) -> bool {
        self.lookup.contains_key(name)
    }

    /// `proposed` if free, otherwise `proposed_N` for the first free N when
    /// `can_rename` is set
    fn unique(&mut self, proposed: &str, can_rename: bool) -> Result<String> {
        if !self.contains(proposed) {
            return Ok(proposed.to_string());
        }
        if !can_rename {
            return Err(SheetError::DuplicateColumnName {
                name: proposed.to_string(),
            });
        }

        let start = self.next_suffix.get(proposed).copied().unwrap_or(1);
        let (suffix, name) = (start..=MAX_COUNT)
            .map(|suffix| (suffix, format!("{proposed}_{suffix}")))
            .find(|(_, candidate)| !self.contains(candidate))
            .ok_or(SheetError::CapacityExceeded { what: "Column" })?;
        self.next_suffix.insert(proposed.to_string(), suffix + 1);
        Ok(name)
    }

    /// Place `name` at `index`, renumbering the names after it
    fn insert(&mut self, index: usize, name: String) {
        if index < self.names.len() {
            for position in self.lookup.values_mut() {
                if *position >= index {
                    *position += 1;
                }
            }
        }
        self.lookup.insert(name.clone(), index);
        self.names.insert(index, name);
    }

    fn remove(&mut self, index: usize) {
        let name = self.names.remove(index);
        self.lookup.remove(&name);
        if index < self.names.len() {
            for position in self.lookup.values_mut() {
                if *position > index {
                    *position -= 1;
                }
            }
        }
        self.next_suffix.clear();
    }

    fn rename(&mut self, index: usize, name: String) {
        let old = std::mem::replace(&mut self.names[index], name.clone());
        self.lookup.remove(&old);
        self.lookup.insert(name, index);
        self.next_suffix.clear();
    }
}

// the lookup and the suffix hints are derived from `names`
impl PartialEq for ColumnNames {
    fn eq(&self, other: &Self) -> bool {
        self.names == other.names
    }
}

impl Eq for ColumnNames {}

/// A column-oriented grid of string cells.
///
/// All columns always hold the same number of cells. Rows wider than the
/// sheet add columns, rows narrower than the sheet are padded with empty
/// cells. Cells are stored cleaned: a raw value wrapped in quotes loses the
/// quote pair and its doubled quotes (see [`cell::clean`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    columns: Vec<Column>,
    header: HeaderMode,
}

impl Sheet {
    /// Create an empty sheet. The header mode is fixed for the sheet's lifetime.
    #[must_use]
    pub fn new(has_header_row: bool) -> Self {
        let header = if has_header_row {
            HeaderMode::Headered(ColumnNames::default())
        } else {
            HeaderMode::Headerless
        };

        Sheet {
            columns: Vec::new(),
            header,
        }
    }

    /// Create a headerless sheet of `columns` x `rows` empty cells.
    /// Without columns there can be no rows, so `blank(0, n)` is empty.
    pub fn blank(columns: usize, rows: usize) -> Result<Self> {
        if columns > MAX_COUNT {
            return Err(SheetError::CapacityExceeded { what: "Column" });
        }

        let mut sheet = Sheet::new(false);
        for _ in 0..columns {
            sheet.add_column()?;
        }
        if columns == 0 {
            return Ok(sheet);
        }
        for _ in 0..rows {
            sheet.add_empty_row()?;
        }
        Ok(sheet)
    }

    /// Create a sheet with the given header names and `rows` empty data rows
    pub fn blank_with_headers<I, S>(names: I, rows: usize) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sheet = Sheet::new(true);
        sheet.add_header_row(names)?;
        if sheet.is_empty() {
            return Ok(sheet);
        }
        for _ in 0..rows {
            sheet.add_empty_row()?;
        }
        Ok(sheet)
    }

    // ===== Shape =====

    /// Number of columns
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of data rows (the header row is not counted)
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.cells.len())
    }

    /// Whether the sheet names its columns
    #[must_use]
    pub fn has_header_row(&self) -> bool {
        matches!(self.header, HeaderMode::Headered(_))
    }

    /// Check if the sheet has no columns
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Header names in column order
    pub fn column_names(&self) -> Result<&[String]> {
        match &self.header {
            HeaderMode::Headered(header) => Ok(&header.names),
            HeaderMode::Headerless => Err(SheetError::NoHeaderRow),
        }
    }

    // ===== Cell Access =====

    /// Get a cell by column and row index (0-based)
    pub fn get(&self, col: usize, row: usize) -> Result<&str> {
        let column = self.column_ref(col)?;
        column
            .cells
            .get(row)
            .map(String::as_str)
            .ok_or(SheetError::RowIndexOutOfBounds {
                index: row,
                count: column.cells.len(),
            })
    }

    /// Set a cell by column and row index (0-based). The value is cleaned
    /// exactly like a parsed cell.
    pub fn set(&mut self, col: usize, row: usize, value: impl AsRef<str>) -> Result<()> {
        let count = self.row_count();
        let column = self.column_mut(col)?;
        let slot = column
            .cells
            .get_mut(row)
            .ok_or(SheetError::RowIndexOutOfBounds { index: row, count })?;
        *slot = cell::clean(value.as_ref());
        Ok(())
    }

    /// Get a cell by column name and row index
    pub fn get_by_name(&self, name: &str, row: usize) -> Result<&str> {
        let col = self.column_index(name)?;
        self.get(col, row)
    }

    /// Set a cell by column name and row index
    pub fn set_by_name(&mut self, name: &str, row: usize, value: impl AsRef<str>) -> Result<()> {
        let col = self.column_index(name)?;
        self.set(col, row, value)
    }

    /// Get a cell using A1-style notation. Row numbers follow
    /// [`get_row_number`](Self::get_row_number), so in a sheet with a header
    /// row the first data row is `A2`.
    pub fn get_a1(&self, notation: &str) -> Result<&str> {
        let (col, row) = self.resolve_a1(notation)?;
        self.get(col, row)
    }

    /// Set a cell using A1-style notation
    pub fn set_a1(&mut self, notation: &str, value: impl AsRef<str>) -> Result<()> {
        let (col, row) = self.resolve_a1(notation)?;
        self.set(col, row, value)
    }

    fn resolve_a1(&self, notation: &str) -> Result<(usize, usize)> {
        let (col, row_number) = parse_a1(notation)?;
        let first = self.first_data_row_number();
        if row_number < first {
            return Err(SheetError::InvalidCellNotation(notation.to_string()));
        }
        Ok((col, row_number - first))
    }

    /// All cells of a column, top to bottom
    pub fn column(&self, col: usize) -> Result<&[String]> {
        Ok(&self.column_ref(col)?.cells)
    }

    /// All cells of a named column
    pub fn column_by_name(&self, name: &str) -> Result<&[String]> {
        let col = self.column_index(name)?;
        self.column(col)
    }

    /// Cells of a row, in column order
    pub fn row(&self, row: usize) -> Result<Vec<&str>> {
        self.check_row(row)?;
        Ok(self
            .columns
            .iter()
            .map(|c| c.cells[row].as_str())
            .collect())
    }

    // ===== Row Operations =====

    /// Name the columns. Only valid once, on a sheet created with a header row
    /// and before any column exists. Names are cleaned like cells.
    pub fn add_header_row<I, S>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !self.has_header_row() {
            return Err(SheetError::NoHeaderRow);
        }
        if !self.columns.is_empty() {
            return Err(SheetError::HeaderAlreadyInitialized);
        }

        let names: Vec<String> = names.into_iter().map(|n| cell::clean(n.as_ref())).collect();
        if names.len() > MAX_COUNT {
            return Err(SheetError::CapacityExceeded { what: "Column" });
        }

        let mut seen = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if is_blank(name) {
                return Err(SheetError::BlankArgument { name: "column name" });
            }
            if seen.insert(name.as_str(), i).is_some() {
                return Err(SheetError::DuplicateColumnName { name: name.clone() });
            }
        }

        for name in names {
            self.add_new_column(self.column_count(), &name, false)?;
        }
        Ok(())
    }

    /// Append a row of raw cells.
    ///
    /// Each cell is cleaned. Cells beyond the current column count create new
    /// columns (named `Undefined`, `Undefined_1`, ... in a headered sheet)
    /// whose earlier rows are empty. Missing trailing cells are stored as empty.
    /// An empty row is treated as a single empty cell.
    pub fn add_row<I, S>(&mut self, cells: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let previous = self.row_count();
        if previous >= MAX_COUNT {
            return Err(SheetError::CapacityExceeded { what: "Row" });
        }

        let mut cells: Vec<String> = cells.into_iter().map(|c| cell::clean(c.as_ref())).collect();
        if cells.len() > MAX_COUNT {
            return Err(SheetError::CapacityExceeded { what: "Column" });
        }
        if cells.is_empty() {
            cells.push(String::new());
        }

        for (col, value) in cells.into_iter().enumerate() {
            if col >= self.column_count() {
                self.add_new_column(col, PLACEHOLDER_COLUMN_NAME, true)?;
            }
            let column = &mut self.columns[col];
            if column.cells.len() == previous {
                column.cells.push(value);
            } else {
                column.cells[previous] = value;
            }
        }

        self.fill_up_missing_cells();
        Ok(())
    }

    /// Append a row of empty cells
    pub fn add_empty_row(&mut self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(SheetError::NoColumns);
        }
        self.add_row([""])
    }

    /// Append a row given as (column name, value) pairs. Unnamed columns stay
    /// empty. Every name must exist; nothing is appended otherwise.
    pub fn add_named_row<I, K, V>(&mut self, cells: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let resolved = cells
            .into_iter()
            .map(|(name, value)| Ok((self.column_index(name.as_ref())?, value)))
            .collect::<Result<Vec<_>>>()?;

        self.add_empty_row()?;
        let row = self.row_count() - 1;
        for (col, value) in resolved {
            self.set(col, row, value)?;
        }
        Ok(())
    }

    /// Insert an empty row before `index`, shifting later rows down
    pub fn insert_row(&mut self, index: usize) -> Result<()> {
        self.check_row(index)?;
        if self.row_count() >= MAX_COUNT {
            return Err(SheetError::CapacityExceeded { what: "Row" });
        }

        for column in &mut self.columns {
            column.cells.insert(index, String::new());
        }
        Ok(())
    }

    /// Remove the row at `index` from every column
    pub fn remove_row(&mut self, index: usize) -> Result<Vec<String>> {
        self.check_row(index)?;
        Ok(self
            .columns
            .iter_mut()
            .map(|c| c.cells.remove(index))
            .collect())
    }

    // ===== Column Operations =====

    /// Append an empty column. In a headered sheet it is named `Undefined`
    /// (or the first free `Undefined_N`).
    pub fn add_column(&mut self) -> Result<()> {
        self.add_new_column(self.column_count(), PLACEHOLDER_COLUMN_NAME, true)
    }

    /// Append an empty column with the given name, cleaned like a header cell
    pub fn add_column_named(&mut self, name: &str) -> Result<()> {
        let name = cell::clean(name);
        self.check_new_name(&name)?;
        self.add_new_column(self.column_count(), &name, false)
    }

    /// Insert an empty column before `index`, shifting later columns right
    pub fn insert_column(&mut self, index: usize) -> Result<()> {
        self.check_column(index)?;
        self.add_new_column(index, PLACEHOLDER_COLUMN_NAME, true)
    }

    /// Insert an empty named column before `index`
    pub fn insert_column_named(&mut self, index: usize, name: &str) -> Result<()> {
        let name = cell::clean(name);
        self.check_new_name(&name)?;
        self.check_column(index)?;
        self.add_new_column(index, &name, false)
    }

    /// Remove the column at `index`, shifting later columns left together
    /// with their names
    pub fn remove_column(&mut self, index: usize) -> Result<Vec<String>> {
        self.check_column(index)?;
        let removed = self.columns.remove(index);
        if let HeaderMode::Headered(header) = &mut self.header {
            header.remove(index);
        }
        Ok(removed.cells)
    }

    /// Remove a column by name
    pub fn remove_column_by_name(&mut self, name: &str) -> Result<Vec<String>> {
        let index = self.column_index(name)?;
        self.remove_column(index)
    }

    /// Rename a column. The new name is cleaned like a header cell and must
    /// not be in use.
    pub fn rename_column(&mut self, old_name: &str, new_name: &str) -> Result<()> {
        let new_name = cell::clean(new_name);
        if is_blank(&new_name) {
            return Err(SheetError::BlankArgument { name: "new_name" });
        }
        let index = self.column_index(old_name)?;
        if self.column_index(&new_name).is_ok() {
            return Err(SheetError::DuplicateColumnName { name: new_name });
        }

        if let HeaderMode::Headered(header) = &mut self.header {
            header.rename(index, new_name);
        }
        Ok(())
    }

    // ===== Formatting =====

    /// A cell in output form
    pub fn get_formatted_cell(&self, col: usize, row: usize, delimiter: Delimiter) -> Result<String> {
        Ok(cell::format(self.get(col, row)?, delimiter).into_owned())
    }

    /// A named cell in output form
    pub fn get_formatted_cell_by_name(
        &self,
        name: &str,
        row: usize,
        delimiter: Delimiter,
    ) -> Result<String> {
        Ok(cell::format(self.get_by_name(name, row)?, delimiter).into_owned())
    }

    /// A data row in output form, cells joined by the delimiter
    pub fn get_formatted_row(&self, row: usize, delimiter: Delimiter) -> Result<String> {
        self.check_row(row)?;
        Ok(join_formatted(
            self.columns.iter().map(|c| c.cells[row].as_str()),
            delimiter,
        ))
    }

    /// The header row in output form
    pub fn get_formatted_header_row(&self, delimiter: Delimiter) -> Result<String> {
        let names = self.column_names()?;
        Ok(join_formatted(names.iter().map(String::as_str), delimiter))
    }

    /// Every line of the sheet in output form: the header row first if there
    /// is one, then one line per data row. Lines are produced on demand.
    /// A sheet without columns has no lines, headered or not.
    pub fn get_formatted_sheet(&self, delimiter: Delimiter) -> impl Iterator<Item = String> + '_ {
        let header = match &self.header {
            HeaderMode::Headered(header) if !header.names.is_empty() => Some(join_formatted(
                header.names.iter().map(String::as_str),
                delimiter,
            )),
            _ => None,
        };

        header.into_iter().chain((0..self.row_count()).map(move |row| {
            join_formatted(self.columns.iter().map(|c| c.cells[row].as_str()), delimiter)
        }))
    }

    // ===== Numbering =====

    /// Spreadsheet letters for a 0-based column index: 0 is `A`, 25 is `Z`,
    /// 26 is `AA`
    #[must_use]
    pub fn get_column_number(&self, col: usize) -> String {
        column_index_to_letters(col)
    }

    /// 1-based spreadsheet row number of a data row. With a header row the
    /// header occupies row 1, so data row 0 is row 2.
    #[must_use]
    pub fn get_row_number(&self, row: usize) -> usize {
        row + self.first_data_row_number()
    }

    fn first_data_row_number(&self) -> usize {
        if self.has_header_row() {
            2
        } else {
            1
        }
    }

    // ===== Snapshots =====

    /// Column-major copy of the grid: `grid[col][row]`. With a header row the
    /// column name is row 0.
    #[must_use]
    pub fn get_sheet(&self) -> Vec<Vec<String>> {
        let names = self.column_names().ok();
        self.columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                names
                    .map(|n| n[i].clone())
                    .into_iter()
                    .chain(column.cells.iter().cloned())
                    .collect()
            })
            .collect()
    }

    /// Iterate over data rows
    pub fn rows(&self) -> impl Iterator<Item = Vec<&str>> + '_ {
        (0..self.row_count()).map(move |row| {
            self.columns
                .iter()
                .map(|c| c.cells[row].as_str())
                .collect()
        })
    }

    // ===== Internals =====

    fn column_ref(&self, col: usize) -> Result<&Column> {
        self.columns
            .get(col)
            .ok_or(SheetError::ColumnIndexOutOfBounds {
                index: col,
                count: self.columns.len(),
            })
    }

    fn column_mut(&mut self, col: usize) -> Result<&mut Column> {
        let count = self.columns.len();
        self.columns
            .get_mut(col)
            .ok_or(SheetError::ColumnIndexOutOfBounds { index: col, count })
    }

    fn check_row(&self, row: usize) -> Result<()> {
        if row >= self.row_count() {
            return Err(SheetError::RowIndexOutOfBounds {
                index: row,
                count: self.row_count(),
            });
        }
        Ok(())
    }

    fn check_column(&self, col: usize) -> Result<()> {
        self.column_ref(col).map(|_| ())
    }

    /// Get the column index by name
    fn column_index(&self, name: &str) -> Result<usize> {
        let HeaderMode::Headered(header) = &self.header else {
            return Err(SheetError::NoHeaderRow);
        };
        if is_blank(name) {
            return Err(SheetError::BlankArgument { name: "column name" });
        }
        header
            .index_of(name)
            .ok_or_else(|| SheetError::ColumnNotFound {
                name: name.to_string(),
            })
    }

    /// Validate a caller-chosen name for a new column
    fn check_new_name(&self, name: &str) -> Result<()> {
        let HeaderMode::Headered(header) = &self.header else {
            return Err(SheetError::NoHeaderRow);
        };
        if is_blank(name) {
            return Err(SheetError::BlankArgument { name: "column name" });
        }
        if header.contains(name) {
            return Err(SheetError::DuplicateColumnName {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Place a new blank column at `index`. In a headered sheet the column is
    /// named `proposed`, or `proposed_N` for the first free N if `can_rename`.
    fn add_new_column(&mut self, index: usize, proposed: &str, can_rename: bool) -> Result<()> {
        if self.column_count() >= MAX_COUNT {
            return Err(SheetError::CapacityExceeded { what: "Column" });
        }

        if let HeaderMode::Headered(header) = &mut self.header {
            let name = header.unique(proposed, can_rename)?;
            header.insert(index, name);
        }

        let rows = self.row_count();
        self.columns.insert(index, Column::blank(rows));
        Ok(())
    }

    /// Pad every column to the length of the longest one
    fn fill_up_missing_cells(&mut self) {
        let max_rows = self
            .columns
            .iter()
            .map(|c| c.cells.len())
            .max()
            .unwrap_or(0);

        for column in &mut self.columns {
            column.cells.resize(max_rows, String::new());
        }
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new(false)
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn join_formatted<'a>(cells: impl Iterator<Item = &'a str>, delimiter: Delimiter) -> String {
    let mut line = String::new();
    for (i, value) in cells.enumerate() {
        if i > 0 {
            line.push(delimiter.as_char());
        }
        line.push_str(&cell::format(value, delimiter));
    }
    line
}
