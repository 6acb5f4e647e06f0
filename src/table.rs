use crate::column::{Column, Schema};
use crate::error::{Result, TableError};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Number of columns a fresh table starts with.
pub const DEFAULT_COLUMNS: usize = 3;

/// One record of cell values, aligned by position with the schema.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Row(Vec<String>);

impl Row {
    pub fn cells(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Row {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Row(iter.into_iter().map(Into::into).collect())
    }
}

/// Column schema plus the rows entered against it.
///
/// Every row always has exactly `column_count()` cells. Schema changes that
/// would break this are applied to the rows inside the same call.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(try_from = "RawTable")]
pub struct Table {
    columns: Schema,
    rows: Vec<Row>,
}

/// Serialized form of [`Table`], checked for row shape before use.
#[derive(Deserialize)]
struct RawTable {
    columns: Schema,
    rows: Vec<Row>,
}

impl TryFrom<RawTable> for Table {
    type Error = TableError;

    fn try_from(raw: RawTable) -> Result<Self> {
        let expected = raw.columns.len();
        if let Some(row) = raw.rows.iter().find(|row| row.len() != expected) {
            return Err(TableError::ShapeMismatch {
                expected,
                found: row.len(),
            });
        }
        Ok(Table {
            columns: raw.columns,
            rows: raw.rows,
        })
    }
}

impl Default for Table {
    fn default() -> Self {
        Table::create(DEFAULT_COLUMNS)
    }
}

impl Table {
    /// Empty table with `columns` default columns.
    pub fn create(columns: usize) -> Self {
        Table {
            columns: Schema::with_defaults(columns),
            rows: Vec::new(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.columns
    }

    pub fn columns(&self) -> std::slice::Iter<'_, Column> {
        self.columns.iter()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn all_filled(&self) -> bool {
        self.columns.all_filled()
    }

    /// Appends a default column. Existing rows get an empty cell in the new
    /// position. Returns the new column's index.
    pub fn add_column(&mut self) -> usize {
        let index = self.columns.push_default();
        for row in &mut self.rows {
            row.0.push(String::new());
        }
        debug!("added column {} ({} rows padded)", index, self.rows.len());
        index
    }

    pub fn set_column_value(&mut self, index: usize, text: &str) -> Result<()> {
        if self.columns.set_value(index, text) {
            debug!("column {} renamed to {:?}", index, text);
            Ok(())
        } else {
            warn!("ignored rename of missing column {}", index);
            Err(TableError::ColumnOutOfRange {
                index,
                len: self.columns.len(),
            })
        }
    }

    /// Removes the column at `index` together with the matching cell of every
    /// row.
    pub fn remove_column(&mut self, index: usize) -> Result<Column> {
        let len = self.columns.len();
        let Some(removed) = self.columns.remove(index) else {
            warn!("ignored removal of missing column {}", index);
            return Err(TableError::ColumnOutOfRange { index, len });
        };
        for row in &mut self.rows {
            row.0.remove(index);
        }
        debug!("removed column {} ({:?})", index, removed.label);
        Ok(removed)
    }

    /// Appends a complete row and returns its index.
    pub fn append_row<I, S>(&mut self, cells: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row = self.validate(cells.into_iter().collect())?;
        self.rows.push(row);
        let index = self.rows.len() - 1;
        debug!("appended row {}", index);
        Ok(index)
    }

    /// Replaces the row at `index` without moving it.
    pub fn update_row<I, S>(&mut self, index: usize, cells: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let len = self.rows.len();
        if index >= len {
            warn!("ignored update of missing row {}", index);
            return Err(TableError::RowOutOfRange { index, len });
        }
        let row = self.validate(cells.into_iter().collect())?;
        self.rows[index] = row;
        debug!("updated row {}", index);
        Ok(())
    }

    /// Removes the row at `index`; later rows move up by one.
    pub fn delete_row(&mut self, index: usize) -> Result<Row> {
        let len = self.rows.len();
        if index >= len {
            warn!("ignored delete of missing row {}", index);
            return Err(TableError::RowOutOfRange { index, len });
        }
        debug!("deleted row {}", index);
        Ok(self.rows.remove(index))
    }

    /// View of the last `n` rows, stamped with their real indices.
    pub fn recent_window(&self, n: usize) -> RecentWindow<'_> {
        let start = self.rows.len().saturating_sub(n);
        RecentWindow {
            start,
            rows: &self.rows[start..],
        }
    }

    fn validate(&self, row: Row) -> Result<Row> {
        if self.columns.is_empty() {
            return Err(TableError::NoColumns);
        }
        if row.len() != self.columns.len() {
            return Err(TableError::ShapeMismatch {
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        if let Some(column) = row.0.iter().position(|cell| cell.trim().is_empty()) {
            return Err(TableError::EmptyCell {
                column,
                header: self.columns.header(column),
            });
        }
        Ok(row)
    }
}

/// The most recent rows of a table, for preview display.
///
/// Borrows the rows instead of copying them and can be iterated any number
/// of times.
#[derive(Clone, Copy, Debug)]
pub struct RecentWindow<'a> {
    start: usize,
    rows: &'a [Row],
}

impl<'a> RecentWindow<'a> {
    /// Index of the first row of the window in the full table.
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &'a [Row] {
        self.rows
    }

    /// `(table index, row)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &'a Row)> + 'a {
        let start = self.start;
        self.rows.iter().enumerate().map(move |(i, row)| (start + i, row))
    }
}
