use crate::column::Column;
use crate::downloader::{self, ExportReceipt, FileStore, ShareSheet};
use crate::error::{ConfigError, ExportError, Result, TableError};
use crate::table::{DEFAULT_COLUMNS, RecentWindow, Row, Table};
use chrono::{DateTime, TimeZone};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for a [`Session`]. Missing fields in a config file take the
/// defaults below.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Columns created at startup and on reset.
    pub default_columns: usize,
    /// Rows shown by [`Session::preview`].
    pub preview_rows: usize,
    /// Where exported CSV files are written.
    pub export_dir: PathBuf,
    /// Title passed to the share collaborator.
    pub share_title: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            default_columns: DEFAULT_COLUMNS,
            preview_rows: 4,
            export_dir: PathBuf::from("exports"),
            share_title: "Share CSV".to_string(),
        }
    }
}

impl SessionConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> std::result::Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Unsaved input for the row being entered, one string per column.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowDraft {
    cells: Vec<String>,
}

impl RowDraft {
    fn blank(columns: usize) -> Self {
        RowDraft {
            cells: vec![String::new(); columns],
        }
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }
}

/// Application state shared by every screen of the front end.
///
/// Created once per run and passed around by reference. All reads and
/// writes of the table go through here, so every screen sees the same data.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    table: Table,
    draft: Option<RowDraft>,
}

impl Default for Session {
    fn default() -> Self {
        Session::new(SessionConfig::default())
    }
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let table = Table::create(config.default_columns);
        Session {
            config,
            table,
            draft: None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn columns(&self) -> Vec<&str> {
        self.table.schema().labels()
    }

    pub fn column_values(&self) -> Vec<&str> {
        self.table.schema().values()
    }

    pub fn rows(&self) -> &[Row] {
        self.table.rows()
    }

    /// Back to the startup table: default columns, no rows, no draft.
    pub fn reset(&mut self) {
        self.table = Table::create(self.config.default_columns);
        self.draft = None;
        debug!("session reset to {} columns", self.config.default_columns);
    }

    // Schema changes invalidate any draft, since its length would no longer match.

    pub fn add_column(&mut self) -> usize {
        self.draft = None;
        self.table.add_column()
    }

    pub fn set_column_value(&mut self, index: usize, text: &str) -> Result<()> {
        self.table.set_column_value(index, text)
    }

    pub fn remove_column(&mut self, index: usize) -> Result<Column> {
        let removed = self.table.remove_column(index)?;
        self.draft = None;
        Ok(removed)
    }

    pub fn all_filled(&self) -> bool {
        self.table.all_filled()
    }

    /// Appends a complete row in one step.
    ///
    /// Like [`Session::begin_row_entry`], this needs every column to be
    /// named first.
    pub fn append_row<I, S>(&mut self, cells: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !self.table.all_filled() {
            return Err(TableError::IncompleteSchema);
        }
        self.table.append_row(cells)
    }

    pub fn update_row<I, S>(&mut self, index: usize, cells: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.table.update_row(index, cells)
    }

    /// Deletes a row. The caller is expected to have confirmed with the user.
    pub fn delete_row(&mut self, index: usize) -> Result<Row> {
        self.table.delete_row(index)
    }

    pub fn preview(&self) -> RecentWindow<'_> {
        self.table.recent_window(self.config.preview_rows)
    }

    /// Starts entering a new row. Requires every column to be named.
    pub fn begin_row_entry(&mut self) -> Result<&RowDraft> {
        if !self.table.all_filled() {
            return Err(TableError::IncompleteSchema);
        }
        let draft = self
            .draft
            .insert(RowDraft::blank(self.table.column_count()));
        Ok(&*draft)
    }

    pub fn draft(&self) -> Option<&RowDraft> {
        self.draft.as_ref()
    }

    /// Sets one cell of the draft, starting entry first if needed.
    pub fn set_draft_cell(&mut self, index: usize, text: &str) -> Result<()> {
        if self.draft.is_none() {
            self.begin_row_entry()?;
        }
        let len = self.table.column_count();
        match self.draft.as_mut().and_then(|d| d.cells.get_mut(index)) {
            Some(cell) => {
                *cell = text.to_string();
                Ok(())
            }
            None => Err(TableError::ColumnOutOfRange { index, len }),
        }
    }

    /// Saves the draft as a new row and starts a fresh one.
    ///
    /// If validation fails the draft is left as typed so it can be corrected.
    pub fn submit_draft(&mut self) -> Result<usize> {
        let Some(draft) = self.draft.as_ref() else {
            return Err(TableError::IncompleteSchema);
        };
        let index = self.table.append_row(draft.cells.iter().cloned())?;
        self.draft = Some(RowDraft::blank(self.table.column_count()));
        Ok(index)
    }

    /// Export the current table as CSV and offer it for sharing
    ///
    /// Delegates to [`downloader::export_and_share`] with the configured
    /// share title. Takes `&self`, so session state is never changed,
    /// whether the export succeeds or fails.
    ///
    /// # Arguments
    /// * `store` - Where the CSV file is written
    /// * `share` - Receives the written file for presentation to the user
    /// * `now` - Time used to name the file
    ///
    /// # Returns
    /// * `Result<ExportReceipt, ExportError>` - Details of the written file, or
    ///   the write/share failure
    pub fn export<Tz>(
        &self,
        store: &mut dyn FileStore,
        share: &mut dyn ShareSheet,
        now: &DateTime<Tz>,
    ) -> std::result::Result<ExportReceipt, ExportError>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        downloader::export_and_share(&self.table, store, share, &self.config.share_title, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named_session() -> Session {
        let mut session = Session::default();
        for (i, name) in ["Site", "Depth", "pH"].iter().enumerate() {
            session.set_column_value(i, name).unwrap();
        }
        session
    }

    #[test]
    fn reset_restores_defaults() {
        let mut session = named_session();
        session.add_column();
        session.set_column_value(3, "Notes").unwrap();
        session.append_row(["a", "b", "c", "d"]).unwrap();
        session.begin_row_entry().unwrap();

        session.reset();
        assert_eq!(session.columns(), vec!["Column 1", "Column 2", "Column 3"]);
        assert_eq!(session.column_values(), vec!["", "", ""]);
        assert!(session.rows().is_empty());
        assert!(session.draft().is_none());
    }

    #[test]
    fn row_entry_requires_named_columns() {
        let mut session = Session::default();
        assert_eq!(
            session.begin_row_entry().unwrap_err(),
            TableError::IncompleteSchema
        );
        assert_eq!(
            session.set_draft_cell(0, "x").unwrap_err(),
            TableError::IncompleteSchema
        );
    }

    #[test]
    fn append_requires_named_columns() {
        let mut session = Session::default();
        assert_eq!(
            session.append_row(["a", "b", "c"]),
            Err(TableError::IncompleteSchema)
        );
        assert!(session.rows().is_empty());

        session.set_column_value(0, "Site").unwrap();
        session.set_column_value(1, "Depth").unwrap();
        assert_eq!(
            session.append_row(["a", "b", "c"]),
            Err(TableError::IncompleteSchema)
        );

        session.set_column_value(2, "pH").unwrap();
        assert_eq!(session.append_row(["a", "b", "c"]), Ok(0));
    }

    #[test]
    fn submit_clears_draft_on_success() {
        let mut session = named_session();
        session.set_draft_cell(0, "north").unwrap();
        session.set_draft_cell(1, "4").unwrap();
        session.set_draft_cell(2, "7.1").unwrap();

        assert_eq!(session.submit_draft(), Ok(0));
        let draft = session.draft().unwrap();
        assert_eq!(draft.cells(), &["", "", ""]);
        assert_eq!(session.rows()[0].get(0), Some("north"));
    }

    #[test]
    fn submit_keeps_draft_on_failure() {
        let mut session = named_session();
        session.set_draft_cell(0, "north").unwrap();

        assert!(session.submit_draft().unwrap_err().is_validation());
        assert_eq!(session.draft().unwrap().cells(), &["north", "", ""]);
        assert!(session.rows().is_empty());
    }

    #[test]
    fn schema_change_discards_draft() {
        let mut session = named_session();
        session.set_draft_cell(0, "north").unwrap();
        session.add_column();
        assert!(session.draft().is_none());
    }

    #[test]
    fn draft_cell_out_of_range() {
        let mut session = named_session();
        assert_eq!(
            session.set_draft_cell(3, "x"),
            Err(TableError::ColumnOutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn preview_uses_configured_size() {
        let mut session = Session::new(SessionConfig {
            preview_rows: 2,
            ..SessionConfig::default()
        });
        for (i, name) in ["A", "B", "C"].iter().enumerate() {
            session.set_column_value(i, name).unwrap();
        }
        for r in ["1", "2", "3"] {
            session.append_row([r, r, r]).unwrap();
        }
        let preview = session.preview();
        assert_eq!(preview.start(), 1);
        assert_eq!(preview.len(), 2);
    }

    #[test]
    fn config_fills_missing_fields() {
        let config: SessionConfig = serde_json::from_str(r#"{"preview_rows": 10}"#).unwrap();
        assert_eq!(config.preview_rows, 10);
        assert_eq!(config.default_columns, 3);
        assert_eq!(config.share_title, "Share CSV");
    }
}
