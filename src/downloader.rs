use crate::error::ExportError;
use crate::table::Table;
use chrono::{DateTime, TimeZone};
use log::info;
use std::fmt::Display;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// MIME type handed to the share collaborator.
pub const CSV_MIME_TYPE: &str = "text/csv";

/// Convert a table to CSV text
///
/// This function renders the whole table as comma-separated text where:
/// - The first line holds the column headers (the user's header, or
///   "Column N" when it was left empty)
/// - Each following line is one row, in table order
/// - Fields are joined with `,` and lines with `\n`, with no trailing newline
/// - Values are written as-is: a cell containing a comma or newline is not
///   quoted and will split when the file is read back
///
/// # Arguments
/// * `table` - Reference to the table to convert
///
/// # Returns
/// * `String` - CSV content; a table without rows gives the header line alone
///
/// # Examples
/// ```
/// use fieldsheet::table::Table;
/// use fieldsheet::downloader::to_csv;
///
/// let mut table = Table::create(2);
/// table.set_column_value(0, "A").unwrap();
/// table.set_column_value(1, "B").unwrap();
/// table.append_row(["1", "2"]).unwrap();
/// assert_eq!(to_csv(&table), "A,B\n1,2");
/// ```
pub fn to_csv(table: &Table) -> String {
    let schema = table.schema();
    let header = (0..schema.len())
        .map(|i| schema.header(i))
        .collect::<Vec<_>>()
        .join(",");

    let mut lines = Vec::with_capacity(table.row_count() + 1);
    lines.push(header);
    for row in table.rows() {
        lines.push(row.cells().join(","));
    }
    lines.join("\n")
}

/// File name for an export taken at `now`, e.g. `research_data_20261019_143005.csv`.
pub fn export_filename<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("research_data_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

/// Persists export content somewhere the share collaborator can reach it.
pub trait FileStore {
    /// Writes `content` as UTF-8 and returns where it landed.
    fn write_utf8(&mut self, filename: &str, content: &str) -> Result<PathBuf, ExportError>;
}

/// Presents a written file to the user for sharing.
pub trait ShareSheet {
    fn share(&mut self, request: &ShareRequest) -> Result<(), ExportError>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareRequest {
    pub file: PathBuf,
    pub mime_type: &'static str,
    pub dialog_title: String,
}

/// What a successful export produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportReceipt {
    pub path: PathBuf,
    pub rows: usize,
    pub bytes: usize,
}

/// [`FileStore`] writing into a directory on disk.
///
/// Content goes to a temporary file in the target directory first and is
/// renamed into place, so a failed write never leaves a truncated CSV behind.
#[derive(Clone, Debug)]
pub struct DirectoryStore {
    dir: PathBuf,
}

impl DirectoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectoryStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileStore for DirectoryStore {
    fn write_utf8(&mut self, filename: &str, content: &str) -> Result<PathBuf, ExportError> {
        let path = self.dir.join(filename);
        let wrap = |source: std::io::Error| ExportError::Write {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(wrap)?;
        let mut file = tempfile::NamedTempFile::new_in(&self.dir).map_err(wrap)?;
        file.write_all(content.as_bytes()).map_err(wrap)?;
        file.persist(&path).map_err(|e| wrap(e.error))?;
        Ok(path)
    }
}

/// Export a table as a CSV file and offer it for sharing
///
/// This function renders `table` with [`to_csv`], writes the result through
/// `store` under a timestamped file name, then hands the written file to
/// `share` as `text/csv`. The table is only read. Running it again
/// regenerates identical content from the current state, so a failed export
/// can simply be retried.
///
/// # Arguments
/// * `table` - Table to export
/// * `store` - Where the CSV file is written
/// * `share` - Receives the written file for presentation to the user
/// * `dialog_title` - Title shown by the share collaborator
/// * `now` - Time used to name the file
///
/// # Returns
/// * `Result<ExportReceipt, ExportError>` - Path, row count and byte size of
///   the export, or the write/share failure with its underlying message
///
/// # Examples
/// ```no_run
/// use chrono::Local;
/// use fieldsheet::downloader::{export_and_share, DirectoryStore, ShareRequest, ShareSheet};
/// use fieldsheet::error::ExportError;
/// use fieldsheet::table::Table;
///
/// struct Print;
/// impl ShareSheet for Print {
///     fn share(&mut self, request: &ShareRequest) -> Result<(), ExportError> {
///         println!("{}", request.file.display());
///         Ok(())
///     }
/// }
///
/// let table = Table::default();
/// let mut store = DirectoryStore::new("exports");
/// match export_and_share(&table, &mut store, &mut Print, "Share CSV", &Local::now()) {
///     Ok(receipt) => println!("wrote {} bytes", receipt.bytes),
///     Err(e) => eprintln!("export failed: {}", e),
/// }
/// ```
pub fn export_and_share<Tz>(
    table: &Table,
    store: &mut dyn FileStore,
    share: &mut dyn ShareSheet,
    dialog_title: &str,
    now: &DateTime<Tz>,
) -> Result<ExportReceipt, ExportError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let content = to_csv(table);
    let filename = export_filename(now);
    let path = store.write_utf8(&filename, &content)?;

    share.share(&ShareRequest {
        file: path.clone(),
        mime_type: CSV_MIME_TYPE,
        dialog_title: dialog_title.to_string(),
    })?;

    info!(
        "exported {} rows ({} bytes) to {}",
        table.row_count(),
        content.len(),
        path.display()
    );
    Ok(ExportReceipt {
        path,
        rows: table.row_count(),
        bytes: content.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn named(headers: &[&str]) -> Table {
        let mut table = Table::create(headers.len());
        for (i, h) in headers.iter().enumerate() {
            table.set_column_value(i, h).unwrap();
        }
        table
    }

    #[test]
    fn csv_joins_header_and_rows() {
        let mut table = named(&["A", "B"]);
        table.append_row(["1", "2"]).unwrap();
        assert_eq!(to_csv(&table), "A,B\n1,2");
    }

    #[test]
    fn csv_without_rows_is_header_only() {
        assert_eq!(to_csv(&named(&["Site", "Depth"])), "Site,Depth");
    }

    #[test]
    fn csv_uses_generated_name_for_blank_header() {
        let mut table = named(&["Site", "", "pH"]);
        table.append_row(["north", "4", "7.1"]).unwrap();
        assert_eq!(to_csv(&table), "Site,Column 2,pH\nnorth,4,7.1");
    }

    #[test]
    fn csv_does_not_quote_embedded_commas() {
        let mut table = named(&["Note"]);
        table.append_row(["a,b"]).unwrap();
        assert_eq!(to_csv(&table), "Note\na,b");
    }

    #[test]
    fn filename_is_timestamped() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 14, 30, 5).unwrap();
        assert_eq!(export_filename(&now), "research_data_20261019_143005.csv");
    }

    #[test]
    fn directory_store_creates_missing_dir() {
        let root = tempfile::tempdir().unwrap();
        let mut store = DirectoryStore::new(root.path().join("exports"));
        let path = store.write_utf8("t.csv", "A\n1").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "A\n1");
    }
}
