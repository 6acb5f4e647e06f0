/*!
# Field Sheet

A small research data collection tool: define a set of named columns, enter
rows of values against them, and export the result as CSV for sharing.

## Overview

The crate holds the table model and its consistency rules. Screens, dialogs
and the operating system's share sheet live outside it and talk to it only
through [`Session`]. A terminal front end (`fieldsheet-cli`) is included as
one such caller.

## Architecture

### Core
- **Schema** ([`column`]) - ordered column labels and user-entered headers
- **Table** ([`table`]) - rows of text cells, always one cell per column
- **Exporter** ([`downloader`]) - CSV text plus the file and share hooks

### State
- **Session** ([`session`]) - the single table every screen reads from,
  the in-progress row draft, and configuration

### Front end
- **Commands** ([`command`]) - input grammar of the terminal front end

## Consistency rules

- Every row has exactly as many cells as there are columns. Removing a
  column removes that cell from every row; adding one gives every existing
  row an empty cell.
- Rows are only saved when every cell is non-blank.
- Rows are addressed by position. Deleting a row moves later rows up.
- Failed operations return an error and change nothing.

## CSV format

Header line of column names, one line per row, fields joined with `,`,
lines with `\n`. Values are not quoted or escaped.
*/

pub mod column;
pub mod command;
pub mod downloader;
pub mod error;
pub mod session;
pub mod table;

/// Re-export everything from these modules to make it easier to use
pub use column::*;
pub use command::*;
pub use downloader::*;
pub use error::*;
pub use session::*;
pub use table::*;
