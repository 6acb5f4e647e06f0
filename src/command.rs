//! Command grammar of the terminal front end.
//!
//! Column and row numbers are typed 1-based, matching the "Column N" labels,
//! and converted to 0-based indices here. Text after `=` and each
//! comma-separated cell are trimmed of surrounding whitespace.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ASSIGN_REGEX: Regex = Regex::new(r"^(set|cell|edit)\s+(\d+)\s*=(.*)$").unwrap();
    static ref INDEX_REGEX: Regex = Regex::new(r"^(drop|delete)\s+(\d+)$").unwrap();
    static ref ROW_REGEX: Regex = Regex::new(r"^row\s+(.*)$").unwrap();
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Show,
    AddColumn,
    SetColumn { index: usize, text: String },
    DropColumn(usize),
    BeginRow,
    SetCell { index: usize, text: String },
    SaveDraft,
    AppendRow(Vec<String>),
    EditRow { index: usize, cells: Vec<String> },
    DeleteRow(usize),
    Export,
    Reset,
    Quit,
}

impl Command {
    /// Parses one input line. Returns `None` for anything unrecognised,
    /// including a column or row number of 0.
    pub fn parse(line: &str) -> Option<Command> {
        let line = line.trim();
        match line {
            "help" => return Some(Command::Help),
            "show" => return Some(Command::Show),
            "add" => return Some(Command::AddColumn),
            "begin" => return Some(Command::BeginRow),
            "save" => return Some(Command::SaveDraft),
            "export" => return Some(Command::Export),
            "reset" => return Some(Command::Reset),
            "q" | "quit" => return Some(Command::Quit),
            _ => {}
        }

        if let Some(captures) = ASSIGN_REGEX.captures(line) {
            let index = one_based(&captures[2])?;
            let text = captures[3].trim().to_string();
            return Some(match &captures[1] {
                "set" => Command::SetColumn { index, text },
                "cell" => Command::SetCell { index, text },
                _ => Command::EditRow {
                    index,
                    cells: split_cells(&text),
                },
            });
        }

        if let Some(captures) = INDEX_REGEX.captures(line) {
            let index = one_based(&captures[2])?;
            return Some(match &captures[1] {
                "drop" => Command::DropColumn(index),
                _ => Command::DeleteRow(index),
            });
        }

        ROW_REGEX
            .captures(line)
            .map(|captures| Command::AppendRow(split_cells(&captures[1])))
    }
}

fn one_based(digits: &str) -> Option<usize> {
    digits.parse::<usize>().ok()?.checked_sub(1)
}

fn split_cells(text: &str) -> Vec<String> {
    text.split(',').map(|cell| cell.trim().to_string()).collect()
}
