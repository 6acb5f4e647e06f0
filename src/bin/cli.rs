#![cfg(not(tarpaulin_include))]

use clap::Parser;
use fieldsheet::command::Command;
use fieldsheet::downloader::{DirectoryStore, ShareRequest, ShareSheet};
use fieldsheet::error::ExportError;
use fieldsheet::session::{Session, SessionConfig};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Terminal front end for collecting research data into a table.
#[derive(Parser, Debug)]
#[command(name = "fieldsheet-cli", version)]
struct Args {
    /// JSON file with session settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for exported CSV files (overrides the config)
    #[arg(long)]
    export_dir: Option<PathBuf>,
}

/// Stands in for a platform share sheet by telling the user where the file is.
struct TerminalShare;

impl ShareSheet for TerminalShare {
    fn share(&mut self, request: &ShareRequest) -> Result<(), ExportError> {
        println!(
            "{}: {} ({})",
            request.dialog_title,
            request.file.display(),
            request.mime_type
        );
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SessionConfig::from_json_file(path)?,
        None => SessionConfig::default(),
    };
    if let Some(dir) = args.export_dir {
        config.export_dir = dir;
    }

    let mut store = DirectoryStore::new(config.export_dir.clone());
    let mut session = Session::new(config);
    let mut status = String::from("ok");
    let stdin = io::stdin();
    let mut input = stdin.lock();

    display(&session);
    loop {
        print!("({}) > ", status);
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let Some(command) = Command::parse(&line) else {
            status = String::from("invalid command");
            continue;
        };

        let outcome = match command {
            Command::Quit => break,
            Command::Help => {
                print_help();
                Ok(())
            }
            Command::Show => {
                display(&session);
                Ok(())
            }
            Command::AddColumn => {
                let index = session.add_column();
                println!("added {}", session.columns()[index]);
                Ok(())
            }
            Command::SetColumn { index, text } => session.set_column_value(index, &text),
            Command::DropColumn(index) => session.remove_column(index).map(|_| ()),
            Command::BeginRow => session.begin_row_entry().map(|draft| {
                println!("entering row with {} cells", draft.cells().len());
            }),
            Command::SetCell { index, text } => session.set_draft_cell(index, &text),
            Command::SaveDraft => session.submit_draft().map(|i| println!("saved row {}", i + 1)),
            Command::AppendRow(cells) => session.append_row(cells).map(|i| println!("saved row {}", i + 1)),
            Command::EditRow { index, cells } => session.update_row(index, cells),
            Command::DeleteRow(index) => {
                if confirm(&mut input, &format!("Delete row {}?", index + 1))? {
                    session.delete_row(index).map(|_| ())
                } else {
                    Ok(())
                }
            }
            Command::Reset => {
                if confirm(&mut input, "Are you sure you want to reset everything?")? {
                    session.reset();
                }
                Ok(())
            }
            Command::Export => {
                if session.rows().is_empty() {
                    status = String::from("no rows to export");
                    continue;
                }
                match session.export(&mut store, &mut TerminalShare, &chrono::Local::now()) {
                    Ok(receipt) => {
                        println!("wrote {} rows, {} bytes", receipt.rows, receipt.bytes);
                        status = String::from("ok");
                    }
                    Err(e) => status = format!("export failed: {}", e),
                }
                continue;
            }
        };

        status = match outcome {
            Ok(()) => String::from("ok"),
            Err(e) => e.to_string(),
        };
        display(&session);
    }

    Ok(())
}

fn confirm(input: &mut impl BufRead, question: &str) -> io::Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

fn display(session: &Session) {
    let schema = session.table().schema();

    println!("Columns:");
    for (i, col) in schema.iter().enumerate() {
        println!("  {}. {:<12} {}", i + 1, col.label, col.value);
    }

    if let Some(draft) = session.draft() {
        println!("Draft:");
        for (i, cell) in draft.cells().iter().enumerate() {
            let shown = if cell.is_empty() {
                format!("<{}>", schema.placeholder(i))
            } else {
                cell.clone()
            };
            println!("  {}. {}", i + 1, shown);
        }
    }

    let preview = session.preview();
    if preview.is_empty() {
        return;
    }
    println!("Recent entries:");
    print!("\t");
    for i in 0..schema.len() {
        print!("{:<16}", schema.preview_header(i));
    }
    println!();
    for (index, row) in preview.iter() {
        print!("{}\t", index + 1);
        for cell in row.cells() {
            print!("{:<16}", cell);
        }
        println!();
    }
}

fn print_help() {
    println!("Commands:");
    println!("  show: Show columns, draft and recent rows");
    println!("  add: Add a column");
    println!("  set <n>=<name>: Name column n");
    println!("  drop <n>: Remove column n and its cells");
    println!("  begin: Start entering a row");
    println!("  cell <n>=<value>: Fill cell n of the row being entered");
    println!("  save: Save the row being entered");
    println!("  row <a>,<b>,...: Add a complete row");
    println!("  edit <n>=<a>,<b>,...: Replace row n");
    println!("  delete <n>: Delete row n");
    println!("  export: Write the table as CSV");
    println!("  reset: Clear everything");
    println!("  q: Quit");
}
