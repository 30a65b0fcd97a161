//! namecheck - Reconcile expected filenames from a spreadsheet against a folder.
//!
//! Compares identifiers recorded in an Excel sheet with the files present in a
//! directory, reports missing, extra, incomplete and duplicated file numbers,
//! and optionally unifies filename suffixes with a conflict-safe bulk rename.

mod config;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use namecheck::excel::{self, ColumnRef};
use namecheck::folder;
use namecheck::reconcile::ComparisonReport;
use namecheck::rename::{RenameConfig, SuffixRename};

use crate::config::Config;

#[derive(Parser)]
#[command(
    author,
    version,
    name = env!("CARGO_BIN_NAME"),
    about = "Reconcile spreadsheet filenames against a folder"
)]
pub struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compare spreadsheet filenames against the files in a folder
    Compare {
        /// Excel file holding the expected filenames
        #[arg(value_hint = clap::ValueHint::FilePath)]
        excel: PathBuf,

        /// Folder containing the actual files
        #[arg(value_hint = clap::ValueHint::DirPath)]
        folder: PathBuf,

        /// Sheet name (default is the first sheet)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Only scan the given column (letter, 1-based index, or header name)
        #[arg(short, long, num_args = 1, action = clap::ArgAction::Append, name = "COLUMN")]
        column: Vec<String>,

        /// Required number of files per test number
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// List the sheet names in an Excel file
    Sheets {
        /// Excel file
        #[arg(value_hint = clap::ValueHint::FilePath)]
        excel: PathBuf,
    },

    /// Unify the suffix segment of matching filenames in a folder
    Rename {
        /// New suffix, for example `H0222_A`
        suffix: String,

        /// Optional input directory (default is the current directory)
        #[arg(value_hint = clap::ValueHint::DirPath)]
        folder: Option<PathBuf>,

        /// Only print changes without renaming files
        #[arg(short, long)]
        print: bool,

        /// Print verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        shell: Shell,

        /// Install the completion script
        #[arg(short, long)]
        install: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    match args.command {
        Command::Compare {
            excel,
            folder,
            sheet,
            column,
            count,
        } => compare(&excel, &folder, sheet.as_deref(), &column, count),
        Command::Sheets { excel } => sheets(&excel),
        Command::Rename {
            suffix,
            folder,
            print,
            verbose,
        } => rename(folder, suffix, print, verbose),
        Command::Completion { shell, install } => {
            namecheck::generate_shell_completion(shell, Args::command(), install, env!("CARGO_BIN_NAME"))
        }
    }
}

/// Run the spreadsheet vs folder comparison and print the report.
fn compare(excel: &Path, folder: &Path, sheet: Option<&str>, columns: &[String], count: Option<usize>) -> Result<()> {
    let user_config = Config::load()?;
    let required_files = count.unwrap_or(user_config.required_files);
    anyhow::ensure!(required_files > 0, "Files per test number must be greater than 0");

    let excel_path = namecheck::resolve_input_path(Some(excel))?;
    let folder_path = namecheck::resolve_input_path(Some(folder))?;
    let column_refs: Vec<ColumnRef> = columns.iter().map(|column| ColumnRef::parse(column)).collect();

    let (sheet_name, range) = excel::load_sheet(&excel_path, sheet)?;
    let scan = excel::scan_table(&range, &column_refs)?;

    let entries = folder::list_entries(&folder_path)?;
    let folder_ids = folder::scan_folder(&entries);
    let incomplete = folder::check_completeness(&entries, required_files);

    let report = ComparisonReport::new(sheet_name, &scan, &folder_ids, incomplete, required_files);
    println!("{report}");
    Ok(())
}

/// Print the worksheet names in the given Excel file.
fn sheets(excel: &Path) -> Result<()> {
    let path = namecheck::resolve_input_path(Some(excel))?;
    for name in excel::sheet_names(&path)? {
        println!("{name}");
    }
    Ok(())
}

/// Run the suffix rename in the given folder.
fn rename(folder: Option<PathBuf>, suffix: String, print: bool, verbose: bool) -> Result<()> {
    let user_config = Config::load()?;
    let root = namecheck::resolve_input_path(folder.as_deref())?;
    let config = RenameConfig {
        suffix,
        dryrun: print || user_config.dryrun,
        verbose: verbose || user_config.verbose,
    };
    SuffixRename::new(root, config).run()
}
