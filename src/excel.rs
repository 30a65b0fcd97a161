//! Spreadsheet loading and identifier scanning.

use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use calamine::{Data, Range, Reader, Xlsx, open_workbook};
use itertools::Itertools;
use regex::Regex;

use crate::pattern::FileId;

/// Cell content delimiters: runs of newline, comma, semicolon or space.
static RE_DELIMITERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\n,; ]+").expect("Failed to create regex pattern for cell delimiters"));

/// Split cell text into candidate filename tokens.
///
/// Tokens at the edges may be empty when the text starts or ends with a
/// delimiter; callers filter blanks.
#[must_use]
pub fn split_cell(value: &str) -> Vec<&str> {
    RE_DELIMITERS.split(value).collect()
}

/// Column selector: spreadsheet letter, 1-based index, or header name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRef {
    Letter(String),
    Index(usize),
    Name(String),
}

impl ColumnRef {
    /// Parse user input into a column reference.
    ///
    /// Digits are read as a 1-based index and short alphabetic input as a
    /// column letter; anything else is a header name.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
            Self::Index(trimmed.parse().unwrap_or_default())
        } else if !trimmed.is_empty() && trimmed.len() <= 3 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            Self::Letter(trimmed.to_ascii_uppercase())
        } else {
            Self::Name(trimmed.to_string())
        }
    }

    /// Resolve to a zero-based column index against the given header row.
    ///
    /// # Errors
    /// Returns an error for an out-of-range letter or index,
    /// or a name that does not appear in the header row.
    pub fn resolve(&self, headers: &[String]) -> Result<usize> {
        let index = match self {
            Self::Letter(letter) => letter
                .bytes()
                .fold(0usize, |acc, byte| acc * 26 + usize::from(byte - b'A') + 1)
                .checked_sub(1)
                .context("Column letter must not be empty")?,
            Self::Index(index) => index.checked_sub(1).context("Column index starts at 1")?,
            Self::Name(name) => headers
                .iter()
                .position(|header| header == name)
                .with_context(|| format!("Column '{name}' was not found in the header row"))?,
        };
        if index >= headers.len() {
            anyhow::bail!(
                "Column reference resolves to column {} but the sheet has {} columns",
                index + 1,
                headers.len()
            );
        }
        Ok(index)
    }
}

/// All worksheet names in the workbook, in workbook order.
pub fn sheet_names(path: &Path) -> Result<Vec<String>> {
    let workbook: Xlsx<_> = open_workbook(path).with_context(|| format!("Failed to open workbook: {}", path.display()))?;
    Ok(workbook.sheet_names().to_vec())
}

/// Load one worksheet: the given sheet name or the first sheet in the workbook.
///
/// Returns the resolved sheet name together with the cell range snapshot.
pub fn load_sheet(path: &Path, sheet: Option<&str>) -> Result<(String, Range<Data>)> {
    let mut workbook: Xlsx<_> =
        open_workbook(path).with_context(|| format!("Failed to open workbook: {}", path.display()))?;
    let name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .context("Workbook contains no sheets")?,
    };
    let range = workbook
        .worksheet_range(&name)
        .with_context(|| format!("Failed to read sheet '{name}'"))?;
    Ok((name, range))
}

/// Result of scanning one worksheet for identifiers.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Identifiers in first-seen order with later duplicates removed.
    pub unique: Vec<FileId>,
    /// Identifiers that appeared more than once, each reported once.
    pub duplicates: Vec<FileId>,
    /// Count of distinct trailing sequence numbers.
    ///
    /// Grouping is by the six digit suffix only, so identifiers from different
    /// dates sharing a sequence number count as one group. This matches the
    /// historical report output and is kept for compatibility.
    pub group_count: usize,
}

/// Scan a worksheet for identifiers, column by column.
///
/// Cells are visited in column order, then row order within a column. The
/// first row is the header row (it resolves [`ColumnRef::Name`]) and is not
/// scanned. Non-string cells never match. With `columns` given, only the
/// referenced columns are scanned.
///
/// # Errors
/// Returns an error when a column reference cannot be resolved, or when the
/// scan extracts no identifiers at all.
pub fn scan_table(range: &Range<Data>, columns: &[ColumnRef]) -> Result<ScanResult> {
    let headers = header_row(range);
    let selected: Vec<usize> = if columns.is_empty() {
        (0..range.width()).collect()
    } else {
        columns.iter().map(|column| column.resolve(&headers)).collect::<Result<_>>()?
    };

    let mut extracted = Vec::new();
    for &column in &selected {
        for row in 1..range.height() {
            let Some(Data::String(text)) = range.get((row, column)) else {
                continue;
            };
            for token in split_cell(text) {
                if token.is_empty() {
                    continue;
                }
                if let Some(id) = FileId::extract(token) {
                    extracted.push(id);
                }
            }
        }
    }

    if extracted.is_empty() {
        anyhow::bail!("No filenames matching the pattern were found in the scanned columns");
    }

    Ok(ScanResult {
        unique: extracted.iter().cloned().unique().collect(),
        duplicates: extracted.iter().cloned().duplicates().collect(),
        group_count: extracted.iter().map(FileId::sequence).unique().count(),
    })
}

/// Header texts from the first row, used to resolve column names.
fn header_row(range: &Range<Data>) -> Vec<String> {
    (0..range.width())
        .map(|column| match range.get((0, column)) {
            Some(Data::String(text)) => text.clone(),
            _ => String::new(),
        })
        .collect()
}
