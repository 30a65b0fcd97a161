//! Comparison of spreadsheet identifiers against a folder snapshot.

use std::collections::HashSet;
use std::fmt;

use crate::excel::ScanResult;
use crate::pattern::FileId;

/// Set-difference spreadsheet identifiers against folder identifiers,
/// in both directions.
///
/// Returns `(missing_from_folder, missing_from_spreadsheet)`, both sorted
/// chronologically. Running this twice on the same inputs yields identical
/// output.
#[must_use]
pub fn reconcile(sheet_ids: &[FileId], folder_ids: &HashSet<FileId>) -> (Vec<FileId>, Vec<FileId>) {
    let sheet_set: HashSet<&FileId> = sheet_ids.iter().collect();

    let mut missing_from_folder: Vec<FileId> = sheet_ids
        .iter()
        .filter(|id| !folder_ids.contains(id))
        .cloned()
        .collect();
    let mut missing_from_sheet: Vec<FileId> = folder_ids
        .iter()
        .filter(|id| !sheet_set.contains(id))
        .cloned()
        .collect();

    missing_from_folder.sort();
    missing_from_sheet.sort();
    (missing_from_folder, missing_from_sheet)
}

/// Outcome of one comparison run, rendered through `Display`.
///
/// Built fresh for every comparison and discarded once printed.
#[derive(Debug)]
pub struct ComparisonReport {
    pub sheet_name: String,
    pub group_count: usize,
    pub required_files: usize,
    pub missing_from_folder: Vec<FileId>,
    pub missing_from_sheet: Vec<FileId>,
    pub incomplete: Vec<FileId>,
    pub duplicates: Vec<FileId>,
}

impl ComparisonReport {
    /// Build a report from one spreadsheet scan and one folder snapshot.
    #[must_use]
    pub fn new(
        sheet_name: String,
        scan: &ScanResult,
        folder_ids: &HashSet<FileId>,
        mut incomplete: Vec<FileId>,
        required_files: usize,
    ) -> Self {
        let (missing_from_folder, missing_from_sheet) = reconcile(&scan.unique, folder_ids);
        incomplete.sort();
        let mut duplicates = scan.duplicates.clone();
        duplicates.sort();

        Self {
            sheet_name,
            group_count: scan.group_count,
            required_files,
            missing_from_folder,
            missing_from_sheet,
            incomplete,
            duplicates,
        }
    }

    /// True when every check came back clean.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.missing_from_folder.is_empty()
            && self.missing_from_sheet.is_empty()
            && self.incomplete.is_empty()
            && self.duplicates.is_empty()
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Sheet '{}' has {} different test numbers.",
            self.sheet_name, self.group_count
        )?;
        writeln!(f)?;

        if self.is_clean() {
            writeln!(
                f,
                "All numbers have complete file sets ({} files each), spreadsheet and folder match.",
                self.required_files
            )?;
            return write!(f, "No duplicate filenames found in the spreadsheet.");
        }

        if !self.missing_from_folder.is_empty() {
            writeln!(f, "In spreadsheet but not in folder ({} files):", self.missing_from_folder.len())?;
            for id in &self.missing_from_folder {
                writeln!(f, "{id}")?;
            }
            writeln!(f)?;
        }

        if !self.missing_from_sheet.is_empty() {
            writeln!(f, "In folder but not in spreadsheet ({} files):", self.missing_from_sheet.len())?;
            for id in &self.missing_from_sheet {
                writeln!(f, "{id}")?;
            }
            writeln!(f)?;
        }

        if !self.incomplete.is_empty() {
            writeln!(
                f,
                "Incomplete file numbers (less than {} files) ({} numbers):",
                self.required_files,
                self.incomplete.len()
            )?;
            let joined = self.incomplete.iter().map(FileId::as_str).collect::<Vec<_>>().join(", ");
            writeln!(f, "{joined}")?;
            writeln!(f)?;
        }

        if self.duplicates.is_empty() {
            write!(f, "No duplicate filenames found in the spreadsheet.")
        } else {
            writeln!(
                f,
                "Duplicate filenames found in the spreadsheet ({} duplicates):",
                self.duplicates.len()
            )?;
            let mut first = true;
            for id in &self.duplicates {
                if !first {
                    writeln!(f)?;
                }
                write!(f, "{id}")?;
                first = false;
            }
            Ok(())
        }
    }
}
