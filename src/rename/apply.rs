use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use colored::Colorize;

/// Why a single rename failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    TargetExists,
    PermissionDenied,
    SourceMissing,
    Other,
}

impl FailureReason {
    fn from_error(error: &io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::AlreadyExists => Self::TargetExists,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            io::ErrorKind::NotFound => Self::SourceMissing,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::TargetExists => "Target file already exists",
            Self::PermissionDenied => "Permission denied",
            Self::SourceMissing => "Source file not found",
            Self::Other => "Other error",
        };
        write!(f, "{text}")
    }
}

/// One failed rename with its categorized reason and the OS error text.
#[derive(Debug)]
pub struct RenameFailure {
    pub from: PathBuf,
    pub to: PathBuf,
    pub reason: FailureReason,
    pub message: String,
}

/// Aggregated result of applying a rename plan.
#[derive(Debug, Default)]
pub struct RenameOutcome {
    pub renamed: usize,
    pub failed: usize,
    pub failures: Vec<RenameFailure>,
}

impl RenameOutcome {
    /// Per-reason failure counts in first-seen order.
    #[must_use]
    pub fn failure_summary(&self) -> Vec<(FailureReason, usize)> {
        let mut summary: Vec<(FailureReason, usize)> = Vec::new();
        for failure in &self.failures {
            match summary.iter_mut().find(|(reason, _)| *reason == failure.reason) {
                Some((_, count)) => *count += 1,
                None => summary.push((failure.reason, 1)),
            }
        }
        summary
    }
}

impl fmt::Display for RenameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.renamed == 1 { "file" } else { "files" };
        let renamed = format!("Renamed {} {noun}", self.renamed);
        if self.failed == 0 {
            return write!(f, "{}", renamed.green());
        }

        writeln!(f, "{}", renamed.green())?;
        write!(f, "{}", format!("Failed to rename {} of {}", self.failed, self.renamed + self.failed).red())?;
        for (reason, count) in self.failure_summary() {
            write!(f, "\n- {reason}: {count}")?;
        }
        Ok(())
    }
}

/// Apply accepted changes one at a time, in plan order.
///
/// A failed item is recorded and the batch continues; already applied renames
/// are not rolled back.
#[must_use]
pub fn apply_rename_plan(changes: &[(PathBuf, PathBuf)]) -> RenameOutcome {
    let mut outcome = RenameOutcome::default();
    for (from, to) in changes {
        match rename_if_absent(from, to) {
            Ok(()) => outcome.renamed += 1,
            Err(error) => {
                outcome.failed += 1;
                outcome.failures.push(RenameFailure {
                    from: from.clone(),
                    to: to.clone(),
                    reason: FailureReason::from_error(&error),
                    message: error.to_string(),
                });
            }
        }
    }
    outcome
}

/// Rename that refuses to overwrite an existing target.
///
/// The planner already routes known conflicts away; this guards against
/// targets that appeared between planning and execution.
fn rename_if_absent(from: &Path, to: &Path) -> io::Result<()> {
    if to.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", to.display()),
        ));
    }
    std::fs::rename(from, to)
}

#[cfg(test)]
mod apply_tests {
    use super::*;

    use std::fs::File;

    use tempfile::tempdir;

    #[test]
    fn applies_all_changes() {
        let dir = tempdir().unwrap();
        let old_a = dir.path().join("2025_08_18_134120_DA0097_E.blf");
        let old_b = dir.path().join("2025_08_19_000001_DA0097_E.blf");
        let new_a = dir.path().join("2025_08_18_134120_H0222_A.blf");
        let new_b = dir.path().join("2025_08_19_000001_H0222_A.blf");
        File::create(&old_a).unwrap();
        File::create(&old_b).unwrap();

        let outcome = apply_rename_plan(&[(old_a.clone(), new_a.clone()), (old_b.clone(), new_b.clone())]);
        assert_eq!(outcome.renamed, 2);
        assert_eq!(outcome.failed, 0);
        assert!(new_a.exists() && new_b.exists());
        assert!(!old_a.exists() && !old_b.exists());
    }

    #[test]
    fn failure_does_not_abort_the_batch() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("2025_08_18_134120_DA0097_E.blf");
        let old = dir.path().join("2025_08_19_000001_DA0097_E.blf");
        let new = dir.path().join("2025_08_19_000001_H0222_A.blf");
        File::create(&old).unwrap();

        let outcome = apply_rename_plan(&[
            (missing, dir.path().join("2025_08_18_134120_H0222_A.blf")),
            (old, new.clone()),
        ]);
        assert_eq!(outcome.renamed, 1);
        assert_eq!(outcome.failed, 1);
        assert_eq!(outcome.failures[0].reason, FailureReason::SourceMissing);
        assert!(new.exists());
    }

    #[test]
    fn target_created_after_planning_is_a_failure() {
        let dir = tempdir().unwrap();
        let old = dir.path().join("2025_08_18_134120_DA0097_E.blf");
        let new = dir.path().join("2025_08_18_134120_H0222_A.blf");
        File::create(&old).unwrap();
        File::create(&new).unwrap();

        let outcome = apply_rename_plan(&[(old.clone(), new)]);
        assert_eq!(outcome.renamed, 0);
        assert_eq!(outcome.failed, 1);
        assert_eq!(outcome.failures[0].reason, FailureReason::TargetExists);
        assert!(old.exists());
    }

    #[test]
    fn failure_summary_groups_by_reason() {
        let outcome = RenameOutcome {
            renamed: 0,
            failed: 3,
            failures: vec![
                RenameFailure {
                    from: PathBuf::from("a"),
                    to: PathBuf::from("b"),
                    reason: FailureReason::SourceMissing,
                    message: String::new(),
                },
                RenameFailure {
                    from: PathBuf::from("c"),
                    to: PathBuf::from("d"),
                    reason: FailureReason::TargetExists,
                    message: String::new(),
                },
                RenameFailure {
                    from: PathBuf::from("e"),
                    to: PathBuf::from("f"),
                    reason: FailureReason::SourceMissing,
                    message: String::new(),
                },
            ],
        };

        let summary = outcome.failure_summary();
        assert_eq!(summary, vec![(FailureReason::SourceMissing, 2), (FailureReason::TargetExists, 1)]);
    }

    #[test]
    fn empty_plan_is_a_no_op() {
        let outcome = apply_rename_plan(&[]);
        assert_eq!(outcome.renamed, 0);
        assert_eq!(outcome.failed, 0);
        assert!(outcome.failures.is_empty());
    }
}
