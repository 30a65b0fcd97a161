use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Result, bail};
use colored::Colorize;

use crate::pattern::FileId;
use crate::rename::apply_rename_plan;

/// Settings for one rename run.
#[derive(Debug, Default)]
pub struct RenameConfig {
    /// Target suffix, e.g. `H0222_A`. A leading underscore is accepted.
    pub suffix: String,
    /// Only print changes without renaming files.
    pub dryrun: bool,
    /// Print verbose output.
    pub verbose: bool,
}

/// Bulk rename plan derived from one folder snapshot.
///
/// Every directory entry lands in exactly one of the three lists.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RenamePlan {
    /// Accepted renames as (old path, new path).
    pub changes: Vec<(PathBuf, PathBuf)>,
    /// Entries left untouched: directories, non-matching names and no-ops.
    pub skipped: Vec<PathBuf>,
    /// Renames whose target already exists on disk
    /// or collides with another planned target.
    pub conflicts: Vec<(PathBuf, PathBuf)>,
}

/// Unify the suffix segment of matching filenames in one directory.
#[derive(Debug, Default)]
pub struct SuffixRename {
    root: PathBuf,
    config: RenameConfig,
}

/// Validate the target suffix: surrounding whitespace and one leading
/// underscore are dropped.
///
/// # Errors
/// Returns an error if nothing remains after stripping.
pub fn normalize_suffix(suffix: &str) -> Result<String> {
    let trimmed = suffix.trim();
    let normalized = trimmed.strip_prefix('_').unwrap_or(trimmed);
    if normalized.is_empty() {
        bail!("Rename suffix must not be empty");
    }
    Ok(normalized.to_string())
}

impl SuffixRename {
    /// Create a new instance for the given directory.
    #[must_use]
    pub const fn new(root: PathBuf, config: RenameConfig) -> Self {
        Self { root, config }
    }

    /// Build the rename plan for the current folder snapshot.
    ///
    /// Entries are processed in sorted name order, so the same snapshot
    /// always yields the same plan. The filesystem is not modified.
    ///
    /// # Errors
    /// Returns an error if the suffix is invalid or the folder cannot be read.
    pub fn plan(&self) -> Result<RenamePlan> {
        let suffix = normalize_suffix(&self.config.suffix)?;
        let entries = crate::folder::list_entries(&self.root)?;

        let mut plan = RenamePlan::default();
        let mut planned_targets: HashSet<PathBuf> = HashSet::new();
        for name in entries {
            let old_path = self.root.join(&name);
            if old_path.is_dir() {
                plan.skipped.push(old_path);
                continue;
            }
            let Some(new_name) = renamed_file_name(&name, &suffix) else {
                plan.skipped.push(old_path);
                continue;
            };
            if new_name == name {
                plan.skipped.push(old_path);
                continue;
            }
            let new_path = self.root.join(&new_name);
            if new_path.exists() || !planned_targets.insert(new_path.clone()) {
                plan.conflicts.push((old_path, new_path));
            } else {
                plan.changes.push((old_path, new_path));
            }
        }
        Ok(plan)
    }

    /// Plan and execute the rename, printing progress.
    ///
    /// # Errors
    /// Returns an error for an invalid suffix or an unreadable folder.
    /// Individual rename failures are reported but never abort the run.
    pub fn run(&self) -> Result<()> {
        let plan = self.plan()?;
        self.print_plan(&plan);

        if plan.changes.is_empty() {
            println!("No files to rename");
            return Ok(());
        }

        let noun = if plan.changes.len() > 1 { "files" } else { "file" };
        if self.config.dryrun {
            println!("Dryrun: would have renamed {} {noun}", plan.changes.len());
            return Ok(());
        }

        let outcome = apply_rename_plan(&plan.changes);
        for failure in &outcome.failures {
            crate::print_error!(
                "Failed to rename {}: {}",
                crate::path_to_filename_string(&failure.from),
                failure.message
            );
        }
        println!("{outcome}");
        Ok(())
    }

    /// Print the planned changes as a numbered list of coloured diffs.
    fn print_plan(&self, plan: &RenamePlan) {
        let total = plan.changes.len();
        let max_chars = total.checked_ilog10().map_or(1, |digits| digits as usize + 1);
        for (index, (old_path, new_path)) in plan.changes.iter().enumerate() {
            let number = format!("{:>max_chars$} / {total}", index + 1);
            let heading = if self.config.dryrun {
                format!("Dryrun {number}:").bold().cyan()
            } else {
                format!("Rename {number}:").bold().magenta()
            };
            println!("{heading}");
            crate::show_diff(
                &crate::path_to_filename_string(old_path),
                &crate::path_to_filename_string(new_path),
            );
        }

        for (old_path, new_path) in &plan.conflicts {
            crate::print_warning!(
                "Conflict: {} -> {} (target already taken)",
                crate::path_to_filename_string(old_path),
                crate::path_to_filename_string(new_path)
            );
        }

        if self.config.verbose && !plan.skipped.is_empty() {
            println!("Skipped {} entries", plan.skipped.len());
        }
    }
}

/// Apply the suffix normalization rule to one filename.
///
/// Returns `None` when the name does not embed an identifier. The new name
/// keeps the identifier, replaces the old suffix segment with `suffix`, keeps
/// trailing tag segments from the fourth underscore group onwards, and keeps
/// the extension verbatim.
fn renamed_file_name(name: &str, suffix: &str) -> Option<String> {
    let id = FileId::extract(name)?;
    let (root, extension) = crate::split_file_name(name);
    let start = root.find(id.as_str())?;
    let remaining = &root[start + id.as_str().len()..];

    let extra = if remaining.is_empty() {
        String::new()
    } else {
        // Splitting "_OLD_E_tag" on '_' yields an empty leading token, so
        // index 3 is the first segment after the replaceable old suffix.
        let segments: Vec<&str> = remaining.split('_').collect();
        if segments.len() >= 4 {
            format!("_{}", segments[3..].join("_"))
        } else {
            String::new()
        }
    };

    Some(format!("{id}_{suffix}{extra}{extension}"))
}

#[cfg(test)]
mod plan_tests {
    use super::*;

    use std::fs::File;
    use std::path::Path;

    use tempfile::tempdir;

    fn rename_in(root: &Path, suffix: &str) -> SuffixRename {
        SuffixRename::new(
            root.to_path_buf(),
            RenameConfig {
                suffix: suffix.to_string(),
                ..Default::default()
            },
        )
    }

    #[test]
    fn normalize_suffix_strips_leading_underscore() {
        assert_eq!(normalize_suffix("_H0222_A").unwrap(), "H0222_A");
        assert_eq!(normalize_suffix("  H0222_A ").unwrap(), "H0222_A");
        assert_eq!(normalize_suffix("E").unwrap(), "E");
    }

    #[test]
    fn normalize_suffix_rejects_empty_input() {
        assert!(normalize_suffix("").is_err());
        assert!(normalize_suffix("_").is_err());
        assert!(normalize_suffix("  _  ").is_err());
    }

    #[test]
    fn replaces_whole_old_suffix() {
        let new_name = renamed_file_name("2025_08_18_134120_DA0097_E.blf", "H0222_A").unwrap();
        assert_eq!(new_name, "2025_08_18_134120_H0222_A.blf");
    }

    #[test]
    fn keeps_trailing_tag_segments() {
        let new_name = renamed_file_name("2025_08_18_134120_DA0097_E_inside.blf", "H0222_A").unwrap();
        assert_eq!(new_name, "2025_08_18_134120_H0222_A_inside.blf");
    }

    #[test]
    fn keeps_several_trailing_tag_segments() {
        let new_name = renamed_file_name("2025_08_18_134120_DA0097_E_inside_raw.blf", "H0222_A").unwrap();
        assert_eq!(new_name, "2025_08_18_134120_H0222_A_inside_raw.blf");
    }

    #[test]
    fn appends_suffix_when_name_ends_at_identifier() {
        let new_name = renamed_file_name("2025_08_18_134120.blf", "H0222_A").unwrap();
        assert_eq!(new_name, "2025_08_18_134120_H0222_A.blf");
    }

    #[test]
    fn preserves_extension_verbatim() {
        let new_name = renamed_file_name("2025_08_18_134120_DA0097_E.BLF", "H0222_A").unwrap();
        assert_eq!(new_name, "2025_08_18_134120_H0222_A.BLF");
    }

    #[test]
    fn identifier_survives_renaming() {
        let old_name = "2025_08_18_134120_DA0097_E_inside.blf";
        let old_id = FileId::extract(old_name).unwrap();
        let new_name = renamed_file_name(old_name, "H0222_A").unwrap();
        assert_eq!(FileId::extract(&new_name).unwrap(), old_id);
    }

    #[test]
    fn name_without_identifier_is_not_renamed() {
        assert!(renamed_file_name("results.xlsx", "H0222_A").is_none());
    }

    #[test]
    fn plan_accounts_for_every_entry_exactly_once() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("2025_08_18_134120_DA0097_E.blf")).unwrap();
        File::create(dir.path().join("2025_08_18_134120_H0222_A.blf")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();
        std::fs::create_dir(dir.path().join("archive")).unwrap();

        let plan = rename_in(dir.path(), "H0222_A").plan().unwrap();
        let total = plan.changes.len() + plan.skipped.len() + plan.conflicts.len();
        assert_eq!(total, 4);
    }

    #[test]
    fn already_correct_name_is_skipped() {
        let dir = tempdir().unwrap();
        let correct = dir.path().join("2025_08_18_134120_H0222_A.blf");
        File::create(&correct).unwrap();

        let plan = rename_in(dir.path(), "H0222_A").plan().unwrap();
        assert!(plan.changes.is_empty());
        assert!(plan.conflicts.is_empty());
        assert_eq!(plan.skipped, vec![correct]);
    }

    #[test]
    fn directories_are_never_renamed() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("2025_08_18_134120_DA0097_E")).unwrap();

        let plan = rename_in(dir.path(), "H0222_A").plan().unwrap();
        assert!(plan.changes.is_empty());
        assert_eq!(plan.skipped.len(), 1);
    }

    #[test]
    fn existing_target_is_a_conflict() {
        let dir = tempdir().unwrap();
        let old = dir.path().join("2025_08_18_134120_DA0097_E.blf");
        let taken = dir.path().join("2025_08_18_134120_H0222_A.blf");
        File::create(&old).unwrap();
        File::create(&taken).unwrap();

        let plan = rename_in(dir.path(), "H0222_A").plan().unwrap();
        assert!(plan.changes.is_empty());
        assert_eq!(plan.conflicts, vec![(old, taken)]);
    }

    #[test]
    fn colliding_planned_targets_keep_only_the_first() {
        let dir = tempdir().unwrap();
        // Both normalize to the same target; sorted order makes DA0097 first.
        File::create(dir.path().join("2025_08_18_134120_DA0097_E.blf")).unwrap();
        File::create(dir.path().join("2025_08_18_134120_DB0001_F.blf")).unwrap();

        let plan = rename_in(dir.path(), "H0222_A").plan().unwrap();
        assert_eq!(plan.changes.len(), 1);
        assert_eq!(plan.conflicts.len(), 1);
        assert_eq!(
            crate::path_to_filename_string(&plan.changes[0].0),
            "2025_08_18_134120_DA0097_E.blf"
        );
    }

    #[test]
    fn plan_is_deterministic() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("2025_08_18_134120_DA0097_E.blf")).unwrap();
        File::create(dir.path().join("2025_08_19_000001_DA0097_E.blf")).unwrap();

        let rename = rename_in(dir.path(), "H0222_A");
        assert_eq!(rename.plan().unwrap(), rename.plan().unwrap());
    }

    #[test]
    fn invalid_suffix_aborts_before_planning() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("2025_08_18_134120_DA0097_E.blf")).unwrap();

        assert!(rename_in(dir.path(), "_").plan().is_err());
    }
}
