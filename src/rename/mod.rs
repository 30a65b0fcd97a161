//! Suffix rename planning and execution.
//!
//! The planner derives a conflict-free bulk rename plan that unifies the
//! variable suffix segment of matching filenames while preserving the
//! identifier, the extension, and any trailing tag segments. The executor
//! applies a plan one rename at a time and aggregates per-item failures.

mod apply;
mod plan;

pub use apply::{FailureReason, RenameFailure, RenameOutcome, apply_rename_plan};
pub use plan::{RenameConfig, RenamePlan, SuffixRename, normalize_suffix};
