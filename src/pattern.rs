//! Canonical file identifier extraction and chronological ordering.

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Matches the identifier embedded in measurement filenames:
/// a date followed by a six digit sequence number, e.g. `2025_08_18_134120`.
pub static RE_FILE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"20\d{2}_\d{2}_\d{2}_\d{6}").expect("Failed to create regex pattern for file id"));

/// Length of the `YYYY_MM_DD` date portion of an identifier.
const DATE_LENGTH: usize = 10;

/// Identifier extracted from a filename or spreadsheet cell.
///
/// Wraps the matched `YYYY_MM_DD_NNNNNN` string.
/// Ordering is chronological: the date portion first,
/// then the sequence number interpreted as an integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileId(String);

impl FileId {
    /// Search `text` for the identifier shape and return the first match.
    ///
    /// The match can sit anywhere in the string.
    #[must_use]
    pub fn extract(text: &str) -> Option<Self> {
        RE_FILE_ID.find(text).map(|m| Self(m.as_str().to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `YYYY_MM_DD` date portion.
    #[must_use]
    pub fn date(&self) -> &str {
        &self.0[..DATE_LENGTH]
    }

    /// The trailing six digit sequence as text.
    #[must_use]
    pub fn sequence(&self) -> &str {
        &self.0[DATE_LENGTH + 1..]
    }

    /// The trailing sequence interpreted as an integer.
    #[must_use]
    pub fn sequence_number(&self) -> u32 {
        self.sequence().parse().unwrap_or_default()
    }
}

impl Ord for FileId {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.date(), self.sequence_number()).cmp(&(other.date(), other.sequence_number()))
    }
}

impl PartialOrd for FileId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
