pub mod config;
pub mod excel;
pub mod folder;
pub mod pattern;
pub mod reconcile;
pub mod rename;

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Command;
use clap_complete::Shell;
use colored::Colorize;
use difference::{Changeset, Difference};
use unicode_normalization::UnicodeNormalization;

/// Split a file name into root and extension with special characters retained
/// instead of decomposed.
///
/// The extension keeps its leading dot and original casing; a name without an
/// extension yields an empty extension string.
///
/// Rust uses Unicode NFD (Normalization Form Decomposed) by default,
/// which converts special chars like "å" to "a\u{30a}",
/// which then get printed as a regular "a".
/// Use NFC (Normalization Form Composed) from unicode_normalization crate
/// to retain the correct format and not cause issues later on.
///
/// ```rust
/// use namecheck::split_file_name;
///
/// assert_eq!(
///     split_file_name("2025_08_18_134120_DA0097_E.blf"),
///     ("2025_08_18_134120_DA0097_E".to_string(), ".blf".to_string())
/// );
/// assert_eq!(split_file_name("notes"), ("notes".to_string(), String::new()));
/// ```
#[must_use]
pub fn split_file_name(name: &str) -> (String, String) {
    let path = Path::new(name);
    let root = path.file_stem().map_or_else(|| name.to_string(), os_str_to_string);
    let extension = path
        .extension()
        .map_or_else(String::new, |ext| format!(".{}", os_str_to_string(ext)));

    (root.nfc().collect::<String>(), extension.nfc().collect::<String>())
}

/// Resolves the provided input path to a directory or file to an absolute path.
///
/// If `path` is `None`, the current working directory is used.
/// The function verifies that the provided path exists and is accessible,
/// returning an error if it does not.
#[inline]
pub fn resolve_input_path(path: Option<&Path>) -> Result<PathBuf> {
    let input_path = path
        .map(|p| p.to_str().unwrap_or(""))
        .unwrap_or_default()
        .trim()
        .to_string();

    let filepath = if input_path.is_empty() {
        env::current_dir().context("Failed to get current working directory")?
    } else {
        PathBuf::from(input_path)
    };
    if !filepath.exists() {
        anyhow::bail!(
            "Input path does not exist or is not accessible: '{}'",
            filepath.display()
        );
    }

    Ok(dunce::canonicalize(&filepath)?)
}

/// Convert `OsStr` to String with invalid Unicode handling.
pub fn os_str_to_string(name: &OsStr) -> String {
    name.to_str().map_or_else(
        || name.to_string_lossy().replace('\u{FFFD}', ""),
        std::string::ToString::to_string,
    )
}

/// Convert given path to string with invalid Unicode handling.
pub fn path_to_string(path: &Path) -> String {
    path.to_str().map_or_else(
        || path.to_string_lossy().to_string().replace('\u{FFFD}', ""),
        std::string::ToString::to_string,
    )
}

/// Convert given path to filename string with invalid Unicode handling.
#[must_use]
pub fn path_to_filename_string(path: &Path) -> String {
    os_str_to_string(path.file_name().unwrap_or_default())
}

#[inline]
pub fn print_error(message: &str) {
    eprintln!("{}", format!("Error: {message}").red());
}

#[macro_export]
macro_rules! print_error {
    ($($arg:tt)*) => {
        $crate::print_error(&format!($($arg)*))
    };
}

#[inline]
pub fn print_warning(message: &str) {
    eprintln!("{}", message.yellow());
}

#[macro_export]
macro_rules! print_warning {
    ($($arg:tt)*) => {
        $crate::print_warning(&format!($($arg)*))
    };
}

/// Create a coloured diff for the given strings.
///
/// Renamed file names share their identifier prefix so the unchanged parts
/// line up without extra padding.
pub fn color_diff(old: &str, new: &str) -> (String, String) {
    let changeset = Changeset::new(old, new, "");
    let mut old_diff = String::new();
    let mut new_diff = String::new();

    for diff in changeset.diffs {
        match diff {
            Difference::Same(ref x) => {
                old_diff.push_str(x);
                new_diff.push_str(x);
            }
            Difference::Add(ref x) => {
                new_diff.push_str(&x.green().to_string());
            }
            Difference::Rem(ref x) => {
                old_diff.push_str(&x.red().to_string());
            }
        }
    }

    (old_diff, new_diff)
}

/// Print a stacked diff of the changes.
pub fn show_diff(old: &str, new: &str) {
    let (old_diff, new_diff) = color_diff(old, new);
    println!("{old_diff}");
    if old_diff != new_diff {
        println!("{new_diff}");
    }
}

/// Generate a shell completion script for the given shell.
pub fn generate_shell_completion(shell: Shell, mut command: Command, install: bool, command_name: &str) -> Result<()> {
    if install {
        let out_dir = get_shell_completion_dir(shell)?;
        let path = clap_complete::generate_to(shell, &mut command, command_name, out_dir)?;
        println!("Completion file generated to: {}", path.display());
    } else {
        clap_complete::generate(shell, &mut command, command_name, &mut std::io::stdout());
    }
    Ok(())
}

/// Determine the user directory for storing shell completions,
/// creating it if it does not exist yet.
fn get_shell_completion_dir(shell: Shell) -> Result<PathBuf> {
    let home = dirs::home_dir().context("Failed to get home directory")?;
    let user_dir = match shell {
        Shell::Bash => home.join(".bash_completion.d"),
        Shell::Elvish => home.join(".elvish"),
        Shell::Fish => home.join(".config/fish/completions"),
        Shell::PowerShell => {
            if cfg!(windows) {
                home.join(r"Documents\PowerShell\completions")
            } else {
                home.join(".config/powershell/completions")
            }
        }
        Shell::Zsh => home.join(".zsh/completions"),
        _ => anyhow::bail!("Unsupported shell"),
    };

    if !user_dir.exists() {
        std::fs::create_dir_all(&user_dir)?;
    }
    Ok(user_dir)
}
