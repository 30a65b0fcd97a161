use std::fs;

use anyhow::Context;
use serde::Deserialize;

/// Default number of files expected per test number.
const DEFAULT_REQUIRED_FILES: usize = 4;

/// Final config created from the user config file and defaults.
#[derive(Debug)]
pub struct Config {
    pub required_files: usize,
    pub dryrun: bool,
    pub verbose: bool,
}

/// Config from a config file.
#[derive(Debug, Default, Deserialize)]
struct NameCheckConfig {
    #[serde(default)]
    required_files: Option<usize>,
    #[serde(default)]
    dryrun: bool,
    #[serde(default)]
    verbose: bool,
}

/// Wrapper needed for parsing the config file section.
#[derive(Debug, Default, Deserialize)]
struct UserConfig {
    #[serde(default)]
    namecheck: NameCheckConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            required_files: DEFAULT_REQUIRED_FILES,
            dryrun: false,
            verbose: false,
        }
    }
}

impl Config {
    /// Load user config from the config file if it exists,
    /// falling back to default values.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> anyhow::Result<Self> {
        Ok(Self::from(NameCheckConfig::get_user_config()?))
    }
}

impl From<NameCheckConfig> for Config {
    fn from(user_config: NameCheckConfig) -> Self {
        Self {
            required_files: user_config.required_files.unwrap_or(DEFAULT_REQUIRED_FILES),
            dryrun: user_config.dryrun,
            verbose: user_config.verbose,
        }
    }
}

impl NameCheckConfig {
    /// Try to read user config from the file if it exists.
    /// Otherwise, fall back to default config.
    ///
    /// # Errors
    /// Returns an error if config file exists but cannot be read or parsed.
    fn get_user_config() -> anyhow::Result<Self> {
        let Some(path) = namecheck::config::config_path() else {
            return Ok(Self::default());
        };

        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse config file {}:\n{e}", path.display())),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(anyhow::anyhow!(
                "Failed to read config file {}: {error}",
                path.display()
            )),
        }
    }

    /// Parse config from a TOML string.
    ///
    /// # Errors
    /// Returns an error if the TOML string is invalid.
    fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        toml::from_str::<UserConfig>(toml_str)
            .map(|config| config.namecheck)
            .context("Failed to parse namecheck config TOML")
    }
}
