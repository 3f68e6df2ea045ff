//! Configuration management for the SVG data-attribute validator.
//!
//! Handles:
//! - Command-line argument parsing for both binaries
//! - The optional TOML settings file
//! - Merging the two, CLI flags taking precedence

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::export::DEFAULT_FILE_NAME;
use crate::report::OutputFormat;
use crate::validation::ValidationOptions;

/// Settings file looked up in the working directory
pub const PROJECT_SETTINGS_FILE: &str = ".svg-data.toml";

/// Arguments shared by the language server and the checker
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CommonArgs {
    /// Explicit settings file
    #[arg(long, help = "Path to a TOML settings file")]
    pub config: Option<PathBuf>,

    /// Disable source line lookup for findings
    #[arg(long, help = "Do not report line numbers")]
    pub no_line_numbers: bool,

    /// Log level
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// Command-line arguments for the language server
#[derive(Debug, Parser)]
#[command(name = "svg-data-ls")]
#[command(about = "Language server checking required data-* attributes in SVG files")]
#[command(version)]
pub struct ServerArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Command-line arguments for the one-shot checker
#[derive(Debug, Parser)]
#[command(name = "svg-data-check")]
#[command(about = "Check an SVG file for required data-* attributes")]
#[command(version)]
pub struct CheckArgs {
    /// SVG file to validate
    pub file: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Save the document as validated.svg next to FILE, or to PATH
    #[arg(long, value_name = "PATH", num_args = 0..=1, require_equals = true)]
    pub save: Option<Option<PathBuf>>,

    /// Revalidate every time the file changes, until Ctrl-C. The exit code reflects the last run.
    #[arg(long)]
    pub watch: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Contents of the TOML settings file
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub line_numbers: bool,
    pub output_file: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            line_numbers: true,
            output_file: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub track_lines: bool,
    /// File name used when saving into a directory
    pub output_file: String,
    /// Settings file that was loaded, if any
    pub settings_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_settings(&CommonArgs::default(), Settings::default(), None)
    }
}

impl Config {
    /// Create server configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(&ServerArgs::parse().common)
    }

    /// Create configuration from explicit arguments, loading the settings file
    pub fn from_args(args: &CommonArgs) -> Result<Self> {
        let settings_path = find_settings_file(args.config.as_deref());
        let settings = match &settings_path {
            Some(path) => load_settings(path)?,
            None => Settings::default(),
        };

        Ok(Self::from_settings(args, settings, settings_path))
    }

    /// Merge arguments over already-loaded settings
    pub fn from_settings(
        args: &CommonArgs,
        settings: Settings,
        settings_path: Option<PathBuf>,
    ) -> Self {
        let log_level = if args.log_level.is_empty() {
            "info".to_string()
        } else {
            args.log_level.clone()
        };

        Config {
            log_level,
            track_lines: settings.line_numbers && !args.no_line_numbers,
            output_file: settings.output_file,
            settings_path,
        }
    }

    pub fn validation_options(&self) -> ValidationOptions {
        ValidationOptions {
            track_lines: self.track_lines,
        }
    }
}

/// Locate the settings file: explicit path, then project file, then user config dir
pub fn find_settings_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let project = PathBuf::from(PROJECT_SETTINGS_FILE);
    if project.is_file() {
        return Some(project);
    }

    dirs::config_dir()
        .map(|dir| dir.join("svg-data").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Read and parse a settings file
pub fn load_settings(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
    let settings = toml::from_str(&content)
        .with_context(|| format!("Failed to parse settings TOML: {}", path.display()))?;
    log::debug!("Loaded settings from {}", path.display());
    Ok(settings)
}
