//! Run configuration
//!
//! Settings come from three layers, highest priority first: command-line
//! flags, a `classgrid.toml` file, built-in defaults. The file is read from
//! `--config` when given, otherwise from the input directory if it exists
//! there.
//!
//! ```toml
//! input_dir = "timetables"
//! pattern = "*.xlsx"
//! output = "student_matrix_calendar.xlsx"
//! step_minutes = 15
//! days = ["Mon", "Tue", "Wed", "Thu", "Fri"]
//! sheet = "best"
//! strict = false
//! ```

use anyhow::{bail, Context, Result};
use classgrid_core::Weekday;
use classgrid_grid::{GridOptions, DEFAULT_STEP_MINUTES};
use classgrid_parser::{normalize_day, FilePolicy, LoadOptions, SheetSelection};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the input directory
pub const CONFIG_FILE_NAME: &str = "classgrid.toml";

/// Default output workbook
pub const DEFAULT_OUTPUT: &str = "student_matrix_calendar.xlsx";

/// Default input file pattern
pub const DEFAULT_PATTERN: &str = "*.xlsx";

/// Contents of `classgrid.toml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub input_dir: Option<PathBuf>,
    pub pattern: Option<String>,
    pub output: Option<PathBuf>,
    pub step_minutes: Option<u32>,
    pub days: Option<Vec<String>>,
    pub sheet: Option<SheetSelection>,
    pub strict: Option<bool>,
}

impl FileConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("In config file {}", path.display()))
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub input_dir: Option<PathBuf>,
    pub pattern: Option<String>,
    pub output: Option<PathBuf>,
    pub step_minutes: Option<u32>,
    /// Comma-separated day list
    pub days: Option<String>,
    pub sheet: Option<SheetSelection>,
    /// `--strict` can only switch strict mode on
    pub strict: bool,
    pub config: Option<PathBuf>,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub input_dir: PathBuf,
    pub pattern: String,
    pub output: PathBuf,
    pub step_minutes: u32,
    pub days: Vec<Weekday>,
    pub sheet: SheetSelection,
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            pattern: DEFAULT_PATTERN.into(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            step_minutes: DEFAULT_STEP_MINUTES,
            days: Weekday::ALL.to_vec(),
            sheet: SheetSelection::First,
            strict: false,
        }
    }
}

impl Config {
    /// Locate and read the config file, then merge everything
    pub fn resolve(overrides: &Overrides) -> Result<Self> {
        let file = match &overrides.config {
            Some(path) => FileConfig::load(path)?,
            None => {
                let dir = overrides
                    .input_dir
                    .clone()
                    .unwrap_or_else(|| PathBuf::from("."));
                let candidate = dir.join(CONFIG_FILE_NAME);
                if candidate.is_file() {
                    tracing::debug!(path = %candidate.display(), "using config file");
                    FileConfig::load(&candidate)?
                } else {
                    FileConfig::default()
                }
            }
        };
        Self::merge(file, overrides)
    }

    /// Apply `file` then `overrides` on top of the defaults
    pub fn merge(file: FileConfig, overrides: &Overrides) -> Result<Self> {
        let defaults = Config::default();

        let days = match (&overrides.days, &file.days) {
            (Some(list), _) => parse_day_list(list.split(','))?,
            (None, Some(list)) => parse_day_list(list.iter().map(String::as_str))?,
            (None, None) => defaults.days,
        };

        let config = Config {
            input_dir: overrides
                .input_dir
                .clone()
                .or(file.input_dir)
                .unwrap_or(defaults.input_dir),
            pattern: overrides
                .pattern
                .clone()
                .or(file.pattern)
                .unwrap_or(defaults.pattern),
            output: overrides
                .output
                .clone()
                .or(file.output)
                .unwrap_or(defaults.output),
            step_minutes: overrides
                .step_minutes
                .or(file.step_minutes)
                .unwrap_or(defaults.step_minutes),
            days,
            sheet: overrides.sheet.or(file.sheet).unwrap_or(defaults.sheet),
            strict: overrides.strict || file.strict.unwrap_or(defaults.strict),
        };

        config
            .grid_options()
            .validate()
            .context("Invalid configuration")?;
        Ok(config)
    }

    pub fn grid_options(&self) -> GridOptions {
        GridOptions::new()
            .step(self.step_minutes)
            .days(self.days.clone())
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            sheet: self.sheet,
            file_policy: if self.strict {
                FilePolicy::Abort
            } else {
                FilePolicy::Skip
            },
        }
    }
}

/// Parse day names in order, dropping repeats
pub fn parse_day_list<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<Vec<Weekday>> {
    let mut days = Vec::new();
    for name in names {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let day = normalize_day(name).with_context(|| format!("Invalid day list entry '{name}'"))?;
        if !days.contains(&day) {
            days.push(day);
        }
    }
    if days.is_empty() {
        bail!("Day list is empty");
    }
    Ok(days)
}
