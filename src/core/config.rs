use serde::{Serialize, Deserialize};
use std::fmt;

use crate::core::error::{Result, UnitStyleError};


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub format: OutputFormat,
    pub descriptions: bool,
    pub verbosity: u8,
    pub failfast: bool,
    pub buffer: bool,
    pub color: ColorChoice,
}

/// The eight renderer styles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OutputFormat {
    List,
    #[default]
    Dots,
    JsonStream,
    Json,
    Progress,
    Min,
    Tap,
    Spec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Dots,
            descriptions: true,
            verbosity: 1,
            failfast: false,
            buffer: false,
            color: ColorChoice::Auto,
        }
    }
}

impl RunnerConfig {

    pub fn with_format(mut self, name: &str) -> Self {
        self.format = OutputFormat::from_name(name);
        self
    }


    pub fn from_file(path: &str) -> Result<Self> {
        use std::fs;
        use std::path::Path;

        let path = Path::new(path);
        if !path.exists() {
            return Err(UnitStyleError::ConfigError(format!("Config file not found: {}", path.display())));
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| UnitStyleError::ConfigError(format!("Failed to read config file: {}", e)))?;

        if path.extension().and_then(|ext| ext.to_str()) == Some("toml") {
            Self::from_toml(&contents)
        } else {
            Self::from_json(&contents)
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str::<Self>(contents)
            .map_err(|e| UnitStyleError::ConfigError(format!("Failed to parse TOML config: {}", e)))
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str::<Self>(contents)
            .map_err(|e| UnitStyleError::ConfigError(format!("Failed to parse JSON config: {}", e)))
    }
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 8] = [
        OutputFormat::List,
        OutputFormat::Dots,
        OutputFormat::JsonStream,
        OutputFormat::Json,
        OutputFormat::Progress,
        OutputFormat::Min,
        OutputFormat::Tap,
        OutputFormat::Spec,
    ];

    /// Case-insensitive lookup. Anything unrecognised, including an empty
    /// name, selects [`OutputFormat::Dots`].
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(name))
            .unwrap_or_else(|| {
                if !name.is_empty() {
                    log::debug!("unknown output format `{}`, using dots", name);
                }
                OutputFormat::Dots
            })
    }

    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::List => "list",
            OutputFormat::Dots => "dots",
            OutputFormat::JsonStream => "jsstream",
            OutputFormat::Json => "json",
            OutputFormat::Progress => "progress",
            OutputFormat::Min => "min",
            OutputFormat::Tap => "tap",
            OutputFormat::Spec => "spec",
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            OutputFormat::List => "one line per test with its outcome",
            OutputFormat::Dots => "a colored dot per test",
            OutputFormat::JsonStream => "newline-delimited JSON events",
            OutputFormat::Json => "a single JSON document at the end of the run",
            OutputFormat::Progress => "a progress bar",
            OutputFormat::Min => "the final summary only",
            OutputFormat::Tap => "Test Anything Protocol",
            OutputFormat::Spec => "tests nested under their module and group",
        }
    }
}

impl From<String> for OutputFormat {
    fn from(name: String) -> Self {
        OutputFormat::from_name(&name)
    }
}

impl From<OutputFormat> for String {
    fn from(format: OutputFormat) -> Self {
        format.name().to_string()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl ColorChoice {
    /// Reduce the choice to the single boolean handed to a renderer.
    pub fn resolve(self, is_terminal: bool) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => is_terminal && platform_supports_ansi(),
        }
    }
}

fn platform_supports_ansi() -> bool {
    if cfg!(windows) {
        std::env::var_os("ANSICON").is_some()
    } else {
        true
    }
}
