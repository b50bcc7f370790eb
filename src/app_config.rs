use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Alignment strategy
    #[serde(default)]
    pub strategy: Strategy,

    /// Alignment tuning knobs (paired strategy)
    #[serde(default)]
    pub alignment: AlignmentConfig,

    /// Output rendering format
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Primary track label used in logs and output naming
    #[serde(default = "default_primary_track")]
    pub primary_track: String,

    /// Secondary track label used in logs and output naming
    #[serde(default = "default_secondary_track")]
    pub secondary_track: String,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Alignment strategy selector
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    // @strategy: Chronological interleave, no pairing
    Timeline,
    // @strategy: Nearest-time one-to-one matching, primary leads
    #[default]
    Paired,
}

impl Strategy {
    // @returns: Capitalized strategy name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Timeline => "Timeline",
            Self::Paired => "Paired",
        }
    }

    // @returns: Lowercase strategy identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Timeline => "timeline".to_string(),
            Self::Paired => "paired".to_string(),
        }
    }
}

// Implement Display trait for Strategy
impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for Strategy
impl std::str::FromStr for Strategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "timeline" => Ok(Self::Timeline),
            "paired" => Ok(Self::Paired),
            _ => Err(anyhow!("Invalid strategy: {}", s)),
        }
    }
}

/// Output rendering format
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Timed SRT blocks (index, time range, text)
    #[default]
    Srt,
    /// Untimed plain-text blocks (text only)
    Text,
}

impl OutputFormat {
    /// Whether rendered entries carry a time-range line
    pub fn is_timed(&self) -> bool {
        matches!(self, Self::Srt)
    }

    /// On-disk file extension for the format
    pub fn extension(&self) -> &str {
        match self {
            Self::Srt => "srt",
            Self::Text => "txt",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Srt => write!(f, "srt"),
            Self::Text => write!(f, "text"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "srt" => Ok(Self::Srt),
            "text" | "txt" => Ok(Self::Text),
            _ => Err(anyhow!("Invalid output format: {}", s)),
        }
    }
}

/// Tuning knobs for the paired match strategy
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct AlignmentConfig {
    // @field: Maximum acceptable absolute start-time gap, in seconds
    #[serde(default = "default_max_gap_seconds")]
    pub max_gap_seconds: f64,

    // @field: Secondary cues considered per primary cue
    #[serde(default = "default_search_window")]
    pub search_window: usize,

    // @field: How far the search cursor may step back from its committed position
    #[serde(default = "default_backtrack")]
    pub backtrack: usize,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            max_gap_seconds: default_max_gap_seconds(),
            search_window: default_search_window(),
            backtrack: default_backtrack(),
        }
    }
}

/// Log level configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level (default)
    #[default]
    Info,
    /// Debug level
    Debug,
    /// Trace level
    Trace,
}

fn default_max_gap_seconds() -> f64 {
    1.0
}

fn default_search_window() -> usize {
    10
}

fn default_backtrack() -> usize {
    2
}

fn default_primary_track() -> String {
    "primary".to_string()
}

fn default_secondary_track() -> String {
    "secondary".to_string()
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        self.alignment.validate().map_err(|e| anyhow!(e))?;

        if self.primary_track.trim().is_empty() || self.secondary_track.trim().is_empty() {
            return Err(anyhow!("Track labels must not be empty"));
        }

        Ok(())
    }
}

impl AlignmentConfig {
    /// Check the alignment knobs against their sane bounds; called before any
    /// cue is processed
    pub fn validate(&self) -> std::result::Result<(), crate::errors::AlignError> {
        use crate::errors::AlignError;

        if !self.max_gap_seconds.is_finite() {
            return Err(AlignError::InvalidConfiguration(format!(
                "max_gap_seconds must be finite, got {}",
                self.max_gap_seconds
            )));
        }
        if self.max_gap_seconds < 0.0 {
            return Err(AlignError::InvalidConfiguration(format!(
                "max_gap_seconds must be >= 0, got {}",
                self.max_gap_seconds
            )));
        }
        if self.search_window == 0 {
            return Err(AlignError::InvalidConfiguration(
                "search_window must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            strategy: Strategy::default(),
            alignment: AlignmentConfig::default(),
            output_format: OutputFormat::default(),
            primary_track: default_primary_track(),
            secondary_track: default_secondary_track(),
            log_level: LogLevel::default(),
        }
    }
}
