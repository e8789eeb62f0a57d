use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use fgd_common::FgdError;
use serde::{Deserialize, Serialize};

/// Log output style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, colored when attached to a terminal
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// FGD generator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding `base/`, `entities/` and `sentences.json`
    pub source_dir: PathBuf,

    /// Root of the generated tree; one sub-directory per language
    pub output_dir: PathBuf,

    /// File name stem, the dialect is appended
    pub file_prefix: String,

    /// Log level, overridden by `RUST_LOG`
    pub log_level: String,

    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            output_dir: PathBuf::from("../../assets/tools/FGD"),
            file_prefix: "halflife-unified".to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

/// CLI arguments
#[derive(Parser, Debug, Default)]
#[command(name = "fgd_generator")]
#[command(about = "Generate Hammer and J.A.C.K. FGD files from JSON class definitions")]
pub struct Cli {
    /// Configuration file path (TOML or JSON)
    #[arg(short, long, env = "FGD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Source definitions directory
    #[arg(long, env = "FGD_SOURCE_DIR")]
    pub source_dir: Option<PathBuf>,

    /// Output directory
    #[arg(long, env = "FGD_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output file name prefix
    #[arg(long, env = "FGD_FILE_PREFIX")]
    pub file_prefix: Option<String>,

    /// Log level
    #[arg(long, env = "FGD_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Log format
    #[arg(long, value_enum, env = "FGD_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,
}

impl Config {
    /// Load configuration from environment, CLI args, and optional config file
    pub fn from_env() -> Result<Self> {
        Self::from_cli(Cli::parse())
    }

    pub fn from_cli(cli: Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load_file(path)?,
            None => Self::default(),
        };

        // Override with CLI args
        if let Some(source_dir) = cli.source_dir {
            config.source_dir = source_dir;
        }
        if let Some(output_dir) = cli.output_dir {
            config.output_dir = output_dir;
        }
        if let Some(file_prefix) = cli.file_prefix {
            config.file_prefix = file_prefix;
        }
        if let Some(log_level) = cli.log_level {
            config.log_level = log_level;
        }
        if let Some(log_format) = cli.log_format {
            config.log_format = log_format;
        }

        config.validate()?;

        Ok(config)
    }

    /// Read a config file. Fields it leaves out keep their defaults.
    pub fn load_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let parsed: Result<Config, String> = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::from_str(&config_str).map_err(|e| e.to_string()),
            _ => toml::from_str(&config_str).map_err(|e| e.to_string()),
        };

        parsed
            .map_err(|e| FgdError::Config(format!("{}: {}", path.display(), e)))
            .context("Failed to parse config file")
    }

    pub fn validate(&self) -> Result<()> {
        if self.file_prefix.is_empty() {
            return Err(FgdError::Config("file_prefix must not be empty".into()).into());
        }

        if self.file_prefix.contains(['/', '\\']) {
            return Err(FgdError::Config(format!(
                "file_prefix \"{}\" must not contain path separators",
                self.file_prefix
            ))
            .into());
        }

        if self.log_level.trim().is_empty() {
            return Err(FgdError::Config("log_level must not be empty".into()).into());
        }

        Ok(())
    }
}
