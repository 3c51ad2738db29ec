//! Configuration loading and parsing

use anyhow::{Context, Result};
use dbc_diff::DiffConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from a TOML file)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub diff: DiffConfig,
    #[serde(default)]
    pub baseline: BaselineConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    /// Directory holding the current DBC files
    #[serde(default = "default_current_dir")]
    pub current_dir: PathBuf,
    /// Directory holding the previous DBC files
    #[serde(default = "default_baseline_dir")]
    pub baseline_dir: PathBuf,
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            current_dir: default_current_dir(),
            baseline_dir: default_baseline_dir(),
            extension: default_extension(),
        }
    }
}

fn default_current_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_baseline_dir() -> PathBuf {
    PathBuf::from("./old")
}

fn default_extension() -> String {
    dbc_diff::batch::DEFAULT_EXTENSION.to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./reports")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Txt,
    #[default]
    Html,
    Json,
}

impl OutputFormat {
    /// File extension of the generated report
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Txt => "txt",
            OutputFormat::Html => "html",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BaselineConfig {
    /// Copy successfully compared files into the baseline directory
    #[serde(default = "default_true")]
    pub update: bool,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self { update: true }
    }
}

fn default_true() -> bool {
    true
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    config
        .diff
        .validate()
        .with_context(|| format!("Invalid [diff] section in {:?}", path))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [input]
            current_dir = "dbc"
            baseline_dir = "dbc/old"

            [output]
            format = "txt"

            [diff]
            ignore_signal_order = true
            ignored_fields = ["choices"]

            [baseline]
            update = false
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.input.current_dir, PathBuf::from("dbc"));
        assert_eq!(config.input.baseline_dir, PathBuf::from("dbc/old"));
        assert_eq!(config.input.extension, "dbc");
        assert_eq!(config.output.format, OutputFormat::Txt);
        assert_eq!(config.output.output_dir, PathBuf::from("./reports"));
        assert!(config.diff.ignore_signal_order);
        assert_eq!(config.diff.ignored_fields, vec!["choices"]);
        assert!(!config.baseline.update);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.input.current_dir, PathBuf::from("."));
        assert_eq!(config.input.baseline_dir, PathBuf::from("./old"));
        assert_eq!(config.output.format, OutputFormat::Html);
        assert!(!config.diff.ignore_signal_order);
        assert!(config.baseline.update);
    }

    #[test]
    fn test_load_config_rejects_unknown_field() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[diff]\nignored_fields = [\"colour\"]").unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("colour"));
    }
}
