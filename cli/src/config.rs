use anyhow::{Context, Result};
use clap::ValueEnum;
use search_clause::{AlarmLogField, DEFAULT_FIELD};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Field for query terms without a `field:` prefix
    #[serde(default = "default_field")]
    pub default_field: String,
    #[serde(default)]
    pub output: OutputFormat,
    /// Known index fields, used to warn about typos
    #[serde(default = "default_fields")]
    pub fields: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_field: default_field(),
            output: OutputFormat::default(),
            fields: default_fields(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads `explicit` if given, which must exist. Otherwise the default
    /// config path is used when the file is present.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => {
                log::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn is_known_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sclause").join("config.toml"))
}

fn default_field() -> String {
    DEFAULT_FIELD.to_string()
}

fn default_fields() -> Vec<String> {
    AlarmLogField::names()
}
