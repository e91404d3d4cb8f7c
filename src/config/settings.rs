use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}
fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}
fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}
fn default_timeout_secs() -> u64 {
    15
}
fn default_temperature() -> f64 {
    0.7
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Name of the environment variable holding the API key. The key itself
    /// never goes into config.toml.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelThreshold {
    pub min_points: u64,
    pub label: String,
}

fn default_levels() -> Vec<LevelThreshold> {
    [
        (0, "Beginner"),
        (10_000, "Striving"),
        (250_000, "Steadfast"),
        (2_500_000, "Devoted"),
        (25_000_000, "Foremost"),
    ]
    .into_iter()
    .map(|(min_points, label)| LevelThreshold {
        min_points,
        label: label.to_string(),
    })
    .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelsConfig {
    #[serde(default = "default_levels")]
    pub thresholds: Vec<LevelThreshold>,
}

impl Default for LevelsConfig {
    fn default() -> Self {
        Self {
            thresholds: default_levels(),
        }
    }
}

impl LevelsConfig {
    /// Label of the highest threshold reached. Thresholds may be listed in any
    /// order.
    pub fn label_for(&self, points: u64) -> String {
        self.thresholds
            .iter()
            .filter(|t| points >= t.min_points)
            .max_by_key(|t| t.min_points)
            .map(|t| t.label.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub levels: LevelsConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "hasanat")
            .context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn db_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("hasanat.db"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(&path).with_context(|| format!("Reading {:?}", path))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Parsing config.toml")
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}
