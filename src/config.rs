use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Optional config file looked up in the working directory.
pub const CONFIG_FILE: &str = "food-impact.json";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Startup settings. Every field has a default, so the file may set any subset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// CSV loaded at startup.
    pub data_path: PathBuf,
    /// Initial window size in points.
    pub window_size: [f32; 2],
    /// Repository link shown under the title.
    pub source_url: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("Food_Production.csv"),
            window_size: [1280.0, 900.0],
            source_url:
                "https://github.com/iamjustkay/Environment_Impact_of_Food_Production_Analysis"
                    .to_string(),
        }
    }
}

impl DashboardConfig {
    /// Read [`CONFIG_FILE`] if it exists, otherwise use defaults.
    pub fn load() -> Result<Self> {
        let path = Path::new(CONFIG_FILE);
        if !path.exists() {
            log::debug!("No {CONFIG_FILE}, using defaults");
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: DashboardConfig = serde_json::from_str(text).context("parsing JSON")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = DashboardConfig::from_json(r#"{ "data_path": "data/food.csv" }"#).unwrap();
        assert_eq!(config.data_path, PathBuf::from("data/food.csv"));
        assert_eq!(config.window_size, DashboardConfig::default().window_size);
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(DashboardConfig::from_json("{ data_path: ").is_err());
    }
}
