use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Pipeline configuration, loaded from `~/.testforge/config.toml` by default.
///
/// CLI flags and environment variables override individual fields after
/// loading (see `CommonArgs::apply_overrides`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Page the scrape stage targets.
    pub target_url: String,
    /// Directory for generated artifacts.
    pub output_dir: PathBuf,
    /// LLM provider id (see `providers::PROVIDERS`).
    pub provider: String,
    /// Model override; the provider default is used when unset.
    pub model: Option<String>,
    /// Base URL override, required for the `custom` provider.
    pub base_url: Option<String>,
    /// Number of test cases requested from the model.
    pub case_count: usize,
    /// Sampling temperature for test-case synthesis.
    pub case_temperature: f64,
    /// Sampling temperature for script synthesis.
    pub script_temperature: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_url: "https://demoblaze.com".to_string(),
            output_dir: PathBuf::from("output"),
            provider: "google".to_string(),
            model: None,
            base_url: None,
            case_count: 5,
            case_temperature: 0.7,
            script_temperature: 0.3,
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults when the file
    /// does not exist.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p
        } else {
            let home_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            home_dir.join(".testforge").join("config.toml")
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Invalid config at {}", config_path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Stage 1 artifact: the element listing.
    pub fn elements_path(&self) -> PathBuf {
        self.output_dir.join("elements.json")
    }

    /// Stage 2 artifact: the test-case table.
    pub fn test_cases_path(&self) -> PathBuf {
        self.output_dir.join("test_cases.csv")
    }

    /// Stage 3 artifact: the generated-script table.
    pub fn scripts_path(&self) -> PathBuf {
        self.output_dir.join("test_scripts.csv")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_pipeline_layout() {
        let config = Config::default();
        assert_eq!(config.provider, "google");
        assert_eq!(config.case_count, 5);
        assert_eq!(config.elements_path(), PathBuf::from("output/elements.json"));
        assert_eq!(
            config.test_cases_path(),
            PathBuf::from("output/test_cases.csv")
        );
        assert_eq!(
            config.scripts_path(),
            PathBuf::from("output/test_scripts.csv")
        );
    }

    #[test]
    fn toml_round_trip() {
        let mut config = Config::default();
        config.target_url = "https://example.org".to_string();
        config.model = Some("gemini-2.5-pro".to_string());
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.target_url, "https://example.org");
        assert_eq!(parsed.model.as_deref(), Some("gemini-2.5-pro"));
        assert_eq!(parsed.case_count, 5);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let parsed: Config = toml::from_str("provider = \"openai\"").unwrap();
        assert_eq!(parsed.provider, "openai");
        assert_eq!(parsed.target_url, "https://demoblaze.com");
        assert!((parsed.case_temperature - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.case_count = 8;
        config.save(&path).unwrap();

        let loaded = Config::load(Some(path)).unwrap();
        assert_eq!(loaded.case_count, 8);
    }
}
