use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OunceProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RateProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub ounce: Option<OunceProviderConfig>,
    pub rate: Option<RateProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            ounce: Some(OunceProviderConfig {
                base_url: "https://sa.investing.com".to_string(),
            }),
            rate: Some(RateProviderConfig {
                base_url: "https://gold-price-live.com".to_string(),
            }),
        }
    }
}

fn default_currency() -> String {
    "EGP".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Display label for amounts; valuations are denominated in it.
    #[serde(default = "default_currency")]
    pub currency: String,
    pub data_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            currency: default_currency(),
            data_path: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config file found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "hosams", "dahab")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("io", "hosams", "dahab")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
providers:
  ounce:
    base_url: "http://example.com/ounce"
  rate:
    base_url: "http://example.com/rate"
currency: "EGP"
data_path: "/tmp/dahab-data"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(
            config.providers.ounce.unwrap().base_url,
            "http://example.com/ounce"
        );
        assert_eq!(
            config.providers.rate.unwrap().base_url,
            "http://example.com/rate"
        );
        assert_eq!(config.currency, "EGP");
        assert_eq!(config.data_path.as_deref(), Some("/tmp/dahab-data"));
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = serde_yaml::from_str("data_path: null").expect("Failed to deserialize");
        assert_eq!(config.currency, "EGP");
        assert_eq!(
            config.providers.ounce.unwrap().base_url,
            "https://sa.investing.com"
        );
        assert_eq!(
            config.providers.rate.unwrap().base_url,
            "https://gold-price-live.com"
        );
        assert!(config.data_path.is_none());
    }
}
