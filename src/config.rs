//! Dashboard configuration.
//!
//! Loaded from TOML with every field defaulted, then overridden from
//! `MC_DASHBOARD_*` environment variables.

use crate::aggregator::{SamplingStrategy, DEFAULT_SAMPLE_CAP};
use crate::controller::SamplingOptions;
use crate::error::{DashboardError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            base_url: "http://127.0.0.1:5000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SamplingConfig {
    /// Maximum number of individual trajectories drawn.
    pub cap: usize,
    pub strategy: SamplingStrategy,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        SamplingConfig {
            cap: DEFAULT_SAMPLE_CAP,
            strategy: SamplingStrategy::Leading,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            dir: PathBuf::from("output"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub log_level: String,
    pub server: ServerConfig,
    pub sampling: SamplingConfig,
    pub output: OutputConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            log_level: "info".to_string(),
            server: ServerConfig::default(),
            sampling: SamplingConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl DashboardConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| DashboardError::config(e.to_string()))
    }

    /// Load `path` if given, otherwise start from defaults; then apply
    /// environment overrides and validate.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(p) => Self::load(p)?,
            None => Self::default(),
        };
        let config = config.with_env_override()?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_env_override(mut self) -> Result<Self> {
        if let Ok(url) = std::env::var("MC_DASHBOARD_SERVER_URL") {
            self.server.base_url = url;
        }
        if let Ok(cap) = std::env::var("MC_DASHBOARD_SAMPLE_CAP") {
            self.sampling.cap = cap
                .parse()
                .map_err(|_| DashboardError::config(format!("invalid MC_DASHBOARD_SAMPLE_CAP '{}'", cap)))?;
        }
        if let Ok(dir) = std::env::var("MC_DASHBOARD_OUTPUT_DIR") {
            self.output.dir = PathBuf::from(dir);
        }
        if let Ok(level) = std::env::var("MC_DASHBOARD_LOG_LEVEL") {
            self.log_level = level;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "invalid log_level '{}', expected one of {:?}",
                self.log_level, LOG_LEVELS
            ));
        }
        if !self.server.base_url.starts_with("http://") && !self.server.base_url.starts_with("https://") {
            errors.push(format!(
                "invalid server.base_url '{}', must start with http:// or https://",
                self.server.base_url
            ));
        }
        if self.sampling.cap == 0 {
            errors.push("sampling.cap must be greater than 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(DashboardError::config(errors.join("; ")))
        }
    }

    pub fn sampling_options(&self) -> SamplingOptions {
        SamplingOptions {
            cap: self.sampling.cap,
            strategy: self.sampling.strategy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = DashboardConfig::from_toml("").unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.sampling.cap, 20);
        assert_eq!(config.sampling.strategy, SamplingStrategy::Leading);
        assert_eq!(config.server.base_url, "http://127.0.0.1:5000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_sections() {
        let config = DashboardConfig::from_toml(
            r#"
            log_level = "debug"

            [sampling]
            strategy = "stride"
            "#,
        )
        .unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.sampling.cap, 20);
        assert_eq!(config.sampling.strategy, SamplingStrategy::Stride);
        assert_eq!(config.output.dir, PathBuf::from("output"));
    }

    #[test]
    fn test_validate_collects_every_problem() {
        let mut config = DashboardConfig::from_toml("").unwrap();
        config.log_level = "loud".into();
        config.server.base_url = "ftp://example".into();
        config.sampling.cap = 0;

        let msg = config.validate().unwrap_err().to_string();
        assert!(msg.contains("log_level"));
        assert!(msg.contains("base_url"));
        assert!(msg.contains("sampling.cap"));
    }

    #[test]
    fn test_unknown_strategy_is_rejected() {
        let err = DashboardConfig::from_toml("[sampling]\nstrategy = \"random\"").unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)));
    }
}
