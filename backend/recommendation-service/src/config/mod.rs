use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::PathBuf;

use crate::services::EngineConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // HTTP server config
    pub http_host: String,
    pub http_port: u16,

    // Artifacts
    pub scores_path: PathBuf,
    pub metadata_path: PathBuf,

    // Retrieval
    pub default_k: usize,
    pub max_k: usize,
    pub placeholder_title: String,

    pub app_env: String,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .set_default("http_host", "0.0.0.0")?
            .set_default("http_port", 5000)?
            .set_default("scores_path", "./data/pred_df.json")?
            .set_default("metadata_path", "./data/movie_map.json")?
            .set_default("default_k", 5)?
            .set_default("max_k", 50)?
            .set_default("placeholder_title", "Unknown title")?
            .set_default("app_env", "development")?
            .add_source(config::Environment::default())
            .build()?;

        config.try_deserialize()
    }

    pub fn validate(&self) -> Result<()> {
        if self.http_port == 0 {
            return Err(anyhow!("HTTP port must be greater than 0"));
        }

        if self.scores_path.as_os_str().is_empty() {
            return Err(anyhow!("Score artifact path is required"));
        }

        if self.metadata_path.as_os_str().is_empty() {
            return Err(anyhow!("Metadata artifact path is required"));
        }

        if self.max_k == 0 {
            return Err(anyhow!("max_k must be greater than 0"));
        }

        if self.default_k == 0 || self.default_k > self.max_k {
            return Err(anyhow!(
                "default_k must be between 1 and max_k ({})",
                self.max_k
            ));
        }

        if self.placeholder_title.trim().is_empty() {
            return Err(anyhow!("Placeholder title must not be empty"));
        }

        Ok(())
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            max_k: self.max_k,
            placeholder_title: self.placeholder_title.clone(),
        }
    }
}
