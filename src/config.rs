use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the poker recap pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Summary document ingestion settings
    pub input: InputConfig,

    /// YouTube Data API settings
    pub youtube: YouTubeConfig,

    /// Report output settings
    pub report: ReportConfig,

    /// Git publishing settings
    pub publish: PublishConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Directory holding per-video summary JSON files
    pub summaries_dir: PathBuf,

    /// Path of the processed-state sidecar written after each run
    pub state_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouTubeConfig {
    /// API key for the Data API
    pub api_key: String,

    /// `videos.list` endpoint
    pub api_endpoint: String,

    /// Maximum attempts per video before it is dropped from the report
    pub max_retries: u32,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Where the rendered HTML lands
    pub output_path: PathBuf,

    /// Page title of the report
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Disable to keep the report local
    pub enabled: bool,

    /// Local checkout of the publishing repository
    pub repo_dir: PathBuf,

    /// Path of the report inside the repository
    pub target_path: String,

    /// Remote and branch to push to
    pub remote: String,
    pub branch: String,
}

impl Config {
    /// Load configuration from file, falling back to environment variables
    pub fn load() -> Result<Self> {
        let config_paths = [
            "poker-recap.toml",
            "config/poker-recap.toml",
            "~/.config/poker-recap/config.toml",
        ];

        for path in &config_paths {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str(&config_str) {
                    Ok(config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path);
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        Self::from_env()
    }

    /// Load configuration from environment variables over defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("POKER_RECAP_SUMMARIES_DIR") {
            config.input.summaries_dir = PathBuf::from(dir);
        }

        if let Ok(api_key) = std::env::var("YOUTUBE_API_KEY") {
            config.youtube.api_key = api_key;
        }

        if let Ok(output) = std::env::var("POKER_RECAP_OUTPUT_PATH") {
            config.report.output_path = PathBuf::from(output);
        }

        if let Ok(repo) = std::env::var("POKER_RECAP_PUBLISH_REPO") {
            config.publish.repo_dir = PathBuf::from(repo);
            config.publish.enabled = true;
        }

        Ok(config)
    }

    /// Validate configuration before running the pipeline
    pub fn validate(&self) -> Result<()> {
        if !self.input.summaries_dir.exists() {
            return Err(anyhow!(
                "Summaries directory does not exist: {}",
                self.input.summaries_dir.display()
            ));
        }

        if self.youtube.api_key.is_empty() {
            return Err(anyhow!("YouTube API key is not configured"));
        }

        if self.youtube.max_retries == 0 {
            return Err(anyhow!("max_retries must be greater than 0"));
        }

        if self.publish.enabled && !self.publish.repo_dir.exists() {
            return Err(anyhow!(
                "Publish repository checkout does not exist: {}",
                self.publish.repo_dir.display()
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: InputConfig {
                summaries_dir: PathBuf::from("./data/summaries"),
                state_path: PathBuf::from("./data/processed_report_state.json"),
            },
            youtube: YouTubeConfig {
                api_key: String::new(),
                api_endpoint: "https://www.googleapis.com/youtube/v3/videos".to_string(),
                max_retries: 5,
                timeout_seconds: 60,
            },
            report: ReportConfig {
                output_path: PathBuf::from("./output/poker_recap.html"),
                title: "Poker Tournament Recaps".to_string(),
            },
            publish: PublishConfig {
                enabled: false,
                repo_dir: PathBuf::from("./publish-repo"),
                target_path: "index.html".to_string(),
                remote: "origin".to_string(),
                branch: "main".to_string(),
            },
        }
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_summaries_dir(mut self, dir: PathBuf) -> Self {
        self.config.input.summaries_dir = dir;
        self
    }

    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.config.youtube.api_key = api_key;
        self
    }

    pub fn with_output_path(mut self, path: PathBuf) -> Self {
        self.config.report.output_path = path;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.config.youtube.max_retries = retries;
        self
    }

    pub fn enable_publish(mut self, enable: bool) -> Self {
        self.config.publish.enabled = enable;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.youtube.max_retries, 5);
        assert!(!config.publish.enabled);
        assert_eq!(config.publish.target_path, "index.html");
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .with_api_key("key123".to_string())
            .with_max_retries(2)
            .enable_publish(true)
            .build();

        assert_eq!(config.youtube.api_key, "key123");
        assert_eq!(config.youtube.max_retries, 2);
        assert!(config.publish.enabled);
    }

    #[test]
    fn test_validation_requires_api_key() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = ConfigBuilder::new()
            .with_summaries_dir(dir.path().to_path_buf())
            .build();
        assert!(config.validate().is_err());

        config.youtube.api_key = "key".to_string();
        assert!(config.validate().is_ok());
    }
}
