// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{CrawlError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub github: GitHubConfig,
    pub crawl: CrawlConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubConfig {
    pub api_url: String,
    pub raw_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub verify_ref: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CrawlConfig {
    pub show_progress: bool,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("REPO_CRAWLER")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| CrawlError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| CrawlError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            github: GitHubConfig {
                api_url: "https://api.github.com".to_string(),
                raw_url: "https://raw.githubusercontent.com".to_string(),
                user_agent: concat!("repo-crawler/", env!("CARGO_PKG_VERSION")).to_string(),
                timeout_secs: 30,
                verify_ref: true,
            },
            crawl: CrawlConfig {
                show_progress: true,
            },
        }
    }

    fn validate(&self) -> Result<()> {
        if self.github.timeout_secs == 0 {
            return Err(CrawlError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        for (name, url) in [
            ("api_url", &self.github.api_url),
            ("raw_url", &self.github.raw_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(CrawlError::Config(format!(
                    "{} must be an http(s) URL, got '{}'",
                    name, url
                )));
            }
        }

        if self.github.user_agent.trim().is_empty() {
            return Err(CrawlError::Config("user_agent must not be empty".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default_config();
        assert!(config.validate().is_ok());
        assert!(config.github.verify_ref);
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("crawler.toml");
        fs::write(
            &path,
            r#"
[github]
api_url = "http://localhost:9000"
raw_url = "http://localhost:9001"
user_agent = "test-agent"
timeout_secs = 5
verify_ref = false

[crawl]
show_progress = false
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.github.api_url, "http://localhost:9000");
        assert!(!config.github.verify_ref);
        assert!(!config.crawl.show_progress);
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let mut config = Config::default_config();
        config.github.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(CrawlError::Config(_))));
    }

    #[test]
    fn test_rejects_non_http_url() {
        let mut config = Config::default_config();
        config.github.raw_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }
}
