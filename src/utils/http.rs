// file: src/utils/http.rs
// description: Shared reqwest client construction and endpoint building
// reference: https://docs.rs/reqwest

use crate::config::GitHubConfig;
use crate::error::{CrawlError, Result};
use reqwest::{Client, Url};
use std::time::Duration;

pub fn http_client(config: &GitHubConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Appends path segments to `base`, percent-encoding each one.
pub fn endpoint<'a>(base: &str, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| CrawlError::Config(format!("Invalid base URL '{}': {}", base, e)))?;

    url.path_segments_mut()
        .map_err(|_| CrawlError::Config(format!("Base URL '{}' cannot take a path", base)))?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}

/// Pulls the `message` field out of a GitHub error body, falling back to the raw text.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_appends_segments() {
        let url = endpoint("https://api.github.com/", ["repos", "org", "repo"]).unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/repos/org/repo");
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let url = endpoint("http://localhost:1234", ["docs", "read me.md"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:1234/docs/read%20me.md");
    }

    #[test]
    fn test_endpoint_rejects_garbage_base() {
        assert!(endpoint("not a url", ["x"]).is_err());
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"message":"Not Found","documentation_url":"x"}"#),
            "Not Found"
        );
        assert_eq!(error_message("  plain text \n"), "plain text");
    }
}
