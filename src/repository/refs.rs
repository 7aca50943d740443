// file: src/repository/refs.rs
// description: Ref existence check against the hosting API, injectable for tests
// reference: https://docs.github.com/en/rest/branches/branches#get-a-branch

use crate::error::{CrawlError, Result};
use crate::repository::{Credentials, RepositoryLocator};
use crate::utils::http::endpoint;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use tracing::{debug, info};

/// Precondition check run before anything is listed, turning a silent empty
/// crawl into an explicit "branch not found".
#[async_trait]
pub trait RefVerifier: Send + Sync {
    async fn verify(
        &self,
        locator: &RepositoryLocator,
        credentials: Option<&Credentials>,
    ) -> Result<()>;
}

/// For hosts without a branch lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipRefCheck;

#[async_trait]
impl RefVerifier for SkipRefCheck {
    async fn verify(
        &self,
        locator: &RepositoryLocator,
        _credentials: Option<&Credentials>,
    ) -> Result<()> {
        debug!("Skipping ref check for {}", locator);
        Ok(())
    }
}

pub struct GitHubRefVerifier {
    client: Client,
    api_url: String,
}

impl GitHubRefVerifier {
    pub fn new(client: Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
        }
    }

    fn not_found(locator: &RepositoryLocator) -> CrawlError {
        CrawlError::RefNotFound {
            organization: locator.organization.clone(),
            repository: locator.repository.clone(),
            reference: locator.reference.clone(),
        }
    }
}

#[async_trait]
impl RefVerifier for GitHubRefVerifier {
    async fn verify(
        &self,
        locator: &RepositoryLocator,
        credentials: Option<&Credentials>,
    ) -> Result<()> {
        let url = endpoint(
            &self.api_url,
            [
                "repos",
                locator.organization.as_str(),
                locator.repository.as_str(),
                "branches",
            ]
            .into_iter()
            .chain(locator.reference.split('/')),
        )?;

        debug!("Checking branch at {}", url);

        let mut request = self.client.get(url);
        if let Some(credentials) = credentials {
            request = request.header(AUTHORIZATION, format!("token {}", credentials.token));
        }

        let response = request.send().await.map_err(|e| {
            debug!("Branch lookup failed: {}", e);
            Self::not_found(locator)
        })?;

        if !response.status().is_success() {
            debug!("Branch lookup returned status {}", response.status());
            return Err(Self::not_found(locator));
        }

        info!("Branch '{}' found in {}", locator.reference, locator.slug());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn locator(reference: &str) -> RepositoryLocator {
        RepositoryLocator::parse(&format!("octo/widgets:{}", reference)).unwrap()
    }

    #[tokio::test]
    async fn test_existing_branch_passes() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/repos/octo/widgets/branches/main")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name":"main"}"#)
            .create_async()
            .await;

        let verifier = GitHubRefVerifier::new(Client::new(), server.url());
        verifier.verify(&locator("main"), None).await.unwrap();
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_branch_is_ref_not_found() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/repos/octo/widgets/branches/gone")
            .with_status(404)
            .with_body(r#"{"message":"Branch not found"}"#)
            .create_async()
            .await;

        let verifier = GitHubRefVerifier::new(Client::new(), server.url());
        let err = verifier.verify(&locator("gone"), None).await.unwrap_err();
        match err {
            CrawlError::RefNotFound {
                organization,
                repository,
                reference,
            } => {
                assert_eq!(organization, "octo");
                assert_eq!(repository, "widgets");
                assert_eq!(reference, "gone");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_sends_token_header_and_slashed_ref() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/repos/octo/widgets/branches/feature/x")
            .match_header("authorization", "token ghp_abc")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let verifier = GitHubRefVerifier::new(Client::new(), server.url());
        let creds = Credentials::new("octo", "ghp_abc");
        verifier
            .verify(&locator("feature/x"), Some(&creds))
            .await
            .unwrap();
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_unreachable_host_is_ref_not_found() {
        let verifier = GitHubRefVerifier::new(Client::new(), "http://127.0.0.1:1");
        let err = verifier.verify(&locator("main"), None).await.unwrap_err();
        assert!(matches!(err, CrawlError::RefNotFound { .. }));
    }

    #[tokio::test]
    async fn test_skip_ref_check_is_noop() {
        SkipRefCheck.verify(&locator("anything"), None).await.unwrap();
    }
}
