use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::Token;
use crate::error::{DashboardError, Result};
use crate::stats::Stats;

pub struct GitHubClient {
    client: Client,
    repos_url: Url,
    token: Option<Token>,
    stats: Arc<Stats>,
}

impl GitHubClient {
    pub fn new(
        base_url: &str,
        owner: &str,
        token: Option<Token>,
        timeout: Duration,
        stats: Arc<Stats>,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("repo-dashboard/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| DashboardError::Config(format!("Failed to create HTTP client: {e}")))?;

        let repos_url = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))
            .map_err(|e| DashboardError::Config(format!("Invalid base URL: {e}")))?
            .join(&format!("repos/{}/", urlencoding::encode(owner)))
            .map_err(|e| DashboardError::Config(format!("Invalid owner URL: {e}")))?;

        Ok(Self {
            client,
            repos_url,
            token,
            stats,
        })
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    fn auth_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(token) = &self.token {
            request.bearer_auth(token.as_str())
        } else {
            request
        }
    }

    /// `{api}/repos/{owner}/{repo}`, followed by `/{sub_path}` when one is given.
    fn repo_url(&self, repo: &str, sub_path: &str) -> Result<Url> {
        let repo = urlencoding::encode(repo);
        let path = if sub_path.is_empty() {
            repo.into_owned()
        } else {
            format!("{repo}/{sub_path}")
        };

        self.repos_url
            .join(&path)
            .map_err(|e| DashboardError::Config(format!("Invalid repository URL: {e}")))
    }

    /// Issue a single GET against a repository resource.
    ///
    /// Anything but `200 OK` is an error. Latency is recorded only for
    /// successful calls.
    pub async fn request(&self, repo: &str, sub_path: &str) -> Result<Response> {
        let url = self.repo_url(repo, sub_path)?;
        let request = self
            .client
            .get(url.clone())
            .header(header::ACCEPT, "application/vnd.github+json");
        let request = self.auth_request(request);

        let start = Instant::now();
        let response = request.send().await?;
        let elapsed = start.elapsed();

        if response.status() != StatusCode::OK {
            return Err(DashboardError::Status {
                status: response.status(),
                url: url.to_string(),
            });
        }

        self.stats.record_call(elapsed);

        Ok(response)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, repo: &str, sub_path: &str) -> Result<T> {
        let response = self.request(repo, sub_path).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
