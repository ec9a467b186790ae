use std::collections::{HashMap, HashSet};

use futures::{stream, StreamExt};
use log::{info, warn};
use serde::Deserialize;

use super::core::{GitHubProvider, MissingRepoPolicy};
use crate::models::Repository;
use crate::providers::github::extract::{extract_team, format_date};

#[derive(Debug, Deserialize)]
pub struct RepositoryDto {
    pub name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub pushed_at: Option<String>,
    #[serde(default)]
    pub html_url: String,
}

impl From<RepositoryDto> for Repository {
    fn from(dto: RepositoryDto) -> Self {
        Self {
            team: extract_team(&dto.topics),
            pushed_at: format_date(dto.pushed_at.as_deref().unwrap_or_default()),
            name: dto.name,
            full_name: dto.full_name,
            description: dto.description.unwrap_or_default(),
            stars: dto.stargazers_count,
            topics: dto.topics,
            html_url: dto.html_url,
            ..Self::default()
        }
    }
}

/// Arrange fetched repositories in the order they were requested.
///
/// Names without a fetched repository are left out.
pub fn reorder_repositories(fetched: Vec<(String, Repository)>, names: &[String]) -> Vec<Repository> {
    let mut by_name: HashMap<String, Repository> = fetched.into_iter().collect();
    names.iter().filter_map(|name| by_name.remove(name)).collect()
}

impl GitHubProvider {
    pub async fn fetch_repository(&self, name: &str) -> Option<Repository> {
        match self.client.get_json::<RepositoryDto>(name, "").await {
            Ok(dto) => Some(Repository::from(dto)),
            Err(e) => {
                warn!("GitHub request failed for {name}: {e}");
                None
            }
        }
    }

    async fn fetch_one(&self, name: &str) -> Option<Repository> {
        let mut repo = match self.fetch_repository(name).await {
            Some(repo) => repo,
            None if self.options.missing_repo_policy == MissingRepoPolicy::Placeholder => {
                Repository {
                    name: name.to_string(),
                    ..Repository::default()
                }
            }
            None => return None,
        };

        let (pull_requests, commits, deployments) = tokio::join!(
            self.fetch_pull_requests(name),
            self.fetch_commits(name),
            self.fetch_deployments(name),
        );

        repo.pull_requests = pull_requests;
        repo.commits = commits;
        repo.deployments = deployments;
        repo.ci_link = format!("{}{}", self.options.ci_base_template, repo.name);

        Some(repo)
    }

    /// Fetch every named repository concurrently, up to the configured maximum,
    /// and return them in request order. Repeated names are fetched once.
    ///
    /// Repositories still in flight when the deadline passes are dropped.
    pub async fn fetch_top_repositories(&self, names: &[String]) -> Vec<Repository> {
        if names.is_empty() {
            info!("No repositories configured, nothing to fetch");
            return Vec::new();
        }

        let mut seen = HashSet::new();
        let names: Vec<String> = names
            .iter()
            .filter(|&name| seen.insert(name.as_str()))
            .cloned()
            .collect();

        let limit = self.options.max_repositories;
        if names.len() > limit {
            warn!(
                "{} repositories configured, only the first {limit} will be fetched",
                names.len()
            );
        }
        let launched = names.len().min(limit);

        let results: Vec<Option<(String, Repository)>> =
            stream::iter(names.iter().take(limit).cloned())
                .map(|name: String| async move {
                    self.fetch_one(&name).await.map(|repo| (name, repo))
                })
                .buffer_unordered(limit.max(1))
                .take_until(tokio::time::sleep(self.options.deadline))
                .collect()
                .await;

        if results.len() < launched {
            warn!(
                "Fetch deadline of {:?} reached, dropping {} unfinished repositories",
                self.options.deadline,
                launched - results.len()
            );
        }

        let fetched: Vec<(String, Repository)> = results.into_iter().flatten().collect();

        info!("Fetched {} of {launched} repositories", fetched.len());

        reorder_repositories(fetched, &names)
    }
}
