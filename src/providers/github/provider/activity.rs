use log::{debug, warn};
use serde::Deserialize;

use super::core::GitHubProvider;
use crate::models::{Commit, Deployment, PullRequest};
use crate::providers::github::extract::{
    extract_commit_message, extract_stack, format_date, format_timestamp,
};

const PULL_REQUEST_LIMIT: usize = 10;
const COMMIT_LIMIT: usize = 5;
// Extra commits are requested so bot commits can be skipped
const COMMIT_PAGE_SIZE: usize = 15;
const DEPLOYMENT_LIMIT: usize = 3;

#[derive(Debug, Deserialize)]
pub struct PullRequestDto {
    pub title: String,
    pub html_url: String,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CommitDto {
    pub commit: CommitDetailDto,
    pub html_url: String,
}

#[derive(Debug, Deserialize)]
pub struct CommitDetailDto {
    pub message: String,
    #[serde(default)]
    pub author: Option<CommitAuthorDto>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CommitAuthorDto {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct DeploymentDto {
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub environment: String,
}

impl From<PullRequestDto> for PullRequest {
    fn from(dto: PullRequestDto) -> Self {
        Self {
            title: dto.title,
            link: dto.html_url,
            created_at: format_date(&dto.created_at),
        }
    }
}

impl From<DeploymentDto> for Deployment {
    fn from(dto: DeploymentDto) -> Self {
        let (environment, stack) = extract_stack(&dto.environment);
        Self {
            created_at: format_timestamp(&dto.created_at),
            environment,
            stack,
        }
    }
}

/// Keep the first human-authored commits, stopping as soon as enough are found.
pub fn collect_commits(records: Vec<CommitDto>, bot_author: &str) -> Vec<Commit> {
    records
        .into_iter()
        .filter_map(|record| {
            let author = record.commit.author.unwrap_or_default();
            if author.name == bot_author {
                return None;
            }

            Some(Commit {
                message: extract_commit_message(&record.commit.message),
                author: author.name,
                date: format_date(&author.date),
                link: record.html_url,
            })
        })
        .take(COMMIT_LIMIT)
        .collect()
}

impl GitHubProvider {
    pub async fn fetch_pull_requests(&self, repo: &str) -> Vec<PullRequest> {
        let path = format!("pulls?per_page={PULL_REQUEST_LIMIT}");
        match self.client.get_json::<Vec<PullRequestDto>>(repo, &path).await {
            Ok(records) => {
                let pull_requests: Vec<PullRequest> = records
                    .into_iter()
                    .take(PULL_REQUEST_LIMIT)
                    .map(PullRequest::from)
                    .collect();
                debug!("Fetched {} pull requests from {repo}", pull_requests.len());
                pull_requests
            }
            Err(e) => {
                warn!("Can't fetch pull requests for {repo}: {e}");
                Vec::new()
            }
        }
    }

    pub async fn fetch_commits(&self, repo: &str) -> Vec<Commit> {
        let path = format!("commits?per_page={COMMIT_PAGE_SIZE}");
        match self.client.get_json::<Vec<CommitDto>>(repo, &path).await {
            Ok(records) => collect_commits(records, &self.options.bot_author),
            Err(e) => {
                warn!("Can't fetch commits for {repo}: {e}");
                Vec::new()
            }
        }
    }

    /// `None` means the deployments could not be fetched at all.
    pub async fn fetch_deployments(&self, repo: &str) -> Option<Vec<Deployment>> {
        let path = format!("deployments?per_page={DEPLOYMENT_LIMIT}");
        match self.client.get_json::<Vec<DeploymentDto>>(repo, &path).await {
            Ok(records) => Some(
                records
                    .into_iter()
                    .take(DEPLOYMENT_LIMIT)
                    .map(Deployment::from)
                    .collect(),
            ),
            Err(e) => {
                warn!("Can't fetch deployments for {repo}: {e}");
                None
            }
        }
    }
}
