mod client;
mod extract;
mod provider;

use async_trait::async_trait;

use crate::models::Repository;
use crate::providers::Provider;
use crate::stats::StatsSnapshot;

pub use client::GitHubClient;
pub use provider::{GitHubProvider, MissingRepoPolicy, ProviderOptions};

#[async_trait]
impl Provider for GitHubProvider {
    async fn top_repositories(&self, names: &[String]) -> Vec<Repository> {
        let repositories = self.fetch_top_repositories(names).await;
        self.client.stats().log_stats();
        repositories
    }

    fn stats(&self) -> StatsSnapshot {
        self.client.stats().snapshot()
    }
}
