use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use log::{info, warn};

use crate::auth::Token;
use crate::dashboard::{DashboardCache, DashboardServer, Refresher};
use crate::providers::github::{GitHubClient, GitHubProvider, MissingRepoPolicy, ProviderOptions};
use crate::stats::Stats;

#[derive(Parser)]
#[command(name = "repo-dashboard")]
#[command(author, version, about = "Dashboard of recent GitHub repository activity", long_about = None)]
pub struct Cli {
    /// Comma separated repository names, shown in this order
    #[arg(long, env = "TOP_PROJECTS", default_value = "")]
    top_projects: String,

    /// GitHub API token
    #[arg(short, long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Prefix joined with each repository name to build its CI link
    #[arg(long, env = "CI_BASE_TEMPLATE", default_value = "")]
    ci_base_template: String,

    /// Port the dashboard listens on
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    api_url: String,

    /// Organization owning the repositories
    #[arg(long, env = "GITHUB_OWNER", default_value = "Glovo")]
    owner: String,

    /// Commit author whose commits are hidden
    #[arg(long, env = "BOT_AUTHOR", default_value = "GlovoRobot")]
    bot_author: String,

    /// Timeout for a single API request, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 10)]
    request_timeout_secs: u64,

    /// Time allowed for fetching all repositories, in seconds
    #[arg(long, env = "FETCH_DEADLINE_SECS", default_value_t = 60)]
    fetch_deadline_secs: u64,

    /// Refetch every N seconds (fetch once when unset)
    #[arg(long, env = "REFRESH_INTERVAL_SECS")]
    refresh_interval_secs: Option<u64>,

    /// How to show a repository whose metadata could not be fetched
    #[arg(long, env = "MISSING_REPO_POLICY", value_enum, default_value_t = MissingRepoPolicy::Skip)]
    missing_repo_policy: MissingRepoPolicy,

    /// Directory served under /static/
    #[arg(long, env = "STATIC_DIR", default_value = "./static")]
    static_dir: PathBuf,
}

impl Cli {
    pub fn repository_names(&self) -> Vec<String> {
        parse_repository_names(&self.top_projects)
    }

    fn provider_options(&self) -> ProviderOptions {
        ProviderOptions {
            ci_base_template: self.ci_base_template.clone(),
            bot_author: self.bot_author.clone(),
            missing_repo_policy: self.missing_repo_policy,
            deadline: Duration::from_secs(self.fetch_deadline_secs),
            ..ProviderOptions::default()
        }
    }

    pub async fn execute(&self) -> Result<()> {
        let start = Instant::now();

        let token = Token::from_config(self.token.as_deref());
        if token.is_none() {
            warn!("GITHUB_TOKEN is not set, requests are unauthenticated and rate limited");
        }
        let client = GitHubClient::new(
            &self.api_url,
            &self.owner,
            token,
            Duration::from_secs(self.request_timeout_secs),
            Arc::new(Stats::new()),
        )?;
        let provider = Arc::new(GitHubProvider::new(client, self.provider_options()));

        let names = self.repository_names();
        info!("Tracking {} repositories: {}", names.len(), names.join(", "));

        let cache = Arc::new(DashboardCache::new());
        let interval = self
            .refresh_interval_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        Refresher::new(provider, Arc::clone(&cache), names, interval).spawn();

        let server = DashboardServer::new(cache, self.static_dir.clone());
        info!("Server started in {:?}, listening on port {}", start.elapsed(), self.port);
        server.run(&format!("0.0.0.0:{}", self.port)).await?;

        Ok(())
    }
}

fn parse_repository_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
        .collect()
}
