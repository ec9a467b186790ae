use std::time::Duration;

use clap::ValueEnum;

use crate::providers::github::client::GitHubClient;

pub const MAX_REPOSITORIES: usize = 10;

/// What to show for a repository whose metadata could not be fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum MissingRepoPolicy {
    /// Leave the repository out of the dashboard.
    #[default]
    Skip,
    /// Keep an entry named after the request, with whatever activity could be fetched.
    Placeholder,
}

#[derive(Debug, Clone)]
pub struct ProviderOptions {
    pub ci_base_template: String,
    pub bot_author: String,
    pub missing_repo_policy: MissingRepoPolicy,
    pub max_repositories: usize,
    pub deadline: Duration,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            ci_base_template: String::new(),
            bot_author: String::new(),
            missing_repo_policy: MissingRepoPolicy::default(),
            max_repositories: MAX_REPOSITORIES,
            deadline: Duration::from_secs(60),
        }
    }
}

pub struct GitHubProvider {
    pub client: GitHubClient,
    pub options: ProviderOptions,
}

impl GitHubProvider {
    pub fn new(client: GitHubClient, options: ProviderOptions) -> Self {
        Self { client, options }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use std::time::Duration;

    use super::{GitHubProvider, ProviderOptions};
    use crate::auth::Token;
    use crate::providers::github::client::GitHubClient;
    use crate::stats::Stats;

    pub fn test_provider(base_url: &str, options: ProviderOptions) -> GitHubProvider {
        let client = GitHubClient::new(
            base_url,
            "acme",
            Some(Token::from("test-token")),
            Duration::from_secs(5),
            Arc::new(Stats::new()),
        )
        .unwrap();

        GitHubProvider::new(client, options)
    }

    pub fn bot_options() -> ProviderOptions {
        ProviderOptions {
            bot_author: "AcmeBot".to_string(),
            ci_base_template: "https://ci.example.com/job/".to_string(),
            ..ProviderOptions::default()
        }
    }
}
