/// A repository as shown on the dashboard, with its recent activity attached.
#[derive(Debug, Clone, Default)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    pub description: String,
    pub stars: u64,
    pub topics: Vec<String>,
    /// Last push, already formatted for display (e.g. "Jun 15").
    pub pushed_at: String,
    pub html_url: String,
    pub team: String,
    pub ci_link: String,
    pub pull_requests: Vec<PullRequest>,
    pub commits: Vec<Commit>,
    /// `None` when the deployments could not be fetched, as opposed to a
    /// repository that simply has none.
    pub deployments: Option<Vec<Deployment>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub title: String,
    pub link: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub message: String,
    pub author: String,
    pub date: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub created_at: String,
    pub environment: String,
    pub stack: String,
}
