pub mod github;

use async_trait::async_trait;

use crate::models::Repository;
use crate::stats::StatsSnapshot;

#[async_trait]
pub trait Provider {
    /// Repositories for `names`, in the same order, without the ones that failed.
    async fn top_repositories(&self, names: &[String]) -> Vec<Repository>;

    fn stats(&self) -> StatsSnapshot;
}
