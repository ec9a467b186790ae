use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::models::Repository;
use crate::stats::StatsSnapshot;

/// One complete refresh result, swapped into the cache as a unit.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub repositories: Vec<Repository>,
    pub stats: StatsSnapshot,
    /// `None` until the first refresh has completed.
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn new(repositories: Vec<Repository>, stats: StatsSnapshot) -> Self {
        Self {
            repositories,
            stats,
            refreshed_at: Some(Utc::now()),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.refreshed_at.is_some()
    }
}

#[derive(Debug, Default)]
pub struct DashboardCache {
    current: RwLock<Arc<Snapshot>>,
}

impl DashboardCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self) -> Arc<Snapshot> {
        Arc::clone(&*self.current.read().await)
    }

    pub async fn replace(&self, snapshot: Snapshot) {
        *self.current.write().await = Arc::new(snapshot);
    }
}
