use std::sync::Arc;
use std::time::{Duration, Instant};

use log::info;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::cache::{DashboardCache, Snapshot};
use crate::providers::Provider;

/// Background task filling the dashboard cache.
pub struct Refresher {
    provider: Arc<dyn Provider + Send + Sync>,
    cache: Arc<DashboardCache>,
    names: Vec<String>,
    interval: Option<Duration>,
}

impl Refresher {
    pub fn new(
        provider: Arc<dyn Provider + Send + Sync>,
        cache: Arc<DashboardCache>,
        names: Vec<String>,
        interval: Option<Duration>,
    ) -> Self {
        Self {
            provider,
            cache,
            names,
            interval,
        }
    }

    pub async fn refresh_once(&self) {
        let start = Instant::now();

        let repositories = self.provider.top_repositories(&self.names).await;
        let stats = self.provider.stats();
        let count = repositories.len();
        self.cache.replace(Snapshot::new(repositories, stats)).await;

        info!("Refresh of {count} repositories took {:?}", start.elapsed());
    }

    /// Runs once, or forever at the configured interval.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let Some(period) = self.interval else {
                self.refresh_once().await;
                return;
            };

            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                self.refresh_once().await;
            }
        })
    }
}
