use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use log::info;

/// Counters for outbound API calls, shared by every in-flight request.
#[derive(Debug, Default)]
pub struct Stats {
    calls: AtomicU64,
    total_latency_nanos: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub calls: u64,
    pub average_latency: Duration,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_call(&self, duration: Duration) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        // Count first so a concurrent snapshot never sees latency without its call
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.total_latency_nanos.fetch_add(nanos, Ordering::Release);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let total = self.total_latency_nanos.load(Ordering::Acquire);
        let calls = self.calls.load(Ordering::Relaxed);

        let average_latency = if calls == 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos(total / calls)
        };

        StatsSnapshot {
            calls,
            average_latency,
        }
    }

    pub fn log_stats(&self) {
        let snapshot = self.snapshot();
        info!("Number of API calls: {}", snapshot.calls);
        info!("Average response time: {:?}", snapshot.average_latency);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_average_of_recorded_calls() {
        let stats = Stats::new();
        stats.record_call(Duration::from_millis(100));
        stats.record_call(Duration::from_millis(300));

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.calls, 2);
        assert_eq!(snapshot.average_latency, Duration::from_millis(200));
    }

    #[test]
    fn test_average_is_zero_without_calls() {
        let snapshot = Stats::new().snapshot();

        assert_eq!(snapshot.calls, 0);
        assert_eq!(snapshot.average_latency, Duration::ZERO);
    }

    #[test]
    fn test_zero_duration_calls_are_counted() {
        let stats = Stats::new();
        stats.record_call(Duration::ZERO);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.calls, 1);
        assert_eq!(snapshot.average_latency, Duration::ZERO);
    }

    #[test]
    fn test_concurrent_recording_loses_no_updates() {
        let stats = Arc::new(Stats::new());
        let threads = 16;
        let per_thread = 1_000;

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let stats = Arc::clone(&stats);
                std::thread::spawn(move || {
                    for _ in 0..per_thread {
                        stats.record_call(Duration::from_micros(10));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.calls, threads * per_thread);
        assert_eq!(snapshot.average_latency, Duration::from_micros(10));
    }

    #[test]
    fn test_snapshot_during_recording_never_overstates_latency() {
        let stats = Arc::new(Stats::new());
        let latency = Duration::from_millis(100);

        let writers: Vec<_> = (0..4)
            .map(|_| {
                let stats = Arc::clone(&stats);
                std::thread::spawn(move || {
                    for _ in 0..10_000 {
                        stats.record_call(latency);
                    }
                })
            })
            .collect();

        while writers.iter().any(|writer| !writer.is_finished()) {
            assert!(stats.snapshot().average_latency <= latency);
        }
        for writer in writers {
            writer.join().unwrap();
        }

        assert_eq!(stats.snapshot().average_latency, latency);
    }

    #[tokio::test]
    async fn test_concurrent_tasks_record_every_call() {
        let stats = Arc::new(Stats::new());

        let tasks: Vec<_> = (1..=50u64)
            .map(|i| {
                let stats = Arc::clone(&stats);
                tokio::spawn(async move { stats.record_call(Duration::from_millis(i)) })
            })
            .collect();
        futures::future::join_all(tasks).await;

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.calls, 50);
        // (1 + ... + 50) / 50 = 25.5ms
        assert_eq!(snapshot.average_latency, Duration::from_micros(25_500));
    }
}
