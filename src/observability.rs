//! Logging setup and run counters

use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber, honouring `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Counters for one dispatcher run
#[derive(Debug, Default)]
pub struct Metrics {
    batches: AtomicU64,
    songs_dispatched: AtomicU64,
    songs_succeeded: AtomicU64,
    songs_failed: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batch_started(&self) {
        self.batches.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "batches", "Metric incremented");
    }

    pub fn song_dispatched(&self) {
        self.songs_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn song_succeeded(&self) {
        self.songs_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn song_failed(&self) {
        self.songs_failed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "songs_failed", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            batches: self.batches.load(Ordering::Relaxed),
            songs_dispatched: self.songs_dispatched.load(Ordering::Relaxed),
            songs_succeeded: self.songs_succeeded.load(Ordering::Relaxed),
            songs_failed: self.songs_failed.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub batches: u64,
    pub songs_dispatched: u64,
    pub songs_succeeded: u64,
    pub songs_failed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_counts() {
        let metrics = Metrics::new();
        metrics.batch_started();
        metrics.song_dispatched();
        metrics.song_dispatched();
        metrics.song_succeeded();
        metrics.song_failed();

        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                batches: 1,
                songs_dispatched: 2,
                songs_succeeded: 1,
                songs_failed: 1,
            }
        );
    }
}
