use super::input::SongList;
use crate::config::DispatchConfig;
use crate::metadata::{FilterMode, SongQuery};
use crate::observability::{Metrics, MetricsSnapshot};
use crate::worker::SongJob;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::io::AsyncBufRead;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinSet;
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Failed to create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Song queue closed unexpectedly")]
    QueueClosed,
}

/// Totals for a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub batches: u64,
    pub dispatched: u64,
    pub succeeded: u64,
    pub failed: u64,
}

impl From<MetricsSnapshot> for DispatchSummary {
    fn from(snapshot: MetricsSnapshot) -> Self {
        Self {
            batches: snapshot.batches,
            dispatched: snapshot.songs_dispatched,
            succeeded: snapshot.songs_succeeded,
            failed: snapshot.songs_failed,
        }
    }
}

enum State {
    /// Reading titles into the queue
    Filling,
    /// Flushing the queue into one batch. `carried` holds the title that did
    /// not fit; `None` marks the final drain after end of input.
    Draining { carried: Option<String> },
}

/// Reads song names into a bounded queue and runs them in batches.
///
/// Whenever the queue is full, or the input ends, every buffered name is
/// spawned as one [`SongJob`] and the whole batch is awaited before more input
/// is read. At most `queue_capacity` jobs are ever in flight.
pub struct BatchDispatcher<J> {
    job: Arc<J>,
    output_dir: Arc<Path>,
    capacity: usize,
    filter: FilterMode,
    metrics: Metrics,
}

impl<J: SongJob> BatchDispatcher<J> {
    pub fn new(job: Arc<J>, config: &DispatchConfig, output_dir: impl Into<PathBuf>) -> Self {
        let output_dir: PathBuf = output_dir.into();
        Self {
            job,
            output_dir: Arc::from(output_dir),
            capacity: config.queue_capacity.max(1),
            filter: config.filter,
            metrics: Metrics::new(),
        }
    }

    /// Run until the input is exhausted and the last batch has finished.
    ///
    /// Only a failure to create the output directory aborts the run; failed
    /// songs are logged and counted.
    pub async fn run<R>(self, input: SongList<R>) -> Result<DispatchSummary, DispatchError>
    where
        R: AsyncBufRead + Unpin,
    {
        let span = info_span!("run", run_id = %Uuid::now_v7());
        self.run_inner(input).instrument(span).await
    }

    async fn run_inner<R>(self, mut input: SongList<R>) -> Result<DispatchSummary, DispatchError>
    where
        R: AsyncBufRead + Unpin,
    {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| DispatchError::OutputDir {
                path: self.output_dir.to_path_buf(),
                source,
            })?;

        info!(
            output_dir = %self.output_dir.display(),
            capacity = self.capacity,
            filter = %self.filter,
            "Starting song downloads"
        );

        let (tx, mut rx) = mpsc::channel::<String>(self.capacity);
        let mut state = State::Filling;

        loop {
            state = match state {
                State::Filling => match input.next_title().await {
                    Some(title) => match tx.try_send(title) {
                        Ok(()) => State::Filling,
                        Err(TrySendError::Full(title)) => State::Draining {
                            carried: Some(title),
                        },
                        Err(TrySendError::Closed(_)) => return Err(DispatchError::QueueClosed),
                    },
                    None => State::Draining { carried: None },
                },
                State::Draining { carried } => {
                    let batch = self.spawn_batch(&mut rx);
                    let is_final = carried.is_none();

                    if let Some(title) = carried {
                        // The drain just emptied the queue, so this cannot wait.
                        tx.send(title)
                            .await
                            .map_err(|_| DispatchError::QueueClosed)?;
                    }

                    self.await_batch(batch).await;

                    if is_final {
                        break;
                    }
                    State::Filling
                }
            };
        }

        let summary = DispatchSummary::from(self.metrics.snapshot());
        info!(
            batches = summary.batches,
            dispatched = summary.dispatched,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "All songs processed"
        );
        Ok(summary)
    }

    /// Pop every buffered name and spawn one job for each
    fn spawn_batch(&self, rx: &mut mpsc::Receiver<String>) -> JoinSet<(String, bool)> {
        let mut batch = JoinSet::new();

        while let Ok(title) = rx.try_recv() {
            let job = Arc::clone(&self.job);
            let output_dir = Arc::clone(&self.output_dir);
            let query = SongQuery::new(title, self.filter);

            self.metrics.song_dispatched();
            batch.spawn(
                async move {
                    let title = query.title.clone();
                    let ok = job.run(query, &output_dir).await.is_ok();
                    (title, ok)
                }
                .in_current_span(),
            );
        }

        if !batch.is_empty() {
            self.metrics.batch_started();
            debug!(size = batch.len(), "Batch spawned");
        }
        batch
    }

    /// Completion barrier: wait for every job of the batch
    async fn await_batch(&self, mut batch: JoinSet<(String, bool)>) {
        while let Some(joined) = batch.join_next().await {
            match joined {
                Ok((_, true)) => self.metrics.song_succeeded(),
                Ok((title, false)) => {
                    warn!(title = %title, "Song skipped");
                    self.metrics.song_failed();
                }
                Err(e) => {
                    error!(error = %e, "Song task panicked");
                    self.metrics.song_failed();
                }
            }
        }
    }
}
