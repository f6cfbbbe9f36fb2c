//! Song download worker
//!
//! A [`SongDownloadTask`] resolves one title through a
//! [`MetadataSource`](crate::metadata::MetadataSource) and stores the audio,
//! lyrics and cover it points to using an [`AssetFetcher`].

pub mod fetch;
pub mod task;

pub use fetch::{AssetFetcher, DownloadError};
pub use task::{LyricsOutcome, SongDownloadTask, SongJob, SongReport, TaskError, file_stem, song_paths};
