//! One song: metadata lookup, audio, lyrics, cover

use super::fetch::{AssetFetcher, DownloadError};
use crate::humanize::ByteSize;
use crate::metadata::{MetadataError, MetadataSource, SongQuery};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("metadata lookup failed: {0}")]
    Metadata(#[from] MetadataError),

    #[error("audio download failed: {0}")]
    Audio(#[source] DownloadError),

    #[error("cover download failed: {0}")]
    Cover(#[source] DownloadError),
}

pub type Result<T> = std::result::Result<T, TaskError>;

/// What happened to the `.lrc` file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LyricsOutcome {
    Written(ByteSize),
    Failed(String),
}

/// Successful outcome of one song task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongReport {
    pub title: String,
    pub provider: String,
    pub audio: ByteSize,
    pub lyrics: LyricsOutcome,
    pub cover: ByteSize,
}

/// Unit of work spawned by the dispatcher for each song name
#[async_trait]
pub trait SongJob: Send + Sync + 'static {
    async fn run(&self, query: SongQuery, output_dir: &Path) -> Result<SongReport>;
}

/// Downloads audio, lyrics and cover for one song, in that order
pub struct SongDownloadTask<M> {
    metadata: Arc<M>,
    fetcher: AssetFetcher,
}

impl<M: MetadataSource> SongDownloadTask<M> {
    pub fn new(metadata: Arc<M>, fetcher: AssetFetcher) -> Self {
        Self { metadata, fetcher }
    }

    async fn download(&self, query: &SongQuery, output_dir: &Path) -> Result<SongReport> {
        let song = self.metadata.query(query).await?;

        let [audio_path, lyric_path, cover_path] = song_paths(output_dir, &query.title);

        let audio = self
            .fetcher
            .fetch(&song.stream_url, &audio_path)
            .await
            .map_err(TaskError::Audio)?;

        let lyrics = write_lyrics(&lyric_path, &song.lyric_text).await;
        if let LyricsOutcome::Failed(reason) = &lyrics {
            warn!(
                title = %query.title,
                path = %lyric_path.display(),
                reason = %reason,
                "Failed to write lyrics"
            );
        }

        let cover = self
            .fetcher
            .fetch(&song.cover_url, &cover_path)
            .await
            .map_err(TaskError::Cover)?;

        Ok(SongReport {
            title: query.title.clone(),
            provider: song.provider,
            audio: ByteSize(audio),
            lyrics,
            cover: ByteSize(cover),
        })
    }
}

#[async_trait]
impl<M: MetadataSource + 'static> SongJob for SongDownloadTask<M> {
    async fn run(&self, query: SongQuery, output_dir: &Path) -> Result<SongReport> {
        info!(title = %query.title, "Downloading");

        match self.download(&query, output_dir).await {
            Ok(report) => {
                info!(
                    title = %report.title,
                    provider = %report.provider,
                    audio = %report.audio,
                    cover = %report.cover,
                    "Download succeeded"
                );
                Ok(report)
            }
            Err(e) => {
                error!(title = %query.title, error = %e, "Download failed");
                Err(e)
            }
        }
    }
}

async fn write_lyrics(path: &Path, text: &str) -> LyricsOutcome {
    match tokio::fs::write(path, text).await {
        Ok(()) => LyricsOutcome::Written(ByteSize(text.len() as u64)),
        Err(e) => LyricsOutcome::Failed(e.to_string()),
    }
}

/// File name stem for a title; path separators would escape the output directory.
pub fn file_stem(title: &str) -> String {
    title.replace(['/', '\\'], "_")
}

/// Destination paths for a title, in download order
pub fn song_paths(output_dir: &Path, title: &str) -> [PathBuf; 3] {
    let stem = file_stem(title);
    ["mp3", "lrc", "jpg"].map(|ext| output_dir.join(format!("{}.{}", stem, ext)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem_keeps_plain_titles() {
        assert_eq!(file_stem("Song A"), "Song A");
        assert_eq!(file_stem(""), "");
    }

    #[test]
    fn test_file_stem_replaces_separators() {
        assert_eq!(file_stem("AC/DC - T.N.T"), "AC_DC - T.N.T");
        assert_eq!(file_stem(r"..\up"), ".._up");
    }

    #[test]
    fn test_song_paths() {
        let [audio, lyrics, cover] = song_paths(Path::new("songs"), "Song A");
        assert_eq!(audio, Path::new("songs/Song A.mp3"));
        assert_eq!(lyrics, Path::new("songs/Song A.lrc"));
        assert_eq!(cover, Path::new("songs/Song A.jpg"));
    }

    #[tokio::test]
    async fn test_write_lyrics_reports_failure() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing").join("a.lrc");

        let outcome = write_lyrics(&missing, "la").await;
        assert!(matches!(outcome, LyricsOutcome::Failed(_)));

        let ok = temp_dir.path().join("a.lrc");
        let outcome = write_lyrics(&ok, "la la").await;
        assert_eq!(outcome, LyricsOutcome::Written(ByteSize(5)));
        assert_eq!(std::fs::read_to_string(ok).unwrap(), "la la");
    }
}
