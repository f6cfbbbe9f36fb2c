use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::warn;

/// Line-oriented song list: one title per line, blank lines included
pub struct SongList<R> {
    reader: R,
    buf: Vec<u8>,
    done: bool,
}

impl SongList<BufReader<File>> {
    pub async fn open(path: &Path) -> std::io::Result<Self> {
        let file = File::open(path).await?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: AsyncBufRead + Unpin> SongList<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            done: false,
        }
    }

    /// Next title, or `None` at end of input.
    ///
    /// A read error ends the list; retrying a failing reader would never make progress.
    pub async fn next_title(&mut self) -> Option<String> {
        if self.done {
            return None;
        }

        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf).await {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                if self.buf.ends_with(b"\n") {
                    self.buf.pop();
                    if self.buf.ends_with(b"\r") {
                        self.buf.pop();
                    }
                }
                Some(String::from_utf8_lossy(&self.buf).into_owned())
            }
            Err(e) => {
                warn!(error = %e, "Failed to read song list, treating as end of input");
                self.done = true;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn collect(input: &[u8]) -> Vec<String> {
        let mut list = SongList::new(input);
        let mut titles = Vec::new();
        while let Some(title) = list.next_title().await {
            titles.push(title);
        }
        titles
    }

    #[tokio::test]
    async fn test_lines_and_endings() {
        let titles = collect(b"Song A\r\nSong B\nSong C").await;
        assert_eq!(titles, vec!["Song A", "Song B", "Song C"]);
    }

    #[tokio::test]
    async fn test_blank_lines_are_titles() {
        let titles = collect(b"Song A\n\nSong B\n").await;
        assert_eq!(titles, vec!["Song A", "", "Song B"]);
    }

    #[tokio::test]
    async fn test_empty_input() {
        assert!(collect(b"").await.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_lossy() {
        let titles = collect(b"caf\xe9\nok\n").await;
        assert_eq!(titles, vec!["caf\u{FFFD}", "ok"]);
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let result = SongList::open(&temp_dir.path().join("songs.txt")).await;
        assert!(result.is_err());
    }
}
