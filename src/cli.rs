use clap::{Parser, Subcommand};
use songfetch::config::Config;
use songfetch::metadata::FilterMode;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "songfetch")]
#[command(about = "Download songs, lyrics and covers from a list of titles", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download every song listed in the input file
    Download(DownloadArgs),
}

#[derive(clap::Args, Debug)]
pub struct DownloadArgs {
    /// Configuration file (defaults to $SONGFETCH_CONFIG or config/songfetch.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Song list, one title per line
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Directory to store songs in
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Songs buffered per batch
    #[arg(long)]
    pub queue_capacity: Option<usize>,

    /// How titles are matched: name, id or url
    #[arg(long)]
    pub filter: Option<FilterMode>,
}

impl DownloadArgs {
    /// Flags take precedence over file and environment settings
    pub fn apply(&self, config: &mut Config) {
        if let Some(path) = &self.input {
            config.input.path = path.clone();
        }
        if let Some(dir) = &self.output {
            config.output.dir = dir.clone();
        }
        if let Some(capacity) = self.queue_capacity {
            config.dispatch.queue_capacity = capacity;
        }
        if let Some(filter) = self.filter {
            config.dispatch.filter = filter;
        }
    }
}
