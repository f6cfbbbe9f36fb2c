mod cli;

use clap::Parser;
use cli::{Cli, Commands, DownloadArgs};
use songfetch::config::Config;
use songfetch::dispatch::{BatchDispatcher, SongList};
use songfetch::metadata::MetadataClient;
use songfetch::observability;
use songfetch::worker::{AssetFetcher, SongDownloadTask};
use std::sync::Arc;
use tracing::{error, info};

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[tokio::main]
async fn main() -> Result<(), AnyError> {
    observability::init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Download(args) => download(args).await?,
    }

    Ok(())
}

async fn download(args: DownloadArgs) -> Result<(), AnyError> {
    let mut config = Config::load(args.config.clone())?;
    args.apply(&mut config);
    config.validate()?;

    let input = SongList::open(&config.input.path).await.map_err(|e| {
        error!(path = %config.input.path.display(), error = %e, "Failed to open song list");
        e
    })?;

    let metadata = Arc::new(MetadataClient::new(&config.api, &config.http)?);
    let fetcher = AssetFetcher::new(&config.http)?;
    let task = Arc::new(SongDownloadTask::new(metadata, fetcher));

    let dispatcher = BatchDispatcher::new(task, &config.dispatch, config.output.dir.clone());
    let summary = dispatcher.run(input).await?;

    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "Run complete"
    );
    Ok(())
}
