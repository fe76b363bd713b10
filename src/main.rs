//! CLI entry point for the pindown tool.

use anyhow::Result;
use clap::Parser;
use pindown_core::{
    Annotator, ApiClient, Database, DownloadOptions, Downloader, MAX_TAGS, download, logging,
    profile, resolve_token,
};
use tracing::{debug, error, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before logging, so --help works without logs)
    let args = Args::parse();

    logging::init("pindown", args.verbose, args.quiet)?;

    debug!(?args, "CLI arguments parsed");

    // The one validated user error: too many tag filters.
    if args.tags.len() > MAX_TAGS {
        error!(
            supplied = args.tags.len(),
            "Maximum number of tags is {MAX_TAGS}"
        );
        std::process::exit(1);
    }

    let db = Database::new(&Database::default_path()).await?;
    let prefs = profile(db);

    if let Some(days) = args.reset {
        download::reset(&prefs, days).await?;
        return Ok(());
    }

    let token = resolve_token(&prefs).await?;
    let api = ApiClient::new(token)?;
    let downloader = Downloader::new(prefs, api, Annotator::new());

    let options = DownloadOptions {
        tags: args.tags,
        skip_update: args.skip_update,
    };
    let stats = downloader.run(&options).await?;

    info!(
        downloaded = stats.downloaded,
        skipped = stats.skipped,
        annotation_failures = stats.annotation_failures,
        "Pindown finished"
    );

    Ok(())
}
