//! CLI entry point for the firmware downloader.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use firmware_downloader_core::{
    CrawlError, Crawler, FirmwareDownloader, IbookClient, Pacer, build_http_client,
    default_download_root,
};
use tracing::{debug, error, info};

mod cli;

use cli::Args;

/// Process exit outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProcessExit {
    /// Crawl finished; individual model/download failures were logged.
    Success,
    /// Unexpected setup error.
    Failure,
    /// A discovery query failed and the crawl was aborted.
    DiscoveryFailed,
}

impl From<ProcessExit> for ExitCode {
    fn from(exit: ProcessExit) -> Self {
        match exit {
            ProcessExit::Success => ExitCode::SUCCESS,
            ProcessExit::Failure => ExitCode::from(1),
            ProcessExit::DiscoveryFailed => ExitCode::from(2),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    match run(args).await {
        Ok(exit) => exit.into(),
        Err(e) => {
            error!(error = %format!("{e:#}"), "firmware downloader failed");
            ProcessExit::Failure.into()
        }
    }
}

async fn run(args: Args) -> Result<ProcessExit> {
    let root = args.output_dir.unwrap_or_else(default_download_root);
    let client = build_http_client().context("failed to set up HTTP client")?;
    let api = IbookClient::with_base_url(client.clone(), args.base_url);
    let downloader = FirmwareDownloader::new(client, root);
    info!(
        root = %downloader.root().display(),
        base_url = api.base_url(),
        "firmware downloader starting"
    );

    let pacer = if args.delay_ms == 0 {
        debug!("request pacing disabled");
        Pacer::disabled()
    } else {
        Pacer::new(Duration::from_millis(args.delay_ms))
    };

    let crawler = Crawler::new(api, downloader, pacer);
    match crawler.run().await {
        Ok(_) => Ok(ProcessExit::Success),
        Err(CrawlError::Discovery(e)) => {
            error!(error = %e, "aborting: product model discovery failed");
            Ok(ProcessExit::DiscoveryFailed)
        }
    }
}
