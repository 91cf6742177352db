//! End-to-end crawl: discover models, resolve releases, download firmware.
//!
//! Failure containment:
//! - discovery failure aborts the crawl ([`CrawlError::Discovery`])
//! - a failed or malformed version list skips that model
//! - a failed or malformed release page skips that version
//! - a failed download is logged and the crawl moves on

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use thiserror::Error;
use tracing::{info, instrument};

use crate::api::{ApiError, IbookClient};
use crate::discovery::discover_models;
use crate::download::FirmwareDownloader;
use crate::pacing::Pacer;
use crate::resolver::{resolve_release, resolve_versions};

/// Errors that abort a crawl.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The keyword sweep failed; no model universe is available.
    #[error("model discovery failed: {0}")]
    Discovery(#[source] ApiError),
}

/// Counters describing a finished crawl.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Unique product models found by discovery.
    pub models_discovered: usize,
    /// Models skipped because their version list could not be resolved.
    pub models_skipped: usize,
    /// Release pages that yielded a firmware URL.
    pub releases_resolved: usize,
    /// Versions (or default releases) skipped because the release page failed.
    pub versions_skipped: usize,
    /// Firmware files written to disk.
    pub downloads_completed: usize,
    /// Firmware downloads that failed.
    pub downloads_failed: usize,
}

/// Default download root for a given date: `firmware__YYYYMMDD`.
#[must_use]
pub fn download_root_for(date: NaiveDate) -> PathBuf {
    PathBuf::from(format!("firmware__{}", date.format("%Y%m%d")))
}

/// Default download root for today's local date.
#[must_use]
pub fn default_download_root() -> PathBuf {
    download_root_for(Local::now().date_naive())
}

/// Sequential crawler composing discovery, resolution and download.
#[derive(Debug)]
pub struct Crawler {
    api: IbookClient,
    downloader: FirmwareDownloader,
    pacer: Pacer,
}

impl Crawler {
    /// Creates a crawler.
    #[must_use]
    pub fn new(api: IbookClient, downloader: FirmwareDownloader, pacer: Pacer) -> Self {
        Self {
            api,
            downloader,
            pacer,
        }
    }

    /// Returns the pacer shared by every step.
    #[must_use]
    pub fn pacer(&self) -> &Pacer {
        &self.pacer
    }

    /// Runs the full crawl.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::Discovery`] if any keyword query fails. All
    /// later failures are logged and counted in the report instead.
    #[instrument(skip(self), fields(root = %self.downloader.root().display()))]
    pub async fn run(&self) -> Result<CrawlReport, CrawlError> {
        let models = discover_models(&self.api, &self.pacer)
            .await
            .map_err(CrawlError::Discovery)?;

        let mut report = CrawlReport {
            models_discovered: models.len(),
            ..CrawlReport::default()
        };

        for model in &models {
            let Ok(versions) = resolve_versions(&self.api, &self.pacer, model).await else {
                report.models_skipped += 1;
                continue;
            };

            if versions.is_empty() {
                // Single unversioned firmware.
                self.fetch(model, "", &mut report).await;
            } else {
                for version in &versions {
                    self.fetch(model, version, &mut report).await;
                }
            }

            self.pacer.pause().await;
        }

        info!(
            models = report.models_discovered,
            models_skipped = report.models_skipped,
            releases = report.releases_resolved,
            versions_skipped = report.versions_skipped,
            downloaded = report.downloads_completed,
            failed = report.downloads_failed,
            "crawl complete"
        );
        Ok(report)
    }

    async fn fetch(&self, model: &str, version: &str, report: &mut CrawlReport) {
        let Ok(release) = resolve_release(&self.api, &self.pacer, model, version).await else {
            report.versions_skipped += 1;
            return;
        };
        report.releases_resolved += 1;
        info!(model, firmware_url = %release.url, "firmware URL resolved");

        if self
            .downloader
            .fetch_release(&release, &self.pacer)
            .await
            .is_some()
        {
            report.downloads_completed += 1;
        } else {
            report.downloads_failed += 1;
        }
    }
}
