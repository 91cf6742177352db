//! Streaming firmware downloader.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, error, info, instrument};

use super::error::DownloadError;
use super::filename::{firmware_filename, model_dir};
use crate::pacing::Pacer;
use crate::resolver::FirmwareRelease;

/// Writes firmware binaries to `<root>/<model>/<basename-of-url>`.
///
/// Existing files are replaced only once a new copy has been fully
/// received; nothing is resumed or verified.
#[derive(Debug, Clone)]
pub struct FirmwareDownloader {
    client: Client,
    root: PathBuf,
}

impl FirmwareDownloader {
    /// Creates a downloader that stores files under `root`.
    #[must_use]
    pub fn new(client: Client, root: impl Into<PathBuf>) -> Self {
        Self {
            client,
            root: root.into(),
        }
    }

    /// Returns the download root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Downloads a resolved release, logging any failure, then paces.
    ///
    /// Failures are not propagated: the returned path is `None` when nothing
    /// was written.
    #[instrument(
        skip(self, pacer, release),
        fields(model = %release.model, version = %release.version, url = %release.url)
    )]
    pub async fn fetch_release(&self, release: &FirmwareRelease, pacer: &Pacer) -> Option<PathBuf> {
        let result = self.download(&release.model, &release.url).await;
        pacer.pause().await;

        match result {
            Ok(path) => Some(path),
            Err(DownloadError::HttpStatus { status, .. }) => {
                error!(status, "failed to download firmware; server sent error status");
                None
            }
            Err(e) => {
                error!(error = %e, "failed to download firmware");
                None
            }
        }
    }

    /// Downloads `url` into the directory of `model`.
    ///
    /// The model directory is created before the file path is composed.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] if:
    /// - the URL has no filename segment
    /// - the directory or file cannot be created or written
    /// - the request fails or the server returns a non-success status
    ///
    /// On any error the destination is left as it was.
    #[must_use = "download result contains the path to the written file"]
    pub async fn download(&self, model: &str, url: &str) -> Result<PathBuf, DownloadError> {
        let dir = model_dir(&self.root, model);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| DownloadError::io(dir.clone(), e))?;

        let filename = firmware_filename(url)?;
        let file_path = dir.join(&filename);
        let part_path = dir.join(format!("{filename}.part"));
        debug!(path = %file_path.display(), "downloading firmware");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        // The destination is replaced only after the whole body is on disk.
        let stream_result = stream_to_part_file(response, url, &part_path).await;
        let bytes = match stream_result {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(path = %part_path.display(), "cleaning up partial file after error");
                let _ = tokio::fs::remove_file(&part_path).await;
                return Err(e);
            }
        };

        if let Err(e) = tokio::fs::rename(&part_path, &file_path).await {
            let _ = tokio::fs::remove_file(&part_path).await;
            return Err(DownloadError::io(file_path, e));
        }

        info!(path = %file_path.display(), bytes, "download complete");
        Ok(file_path)
    }
}

/// Streams response body into `part_path`, returning bytes written.
async fn stream_to_part_file(
    response: reqwest::Response,
    url: &str,
    part_path: &Path,
) -> Result<u64, DownloadError> {
    let file = File::create(part_path)
        .await
        .map_err(|e| DownloadError::io(part_path.to_path_buf(), e))?;
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::network(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(part_path.to_path_buf(), e))?;

        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(part_path.to_path_buf(), e))?;

    Ok(bytes_written)
}
