//! Destination path construction for firmware downloads.
//!
//! Layout: `<root>/<model>/<basename-of-url>`.

use std::path::{Component, Path, PathBuf};

use url::Url;

use super::error::DownloadError;

/// Returns the final path segment of a firmware URL, percent-decoded and
/// sanitized for use as a filename.
///
/// ```
/// use firmware_downloader_core::download::firmware_filename;
///
/// let name = firmware_filename(
///     "https://atoto-usa.oss-us-west-1.aliyuncs.com/2022/library/33320356/filename.zip",
/// )
/// .unwrap();
/// assert_eq!(name, "filename.zip");
/// ```
///
/// # Errors
///
/// Returns [`DownloadError::InvalidUrl`] if the URL cannot be parsed or ends
/// without a filename segment.
pub fn firmware_filename(url: &str) -> Result<String, DownloadError> {
    let parsed = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;
    let last = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| DownloadError::invalid_url(url))?;

    let decoded = urlencoding::decode(last).map_or_else(|_| last.to_string(), |d| d.into_owned());
    Ok(sanitize_filename(&decoded))
}

/// Directory that holds every firmware file of `model`.
#[must_use]
pub fn model_dir(root: &Path, model: &str) -> PathBuf {
    root.join(sanitize_filename(model))
}

/// Full destination path for a firmware URL of `model` under `root`.
///
/// # Errors
///
/// Returns [`DownloadError::InvalidUrl`] when no filename can be derived.
pub fn destination_path(root: &Path, model: &str, url: &str) -> Result<PathBuf, DownloadError> {
    Ok(model_dir(root, model).join(firmware_filename(url)?))
}

/// Replaces characters that are invalid in filenames and neutralizes dot
/// segments, so the result is always a single path component.
pub(crate) fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        return "_".to_string();
    }

    if is_safe_filename_segment(&sanitized) {
        sanitized
    } else {
        sanitized
            .chars()
            .map(|c| if c == '.' { '_' } else { c })
            .collect()
    }
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}
