//! Version and release resolution for a single product model.
//!
//! Both resolvers pace after their request and log failures themselves; the
//! returned error only tells the caller what to skip.

use tracing::{debug, error, instrument};

use crate::api::{ApiError, IbookClient};
use crate::pacing::Pacer;

/// A resolved firmware download for one model (and optional MCU version).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareRelease {
    /// Product model (SKU) the firmware belongs to.
    pub model: String,
    /// MCU version, empty for the single unversioned SoC image.
    pub version: String,
    /// Firmware binary URL.
    pub url: String,
}

/// Lists the firmware versions of `model`.
///
/// An empty list means the model has exactly one default firmware.
///
/// # Errors
///
/// Returns [`ApiError`] when the request fails or the response has no
/// `data.mcuVersionList`. The error has already been logged.
#[instrument(skip(api, pacer))]
pub async fn resolve_versions(
    api: &IbookClient,
    pacer: &Pacer,
    model: &str,
) -> Result<Vec<String>, ApiError> {
    let result = api.list_versions(model).await;
    pacer.pause().await;

    match result {
        Ok(versions) => {
            debug!(versions = versions.len(), "resolved version list");
            Ok(versions)
        }
        Err(e) if e.is_malformed() => {
            error!(error = %e, "version list did not match expected format");
            Err(e)
        }
        Err(e) => {
            error!(error = %e, "couldn't get list of versions for product model");
            Err(e)
        }
    }
}

/// Resolves the firmware URL for `model` at `version` (empty for the default image).
///
/// # Errors
///
/// Returns [`ApiError`] when the request fails or the expected URL path is
/// missing from the release page. The error has already been logged.
#[instrument(skip(api, pacer))]
pub async fn resolve_release(
    api: &IbookClient,
    pacer: &Pacer,
    model: &str,
    version: &str,
) -> Result<FirmwareRelease, ApiError> {
    let result = api.release_url(model, version).await;
    pacer.pause().await;

    match result {
        Ok(url) => {
            debug!(firmware_url = %url, "resolved firmware URL");
            Ok(FirmwareRelease {
                model: model.to_string(),
                version: version.to_string(),
                url,
            })
        }
        Err(e) => {
            error!(error = %e, "failed to resolve firmware release page");
            Err(e)
        }
    }
}
