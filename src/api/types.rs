//! Response shapes returned by the iBook mobile API.
//!
//! Every nested field is optional so that a missing or `null` field surfaces
//! as a typed "malformed response" instead of a decode panic further down.

use serde::Deserialize;

/// Common `{code, message, data}` wrapper around every API payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// Vendor status code (200 on success).
    pub code: Option<i64>,
    /// Human readable status message, often localized.
    pub message: Option<String>,
    /// Endpoint specific payload.
    pub data: Option<T>,
}

/// Payload of `getMcuVersionBySku`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionList {
    /// Operating system family, e.g. `Linux`.
    pub system_version: Option<String>,
    /// Available MCU firmware versions. Empty means a single unversioned release.
    pub mcu_version_list: Option<Vec<String>>,
}

/// Payload of `getIbookList`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleasePage {
    pub software_vo: Option<SoftwareVo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftwareVo {
    pub soc_vo: Option<SocVo>,
    pub mcu_vo: Option<McuVo>,
}

/// System-on-chip firmware descriptor.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocVo {
    pub soc_url: Option<String>,
}

/// Microcontroller firmware descriptor.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McuVo {
    pub mcu_url: Option<String>,
}

/// Pulls the model list out of a `getSkuModelList` envelope.
pub(crate) fn extract_models(envelope: Envelope<Vec<String>>) -> Result<Vec<String>, &'static str> {
    envelope.data.ok_or("missing data")
}

/// Pulls `data.mcuVersionList` out of a `getMcuVersionBySku` envelope.
pub(crate) fn extract_versions(envelope: Envelope<VersionList>) -> Result<Vec<String>, &'static str> {
    envelope
        .data
        .ok_or("missing data")?
        .mcu_version_list
        .ok_or("missing data.mcuVersionList")
}

/// Pulls the firmware URL out of a `getIbookList` envelope.
///
/// An empty `version` selects the SoC image (`data.softwareVo.socVo.socUrl`),
/// any other value selects the MCU image (`data.softwareVo.mcuVo.mcuUrl`).
pub(crate) fn extract_firmware_url(
    envelope: Envelope<ReleasePage>,
    version: &str,
) -> Result<String, &'static str> {
    let software = envelope
        .data
        .ok_or("missing data")?
        .software_vo
        .ok_or("missing data.softwareVo")?;

    let url = if version.is_empty() {
        software
            .soc_vo
            .ok_or("missing data.softwareVo.socVo")?
            .soc_url
            .ok_or("missing data.softwareVo.socVo.socUrl")?
    } else {
        software
            .mcu_vo
            .ok_or("missing data.softwareVo.mcuVo")?
            .mcu_url
            .ok_or("missing data.softwareVo.mcuVo.mcuUrl")?
    };

    let url = url.trim();
    if url.is_empty() {
        return Err("firmware URL is empty");
    }
    Ok(url.to_string())
}
