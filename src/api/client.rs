//! HTTP client construction and the typed iBook API wrapper.

use std::panic::{AssertUnwindSafe, catch_unwind};

use reqwest::{Client, ClientBuilder, Proxy};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use super::error::ApiError;
use super::types::{
    Envelope, ReleasePage, VersionList, extract_firmware_url, extract_models, extract_versions,
};
use crate::user_agent;

/// Base URL of the vendor's iBook mobile API.
pub const DEFAULT_BASE_URL: &str = "https://resources.myatoto.com/atoto-product-ibook/ibMobile";

/// `iBookType` selector sent with every query (firmware catalog).
const IBOOK_TYPE: &str = "2";

/// `langType` selector for the release page (English).
const LANG_TYPE: &str = "1";

/// Builds the HTTP client shared by API queries and firmware downloads.
///
/// No explicit timeouts are configured; reqwest defaults apply.
///
/// # Errors
///
/// Returns [`ApiError::ClientBuild`] when client construction fails.
pub fn build_http_client() -> Result<Client, ApiError> {
    match try_build_client(false) {
        Ok(client) => Ok(client),
        Err(BuildClientFailure::Panic) => {
            // Some sandboxed environments panic when querying system proxy
            // settings. Retry with env-proxy lookup only.
            warn!("HTTP client hit system proxy panic; using env-proxy fallback builder");
            match try_build_client(true) {
                Ok(client) => Ok(client),
                Err(BuildClientFailure::Panic) => Err(ApiError::client_build(
                    "client builder panicked while applying env-proxy fallback",
                )),
                Err(BuildClientFailure::Build(error)) => {
                    Err(ApiError::client_build(error.to_string()))
                }
            }
        }
        Err(BuildClientFailure::Build(error)) => Err(ApiError::client_build(error.to_string())),
    }
}

enum BuildClientFailure {
    Panic,
    Build(reqwest::Error),
}

fn try_build_client(disable_system_proxy_lookup: bool) -> Result<Client, BuildClientFailure> {
    catch_unwind(AssertUnwindSafe(move || {
        let mut builder = base_builder();
        if disable_system_proxy_lookup {
            builder = apply_env_proxy_fallback(builder.no_proxy());
        }
        builder.build().map_err(BuildClientFailure::Build)
    }))
    .map_err(|_| BuildClientFailure::Panic)?
}

fn base_builder() -> ClientBuilder {
    Client::builder()
        .user_agent(user_agent::default_user_agent())
        .gzip(true)
}

fn apply_env_proxy_fallback(mut builder: ClientBuilder) -> ClientBuilder {
    if let Some(proxy) = env_proxy_for_scheme("https")
        && let Ok(resolved) = Proxy::https(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    if let Some(proxy) = env_proxy_for_scheme("http")
        && let Ok(resolved) = Proxy::http(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    builder
}

fn env_proxy_for_scheme(scheme: &str) -> Option<String> {
    let names: &[&str] = match scheme {
        "https" => &["HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"],
        "http" => &["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"],
        _ => return None,
    };
    names.iter().find_map(|name| {
        std::env::var(name)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}

/// Typed wrapper over the three iBook catalog endpoints.
///
/// Each method performs exactly one GET request. Pacing between requests is
/// the caller's job (see [`crate::pacing::Pacer`]).
#[derive(Debug, Clone)]
pub struct IbookClient {
    client: Client,
    base_url: String,
}

impl IbookClient {
    /// Creates a client against the production API.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL)
    }

    /// Creates a client against a custom base URL (mirrors, mock servers).
    #[must_use]
    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Returns the configured API base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the "list models by keyword" endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if the base URL cannot be parsed.
    pub fn model_list_url(&self, keyword: char) -> Result<Url, ApiError> {
        let keyword = keyword.to_string();
        self.endpoint(
            "getSkuModelList",
            &[("keyword", keyword.as_str()), ("iBookType", IBOOK_TYPE)],
        )
    }

    /// URL of the "list firmware versions by SKU" endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if the base URL cannot be parsed.
    pub fn version_list_url(&self, model: &str) -> Result<Url, ApiError> {
        self.endpoint(
            "getMcuVersionBySku",
            &[("skuModel", model), ("iBookType", IBOOK_TYPE)],
        )
    }

    /// URL of the release page for a model and (possibly empty) MCU version.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if the base URL cannot be parsed.
    pub fn release_page_url(&self, model: &str, version: &str) -> Result<Url, ApiError> {
        self.endpoint(
            "getIbookList",
            &[
                ("skuModel", model),
                ("mcuVersion", version),
                ("langType", LANG_TYPE),
                ("iBookType", IBOOK_TYPE),
            ],
        )
    }

    /// Lists the product models matching a single-letter keyword.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on network failure, non-success status, or a
    /// body without a `data` array.
    #[instrument(skip(self))]
    pub async fn list_models(&self, keyword: char) -> Result<Vec<String>, ApiError> {
        let url = self.model_list_url(keyword)?;
        let envelope: Envelope<Vec<String>> = self.get_json(&url).await?;
        extract_models(envelope).map_err(|reason| ApiError::malformed(url.as_str(), reason))
    }

    /// Lists the MCU firmware versions published for a model.
    ///
    /// An empty list means the model has exactly one unversioned firmware.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on network failure, non-success status, or when
    /// `data.mcuVersionList` is absent.
    #[instrument(skip(self))]
    pub async fn list_versions(&self, model: &str) -> Result<Vec<String>, ApiError> {
        let url = self.version_list_url(model)?;
        let envelope: Envelope<VersionList> = self.get_json(&url).await?;
        if let Some(system) = envelope
            .data
            .as_ref()
            .and_then(|data| data.system_version.as_deref())
        {
            debug!(model, system, "version list received");
        }
        extract_versions(envelope).map_err(|reason| ApiError::malformed(url.as_str(), reason))
    }

    /// Fetches the release page and extracts the firmware download URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on network failure, non-success status, or when
    /// the SoC/MCU URL path for the requested version is absent.
    #[instrument(skip(self))]
    pub async fn release_url(&self, model: &str, version: &str) -> Result<String, ApiError> {
        let url = self.release_page_url(model, version)?;
        let envelope: Envelope<ReleasePage> = self.get_json(&url).await?;
        extract_firmware_url(envelope, version)
            .map_err(|reason| ApiError::malformed(url.as_str(), reason))
    }

    fn endpoint(&self, name: &str, params: &[(&str, &str)]) -> Result<Url, ApiError> {
        let raw = format!("{}/{name}", self.base_url);
        Url::parse_with_params(&raw, params).map_err(|_| ApiError::invalid_url(raw))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, ApiError> {
        debug!(url = %url, "GET");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ApiError::network(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::http_status(url.as_str(), status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::network(url.as_str(), e))?;
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::malformed(url.as_str(), format!("invalid JSON body: {e}")))
    }
}
