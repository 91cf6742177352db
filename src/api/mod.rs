//! Vendor iBook API client.
//!
//! The catalog is exposed through three JSON endpoints, all wrapped in a
//! `{code, message, data}` envelope:
//!
//! - `getSkuModelList?keyword=<A-Z>` - product models matching a keyword
//! - `getMcuVersionBySku?skuModel=<id>` - MCU firmware versions of a model
//! - `getIbookList?skuModel=<id>&mcuVersion=<ver>` - release page with the
//!   firmware download URL
//!
//! # Example
//!
//! ```no_run
//! use firmware_downloader_core::api::{IbookClient, build_http_client};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = IbookClient::new(build_http_client()?);
//! let models = api.list_models('A').await?;
//! println!("{} models start with A", models.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod types;

pub use client::{DEFAULT_BASE_URL, IbookClient, build_http_client};
pub use error::ApiError;
pub use types::{Envelope, McuVo, ReleasePage, SocVo, SoftwareVo, VersionList};
