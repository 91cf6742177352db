//! Firmware Downloader Core Library
//!
//! Crawls a head-unit vendor's iBook catalog API for product models and
//! downloads every firmware binary it references, one directory per model.
//!
//! # Architecture
//!
//! The crawl is strictly sequential and paced:
//! - [`api`] - typed client for the three catalog endpoints
//! - [`pacing`] - fixed delay issued after every network call
//! - [`discovery`] - A-Z keyword sweep building the model set
//! - [`resolver`] - model versions and firmware release URLs
//! - [`download`] - streaming download to `<root>/<model>/<file>`
//! - [`crawl`] - orchestration and failure containment

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod crawl;
pub mod discovery;
pub mod download;
pub mod pacing;
pub mod resolver;
mod user_agent;

// Re-export commonly used types
pub use api::{ApiError, DEFAULT_BASE_URL, IbookClient, build_http_client};
pub use crawl::{CrawlError, CrawlReport, Crawler, default_download_root, download_root_for};
pub use discovery::{KEYWORD_ALPHABET, discover_models};
pub use download::{DownloadError, FirmwareDownloader};
pub use pacing::{DEFAULT_DELAY, Pacer};
pub use resolver::{FirmwareRelease, resolve_release, resolve_versions};
