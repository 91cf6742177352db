//! Firmware binary downloads.
//!
//! Files land at `<root>/<model>/<basename-of-url>`, overwriting whatever was
//! there. The response body is streamed to disk.
//!
//! # Example
//!
//! ```no_run
//! use firmware_downloader_core::api::build_http_client;
//! use firmware_downloader_core::download::FirmwareDownloader;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = FirmwareDownloader::new(build_http_client()?, "firmware__20240101");
//! let path = downloader
//!     .download("A6G209PF", "https://cdn.example.com/33320356/filename.zip")
//!     .await?;
//! println!("Downloaded: {}", path.display());
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod filename;

pub use client::FirmwareDownloader;
pub use error::DownloadError;
pub use filename::{destination_path, firmware_filename, model_dir};
