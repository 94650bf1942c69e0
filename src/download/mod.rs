//! HTTP fetching and the concurrent download engine.
//!
//! This module provides functionality for fetching the target page as a
//! parsed HTML document and for downloading linked files to disk with
//! streaming support.
//!
//! # Features
//!
//! - Streaming downloads (memory-efficient for large files)
//! - Whole-request timeout (30s by default)
//! - Filename derived from the final URL path segment
//! - Bounded concurrency with an explicit completion barrier
//! - Graceful shutdown: queued jobs are skipped, in-flight ones get a grace period
//!
//! # Example
//!
//! ```no_run
//! use doc_harvest::download::HttpClient;
//! use std::path::Path;
//! use url::Url;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! let url = Url::parse("https://example.com/files/report.doc")?;
//! let file = client
//!     .download_to_file(&url, Path::new("./downloads/report.doc"))
//!     .await?;
//! println!("Downloaded {} bytes to {}", file.bytes, file.path.display());
//! # Ok(())
//! # }
//! ```

mod client;
pub mod constants;
mod engine;
mod filename;

pub use client::{DownloadedFile, FetchedPage, HttpClient};
pub use constants::DEFAULT_CONCURRENCY;
pub use engine::{BatchReport, DownloadEngine, DownloadJob, EngineError, FailedLink};
pub use filename::filename_from_url;
