//! Doc Harvest Library
//!
//! This library fetches a single web page, picks out the hyperlinks that point
//! at files with a given suffix, resolves them against the page URL, and
//! downloads every one of them concurrently into a local directory.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`page`] - Link extraction from parsed HTML and URL reference resolution
//! - [`download`] - HTTP client (page fetch, streaming file download) and the
//!   bounded download engine
//! - [`harvest`] - Single-pass orchestration: fetch, extract, resolve, download
//! - [`config`] - Defaults, TOML config file loading, validation
//! - [`error`] - Error taxonomy shared by every stage

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod download;
pub mod error;
pub mod harvest;
pub mod page;
mod user_agent;

// Re-export commonly used types
pub use config::{ConfigError, HarvestConfig};
pub use download::{
    BatchReport, DEFAULT_CONCURRENCY, DownloadEngine, DownloadJob, DownloadedFile, EngineError,
    FailedLink, FetchedPage, HttpClient, filename_from_url,
};
pub use error::{ErrorKind, HarvestError, UrlRole};
pub use harvest::{HarvestOutcome, Harvester};
pub use page::{extract_matching_links, resolve};
