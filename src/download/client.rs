//! HTTP client wrapper for fetching the target page and downloading files.
//!
//! This module provides the `HttpClient` struct which performs plain GET
//! requests with a whole-request timeout, rejects anything but `200 OK`, and
//! either parses the body as HTML or streams it to disk.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::{Client, Response, StatusCode};
use scraper::Html;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument};
use url::Url;

use super::constants::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::error::{HarvestError, UrlRole};
use crate::user_agent;

/// HTTP client for page fetches and streaming downloads.
///
/// This client is designed to be created once and shared by every download
/// task, taking advantage of connection pooling. Cloning is cheap.
///
/// # Example
///
/// ```no_run
/// use doc_harvest::HttpClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new();
/// let page = client.fetch_page("https://example.com/docs/").await?;
/// println!("Fetched {}", page.url);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

/// A fetched and parsed HTML page.
#[derive(Debug)]
pub struct FetchedPage {
    /// Final page URL after redirects; links on the page resolve against it.
    pub url: Url,
    /// Parsed document tree.
    pub document: Html,
}

/// A file written by a successful download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    /// URL the file was downloaded from.
    pub url: Url,
    /// Destination path.
    pub path: PathBuf,
    /// Number of bytes written.
    pub bytes: u64,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with the default 30 second request timeout.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    /// Creates a new HTTP client with an explicit whole-request timeout.
    ///
    /// The timeout covers connecting, sending, and reading the full body.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build (TLS backend
    /// initialization failure).
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .user_agent(user_agent::default_user_agent())
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Fetches `url` and parses the response body as an HTML document.
    ///
    /// # Errors
    ///
    /// Returns `HarvestError` if:
    /// - `url` is not an absolute URL (`UrlParse`)
    /// - the request fails or times out (`Network` / `Timeout`)
    /// - the server answers with anything but `200 OK` (`BadStatus`)
    /// - the body cannot be decoded as text (`Parse`)
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_page(&self, url: &str) -> Result<FetchedPage, HarvestError> {
        let parsed = Url::parse(url).map_err(|e| HarvestError::url_parse(url, UrlRole::Base, e))?;

        let response = self.send_get(&parsed).await?;
        let final_url = response.url().clone();
        if final_url != parsed {
            debug!(final_url = %final_url, "page redirected");
        }

        let body = response.text().await.map_err(|e| {
            if e.is_decode() {
                HarvestError::parse(url, e.to_string())
            } else {
                HarvestError::network(url, e)
            }
        })?;

        let document = Html::parse_document(&body);
        debug!(bytes = body.len(), "page parsed");

        Ok(FetchedPage {
            url: final_url,
            document,
        })
    }

    /// Downloads `url` into `destination`, creating or truncating the file.
    ///
    /// The parent directory must already exist. The body is streamed chunk by
    /// chunk, so memory use does not depend on file size.
    ///
    /// A failure after the file was created leaves it in place, truncated.
    ///
    /// # Errors
    ///
    /// Returns `HarvestError` if:
    /// - the request fails or times out, including mid-body (`Network` / `Timeout`)
    /// - the server answers with anything but `200 OK` (`BadStatus`)
    /// - creating, writing or flushing the file fails (`Io`)
    #[instrument(skip(self), fields(url = %url, path = %destination.display()))]
    pub async fn download_to_file(
        &self,
        url: &Url,
        destination: &Path,
    ) -> Result<DownloadedFile, HarvestError> {
        debug!("starting download");

        let response = self.send_get(url).await?;

        let mut file = File::create(destination)
            .await
            .map_err(|e| HarvestError::io(destination, e))?;

        let bytes = stream_to_file(&mut file, response, url, destination).await?;

        debug!(bytes, "download complete");

        Ok(DownloadedFile {
            url: url.clone(),
            path: destination.to_path_buf(),
            bytes,
        })
    }

    async fn send_get(&self, url: &Url) -> Result<Response, HarvestError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| HarvestError::network(url.as_str(), e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(HarvestError::bad_status(url.as_str(), status));
        }

        Ok(response)
    }
}

/// Streams response body to file, returning bytes written.
async fn stream_to_file(
    file: &mut File,
    response: Response,
    url: &Url,
    file_path: &Path,
) -> Result<u64, HarvestError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| HarvestError::network(url.as_str(), e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| HarvestError::io(file_path, e))?;

        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| HarvestError::io(file_path, e))?;

    Ok(bytes_written)
}
