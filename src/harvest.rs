//! Single-pass harvest: fetch the page, extract links, resolve, download.
//!
//! Page-fetch and output-directory failures abort the run and are returned as
//! errors. Everything after that is per link: a link that fails to resolve or
//! download is logged, recorded in the [`BatchReport`], and skipped.

use std::future::Future;

use tracing::{debug, info, instrument, warn};

use crate::config::HarvestConfig;
use crate::download::{BatchReport, DownloadEngine, DownloadJob, EngineError, HttpClient};
use crate::error::HarvestError;
use crate::page::{extract_matching_links, resolve_against};

/// How a harvest run ended.
#[derive(Debug)]
pub enum HarvestOutcome {
    /// The page had no matching links; nothing was created or downloaded.
    NoLinks,
    /// Dry run: the jobs that would have been downloaded.
    DryRun(Vec<DownloadJob>),
    /// Downloads ran to completion (or were cancelled by shutdown).
    Completed(BatchReport),
}

/// Runs one harvest with a fixed configuration.
#[derive(Debug)]
pub struct Harvester {
    config: HarvestConfig,
    client: HttpClient,
    engine: DownloadEngine,
    dry_run: bool,
}

impl Harvester {
    /// Builds the HTTP client and download engine for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] if the configured
    /// concurrency is out of range.
    pub fn new(config: HarvestConfig) -> Result<Self, EngineError> {
        let engine = DownloadEngine::new(config.concurrency, config.shutdown_grace())?;
        let client = HttpClient::with_timeout(config.request_timeout());
        Ok(Self {
            config,
            client,
            engine,
            dry_run: false,
        })
    }

    /// Enables or disables dry-run mode (resolve only, no filesystem or downloads).
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Returns the configuration this harvester runs with.
    #[must_use]
    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Runs the harvest.
    ///
    /// `shutdown` and `force` are forwarded to the download engine. When
    /// `shutdown` completes, queued downloads are skipped and in-flight ones
    /// get the configured grace period; `force` completing during that
    /// period aborts them at once.
    ///
    /// # Errors
    ///
    /// Returns the page-fetch error (`Network`, `Timeout`, `BadStatus`,
    /// `Parse`, `UrlParse`) or an `Io` error if the output directory cannot
    /// be created. Per-link failures are reported in the outcome instead.
    #[instrument(skip(self, shutdown, force), fields(url = %self.config.target_page_url))]
    pub async fn run<F, G>(&self, shutdown: F, force: G) -> Result<HarvestOutcome, HarvestError>
    where
        F: Future<Output = ()>,
        G: Future<Output = ()>,
    {
        let suffix = self.config.link_suffix.as_str();

        // The parsed document is dropped before the next await.
        let (page_url, links) = {
            let page = self.client.fetch_page(&self.config.target_page_url).await?;
            let links = extract_matching_links(&page.document, suffix);
            (page.url, links)
        };

        if links.is_empty() {
            info!(suffix, "no matching files found");
            return Ok(HarvestOutcome::NoLinks);
        }
        info!(count = links.len(), suffix, "found matching links");

        let output_dir = &self.config.output_directory;
        let mut report = BatchReport::default();
        let mut jobs = Vec::with_capacity(links.len());
        for link in links {
            match resolve_against(&page_url, &link) {
                Ok(url) => {
                    debug!(link = %link, url = %url, "resolved link");
                    jobs.push(DownloadJob::new(link, url, output_dir));
                }
                Err(error) => {
                    warn!(link = %link, error = %error, "error resolving URL");
                    report.record_failure(link, error);
                }
            }
        }

        if self.dry_run {
            return Ok(HarvestOutcome::DryRun(jobs));
        }

        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|e| HarvestError::io(output_dir, e))?;

        let batch = self.engine.run(&self.client, jobs, shutdown, force).await;
        report.downloaded = batch.downloaded;
        report.failed.extend(batch.failed);
        report.cancelled = batch.cancelled;

        info!(
            downloaded = report.downloaded.len(),
            failed = report.failed.len(),
            cancelled = report.cancelled,
            output_dir = %output_dir.display(),
            "harvest complete"
        );

        Ok(HarvestOutcome::Completed(report))
    }
}
