//! Download engine for concurrent file downloads.
//!
//! This module provides the `DownloadEngine` which runs one task per job,
//! limits how many of them touch the network at once with a semaphore, and
//! waits for every task before returning.
//!
//! # Example
//!
//! ```no_run
//! use std::future;
//! use std::path::Path;
//! use std::time::Duration;
//!
//! use doc_harvest::{DownloadEngine, DownloadJob, HttpClient};
//! use url::Url;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = DownloadEngine::new(10, Duration::from_secs(10))?;
//! let url = Url::parse("https://example.com/files/report.doc")?;
//! let jobs = vec![DownloadJob::new("files/report.doc", url, Path::new("downloads"))];
//! let report = engine
//!     .run(&HttpClient::new(), jobs, future::pending(), future::pending())
//!     .await;
//! println!("Downloaded: {}, Failed: {}", report.downloaded.len(), report.failed.len());
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::client::{DownloadedFile, HttpClient};
use super::constants::{MAX_CONCURRENCY, MIN_CONCURRENCY};
use super::filename::filename_from_url;
use crate::error::HarvestError;

/// Error type for download engine construction.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },
}

/// One link to download: where it came from, where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadJob {
    /// The `href` value as found on the page.
    pub link: String,
    /// Absolute URL the link resolved to.
    pub url: Url,
    /// File the body is written to.
    pub destination: PathBuf,
}

impl DownloadJob {
    /// Creates a job writing to `output_dir/<filename derived from url>`.
    #[must_use]
    pub fn new(link: impl Into<String>, url: Url, output_dir: &Path) -> Self {
        let destination = output_dir.join(filename_from_url(&url));
        Self {
            link: link.into(),
            url,
            destination,
        }
    }
}

/// A link that could not be downloaded, with the reason.
#[derive(Debug)]
pub struct FailedLink {
    /// The `href` value as found on the page.
    pub link: String,
    /// Why it failed.
    pub error: HarvestError,
}

/// Outcome of a download batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Files written successfully.
    pub downloaded: Vec<DownloadedFile>,
    /// Links that failed to resolve or download.
    pub failed: Vec<FailedLink>,
    /// Tasks that never started or were aborted because of a shutdown request.
    pub cancelled: usize,
}

impl BatchReport {
    /// Returns the number of links accounted for.
    #[must_use]
    pub fn total(&self) -> usize {
        self.downloaded.len() + self.failed.len() + self.cancelled
    }

    /// Returns `true` when every link was downloaded.
    #[must_use]
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty() && self.cancelled == 0
    }

    /// Records a link that failed before reaching the engine.
    pub fn record_failure(&mut self, link: impl Into<String>, error: HarvestError) {
        self.failed.push(FailedLink {
            link: link.into(),
            error,
        });
    }

    fn record(&mut self, outcome: TaskOutcome) {
        match outcome {
            TaskOutcome::Downloaded(file) => self.downloaded.push(file),
            TaskOutcome::Failed(failed) => self.failed.push(failed),
            TaskOutcome::NotStarted => self.cancelled += 1,
        }
    }
}

/// What a single download task produced.
#[derive(Debug)]
enum TaskOutcome {
    Downloaded(DownloadedFile),
    Failed(FailedLink),
    /// The semaphore was closed by a shutdown request before a permit was granted.
    NotStarted,
}

/// Download engine for concurrent file downloads.
///
/// # Concurrency Model
///
/// - Each job runs in its own Tokio task
/// - A semaphore permit is acquired before the task touches the network
/// - Permits are released automatically when downloads complete (RAII)
/// - [`run`](Self::run) returns only after every task has finished or been
///   cancelled
///
/// # Shutdown
///
/// When the shutdown future passed to `run` completes, the semaphore is
/// closed so queued jobs never start, in-flight downloads get the configured
/// grace period, and whatever is still running afterwards is aborted. The
/// force future cuts the grace period short; it is not polled until shutdown
/// has fired.
#[derive(Debug, Clone)]
pub struct DownloadEngine {
    concurrency: usize,
    shutdown_grace: Duration,
}

impl DownloadEngine {
    /// Creates a new download engine.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] if `concurrency` is outside
    /// the valid range (1-100).
    #[instrument(level = "debug")]
    pub fn new(concurrency: usize, shutdown_grace: Duration) -> Result<Self, EngineError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(EngineError::InvalidConcurrency { value: concurrency });
        }

        Ok(Self {
            concurrency,
            shutdown_grace,
        })
    }

    /// Returns the configured concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns how long in-flight downloads may continue after shutdown.
    #[must_use]
    pub fn shutdown_grace(&self) -> Duration {
        self.shutdown_grace
    }

    /// Downloads every job and waits for all of them.
    ///
    /// Individual failures never abort the batch; they are logged and
    /// collected in the returned report. `shutdown` starts the grace period,
    /// `force` ends it early.
    #[instrument(
        skip(self, client, jobs, shutdown, force),
        fields(jobs = jobs.len(), concurrency = self.concurrency)
    )]
    pub async fn run<F, G>(
        &self,
        client: &HttpClient,
        jobs: Vec<DownloadJob>,
        shutdown: F,
        force: G,
    ) -> BatchReport
    where
        F: Future<Output = ()>,
        G: Future<Output = ()>,
    {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for job in jobs {
            tasks.spawn(download_job(client.clone(), job, Arc::clone(&semaphore)));
        }

        debug!(task_count = tasks.len(), "waiting for downloads to complete");

        let mut report = BatchReport::default();
        tokio::pin!(shutdown);

        let interrupted = tokio::select! {
            () = drain(&mut tasks, &mut report) => false,
            () = &mut shutdown => true,
        };

        if interrupted {
            semaphore.close();
            warn!(
                in_flight = tasks.len(),
                grace_secs = self.shutdown_grace.as_secs(),
                "shutdown requested, waiting for in-flight downloads"
            );

            let grace = tokio::time::timeout(self.shutdown_grace, drain(&mut tasks, &mut report));
            let finished = tokio::select! {
                result = grace => result.is_ok(),
                () = force => {
                    warn!("forced shutdown, skipping the rest of the grace period");
                    false
                }
            };

            if !finished {
                warn!(remaining = tasks.len(), "aborting downloads");
                tasks.abort_all();
                drain(&mut tasks, &mut report).await;
            }
        }

        info!(
            downloaded = report.downloaded.len(),
            failed = report.failed.len(),
            cancelled = report.cancelled,
            "download batch finished"
        );

        report
    }
}

/// Joins every remaining task, recording outcomes as they arrive.
async fn drain(tasks: &mut JoinSet<TaskOutcome>, report: &mut BatchReport) {
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => report.record(outcome),
            Err(e) if e.is_cancelled() => report.cancelled += 1,
            Err(e) => {
                // Panics are logged but don't fail the batch
                warn!(error = %e, "download task panicked");
                report.cancelled += 1;
            }
        }
    }
}

async fn download_job(
    client: HttpClient,
    job: DownloadJob,
    semaphore: Arc<Semaphore>,
) -> TaskOutcome {
    let Ok(_permit) = semaphore.acquire_owned().await else {
        debug!(url = %job.url, "shutdown before download started");
        return TaskOutcome::NotStarted;
    };

    info!(url = %job.url, "downloading file");

    match client.download_to_file(&job.url, &job.destination).await {
        Ok(file) => {
            info!(
                path = %file.path.display(),
                bytes = file.bytes,
                "file successfully downloaded"
            );
            TaskOutcome::Downloaded(file)
        }
        Err(error) => {
            warn!(url = %job.url, error = %error, "error downloading file");
            TaskOutcome::Failed(FailedLink {
                link: job.link,
                error,
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::future;

    use super::*;
    use crate::download::DEFAULT_CONCURRENCY;

    const GRACE: Duration = Duration::from_secs(10);

    #[test]
    fn test_engine_new_valid_concurrency() {
        assert_eq!(DownloadEngine::new(1, GRACE).unwrap().concurrency(), 1);
        assert_eq!(DownloadEngine::new(10, GRACE).unwrap().concurrency(), 10);
        assert_eq!(DownloadEngine::new(100, GRACE).unwrap().concurrency(), 100);
    }

    #[test]
    fn test_engine_new_invalid_concurrency_zero() {
        let result = DownloadEngine::new(0, GRACE);
        assert!(matches!(
            result,
            Err(EngineError::InvalidConcurrency { value: 0 })
        ));
    }

    #[test]
    fn test_engine_new_invalid_concurrency_too_high() {
        let result = DownloadEngine::new(101, GRACE);
        assert!(matches!(
            result,
            Err(EngineError::InvalidConcurrency { value: 101 })
        ));
    }

    #[test]
    fn test_engine_stores_shutdown_grace() {
        let engine = DownloadEngine::new(DEFAULT_CONCURRENCY, Duration::from_secs(3)).unwrap();
        assert_eq!(engine.shutdown_grace(), Duration::from_secs(3));
    }

    #[test]
    fn test_engine_error_display() {
        let msg = EngineError::InvalidConcurrency { value: 0 }.to_string();
        assert!(msg.contains("invalid concurrency"));
        assert!(msg.contains("100"));
    }

    #[test]
    fn test_download_job_destination_from_url() {
        let url = Url::parse("https://example.com/archive/x.doc").unwrap();
        let job = DownloadJob::new("../archive/x.doc", url, Path::new("downloads"));
        assert_eq!(job.destination, Path::new("downloads").join("x.doc"));
        assert_eq!(job.link, "../archive/x.doc");
    }

    #[test]
    fn test_batch_report_counts() {
        let mut report = BatchReport::default();
        assert_eq!(report.total(), 0);
        assert!(report.is_complete_success());

        report.record(TaskOutcome::NotStarted);
        report.record_failure("bad.doc", HarvestError::timeout("https://example.com/bad.doc"));
        report.record(TaskOutcome::Downloaded(DownloadedFile {
            url: Url::parse("https://example.com/ok.doc").unwrap(),
            path: PathBuf::from("downloads/ok.doc"),
            bytes: 2,
        }));

        assert_eq!(report.total(), 3);
        assert_eq!(report.cancelled, 1);
        assert_eq!(report.failed[0].link, "bad.doc");
        assert!(!report.is_complete_success());
    }

    #[tokio::test]
    async fn test_run_with_no_jobs_returns_empty_report() {
        let engine = DownloadEngine::new(2, GRACE).unwrap();
        let report = engine
            .run(
                &HttpClient::new(),
                Vec::new(),
                future::pending(),
                future::pending(),
            )
            .await;
        assert_eq!(report.total(), 0);
    }

    #[tokio::test]
    async fn test_run_shutdown_before_start_cancels_every_job() {
        let engine = DownloadEngine::new(1, Duration::ZERO).unwrap();
        let jobs = (0..3)
            .map(|i| {
                let url = Url::parse(&format!("http://127.0.0.1:9/{i}.doc")).unwrap();
                DownloadJob::new(format!("{i}.doc"), url, Path::new("unused"))
            })
            .collect();

        let report = engine
            .run(&HttpClient::new(), jobs, future::ready(()), future::pending())
            .await;

        assert_eq!(report.cancelled, 3);
        assert!(report.downloaded.is_empty());
        assert!(report.failed.is_empty());
    }
}
