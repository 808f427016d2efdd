use crate::error::{Result, ScanError};
use crate::extract::extract_signals;
use crate::result::{MissingSignals, PageResult};
use crate::sitemap::parse_sitemap;
use futures::future::join_all;
use reqwest::Client;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_WORKERS: usize = 10;

/// Called after each page settles with the number of pages completed so far and the page URL.
pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

pub struct Auditor {
    client: Client,
    workers: usize,
    progress_callback: Option<ProgressCallback>,
}

impl Auditor {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let timeout = Duration::from_secs(timeout_secs.max(1));
        let client = Client::builder()
            .user_agent(concat!(
                "metacheck/",
                env!("CARGO_PKG_VERSION"),
                " (https://github.com/trapdoorsec/metacheck)"
            ))
            .timeout(timeout)
            .connect_timeout(timeout)
            .pool_max_idle_per_host(50)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            workers: DEFAULT_WORKERS,
            progress_callback: None,
        })
    }

    /// Upper bound on concurrent page requests. Zero is treated as one.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Download a sitemap and return the page URLs it lists.
    ///
    /// Network and parse failures are returned as errors; nothing is retried.
    pub async fn fetch_sitemap(&self, sitemap_url: &str) -> Result<Vec<String>> {
        let parsed = Url::parse(sitemap_url)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", sitemap_url, e)))?;

        info!("Fetching sitemap {}", parsed);
        let response = self.client.get(parsed).send().await?;
        debug!("Sitemap responded with status {}", response.status());

        let body = response.text().await?;
        let urls = parse_sitemap(&body)?;

        info!("Sitemap lists {} pages", urls.len());
        Ok(urls)
    }

    /// Audit a single page. Failures are captured in the returned result.
    pub async fn audit_page(&self, url: &str) -> PageResult {
        Self::audit_with_client(&self.client, url.to_string()).await
    }

    /// Audit every URL with at most `workers` requests in flight.
    ///
    /// Returns exactly one result per input URL, in input order.
    pub async fn audit_all(&self, urls: &[String]) -> Vec<PageResult> {
        info!("Auditing {} pages with {} workers", urls.len(), self.workers);
        let start = Instant::now();

        let semaphore = Arc::new(Semaphore::new(self.workers));
        let completed = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = urls
            .iter()
            .map(|url| {
                let client = self.client.clone();
                let semaphore = semaphore.clone();
                let completed = completed.clone();
                let progress_cb = self.progress_callback.clone();
                let url = url.clone();

                tokio::spawn(async move {
                    let result = match semaphore.acquire_owned().await {
                        Ok(_permit) => Self::audit_with_client(&client, url).await,
                        Err(e) => PageResult::failed(url, e.to_string()),
                    };

                    let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    if let Some(ref callback) = progress_cb {
                        callback(done, result.url.clone());
                    }

                    result
                })
            })
            .collect();

        let results: Vec<PageResult> = join_all(handles)
            .await
            .into_iter()
            .zip(urls)
            .map(|(joined, url)| {
                joined.unwrap_or_else(|e| {
                    let err = ScanError::from(e);
                    warn!("Audit task for {} did not complete: {}", url, err);
                    PageResult::failed(url.clone(), err.to_string())
                })
            })
            .collect();

        let failed = results.iter().filter(|r| r.error().is_some()).count();
        info!(
            "Audit complete. {} pages in {:.2?} ({} failed)",
            results.len(),
            start.elapsed(),
            failed
        );

        results
    }

    async fn audit_with_client(client: &Client, url: String) -> PageResult {
        match Self::fetch_signals(client, &url).await {
            Ok(missing) => {
                debug!("Audited {}: {:?}", url, missing);
                PageResult::audited(url, missing)
            }
            Err(e) => {
                warn!("Audit error for {}: {}", url, e);
                PageResult::failed(url, e.to_string())
            }
        }
    }

    async fn fetch_signals(client: &Client, url: &str) -> Result<MissingSignals> {
        let parsed =
            Url::parse(url).map_err(|e| ScanError::InvalidUrl(format!("'{}': {}", url, e)))?;

        debug!("Fetching {}", parsed);
        let response = client.get(parsed).send().await?;
        debug!("{} responded with status {}", url, response.status());

        let body = response.text().await?;
        Ok(extract_signals(&body))
    }
}
