use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
pub use metacheck_scanner::auditor::{DEFAULT_TIMEOUT_SECS, DEFAULT_WORKERS};
use metacheck_scanner::{Auditor, PageResult};
use std::sync::Arc;
use tracing::info;

/// Options for configuring an audit run
pub struct AuditOptions {
    pub sitemap_url: String,
    pub workers: usize,
    pub timeout_secs: u64,
    pub show_progress_bars: bool,
}

impl AuditOptions {
    pub fn new(sitemap_url: impl Into<String>) -> Self {
        Self {
            sitemap_url: sitemap_url.into(),
            workers: DEFAULT_WORKERS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            show_progress_bars: false,
        }
    }
}

/// The sitemap URL list together with one result per URL, in sitemap order.
#[derive(Debug, Clone)]
pub struct AuditRun {
    pub urls: Vec<String>,
    pub results: Vec<PageResult>,
}

impl AuditRun {
    /// Number of pages checked, which is always the number of sitemap URLs.
    pub fn checked(&self) -> usize {
        self.urls.len()
    }
}

/// Fetch the sitemap and audit every page it lists.
///
/// A sitemap failure aborts the run. Individual page failures are recorded
/// in the returned results.
pub async fn execute_audit(options: AuditOptions) -> Result<AuditRun> {
    let AuditOptions {
        sitemap_url,
        workers,
        timeout_secs,
        show_progress_bars,
    } = options;

    let mut auditor = Auditor::with_timeout(timeout_secs)
        .context("failed to create HTTP client")?
        .with_workers(workers);

    let urls = auditor
        .fetch_sitemap(&sitemap_url)
        .await
        .with_context(|| format!("failed to load sitemap {}", sitemap_url))?;

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new(urls.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("=>-"),
        );
        pb.set_message("Auditing pages...");
        Some(pb)
    } else {
        None
    };

    if let Some(ref pb) = progress_bar {
        let pb = pb.clone();
        auditor = auditor.with_progress_callback(Arc::new(move |done: usize, url: String| {
            pb.set_position(done as u64);
            pb.set_message(url);
        }));
    }

    let results = auditor.audit_all(&urls).await;

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    let flagged = results.iter().filter(|r| r.is_flagged()).count();
    info!(
        "Checked {} pages from {}, {} with missing tags",
        urls.len(),
        sitemap_url,
        flagged
    );

    Ok(AuditRun { urls, results })
}
