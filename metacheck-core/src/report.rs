// Report generation from audit results

use crate::audit::AuditRun;
use chrono::{DateTime, SecondsFormat, Utc};
use metacheck_scanner::PageResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

const PRESENT_MARK: &str = "✔";
const MISSING_MARK: &str = "⛔";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportData {
    pub generated_at: DateTime<Utc>,
    /// Pages checked, including pages that failed to fetch
    pub checked: usize,
    /// Error-free pages with at least one missing signal
    pub flagged: usize,
    pub pages: Vec<PageResult>,
}

impl ReportData {
    pub fn new(pages: Vec<PageResult>, checked: usize, generated_at: DateTime<Utc>) -> Self {
        let flagged = flagged_pages(&pages).len();
        Self {
            generated_at,
            checked,
            flagged,
            pages,
        }
    }

    pub fn from_run(run: AuditRun, generated_at: DateTime<Utc>) -> Self {
        let checked = run.checked();
        Self::new(run.results, checked, generated_at)
    }

    pub fn flagged_pages(&self) -> Vec<&PageResult> {
        flagged_pages(&self.pages)
    }

    pub fn failed_pages(&self) -> Vec<&PageResult> {
        self.pages.iter().filter(|p| p.error().is_some()).collect()
    }
}

/// Pages that were fetched without error and lack at least one signal, in input order.
pub fn flagged_pages(results: &[PageResult]) -> Vec<&PageResult> {
    results.iter().filter(|r| r.is_flagged()).collect()
}

/// ISO-8601 UTC timestamp with millisecond precision, e.g. `2024-05-01T09:30:00.000Z`.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn mark(missing: bool) -> &'static str {
    if missing { MISSING_MARK } else { PRESENT_MARK }
}

pub fn generate_text_report(data: &ReportData) -> String {
    let flagged = data.flagged_pages();

    let mut lines = vec![
        format!(
            "🧠 Website Meta Check Report - {}",
            format_timestamp(&data.generated_at)
        ),
        format!("Checked {} pages.", data.checked),
        format!("Missing tags on {} pages.", flagged.len()),
        String::new(),
    ];

    for page in flagged {
        if let Some(missing) = page.missing() {
            lines.push(format!(
                "❌ {}\n  - title: {}\n  - description: {}\n  - h1: {}\n",
                page.url,
                mark(missing.title),
                mark(missing.description),
                mark(missing.h1)
            ));
        }
    }

    lines.join("\n")
}

pub fn generate_json_report(data: &ReportData) -> serde_json::Result<String> {
    serde_json::to_string_pretty(data)
}

pub fn render_report(data: &ReportData, format: ReportFormat) -> anyhow::Result<String> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(data)),
        ReportFormat::Json => Ok(generate_json_report(data)?),
    }
}

/// Write the report to `path`, replacing any existing file.
pub fn write_report(path: &Path, contents: &str) -> io::Result<()> {
    fs::write(path, contents)
}
