use serde::{Deserialize, Serialize};

/// Which of the three tracked signals were absent or empty on a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingSignals {
    pub title: bool,
    pub description: bool,
    pub h1: bool,
}

impl MissingSignals {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self {
            title: true,
            description: true,
            h1: true,
        }
    }

    /// True if at least one signal is missing.
    pub fn any(&self) -> bool {
        self.title || self.description || self.h1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageOutcome {
    Audited { missing: MissingSignals },
    Failed { error: String },
}

/// Outcome of auditing a single sitemap URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    pub url: String,
    #[serde(flatten)]
    pub outcome: PageOutcome,
}

impl PageResult {
    pub fn audited(url: String, missing: MissingSignals) -> Self {
        Self {
            url,
            outcome: PageOutcome::Audited { missing },
        }
    }

    pub fn failed(url: String, error: String) -> Self {
        Self {
            url,
            outcome: PageOutcome::Failed { error },
        }
    }

    pub fn missing(&self) -> Option<&MissingSignals> {
        match &self.outcome {
            PageOutcome::Audited { missing } => Some(missing),
            PageOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            PageOutcome::Failed { error } => Some(error),
            PageOutcome::Audited { .. } => None,
        }
    }

    /// A page is flagged when it was fetched successfully and lacks at least one signal.
    /// Failed pages are never flagged.
    pub fn is_flagged(&self) -> bool {
        self.missing().is_some_and(MissingSignals::any)
    }
}
