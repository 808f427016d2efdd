use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

impl From<quick_xml::Error> for ScanError {
    fn from(err: quick_xml::Error) -> Self {
        ScanError::ParseError(format!("malformed sitemap XML: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
