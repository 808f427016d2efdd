pub mod auditor;
pub mod error;
pub mod extract;
pub mod result;
pub mod sitemap;

pub use auditor::{Auditor, ProgressCallback};
pub use error::ScanError;
pub use extract::extract_signals;
pub use result::{MissingSignals, PageOutcome, PageResult};
pub use sitemap::parse_sitemap;
