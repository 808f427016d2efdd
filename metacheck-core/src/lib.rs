pub mod audit;
pub mod report;

pub use audit::{AuditOptions, AuditRun, execute_audit};
pub use report::{ReportData, ReportFormat, generate_text_report, render_report, write_report};
