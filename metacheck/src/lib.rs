pub mod commands;
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{AuditConfig, emit_report, handle_audit, resolve_output_path, run_audit};
