use anyhow::{Context, Result};
use chrono::Utc;
use clap::ArgMatches;
use colored::Colorize;
use metacheck_core::audit::{
    AuditOptions, DEFAULT_TIMEOUT_SECS, DEFAULT_WORKERS, execute_audit,
};
use metacheck_core::report::{ReportData, ReportFormat, render_report, write_report};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::Level;
use url::Url;

/// Everything a single audit run needs, resolved from the command line
#[derive(Debug, Clone)]
pub struct AuditConfig {
    pub sitemap_url: Url,
    pub output: PathBuf,
    pub threads: usize,
    pub timeout_secs: u64,
    pub format: ReportFormat,
    pub quiet: bool,
    pub show_progress: bool,
    pub verbosity: u8,
}

impl AuditConfig {
    pub fn from_matches(args: &ArgMatches) -> Result<Self, String> {
        let sitemap_url = args
            .get_one::<Url>("url")
            .cloned()
            .ok_or_else(|| "--url must be provided".to_string())?;

        let output = args
            .get_one::<String>("output")
            .map(|raw| resolve_output_path(raw))
            .unwrap_or_else(|| PathBuf::from("report.txt"));

        let format_name = args
            .get_one::<String>("format")
            .map(String::as_str)
            .unwrap_or("text");
        let format = ReportFormat::from_str(format_name)
            .ok_or_else(|| format!("Unsupported report format '{}'", format_name))?;

        Ok(Self {
            sitemap_url,
            output,
            threads: *args
                .get_one::<usize>("threads")
                .unwrap_or(&DEFAULT_WORKERS),
            timeout_secs: *args
                .get_one::<u64>("timeout")
                .unwrap_or(&DEFAULT_TIMEOUT_SECS),
            format,
            quiet: args.get_flag("quiet"),
            show_progress: !args.get_flag("no-progress"),
            verbosity: args.get_count("verbose"),
        })
    }

    pub fn audit_options(&self) -> AuditOptions {
        AuditOptions {
            sitemap_url: self.sitemap_url.as_str().to_string(),
            workers: self.threads,
            timeout_secs: self.timeout_secs,
            show_progress_bars: self.show_progress,
        }
    }
}

/// Expand a leading `~` in the report path
pub fn resolve_output_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Map the `-v` count onto a log level. Warnings are always shown.
pub fn log_level(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

/// Logs go to stderr so stdout carries only the report
pub fn init_logging(verbosity: u8) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(log_level(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Audit the sitemap, write the report file and return the report with its data.
pub async fn run_audit(config: &AuditConfig) -> Result<(ReportData, String)> {
    let run = execute_audit(config.audit_options()).await?;
    let data = ReportData::from_run(run, Utc::now());
    let report = render_report(&data, config.format)?;

    write_report(&config.output, &report)
        .with_context(|| format!("failed to write report to {}", config.output.display()))?;

    Ok((data, report))
}

/// Echo the report to `out` unless `quiet` is set
pub fn emit_report(out: &mut impl Write, report: &str, quiet: bool) -> io::Result<()> {
    if quiet {
        return Ok(());
    }
    writeln!(out, "{}", report)?;
    out.flush()
}

pub async fn handle_audit(args: &ArgMatches) {
    let config = match AuditConfig::from_matches(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    init_logging(config.verbosity);

    eprintln!(
        "{} Auditing {} ({} workers)",
        "→".blue(),
        config.sitemap_url.as_str().bright_white(),
        config.threads.to_string().cyan()
    );

    let (data, report) = match run_audit(&config).await {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    let failed = data.failed_pages().len();
    if failed > 0 {
        eprintln!(
            "{} {} of {} pages could not be fetched and are not counted as missing tags",
            "⚠".yellow().bold(),
            failed.to_string().yellow(),
            data.checked
        );
    }
    eprintln!(
        "{} Report written to {}",
        "✓".green().bold(),
        config.output.display().to_string().bright_white()
    );

    if let Err(e) = emit_report(&mut io::stdout().lock(), &report, config.quiet) {
        eprintln!("{} failed to write report to stdout: {}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
