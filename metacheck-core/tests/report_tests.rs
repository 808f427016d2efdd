// Tests for report generation functionality

use chrono::{TimeZone, Utc};
use metacheck_core::report::{
    ReportData, ReportFormat, flagged_pages, format_timestamp, generate_json_report,
    generate_text_report, render_report, write_report,
};
use metacheck_scanner::{MissingSignals, PageResult};
use tempfile::TempDir;

fn fixed_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()
}

fn sample_results() -> Vec<PageResult> {
    vec![
        PageResult::audited("https://example.com/".into(), MissingSignals::none()),
        PageResult::audited(
            "https://example.com/about".into(),
            MissingSignals {
                h1: true,
                ..MissingSignals::none()
            },
        ),
        PageResult::failed(
            "https://example.com/broken".into(),
            "HTTP request failed: connection refused".into(),
        ),
        PageResult::audited("https://example.com/blank".into(), MissingSignals::all()),
    ]
}

// ============================================================================
// Report Format Tests
// ============================================================================

#[test]
fn test_report_format_from_str() {
    assert_eq!(ReportFormat::from_str("text"), Some(ReportFormat::Text));
    assert_eq!(ReportFormat::from_str("TEXT"), Some(ReportFormat::Text));
    assert_eq!(ReportFormat::from_str("txt"), None);
    assert_eq!(ReportFormat::from_str("JSON"), Some(ReportFormat::Json));
    assert_eq!(ReportFormat::from_str("csv"), None);
}

// ============================================================================
// Flagging Tests
// ============================================================================

#[test]
fn test_flagged_pages_excludes_complete_and_failed_pages() {
    let results = sample_results();
    let flagged = flagged_pages(&results);

    let urls: Vec<&str> = flagged.iter().map(|p| p.url.as_str()).collect();
    assert_eq!(
        urls,
        vec!["https://example.com/about", "https://example.com/blank"]
    );
}

#[test]
fn test_report_data_counts() {
    let data = ReportData::new(sample_results(), 4, fixed_time());

    assert_eq!(data.checked, 4);
    assert_eq!(data.flagged, 2);
    assert_eq!(data.failed_pages().len(), 1);
    assert_eq!(data.failed_pages()[0].url, "https://example.com/broken");
}

// ============================================================================
// Text Report Tests
// ============================================================================

#[test]
fn test_format_timestamp_millis_utc() {
    assert_eq!(format_timestamp(&fixed_time()), "2024-05-01T09:30:00.000Z");
}

#[test]
fn test_text_report_layout() {
    let data = ReportData::new(sample_results(), 4, fixed_time());
    let report = generate_text_report(&data);

    let expected = "🧠 Website Meta Check Report - 2024-05-01T09:30:00.000Z\n\
Checked 4 pages.\n\
Missing tags on 2 pages.\n\
\n\
❌ https://example.com/about\n  - title: ✔\n  - description: ✔\n  - h1: ⛔\n\
\n\
❌ https://example.com/blank\n  - title: ⛔\n  - description: ⛔\n  - h1: ⛔\n";

    assert_eq!(report, expected);
}

#[test]
fn test_text_report_two_page_example() {
    let results = vec![
        PageResult::audited("A".into(), MissingSignals::none()),
        PageResult::audited(
            "B".into(),
            MissingSignals {
                h1: true,
                ..MissingSignals::none()
            },
        ),
    ];
    let report = generate_text_report(&ReportData::new(results, 2, fixed_time()));

    assert!(report.contains("Checked 2 pages."));
    assert!(report.contains("Missing tags on 1 pages."));
    assert!(report.contains("❌ B\n  - title: ✔\n  - description: ✔\n  - h1: ⛔\n"));
    assert!(!report.contains("❌ A"));
}

#[test]
fn test_text_report_with_nothing_flagged() {
    let results = vec![PageResult::audited(
        "https://example.com/".into(),
        MissingSignals::none(),
    )];
    let report = generate_text_report(&ReportData::new(results, 1, fixed_time()));

    assert_eq!(
        report,
        "🧠 Website Meta Check Report - 2024-05-01T09:30:00.000Z\n\
Checked 1 pages.\n\
Missing tags on 0 pages.\n"
    );
}

#[test]
fn test_failed_pages_are_counted_but_not_listed() {
    let results = vec![PageResult::failed(
        "https://example.com/down".into(),
        "dns error".into(),
    )];
    let report = generate_text_report(&ReportData::new(results, 1, fixed_time()));

    assert!(report.contains("Checked 1 pages."));
    assert!(report.contains("Missing tags on 0 pages."));
    assert!(!report.contains("example.com/down"));
}

#[test]
fn test_reports_differ_only_in_timestamp_line() {
    let first = generate_text_report(&ReportData::new(sample_results(), 4, fixed_time()));
    let later = fixed_time() + chrono::Duration::hours(3);
    let second = generate_text_report(&ReportData::new(sample_results(), 4, later));

    let first_lines: Vec<&str> = first.lines().collect();
    let second_lines: Vec<&str> = second.lines().collect();

    assert_ne!(first_lines[0], second_lines[0]);
    assert_eq!(first_lines[1..], second_lines[1..]);
}

// ============================================================================
// JSON Report Tests
// ============================================================================

#[test]
fn test_json_report_includes_every_page() {
    let data = ReportData::new(sample_results(), 4, fixed_time());
    let json = generate_json_report(&data).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["checked"], 4);
    assert_eq!(value["flagged"], 2);
    assert_eq!(value["pages"].as_array().unwrap().len(), 4);
    assert_eq!(value["pages"][1]["missing"]["h1"], true);
    assert_eq!(
        value["pages"][2]["error"],
        "HTTP request failed: connection refused"
    );
}

#[test]
fn test_json_report_round_trips() {
    let data = ReportData::new(sample_results(), 4, fixed_time());
    let json = render_report(&data, ReportFormat::Json).unwrap();
    let parsed: ReportData = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.pages, data.pages);
    assert_eq!(parsed.generated_at, data.generated_at);
}

// ============================================================================
// Report Writing Tests
// ============================================================================

#[test]
fn test_write_report_overwrites_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.txt");

    std::fs::write(&path, "stale contents that are much longer than the new report").unwrap();
    write_report(&path, "fresh").unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "fresh");
}

#[test]
fn test_write_report_into_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope").join("report.txt");

    assert!(write_report(&path, "x").is_err());
}
