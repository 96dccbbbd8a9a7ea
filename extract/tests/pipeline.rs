//! End-to-end tests over fixture report directories.

use std::fs;
use std::path::{Path, PathBuf};

use cacti_report_core::{Metric, MetricValue, ReportStatus};
use cacti_report_extract::table::{self, COLUMNS, NOT_AVAILABLE};
use cacti_report_extract::{AnalysisConfig, analyze_directory};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn config_for(dir: &Path) -> AnalysisConfig {
    AnalysisConfig {
        results_dir: dir.to_path_buf(),
        ..AnalysisConfig::default()
    }
}

/// Copies every fixture into a fresh directory, plus a file that must be ignored.
fn fixture_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    for entry in fs::read_dir(fixture("")).expect("fixtures directory") {
        let entry = entry.unwrap();
        fs::copy(entry.path(), dir.path().join(entry.file_name())).unwrap();
    }
    fs::write(dir.path().join("notes.txt"), "Access time (ns): 9.9\n").unwrap();
    dir
}

fn listing_order(dir: &Path, extension: &str) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(extension))
        .collect()
}

#[test]
fn test_fixture_directory_statuses() {
    let dir = fixture_dir();
    let run = analyze_directory(&config_for(dir.path())).unwrap();

    assert_eq!(run.records.len(), 4);
    let status_of = |name: &str| {
        run.records
            .iter()
            .find(|record| record.filename == name)
            .unwrap_or_else(|| panic!("missing record for {name}"))
    };

    let valid = status_of("cache_4096_64_8.out");
    assert_eq!(valid.status(), ReportStatus::Valid);

    let invalid = status_of("cache_8192_128_16.out");
    assert_eq!(invalid.status(), ReportStatus::Invalid);
    assert_eq!(
        invalid.reason(),
        Some("número de conjuntos menor que o mínimo suportado")
    );

    let error = status_of("cache_2048_32_4.out");
    assert_eq!(error.status(), ReportStatus::Error);
    assert_eq!(error.reason(), Some("Runtime error"));

    let summary = run.summary();
    assert_eq!(summary.total, 4);
    assert_eq!(summary.valid, 2);
    assert_eq!(summary.rejected, 2);
}

#[test]
fn test_full_report_metrics() {
    let dir = fixture_dir();
    let run = analyze_directory(&config_for(dir.path())).unwrap();
    let record = run
        .records
        .iter()
        .find(|record| record.filename == "cache_4096_64_8.out")
        .unwrap();
    let report = record.valid_report().unwrap();

    assert_eq!(report.parameters.cache_size, "4096.0");
    assert_eq!(report.parameters.block_size, "64.0");
    assert_eq!(report.parameters.associativity, "8.0");
    assert_eq!(
        report.metric(Metric::AccessTime),
        Some(&MetricValue::Number(0.204612))
    );
    assert_eq!(report.metric(Metric::Sets), Some(&MetricValue::Number(8.0)));
    assert_eq!(report.metric(Metric::Banks), Some(&MetricValue::Number(1.0)));

    let area = report.area.unwrap();
    assert!((area.area_mm2 - area.height_mm * area.width_mm).abs() < 1e-12);
    assert!((area.area_mm2 - 0.152146 * 0.184925).abs() < 1e-12);

    let efficiency = report.efficiency.unwrap();
    assert!((efficiency - 0.204612 / 0.150323).abs() < 1e-12);
}

#[test]
fn test_malformed_values_stay_text_and_skip_derived_fields() {
    let dir = fixture_dir();
    let run = analyze_directory(&config_for(dir.path())).unwrap();
    let record = run
        .records
        .iter()
        .find(|record| record.filename == "cache_1024_16_2.out")
        .unwrap();
    let report = record.valid_report().unwrap();

    assert_eq!(
        report.metric(Metric::AccessTime),
        Some(&MetricValue::Text("0.12.5".into()))
    );
    assert_eq!(
        report.metric(Metric::CycleTime),
        Some(&MetricValue::Number(0.098))
    );
    assert!(report.area.is_none());
    assert!(report.efficiency.is_none());
}

#[test]
fn test_row_order_follows_directory_listing() {
    let dir = tempfile::tempdir().unwrap();
    for name in [
        "res_512_16_1.out",
        "res_65536_64_16.out",
        "res_2048_32_2.out",
        "res_8192_64_4.out",
        "res_1024_8_8.out",
    ] {
        fs::write(dir.path().join(name), "Access time (ns): 1.0\n").unwrap();
    }

    let run = analyze_directory(&config_for(dir.path())).unwrap();
    let names: Vec<String> = run.records.iter().map(|r| r.filename.clone()).collect();
    assert_eq!(names, listing_order(dir.path(), ".out"));
}

#[test]
fn test_csv_round_trip_over_fixtures() {
    let dir = fixture_dir();
    let run = analyze_directory(&config_for(dir.path())).unwrap();
    let out = tempfile::tempdir().unwrap();
    let csv_path = out.path().join("summary.csv");

    table::write_table(&csv_path, &run.records).unwrap();

    let written = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines[0], COLUMNS.join(","));
    assert_eq!(lines.len(), run.records.len() + 1);
    for line in &lines[1..] {
        assert!(!line.split(',').any(str::is_empty), "blank cell in {line}");
    }

    let rows = table::load_valid_rows(&csv_path).unwrap();
    assert_eq!(rows.len(), 2);
    let full = rows
        .iter()
        .find(|row| row.filename == "cache_4096_64_8.out")
        .unwrap();
    assert_eq!(full.value("access_time"), Some(0.204612));
    assert_eq!(full.associativity_value(), Some(8.0));

    let malformed = rows
        .iter()
        .find(|row| row.filename == "cache_1024_16_2.out")
        .unwrap();
    assert_eq!(malformed.value("access_time"), None);
    assert_eq!(malformed.value("area_mm2"), None);
}

#[test]
fn test_rejected_rows_use_placeholders() {
    let dir = fixture_dir();
    let run = analyze_directory(&config_for(dir.path())).unwrap();
    for record in run.records.iter().filter(|r| r.status() != ReportStatus::Valid) {
        let cells = table::row(record);
        assert_eq!(cells.len(), COLUMNS.len());
        assert!(cells[2..].iter().all(|cell| cell == NOT_AVAILABLE));
    }
}

#[test]
fn test_empty_directory_yields_header_only_table() {
    let dir = tempfile::tempdir().unwrap();
    let run = analyze_directory(&config_for(dir.path())).unwrap();
    assert!(run.records.is_empty());
    assert_eq!(run.summary().valid, 0);
    assert_eq!(run.summary().rejected, 0);

    let csv_path = dir.path().join("summary.csv");
    table::write_table(&csv_path, &run.records).unwrap();
    let written = fs::read_to_string(&csv_path).unwrap();
    assert_eq!(written, format!("{}\r\n", COLUMNS.join(",")));
}

#[test]
fn test_missing_directory_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let result = analyze_directory(&config_for(&dir.path().join("absent")));
    assert!(result.is_err());
}

#[test]
fn test_custom_extension() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("run_4096_64_8.txt"), "Cycle time (ns): 2\n").unwrap();
    fs::write(dir.path().join("run_4096_64_8.out"), "Cycle time (ns): 2\n").unwrap();

    let config = AnalysisConfig {
        extension: "txt".to_string(),
        ..config_for(dir.path())
    };
    let run = analyze_directory(&config).unwrap();
    assert_eq!(run.records.len(), 1);
    assert_eq!(run.records[0].filename, "run_4096_64_8.txt");
}
