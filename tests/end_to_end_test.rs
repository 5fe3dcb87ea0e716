//! End-to-end tests for carestat
//!
//! These tests run complete workflows from JSONL files on disk through the
//! report generator to formatted output, and drive the binary itself.

mod common;

use carestat::output::get_formatter;
use carestat::reports::ReportGenerator;
use carestat_core::aggregation_types::BreakdownVariant;
use carestat_core::clock::Clock;
use carestat_core::types::{ServiceKind, YearMonth};
use carestat_provider_json::JsonlSource;
use common::{TestDataDir, date, item_line};
use std::process::Command;

fn fixture() -> TestDataDir {
    let data = TestDataDir::new();
    data.write(
        "2025/requests.jsonl",
        &[
            item_line(
                "request",
                "r1",
                "2025-01-29",
                Some("2025-02-03"),
                7.0,
                &["Shopping"],
                "Riverside",
            ),
            item_line("request", "r2", "2025-06-01", None, 3.5, &["information"], "Hillcrest"),
            item_line(
                "request",
                "r3",
                "2025-03-01",
                None,
                7.0,
                &["Information", "Transport"],
                "",
            ),
            "{\"type\":\"request\",\"id\":\"broken\"".to_string(),
        ],
    );
    data.write(
        "packages.jsonl",
        &[item_line(
            "package",
            "p1",
            "2024-12-25",
            Some("2025-01-07"),
            14.0,
            &["Personal Care"],
            "Riverside",
        )],
    );
    data.write(
        "clients.jsonl",
        &[
            r#"{"type":"client","id":"c1","completedBy":"s1","attendanceAllowance":{"status":"High","requestedLevel":"High","requestedDate":"2025-01-15","confirmationDate":"2025-06-02"}}"#.to_string(),
            r#"{"type":"client","id":"c2","open":false,"attendanceAllowance":{"status":"Pending","requestedDate":"2025-05-01"}}"#.to_string(),
            r#"{"type":"coordinator","staffId":"s1"}"#.to_string(),
        ],
    );
    data
}

fn generator(data: &TestDataDir) -> ReportGenerator<JsonlSource> {
    ReportGenerator::new(
        JsonlSource::new(data.path()),
        Clock::fixed(date(2025, 6, 30)),
    )
}

#[tokio::test]
async fn test_requests_report_from_files() {
    let data = fixture();
    let report = generator(&data)
        .generate_requests_report(Some(2025), BreakdownVariant::Locality)
        .await
        .unwrap();

    let january = report.month(YearMonth::new(2025, 1)).unwrap();
    assert_eq!(january.tally.total_hours, 3.0);
    assert_eq!(
        january.tally.services.get(&ServiceKind::Shopping).unwrap().total_hours,
        3.0
    );

    // r2 is information-only; r3 has a blank locality.
    let june = report.month(YearMonth::new(2025, 6)).unwrap();
    assert!(june.tally.breakdown.get("Hillcrest").is_none());
    assert_eq!(june.tally.breakdown.get("Unknown").unwrap().total_hours, 29.0);
}

#[tokio::test]
async fn test_information_report_from_files() {
    let data = fixture();
    let report = generator(&data)
        .generate_information_report(Some(2025), BreakdownVariant::Locality)
        .await
        .unwrap();

    let june = report.month(YearMonth::new(2025, 6)).unwrap();
    // r2 starts and ends in June: 30 days at 3.5/week; r3: 29 days at 7/week
    assert_eq!(june.tally.total_hours, 44.0);
    assert_eq!(
        june.tally
            .services
            .get(&ServiceKind::Information)
            .unwrap()
            .total_hours,
        44.0
    );
    assert!(report.month(YearMonth::new(2025, 1)).unwrap().tally.breakdown.is_empty());
}

#[tokio::test]
async fn test_packages_cross_section_and_attendance_from_files() {
    let data = fixture();
    let generator = generator(&data);

    let packages = generator
        .generate_packages_report(Some(2024), BreakdownVariant::Locality)
        .await
        .unwrap();
    // December: 31 - 25 + 1 = 7 days; January: 7 - 1 = 6 days
    assert_eq!(packages.month(YearMonth::new(2024, 12)).unwrap().tally.total_hours, 14.0);
    assert_eq!(packages.month(YearMonth::new(2025, 1)).unwrap().tally.total_hours, 12.0);

    let section = generator
        .generate_active_requests_cross_section(BreakdownVariant::Locality)
        .await
        .unwrap();
    // r2 (information-only) and r3 are still open
    assert_eq!(section.tally.total_hours, 10.5);

    let allowance = generator
        .generate_attendance_allowance_report(Some(2025))
        .await
        .unwrap();
    assert_eq!(allowance.month(YearMonth::new(2025, 1)).unwrap().counts.requested, 1);
    assert_eq!(allowance.month(YearMonth::new(2025, 5)).unwrap().counts.requested, 1);
    assert_eq!(allowance.month(YearMonth::new(2025, 6)).unwrap().counts.receiving_high, 1);

    let coordinators = generator
        .generate_coordinator_attendance_allowance_report(Some(2025))
        .await
        .unwrap();
    assert_eq!(coordinators.year(2025).unwrap().counts.requested, 1);

    let open = generator
        .generate_attendance_allowance_cross_section()
        .await
        .unwrap();
    assert_eq!(open.overall.requested, 1);
    assert_eq!(open.this_month.receiving_high_and_requested_high, 1);
}

#[tokio::test]
async fn test_formatted_output() {
    let data = fixture();
    let report = generator(&data)
        .generate_requests_report(Some(2025), BreakdownVariant::Locality)
        .await
        .unwrap();

    let table = get_formatter(false).format_report("Service request hours", &report);
    assert!(table.contains("Service request hours"));
    assert!(table.contains("2025-12"));
    assert!(table.contains("Riverside"));

    let json = get_formatter(true).format_report("Service request hours", &report);
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["report"]["variant"], "locality");
    assert_eq!(value["report"]["years"][0]["months"][0]["totalHours"], 3.0);
}

#[test]
fn test_binary_json_report() {
    let data = fixture();
    let output = Command::new(env!("CARGO_BIN_EXE_carestat"))
        .arg("--data")
        .arg(data.path())
        .args(["--as-of", "2025-06-30", "--json", "report", "packages"])
        .args(["--since-year", "2024", "--deprivation"])
        .output()
        .expect("run carestat");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["title"], "Care package hours");
    assert_eq!(value["report"]["variant"], "deprivation");
    assert_eq!(value["report"]["years"].as_array().unwrap().len(), 2);
    assert_eq!(value["report"]["years"][0]["breakdown"][0]["name"], "Unknown");
}

#[test]
fn test_binary_rejects_missing_data_directory() {
    let output = Command::new(env!("CARGO_BIN_EXE_carestat"))
        .args(["--data", "/nonexistent/carestat-data", "attendance-cross-section"])
        .output()
        .expect("run carestat");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("NoDataDirectory"));
}
