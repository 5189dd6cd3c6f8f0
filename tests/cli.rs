use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

const SALES: &str = "Category,Date,TotalSales,QuantitySold\n\
                     X,2022-01-01,100,10\n\
                     X,2023-01-01,200,20\n\
                     Y,2023-05-01,80,8\n\
                     Z,2023-05-01,5,1\n";
const MARKETING: &str = "Category,Cost\nX,50\nY,40\n";

fn kpiboard(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("kpiboard").unwrap();
    cmd.current_dir(dir)
        .env("KPIBOARD_CONFIG", dir.join("settings.json"))
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "warn");
    cmd
}

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

#[test]
fn report_writes_charts_and_html() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "sales.csv", SALES);
    write(dir.path(), "marketing.csv", MARKETING);

    kpiboard(dir.path())
        .args(["report", "--sales", "sales.csv", "--marketing", "marketing.csv", "--output-dir", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("HTML report generated"))
        .stdout(predicate::str::contains("$300.00"));

    let out = dir.path().join("out");
    for name in ["total_sales.svg", "roms.svg", "aov.svg", "kpi_dashboard.html"] {
        assert!(out.join(name).exists(), "{name} missing");
    }
    let html = std::fs::read_to_string(out.join("kpi_dashboard.html")).unwrap();
    assert!(html.contains("<td>X</td>"));
    assert!(html.contains("300.00"));
    assert!(html.contains("<td>Y</td>"));
    assert!(html.contains("Insufficient data"));
    // Z has no cost row and is dropped by the join.
    assert!(!html.contains("<td>Z</td>"));
}

#[test]
fn report_uses_default_input_names_in_working_dir() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "sales data1.csv", SALES);
    write(dir.path(), "sales data2.csv", MARKETING);

    kpiboard(dir.path()).arg("report").assert().success();
    assert!(dir.path().join("kpi_dashboard.html").exists());
    assert!(dir.path().join("roms.svg").exists());
}

#[test]
fn report_fails_fast_on_missing_cost_column() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "sales.csv", SALES);
    write(dir.path(), "marketing.csv", "Category,Budget\nX,50\n");

    kpiboard(dir.path())
        .args(["report", "--sales", "sales.csv", "--marketing", "marketing.csv"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Missing columns in the dataset: Cost"));
    assert!(!dir.path().join("kpi_dashboard.html").exists());
    assert!(!dir.path().join("total_sales.svg").exists());
}

#[test]
fn report_rejects_zero_cost() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "sales.csv", SALES);
    write(dir.path(), "marketing.csv", "Category,Cost\nX,0\n");

    kpiboard(dir.path())
        .args(["report", "--sales", "sales.csv", "--marketing", "marketing.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ROMS").and(predicate::str::contains("\"X\"")));
}

#[test]
fn report_joined_cost_basis_counts_join_duplicates() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "sales.csv", SALES);
    write(dir.path(), "marketing.csv", "Category,Cost\nX,50\nX,30\n");

    kpiboard(dir.path())
        .args(["report", "--sales", "sales.csv", "--marketing", "marketing.csv", "--cost-basis", "joined"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$600.00"));
}

#[test]
fn init_then_status_reflects_saved_settings() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "q3-sales.csv", SALES);

    kpiboard(dir.path())
        .args(["init", "--sales", "q3-sales.csv", "--output-dir", "reports"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved settings to"));
    assert!(dir.path().join("settings.json").exists());

    kpiboard(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("q3-sales.csv"))
        .stdout(predicate::str::contains("found"))
        .stdout(predicate::str::contains("missing"))
        .stdout(predicate::str::contains("reports"));
}

#[test]
fn report_missing_input_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    kpiboard(dir.path())
        .args(["report", "--sales", "nowhere.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nowhere.csv"));
}
