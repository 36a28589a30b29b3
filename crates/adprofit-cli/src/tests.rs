//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::fs;
use std::path::{Path, PathBuf};

use adprofit_core::{
    pipeline, test_utils::MockSheetServer, AppConfig, ExportFormat, InvalidCostPolicy,
    RevenueSource, RowOutcome, SpendRecord,
};
use tempfile::TempDir;

use crate::cli::InputArgs;
use crate::commands::{self, truncate, ReportTarget};

const SPEND: &str = "Campaign report
Campaign,Clicks,Cost
Small (300),4,5.00
Sale (100),12,40.00
Unnamed Campaign,1,10.00
Big (200),90,\"1,000.00\"
";

const REVENUE: &str = "campid,estimated_revenue
100,50
100,30
200,900
999,15
";

/// Write the spend and revenue fixtures, returning the input args
fn setup_inputs(dir: &TempDir) -> InputArgs {
    let spend = dir.path().join("spend.csv");
    let revenue = dir.path().join("revenue.csv");
    fs::write(&spend, SPEND).unwrap();
    fs::write(&revenue, REVENUE).unwrap();
    InputArgs {
        spend,
        revenue: Some(revenue),
        revenue_url: None,
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

// ========== Input Tests ==========

#[test]
fn test_revenue_source_prefers_command_line() {
    let mut config = AppConfig::default();
    config.revenue = Some(RevenueSource::Url("https://example.com/config.csv".into()));

    let input = InputArgs {
        spend: PathBuf::from("spend.csv"),
        revenue: Some(PathBuf::from("revenue.csv")),
        revenue_url: None,
    };
    assert_eq!(
        commands::revenue_source(&input, &config).unwrap(),
        RevenueSource::File(PathBuf::from("revenue.csv"))
    );

    let input = InputArgs {
        spend: PathBuf::from("spend.csv"),
        revenue: None,
        revenue_url: None,
    };
    assert_eq!(
        commands::revenue_source(&input, &config).unwrap(),
        RevenueSource::Url("https://example.com/config.csv".into())
    );
}

#[test]
fn test_revenue_source_missing() {
    let input = InputArgs {
        spend: PathBuf::from("spend.csv"),
        revenue: None,
        revenue_url: None,
    };
    let err = commands::revenue_source(&input, &AppConfig::default()).unwrap_err();
    assert!(err.to_string().contains("No revenue feed"));
}

#[test]
fn test_load_spend_missing_file() {
    let err = commands::load_spend(Path::new("/nonexistent/spend.csv"), &AppConfig::default())
        .unwrap_err();
    assert!(err.to_string().contains("Failed to open file"));
}

#[test]
fn test_load_spend_schema_error_shows_rows() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("spend.csv");
    fs::write(&path, "Report title\nName,Cost\nA (1),2\n").unwrap();

    let err = commands::load_spend(&path, &AppConfig::default()).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("First rows of the file"));
    assert!(message.contains("Name, Cost"));
    assert!(message.contains("Missing required column(s) in spend feed: Campaign"));
}

#[tokio::test]
async fn test_load_inputs_from_files() {
    let dir = TempDir::new().unwrap();
    let input = setup_inputs(&dir);

    let (spend, revenue) = commands::load_inputs(&input, &AppConfig::default())
        .await
        .unwrap();
    assert_eq!(spend.len(), 4);
    assert_eq!(spend[0].campaign_label, "Small (300)");
    assert_eq!(revenue.len(), 4);
}

#[tokio::test]
async fn test_load_inputs_from_published_sheet() {
    let dir = TempDir::new().unwrap();
    let mut input = setup_inputs(&dir);
    let server = MockSheetServer::start(REVENUE).await;
    input.revenue = None;
    input.revenue_url = Some(server.csv_url());

    let (_, revenue) = commands::load_inputs(&input, &AppConfig::default())
        .await
        .unwrap();
    assert_eq!(revenue.len(), 4);
    assert_eq!(revenue[2].campaign_id, 200);
}

#[tokio::test]
async fn test_load_inputs_sheet_not_found() {
    let dir = TempDir::new().unwrap();
    let mut input = setup_inputs(&dir);
    let server = MockSheetServer::start(REVENUE).await;
    input.revenue = None;
    input.revenue_url = Some(format!("{}/missing", server.url()));

    let err = commands::load_inputs(&input, &AppConfig::default())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Failed to load revenue feed"));
}

// ========== Reconcile Command Tests ==========

#[tokio::test]
async fn test_cmd_reconcile_writes_sorted_csv() {
    let dir = TempDir::new().unwrap();
    let input = setup_inputs(&dir);
    let out = dir.path().join("report.csv");

    commands::cmd_reconcile(
        &AppConfig::default(),
        &input,
        ExportFormat::Csv,
        true,
        &ReportTarget::File(out.clone()),
    )
    .await
    .unwrap();

    assert_eq!(
        read(&out),
        "CampID,Campaign Name,Spend,Revenue,Profit/Loss
200,Big (200),1000,900,-100
100,Sale (100),40,80,40
300,Small (300),5,0,-5
"
    );
}

#[tokio::test]
async fn test_cmd_reconcile_unsorted_keeps_input_order() {
    let dir = TempDir::new().unwrap();
    let input = setup_inputs(&dir);
    let out = dir.path().join("report.csv");

    commands::cmd_reconcile(
        &AppConfig::default(),
        &input,
        ExportFormat::Csv,
        false,
        &ReportTarget::File(out.clone()),
    )
    .await
    .unwrap();

    let ids: Vec<String> = read(&out)
        .lines()
        .skip(1)
        .map(|l| l.split(',').next().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["300", "100", "200"]);
}

#[tokio::test]
async fn test_cmd_reconcile_json() {
    let dir = TempDir::new().unwrap();
    let input = setup_inputs(&dir);
    let out = dir.path().join("report.json");

    commands::cmd_reconcile(
        &AppConfig::default(),
        &input,
        ExportFormat::Json,
        true,
        &ReportTarget::File(out.clone()),
    )
    .await
    .unwrap();

    let value: serde_json::Value = serde_json::from_str(&read(&out)).unwrap();
    assert_eq!(value["rows"].as_array().unwrap().len(), 3);
    assert_eq!(value["rows"][0]["campaign_id"], 200);
    assert_eq!(value["totals"]["excluded_no_id"], 1);
    assert_eq!(value["totals"]["unmatched_revenue_campaigns"], 1);
    assert_eq!(value["fingerprint"].as_str().unwrap().len(), 64);
}

#[tokio::test]
async fn test_cmd_reconcile_rejects_invalid_cost() {
    let dir = TempDir::new().unwrap();
    let input = setup_inputs(&dir);
    fs::write(&input.spend, "Campaign,Cost\nSale (100),n/a\n").unwrap();
    let out = dir.path().join("report.csv");

    let mut config = AppConfig::default();
    config.pipeline.invalid_cost = InvalidCostPolicy::Reject;

    let result = commands::cmd_reconcile(
        &config,
        &input,
        ExportFormat::Csv,
        true,
        &ReportTarget::File(out.clone()),
    )
    .await;

    let err = result.unwrap_err();
    assert!(format!("{:#}", err).contains("Invalid cost on line(s) 2"));
    assert!(!out.exists());
}

#[test]
fn test_render_report_propagates_invalid_cost() {
    let result = pipeline::run(
        &[
            SpendRecord::new("Sale (100)", "40"),
            SpendRecord::new("X (5)", "abc"),
        ],
        &[],
        &AppConfig::default().pipeline,
    )
    .unwrap();

    let csv = commands::render_report(&result, ExportFormat::Csv, true).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[1], "100,Sale (100),40,0,-40");
    assert_eq!(lines[2], "5,X (5),NaN,0,NaN");
}

#[test]
fn test_default_output_path() {
    let csv = commands::default_output_path(ExportFormat::Csv);
    let name = csv.to_str().unwrap();
    assert!(name.starts_with("campaign_pnl_"));
    assert!(name.ends_with(".csv"));
    // campaign_pnl_YYYY-MM-DD.csv
    assert_eq!(name.len(), "campaign_pnl_".len() + 10 + ".csv".len());

    let json = commands::default_output_path(ExportFormat::Json);
    assert_eq!(json.extension().unwrap(), "json");
}

// ========== Check Command Tests ==========

#[tokio::test]
async fn test_cmd_check() {
    let dir = TempDir::new().unwrap();
    let input = setup_inputs(&dir);

    let result = commands::cmd_check(&AppConfig::default(), &input, true).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_cmd_check_reports_instead_of_rejecting() {
    let dir = TempDir::new().unwrap();
    let input = setup_inputs(&dir);
    fs::write(&input.spend, "Campaign,Cost\nA (1),n/a\nA again (1),3\n").unwrap();

    let mut config = AppConfig::default();
    config.pipeline.invalid_cost = InvalidCostPolicy::Reject;

    let result = commands::cmd_check(&config, &input, false).await;
    assert!(result.is_ok());
}

#[test]
fn test_describe_outcome() {
    let outcomes = adprofit_core::spend::normalize_spend(&[
        SpendRecord::new("Sale (100)", "40"),
        SpendRecord::new("Unnamed Campaign", "10"),
        SpendRecord::new("X (5)", "abc"),
    ]);

    assert!(matches!(outcomes[1], RowOutcome::ExcludedNoId { .. }));
    assert!(commands::describe_outcome(&outcomes[0]).contains("Sale (100)"));
    assert!(commands::describe_outcome(&outcomes[1]).contains("no id"));
    assert!(commands::describe_outcome(&outcomes[2]).contains("\"abc\""));
}

// ========== Extract Command Tests ==========

#[test]
fn test_format_extraction() {
    assert_eq!(
        commands::format_extraction("Holiday Promo (48213)"),
        "48213\tHoliday Promo (48213)"
    );
    assert_eq!(
        commands::format_extraction("Unnamed Campaign"),
        "-\tUnnamed Campaign"
    );
}

#[test]
fn test_cmd_extract() {
    let labels = vec!["Sale (100)".to_string(), "none".to_string()];
    assert!(commands::cmd_extract(&labels).is_ok());
}

// ========== Config Command Tests ==========

#[test]
fn test_config_origin_explicit() {
    let path = Path::new("/etc/adprofit.toml");
    assert_eq!(commands::config_origin(Some(path)), "/etc/adprofit.toml");
}

#[test]
fn test_cmd_config_show() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[revenue]\nurl = \"https://example.com/sheet.csv\"\n").unwrap();

    let config = AppConfig::load(Some(&path)).unwrap();
    assert!(commands::cmd_config_show(&config, Some(&path)).is_ok());
}

// ========== Utility Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("exactly 10", 10), "exactly 10");
    assert_eq!(truncate("this is a long string", 10), "this is...");
    assert_eq!(truncate("Été (été) promo", 8), "Été (...");
}
