use super::*;
use crate::types::Cell;
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

fn write_source(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("sales.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "category").unwrap();
    sheet.write_string(0, 1, "revenue").unwrap();
    sheet.write_string(1, 0, "Electronics").unwrap();
    sheet.write_number(1, 1, 100000.0).unwrap();
    sheet.write_string(2, 0, "Books").unwrap();
    sheet.write_string(2, 1, "₹48,000").unwrap();
    workbook.save(&path).unwrap();
    path
}

fn workbook_config(dir: &TempDir) -> AppConfig {
    AppConfig::default().with_workbook(dir.path().join("dashboard.xlsx"))
}

// =========================================================================
// Helper Tests
// =========================================================================

#[test]
fn test_source_path_prefers_argument() {
    let config = AppConfig::default();
    assert_eq!(
        source_path(Some(PathBuf::from("other.xlsx")), &config),
        PathBuf::from("other.xlsx")
    );
    assert_eq!(source_path(None, &config), config.source);
}

#[test]
fn test_current_label_fixed() {
    let config = AppConfig::default();
    assert_eq!(current_label(&Some("Day 3".to_string()), &config), "Day 3");
    assert!(!current_label(&None, &config).is_empty());
}

#[test]
fn test_format_growth() {
    assert!(format_growth(Some(5.0)).contains("+5.00%"));
    assert!(format_growth(Some(-6.25)).contains("-6.25%"));
    assert!(format_growth(None).contains("n/a"));
}

// =========================================================================
// Command Tests
// =========================================================================

#[test]
fn test_aggregate_writes_summary_and_workbook() {
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir);
    let output = dir.path().join("processed_data.json");
    let excel = dir.path().join("summary.xlsx");

    aggregate(
        Some(source),
        output.clone(),
        Some(excel.clone()),
        &AppConfig::default(),
        true,
    )
    .unwrap();

    let summary: Summary = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(
        summary.summary,
        vec![
            CategoryTotal::new("Electronics", 100000.0),
            CategoryTotal::new("Books", 48000.0),
        ]
    );
    assert!(excel.exists());
}

#[test]
fn test_aggregate_missing_source() {
    let dir = TempDir::new().unwrap();
    let result = aggregate(
        Some(dir.path().join("missing.xlsx")),
        dir.path().join("out.json"),
        None,
        &AppConfig::default(),
        false,
    );
    assert!(result.is_err());
}

#[test]
fn test_upload_then_sync_against_workbook() {
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir);
    let config = workbook_config(&dir);

    upload(Some(source.clone()), &config, false).unwrap();
    sync(Some(source.clone()), Some("Feb".to_string()), false, &config, false).unwrap();
    // Second run is a no-op, not an error
    sync(Some(source), Some("Feb".to_string()), false, &config, false).unwrap();

    let table = SourceReader::new(dir.path().join("dashboard.xlsx"))
        .read()
        .unwrap();
    assert_eq!(table.header_labels(), vec!["category", "revenue", "Feb"]);
    assert_eq!(table.cell(2, 2), &Cell::Number(48000.0));
}

#[test]
fn test_sync_dry_run_leaves_sheet_untouched() {
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir);
    let config = workbook_config(&dir);

    upload(Some(source.clone()), &config, false).unwrap();
    sync(Some(source), Some("Feb".to_string()), true, &config, true).unwrap();

    let table = SourceReader::new(dir.path().join("dashboard.xlsx"))
        .read()
        .unwrap();
    assert_eq!(table.header_labels(), vec!["category", "revenue"]);
}

#[test]
fn test_growth_and_insight_on_empty_workbook() {
    let dir = TempDir::new().unwrap();
    let config = workbook_config(&dir);
    growth(false, &config).unwrap();
    growth(true, &config).unwrap();
    insight(&config).unwrap();
}

#[test]
fn test_watch_missing_source() {
    let dir = TempDir::new().unwrap();
    let err = watch(
        Some(dir.path().join("nope.xlsx")),
        None,
        &workbook_config(&dir),
        false,
    )
    .unwrap_err();
    assert!(matches!(err, TasklyticsError::Validation(_)));
}
