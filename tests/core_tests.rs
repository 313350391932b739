//! Core logic tests: numeric parsing, classification, aggregation, insight

use pretty_assertions::assert_eq;
use tasklytics::config::{DuplicateCategoryPolicy, SyncConfig};
use tasklytics::core::{
    classify, generate_insight, growth_percent, parse_number, Aggregator, Classification,
    ColumnClassifier, NumberParser, NO_DATA_INSIGHT,
};
use tasklytics::types::{CategoryTotal, Cell, GrowthRecord, Table};

fn text(s: &str) -> Cell {
    Cell::from(s)
}

fn dashboard(rows: Vec<Vec<Cell>>) -> Table {
    let mut all = vec![vec![
        text("category"),
        text("revenue"),
        text("Jan"),
        text("Feb"),
        text("Mar"),
    ]];
    all.extend(rows);
    Table::new(all)
}

// ═══════════════════════════════════════════════════════════════════════════
// NUMERIC CELL PARSER
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_parse_currency_strings() {
    assert_eq!(parse_number(&text("₹1,200")), 1200.0);
    assert_eq!(parse_number(&text("Rs 500")), 500.0);
    assert_eq!(parse_number(&text("  ₹ 12,34,567.50 ")), 1234567.5);
}

#[test]
fn test_parse_negative_values() {
    assert_eq!(parse_number(&text("-50")), -50.0);
    assert_eq!(parse_number(&Cell::Number(-3.5)), -3.5);
}

#[test]
fn test_parse_never_fails() {
    for raw in ["", "nan", "NaN", "inf", "abc", "₹", "Rs", "1.2.3", "--5"] {
        assert_eq!(parse_number(&text(raw)), 0.0, "input {:?}", raw);
    }
    assert_eq!(parse_number(&Cell::Empty), 0.0);
    assert_eq!(parse_number(&Cell::Number(f64::NAN)), 0.0);
}

#[test]
fn test_parse_is_idempotent_on_numbers() {
    for n in [0.0, 1.0, -50.0, 1234.5678, 1e12] {
        let once = parse_number(&Cell::Number(n));
        assert_eq!(parse_number(&Cell::Number(once)), once);
        assert_eq!(once, n);
    }
}

#[test]
fn test_parse_custom_symbols() {
    let parser = NumberParser::new(vec!["$".to_string(), "USD".to_string()]);
    assert_eq!(parser.parse(&text("$1,000")), 1000.0);
    assert_eq!(parser.parse(&text("USD 20")), 20.0);
    assert_eq!(parser.parse(&text("₹5")), 0.0);
}

// ═══════════════════════════════════════════════════════════════════════════
// COLUMN CLASSIFIER
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_classify_skips_all_zero_columns() {
    let table = dashboard(vec![
        vec![text("Electronics"), text("100"), Cell::from(0), Cell::from(10), Cell::from(20)],
        vec![text("Books"), text("50"), Cell::Empty, text(""), text("₹5")],
    ]);
    let result = classify(table.header(), table.data_rows());
    assert_eq!(
        result,
        Classification {
            last_index: Some(4),
            previous_index: Some(3),
        }
    );
}

#[test]
fn test_classify_rightmost_qualifying_not_rightmost_absolute() {
    let table = dashboard(vec![vec![
        text("Electronics"),
        Cell::Empty,
        Cell::from(5),
        Cell::from(7),
        Cell::from(0),
    ]]);
    let result = classify(table.header(), table.data_rows());
    assert_eq!(result.last_index, Some(3));
    assert_eq!(result.previous_index, Some(2));
}

#[test]
fn test_classify_no_data() {
    let table = dashboard(vec![vec![
        text("Electronics"),
        Cell::from(90000),
        Cell::from(0),
        text("nan"),
        Cell::Empty,
    ]]);
    let result = classify(table.header(), table.data_rows());
    assert_eq!(result, Classification::default());
    assert!(!result.has_data());
}

#[test]
fn test_classify_single_column() {
    let table = Table::from_rows(vec![
        vec![text("category"), text("revenue"), text("Jan")],
        vec![text("Books"), Cell::Empty, text("48000")],
    ]);
    let result = classify(table.header(), table.data_rows());
    assert_eq!(result.last_index, Some(2));
    assert_eq!(result.previous_index, None);
}

#[test]
fn test_classify_reserved_columns_configurable() {
    let table = Table::from_rows(vec![
        vec![text("category"), text("Jan"), text("Feb")],
        vec![text("Books"), Cell::from(10), Cell::from(12)],
    ]);
    let config = SyncConfig {
        reserved_columns: 1,
        ..SyncConfig::default()
    };
    let result = ColumnClassifier::from_config(&config).classify_table(&table);
    assert_eq!(result.last_index, Some(2));
    assert_eq!(result.previous_index, Some(1));
}

#[test]
fn test_classify_short_rows_are_padded() {
    let table = dashboard(vec![
        vec![text("Electronics")],
        vec![text("Books"), Cell::Empty, Cell::Empty, Cell::from(3)],
    ]);
    let result = classify(table.header(), table.data_rows());
    assert_eq!(result.last_index, Some(3));
    assert_eq!(result.previous_index, None);
}

// ═══════════════════════════════════════════════════════════════════════════
// AGGREGATOR
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_growth_values() {
    assert_eq!(growth_percent(45000.0, 48000.0), Some(-6.25));
    assert_eq!(growth_percent(120000.0, 0.0), None);
    assert_eq!(growth_percent(110.0, 100.0), Some(10.0));
    assert_eq!(growth_percent(1.0, 3.0), Some(-66.67));
}

#[test]
fn test_growth_view_records() {
    let table = dashboard(vec![
        vec![text("Books"), Cell::Empty, Cell::Empty, text("48,000"), text("45000")],
        vec![text("Toys"), Cell::Empty, Cell::Empty, Cell::Empty, Cell::from(120000)],
        vec![text("  "), Cell::Empty, Cell::Empty, Cell::from(10), Cell::from(11)],
    ]);
    let aggregator = Aggregator::new(&SyncConfig::default()).unwrap();
    let records = aggregator.growth_view(&table);

    assert_eq!(
        records,
        vec![
            GrowthRecord {
                category: "Books".to_string(),
                latest: 45000.0,
                previous: 48000.0,
                growth: Some(-6.25),
                period_label: "Mar".to_string(),
            },
            GrowthRecord {
                category: "Toys".to_string(),
                latest: 120000.0,
                previous: 0.0,
                growth: None,
                period_label: "Mar".to_string(),
            },
            GrowthRecord {
                category: "Unknown".to_string(),
                latest: 11.0,
                previous: 10.0,
                growth: Some(10.0),
                period_label: "Mar".to_string(),
            },
        ]
    );
}

#[test]
fn test_growth_view_without_previous_column() {
    let table = Table::from_rows(vec![
        vec![text("category"), text("revenue"), text("Day 1")],
        vec![text("Books"), Cell::Empty, text("100")],
    ]);
    let aggregator = Aggregator::new(&SyncConfig::default()).unwrap();
    let records = aggregator.growth_view(&table);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].previous, 0.0);
    assert_eq!(records[0].growth, None);
    assert_eq!(records[0].period_label, "Day 1");
}

#[test]
fn test_growth_view_empty_when_no_data() {
    let table = dashboard(vec![vec![text("Books"), Cell::from(5)]]);
    let aggregator = Aggregator::new(&SyncConfig::default()).unwrap();
    assert!(aggregator.growth_view(&table).is_empty());
    assert!(aggregator.growth_view(&Table::default()).is_empty());
}

#[test]
fn test_growth_record_json_shape() {
    let record = GrowthRecord {
        category: "Toys".to_string(),
        latest: 120000.0,
        previous: 0.0,
        growth: None,
        period_label: "Mar".to_string(),
    };
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "category": "Toys",
            "latest": 120000.0,
            "previous": 0.0,
            "growth": null,
            "date": "Mar"
        })
    );
}

#[test]
fn test_initial_aggregation_units_times_price() {
    let table = Table::from_rows(vec![
        vec![text("category"), text("units"), text("order_value_eur")],
        vec![text("Books"), Cell::from(2), text("₹250")],
        vec![text("Toys"), Cell::Empty, Cell::from(99)],
        vec![text("Books"), Cell::from(1), Cell::from(100)],
    ]);
    let aggregator = Aggregator::new(&SyncConfig::default()).unwrap();
    assert_eq!(
        aggregator.aggregate_totals(&table),
        vec![
            CategoryTotal::new("Books", 600.0),
            // Blank units parse to zero, so the row contributes nothing
            CategoryTotal::new("Toys", 0.0),
        ]
    );
}

#[test]
fn test_initial_aggregation_without_units_column() {
    let table = Table::from_rows(vec![
        vec![text("Category"), text("Revenue")],
        vec![text("Electronics"), Cell::from(100000)],
        vec![text("Books"), Cell::from(48000)],
        vec![text("Electronics"), Cell::from(5000)],
    ]);
    let aggregator = Aggregator::new(&SyncConfig::default()).unwrap();
    assert_eq!(
        aggregator.aggregate_totals(&table),
        vec![
            CategoryTotal::new("Electronics", 105000.0),
            CategoryTotal::new("Books", 48000.0),
        ]
    );
}

#[test]
fn test_initial_aggregation_first_seen_policy() {
    let table = Table::from_rows(vec![
        vec![text("category"), text("revenue")],
        vec![text("Electronics"), Cell::from(100000)],
        vec![text("Electronics"), Cell::from(5000)],
    ]);
    let config = SyncConfig {
        duplicate_categories: DuplicateCategoryPolicy::First,
        ..SyncConfig::default()
    };
    let aggregator = Aggregator::new(&config).unwrap();
    assert_eq!(
        aggregator.aggregate_totals(&table),
        vec![CategoryTotal::new("Electronics", 100000.0)]
    );
}

#[test]
fn test_invalid_column_pattern() {
    let config = SyncConfig {
        value_pattern: "(".to_string(),
        ..SyncConfig::default()
    };
    assert!(Aggregator::new(&config).is_err());
}

// ═══════════════════════════════════════════════════════════════════════════
// INSIGHT
// ═══════════════════════════════════════════════════════════════════════════

fn latest(category: &str, value: f64) -> GrowthRecord {
    GrowthRecord {
        category: category.to_string(),
        latest: value,
        previous: 0.0,
        growth: None,
        period_label: "Mar".to_string(),
    }
}

#[test]
fn test_insight_no_data() {
    assert_eq!(generate_insight(&[]).text, NO_DATA_INSIGHT);
}

#[test]
fn test_insight_dominance() {
    let insight = generate_insight(&[latest("Electronics", 90000.0), latest("Books", 10000.0)]);
    assert_eq!(insight.top_category.as_deref(), Some("Electronics"));
    assert_eq!(insight.contribution, 90.0);
    assert!(insight.text.contains("Electronics"));
}

#[test]
fn test_insight_first_max_wins() {
    let insight = generate_insight(&[latest("A", 10.0), latest("B", 10.0)]);
    assert_eq!(insight.top_category.as_deref(), Some("A"));
}
