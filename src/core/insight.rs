//! Human-readable dashboard insight over the latest period

use crate::types::GrowthRecord;
use serde::Serialize;

pub const NO_DATA_INSIGHT: &str = "No data available for insight generation.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub text: String,
    pub top_category: Option<String>,
    pub top_value: f64,
    /// Share of the total held by the top category, in percent
    pub contribution: f64,
    pub total: f64,
    pub mean: f64,
}

impl Insight {
    fn empty() -> Self {
        Self {
            text: NO_DATA_INSIGHT.to_string(),
            top_category: None,
            top_value: 0.0,
            contribution: 0.0,
            total: 0.0,
            mean: 0.0,
        }
    }
}

/// Summarise the latest values: leader, its share of the total, and the mean
pub fn generate_insight(records: &[GrowthRecord]) -> Insight {
    let Some(first) = records.first() else {
        return Insight::empty();
    };

    // First maximum wins on ties
    let top = records
        .iter()
        .skip(1)
        .fold(first, |best, r| if r.latest > best.latest { r } else { best });

    let total: f64 = records.iter().map(|r| r.latest).sum();
    let mean = total / records.len() as f64;
    let contribution = if total != 0.0 {
        top.latest / total * 100.0
    } else {
        0.0
    };

    let mut text = format!(
        "Category '{}' leads with {}, contributing {:.1}% of total revenue {}. Average category revenue is {}. ",
        top.category,
        format_rupees(top.latest),
        contribution,
        format_rupees(total),
        format_rupees(mean),
    );
    text.push_str(if contribution > 60.0 {
        "Outstanding dominance in this category!"
    } else if contribution < 20.0 {
        "More balanced distribution across categories."
    } else {
        "Healthy distribution with moderate concentration."
    });

    Insight {
        text,
        top_category: Some(top.category.clone()),
        top_value: top.latest,
        contribution,
        total,
        mean,
    }
}

/// `₹` amount with thousands separators and no decimals
pub fn format_rupees(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{}", rounded.abs() as u64);
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-₹{}", grouped)
    } else {
        format!("₹{}", grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(category: &str, latest: f64) -> GrowthRecord {
        GrowthRecord {
            category: category.to_string(),
            latest,
            previous: 0.0,
            growth: None,
            period_label: "Mar".to_string(),
        }
    }

    #[test]
    fn test_format_rupees() {
        assert_eq!(format_rupees(0.0), "₹0");
        assert_eq!(format_rupees(999.4), "₹999");
        assert_eq!(format_rupees(1200.0), "₹1,200");
        assert_eq!(format_rupees(1234567.0), "₹1,234,567");
        assert_eq!(format_rupees(-45000.0), "-₹45,000");
    }

    #[test]
    fn test_empty_records() {
        let insight = generate_insight(&[]);
        assert_eq!(insight.text, NO_DATA_INSIGHT);
        assert!(insight.top_category.is_none());
    }

    #[test]
    fn test_dominant_category() {
        let insight =
            generate_insight(&[record("Electronics", 90000.0), record("Books", 10000.0)]);
        assert_eq!(insight.top_category.as_deref(), Some("Electronics"));
        assert_eq!(insight.contribution, 90.0);
        assert_eq!(insight.total, 100000.0);
        assert_eq!(insight.mean, 50000.0);
        assert!(insight.text.starts_with("Category 'Electronics' leads with ₹90,000"));
        assert!(insight.text.contains("contributing 90.0% of total revenue ₹100,000"));
        assert!(insight.text.ends_with("Outstanding dominance in this category!"));
    }

    #[test]
    fn test_balanced_distribution() {
        let records: Vec<GrowthRecord> = (0..6)
            .map(|i| record(&format!("C{}", i), 100.0))
            .collect();
        let insight = generate_insight(&records);
        // Ties keep the first maximum
        assert_eq!(insight.top_category.as_deref(), Some("C0"));
        assert!(insight.text.ends_with("More balanced distribution across categories."));
    }

    #[test]
    fn test_moderate_concentration() {
        let insight = generate_insight(&[record("A", 40.0), record("B", 30.0), record("C", 30.0)]);
        assert_eq!(insight.contribution, 40.0);
        assert!(insight.text.ends_with("Healthy distribution with moderate concentration."));
    }

    #[test]
    fn test_zero_total() {
        let insight = generate_insight(&[record("A", 0.0), record("B", 0.0)]);
        assert_eq!(insight.contribution, 0.0);
        assert_eq!(insight.top_category.as_deref(), Some("A"));
    }
}
