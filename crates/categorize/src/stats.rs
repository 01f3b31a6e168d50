use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::Model;

#[derive(Debug, Clone, Serialize)]
pub struct VendorSummary {
    pub vendor: String,
    pub transactions: usize,
    pub top_category: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryCoverage {
    pub category: String,
    pub records: usize,
}

/// Read-only summary of the current model.
#[derive(Debug, Clone, Serialize)]
pub struct ModelStats {
    pub total_records: usize,
    pub total_categories: usize,
    pub total_vendors: usize,
    pub trained_at: DateTime<Utc>,
    pub top_vendors: Vec<VendorSummary>,
    pub category_coverage: Vec<CategoryCoverage>,
}

const TOP_VENDOR_LIMIT: usize = 10;

pub fn report(model: &Model) -> ModelStats {
    let mut top_vendors: Vec<VendorSummary> = model
        .vendor_category_counts
        .iter()
        .map(|(vendor, per_category)| {
            let transactions = per_category.values().sum();
            let top_category = per_category
                .iter()
                .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
                .map(|(category, _)| category.clone())
                .unwrap_or_default();
            VendorSummary {
                vendor: vendor.clone(),
                transactions,
                top_category,
            }
        })
        .collect();
    top_vendors.sort_by(|a, b| {
        b.transactions
            .cmp(&a.transactions)
            .then_with(|| a.vendor.cmp(&b.vendor))
    });
    top_vendors.truncate(TOP_VENDOR_LIMIT);

    let mut totals: HashMap<&str, usize> = HashMap::new();
    for per_category in model.vendor_category_counts.values() {
        for (category, count) in per_category {
            *totals.entry(category.as_str()).or_insert(0) += count;
        }
    }
    let mut category_coverage: Vec<CategoryCoverage> = totals
        .into_iter()
        .map(|(category, records)| CategoryCoverage {
            category: category.to_string(),
            records,
        })
        .collect();
    category_coverage.sort_by(|a, b| {
        b.records
            .cmp(&a.records)
            .then_with(|| a.category.cmp(&b.category))
    });

    ModelStats {
        total_records: model.total_records(),
        total_categories: model.total_categories(),
        total_vendors: model.vendor_category_counts.len(),
        trained_at: model.trained_at(),
        top_vendors,
        category_coverage,
    }
}
