use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A stored expense row. `category` is `None` (or empty) until the user
/// confirms a booking category; soft-deleted and duplicate-flagged rows stay
/// in the table but are excluded from model training.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub vendor: String,
    pub description: String,
    pub category: Option<String>,
    pub amount_cents: i64,
    pub is_deleted: bool,
    pub is_duplicate: bool,
}

impl Expense {
    pub fn new(date: NaiveDate, vendor: &str, description: &str, amount_cents: i64) -> Self {
        Expense {
            id: None,
            date,
            vendor: vendor.to_string(),
            description: description.to_string(),
            category: None,
            amount_cents,
            is_deleted: false,
            is_duplicate: false,
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    /// True when the row may feed the categorization model: a confirmed
    /// non-empty category and neither exclusion flag set.
    pub fn is_trainable(&self) -> bool {
        !self.is_deleted
            && !self.is_duplicate
            && self
                .category
                .as_deref()
                .is_some_and(|c| !c.trim().is_empty())
    }
}
