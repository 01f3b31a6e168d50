use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::keywords::extract_keywords;
use crate::vendor::VendorMatcher;

/// One historical transaction fed into a training pass. Ephemeral: the source
/// query produces these, training consumes them, nothing stores them.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingRecord {
    pub vendor: String,
    pub description: String,
    pub category: String,
    pub amount_cents: i64,
}

/// Everything the suggestion engine knows, built in one pass over the user's
/// history. Immutable once constructed; retraining builds a fresh `Model` and
/// swaps it in whole (see `ModelStore`), so readers never observe a partial
/// rebuild.
#[derive(Debug)]
pub struct Model {
    /// category → keyword → TF-IDF weight.
    pub(crate) category_vectors: HashMap<String, HashMap<String, f64>>,
    /// keyword → number of distinct categories containing it.
    pub(crate) document_frequency: HashMap<String, usize>,
    /// Distinct categories with at least one keyword-bearing description.
    pub(crate) total_categories: usize,
    /// normalized vendor → category → occurrence count.
    pub(crate) vendor_category_counts: HashMap<String, HashMap<String, usize>>,
    /// normalized vendor → category → historical amounts (cents).
    pub(crate) vendor_category_amounts: HashMap<String, HashMap<String, Vec<i64>>>,
    pub(crate) total_records: usize,
    pub(crate) trained_at: DateTime<Utc>,
}

impl Model {
    /// Builds a model from historical records. The storage query already
    /// excludes soft-deleted, duplicate, and uncategorized rows; records with
    /// an empty category are skipped again here so a permissive caller cannot
    /// poison the statistics. Zero records is a valid input and produces an
    /// empty model.
    pub fn train<M: VendorMatcher + ?Sized>(records: &[TrainingRecord], matcher: &M) -> Model {
        let mut vendor_category_counts: HashMap<String, HashMap<String, usize>> = HashMap::new();
        let mut vendor_category_amounts: HashMap<String, HashMap<String, Vec<i64>>> =
            HashMap::new();
        // Per category: how many descriptions had at least one keyword, and
        // per keyword, how many of those descriptions contained it.
        let mut docs_per_category: HashMap<String, usize> = HashMap::new();
        let mut term_docs_per_category: HashMap<String, HashMap<String, usize>> = HashMap::new();
        let mut total_records = 0usize;

        for record in records {
            if record.category.trim().is_empty() {
                continue;
            }
            total_records += 1;

            if !record.vendor.trim().is_empty() {
                let normalized = matcher.normalize(&record.vendor);
                if !normalized.is_empty() {
                    *vendor_category_counts
                        .entry(normalized.clone())
                        .or_default()
                        .entry(record.category.clone())
                        .or_insert(0) += 1;
                    vendor_category_amounts
                        .entry(normalized)
                        .or_default()
                        .entry(record.category.clone())
                        .or_default()
                        .push(record.amount_cents);
                }
            }

            // A keyword repeated within one description counts once, so
            // verbose texts don't dominate the term frequencies.
            let unique: HashSet<String> =
                extract_keywords(&record.description).into_iter().collect();
            if unique.is_empty() {
                continue;
            }
            *docs_per_category.entry(record.category.clone()).or_insert(0) += 1;
            let term_docs = term_docs_per_category
                .entry(record.category.clone())
                .or_default();
            for term in unique {
                *term_docs.entry(term).or_insert(0) += 1;
            }
        }

        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        for term_docs in term_docs_per_category.values() {
            for term in term_docs.keys() {
                *document_frequency.entry(term.clone()).or_insert(0) += 1;
            }
        }

        let total_categories = docs_per_category.len();

        let mut category_vectors: HashMap<String, HashMap<String, f64>> = HashMap::new();
        for (category, term_docs) in &term_docs_per_category {
            let doc_count = docs_per_category[category] as f64;
            let vector = term_docs
                .iter()
                .map(|(term, &containing)| {
                    let tf = containing as f64 / doc_count;
                    let df = document_frequency[term] as f64;
                    let idf = (1.0 + total_categories as f64 / df).ln();
                    (term.clone(), tf * idf)
                })
                .collect();
            category_vectors.insert(category.clone(), vector);
        }

        Model {
            category_vectors,
            document_frequency,
            total_categories,
            vendor_category_counts,
            vendor_category_amounts,
            total_records,
            trained_at: Utc::now(),
        }
    }

    /// Inverse document frequency for a query term. Terms never seen in
    /// training fall back to a document frequency of 1 instead of being
    /// skipped, so unknown words still contribute query weight.
    pub fn idf(&self, term: &str) -> f64 {
        let df = self.document_frequency.get(term).copied().unwrap_or(1).max(1);
        (1.0 + self.total_categories as f64 / df as f64).ln()
    }

    pub fn total_records(&self) -> usize {
        self.total_records
    }

    pub fn total_categories(&self) -> usize {
        self.total_categories
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    pub fn is_empty(&self) -> bool {
        self.total_records == 0
    }
}
