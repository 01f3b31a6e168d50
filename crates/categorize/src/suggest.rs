use std::collections::HashMap;

use serde::Serialize;

use crate::keywords::extract_keywords;
use crate::model::Model;
use crate::rules::RuleTable;
use crate::vendor::{similarity, VendorMatcher};

/// A ranked category suggestion for a new expense.
#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    pub category: String,
    pub confidence: f64,
    pub reason: String,
}

/// Candidate emitted by one scoring strategy before dedup/ranking.
/// `matched_vendor` is the normalized vendor whose history produced the
/// candidate; only those candidates are eligible for the amount boost.
#[derive(Debug, Clone)]
struct Candidate {
    category: String,
    confidence: f64,
    reason: String,
    matched_vendor: Option<String>,
}

const EXACT_STRONG_CONFIDENCE: f64 = 0.95;
const EXACT_STRONG_MIN_COUNT: usize = 5;
const EXACT_WEAK_CONFIDENCE: f64 = 0.70;
const EXACT_MIN_COUNT: usize = 2;
const FUZZY_CONFIDENCE: f64 = 0.75;
const FUZZY_SIMILARITY_FLOOR: f64 = 0.8;
const FUZZY_MIN_COUNT: usize = 2;
const KEYWORD_CONFIDENCE_CAP: f64 = 0.6;
const KEYWORD_SIMILARITY_FLOOR: f64 = 0.05;
const RULE_CONFIDENCE: f64 = 0.5;
const AMOUNT_BOOST: f64 = 0.10;
const AMOUNT_WINDOW: f64 = 0.2;

/// Runs all four strategies against the model, applies the amount boost, and
/// collapses the candidates to one ranked suggestion per category. Degenerate
/// inputs (unknown vendor, empty description, empty model) simply contribute
/// nothing; an empty result is valid.
pub fn suggest<M: VendorMatcher + ?Sized>(
    model: &Model,
    rules: &RuleTable,
    matcher: &M,
    vendor: &str,
    description: &str,
    amount_cents: i64,
) -> Vec<Suggestion> {
    let normalized_vendor = matcher.normalize(vendor);

    let mut candidates = Vec::new();
    exact_vendor_candidates(model, &normalized_vendor, &mut candidates);
    fuzzy_vendor_candidates(model, matcher, vendor, &normalized_vendor, &mut candidates);
    keyword_candidates(model, description, &mut candidates);
    // Historical evidence outranks static rules: the fallback only fires when
    // no strategy above produced a ≥0.5 candidate for the rule's category.
    if let Some(rule_candidate) = rule_candidate(rules, vendor, &candidates) {
        candidates.push(rule_candidate);
    }
    apply_amount_boost(model, amount_cents, &mut candidates);

    rank(candidates)
}

// ── Strategies ────────────────────────────────────────────────────────────────

/// Strategy (a): the vendor's own booking history.
fn exact_vendor_candidates(model: &Model, normalized_vendor: &str, out: &mut Vec<Candidate>) {
    if normalized_vendor.is_empty() {
        return;
    }
    let Some(per_category) = model.vendor_category_counts.get(normalized_vendor) else {
        return;
    };
    let vendor_total: usize = per_category.values().sum();

    for (category, &count) in per_category {
        let (confidence, reason) = if count >= EXACT_STRONG_MIN_COUNT {
            (
                EXACT_STRONG_CONFIDENCE,
                format!("Vendor matched {vendor_total} previous transactions"),
            )
        } else if count >= EXACT_MIN_COUNT {
            (
                EXACT_WEAK_CONFIDENCE,
                format!("Vendor matched {count} previous transactions in this category"),
            )
        } else {
            // A single booking is not evidence.
            continue;
        };
        out.push(Candidate {
            category: category.clone(),
            confidence,
            reason,
            matched_vendor: Some(normalized_vendor.to_string()),
        });
    }
}

/// Strategy (b): near-identical vendor names (typos, branch suffixes).
fn fuzzy_vendor_candidates<M: VendorMatcher + ?Sized>(
    model: &Model,
    matcher: &M,
    vendor: &str,
    normalized_vendor: &str,
    out: &mut Vec<Candidate>,
) {
    if vendor.trim().is_empty() {
        return;
    }
    for (known_vendor, per_category) in &model.vendor_category_counts {
        if known_vendor == normalized_vendor {
            continue;
        }
        let sim = similarity(matcher, vendor, known_vendor);
        if sim < FUZZY_SIMILARITY_FLOOR {
            continue;
        }
        let known_total: usize = per_category.values().sum();
        for (category, &count) in per_category {
            if count < FUZZY_MIN_COUNT {
                continue;
            }
            out.push(Candidate {
                category: category.clone(),
                confidence: FUZZY_CONFIDENCE,
                reason: format!(
                    "Similar vendor \"{known_vendor}\" ({:.0}% match, {known_total} transactions)",
                    sim * 100.0
                ),
                matched_vendor: Some(known_vendor.clone()),
            });
        }
    }
}

/// Strategy (c): TF-IDF cosine similarity between the description and each
/// category's keyword vector.
fn keyword_candidates(model: &Model, description: &str, out: &mut Vec<Candidate>) {
    if description.trim().is_empty() || model.category_vectors.is_empty() {
        return;
    }
    let query_keywords = extract_keywords(description);
    if query_keywords.is_empty() {
        return;
    }

    let total = query_keywords.len() as f64;
    let mut frequencies: HashMap<&str, usize> = HashMap::new();
    for keyword in &query_keywords {
        *frequencies.entry(keyword.as_str()).or_insert(0) += 1;
    }
    let query_vector: HashMap<&str, f64> = frequencies
        .into_iter()
        .map(|(keyword, count)| (keyword, count as f64 / total * model.idf(keyword)))
        .collect();

    for (category, category_vector) in &model.category_vectors {
        let sim = cosine_similarity(&query_vector, category_vector);
        if sim <= KEYWORD_SIMILARITY_FLOOR {
            continue;
        }
        let confidence = (sim * KEYWORD_CONFIDENCE_CAP).min(KEYWORD_CONFIDENCE_CAP);

        // Cite up to three keywords shared with the category, in query order.
        let mut cited: Vec<&str> = Vec::new();
        for keyword in &query_keywords {
            if cited.len() == 3 {
                break;
            }
            if category_vector.contains_key(keyword.as_str())
                && !cited.contains(&keyword.as_str())
            {
                cited.push(keyword);
            }
        }
        let reason = if cited.is_empty() {
            "Description similarity to previous bookings".to_string()
        } else {
            format!("Description matches keywords: {}", cited.join(", "))
        };

        out.push(Candidate {
            category: category.clone(),
            confidence,
            reason,
            matched_vendor: None,
        });
    }
}

/// Strategy (d): static rule fallback, suppressed by any ≥0.5 historical
/// candidate for the same category.
fn rule_candidate(rules: &RuleTable, vendor: &str, existing: &[Candidate]) -> Option<Candidate> {
    let rule = rules.match_rule(vendor)?;
    let covered = existing
        .iter()
        .any(|c| c.category == rule.category && c.confidence >= RULE_CONFIDENCE);
    if covered {
        return None;
    }
    Some(Candidate {
        category: rule.category.clone(),
        confidence: RULE_CONFIDENCE,
        reason: format!("Rule-based match: {}", rule.label),
        matched_vendor: None,
    })
}

// ── Boost, dedup, ranking ─────────────────────────────────────────────────────

/// +0.10 for vendor-anchored candidates when the amount sits within ±20% of
/// any historical amount for that vendor/category. Missing history or a
/// non-positive amount skips the boost silently.
fn apply_amount_boost(model: &Model, amount_cents: i64, candidates: &mut [Candidate]) {
    if amount_cents <= 0 {
        return;
    }
    let low = amount_cents as f64 * (1.0 - AMOUNT_WINDOW);
    let high = amount_cents as f64 * (1.0 + AMOUNT_WINDOW);

    for candidate in candidates.iter_mut() {
        let Some(vendor) = &candidate.matched_vendor else {
            continue;
        };
        let Some(amounts) = model
            .vendor_category_amounts
            .get(vendor)
            .and_then(|per_category| per_category.get(&candidate.category))
        else {
            continue;
        };
        if amounts
            .iter()
            .any(|&a| (a as f64) >= low && (a as f64) <= high)
        {
            candidate.confidence += AMOUNT_BOOST;
        }
    }
}

/// Reducer: one candidate per category (highest confidence, clamped to 1.0),
/// sorted by confidence descending. Category name breaks exact ties so the
/// output order is deterministic.
fn rank(candidates: Vec<Candidate>) -> Vec<Suggestion> {
    let mut best: HashMap<String, Candidate> = HashMap::new();
    for mut candidate in candidates {
        candidate.confidence = candidate.confidence.min(1.0);
        match best.get(&candidate.category) {
            Some(existing) if existing.confidence >= candidate.confidence => {}
            _ => {
                best.insert(candidate.category.clone(), candidate);
            }
        }
    }

    let mut suggestions: Vec<Suggestion> = best
        .into_values()
        .map(|c| Suggestion {
            category: c.category,
            confidence: c.confidence,
            reason: c.reason,
        })
        .collect();
    suggestions.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category))
    });
    suggestions
}

fn cosine_similarity(query: &HashMap<&str, f64>, category: &HashMap<String, f64>) -> f64 {
    let dot: f64 = query
        .iter()
        .filter_map(|(term, weight)| category.get(*term).map(|w| w * weight))
        .sum();
    if dot == 0.0 {
        return 0.0;
    }
    let query_norm = query.values().map(|w| w * w).sum::<f64>().sqrt();
    let category_norm = category.values().map(|w| w * w).sum::<f64>().sqrt();
    if query_norm == 0.0 || category_norm == 0.0 {
        return 0.0;
    }
    dot / (query_norm * category_norm)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
