use fibu_core::{levenshtein, normalize_vendor};

/// Seam for vendor canonicalization and edit distance. The engine never calls
/// a concrete normalizer directly, so tests (and future locales) can swap in
/// their own rules without touching scoring code.
pub trait VendorMatcher: Send + Sync {
    fn normalize(&self, vendor: &str) -> String;
    fn edit_distance(&self, a: &str, b: &str) -> usize;
}

/// Default matcher backed by the German-aware normalizer in `fibu-core`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GermanVendorMatcher;

impl VendorMatcher for GermanVendorMatcher {
    fn normalize(&self, vendor: &str) -> String {
        normalize_vendor(vendor)
    }

    fn edit_distance(&self, a: &str, b: &str) -> usize {
        levenshtein(a, b)
    }
}

/// Similarity of two vendor names in [0.0, 1.0]: 1 − dist/max-len over the
/// normalized forms. Either side normalizing to empty yields 0.0; equal
/// non-empty normalized forms yield exactly 1.0.
pub fn similarity<M: VendorMatcher + ?Sized>(matcher: &M, a: &str, b: &str) -> f64 {
    let na = matcher.normalize(a);
    let nb = matcher.normalize(b);

    if na.is_empty() || nb.is_empty() {
        return 0.0;
    }
    if na == nb {
        return 1.0;
    }

    let max_len = na.chars().count().max(nb.chars().count());
    let dist = matcher.edit_distance(&na, &nb);
    (1.0 - dist as f64 / max_len as f64).max(0.0)
}

// Conformance tests against the trait contract, run here against the default
// matcher; any substituted normalizer must pass the same set.
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_vendors_are_fully_similar() {
        let m = GermanVendorMatcher;
        assert_eq!(similarity(&m, "Telekom", "Telekom"), 1.0);
    }

    #[test]
    fn case_and_suffix_insensitive_equality() {
        let m = GermanVendorMatcher;
        assert_eq!(similarity(&m, "telekom deutschland", "Telekom Deutschland GmbH"), 1.0);
    }

    #[test]
    fn one_char_typo_stays_above_fuzzy_threshold() {
        let m = GermanVendorMatcher;
        let sim = similarity(&m, "Telekoom", "Telekom");
        assert!(sim >= 0.8, "sim was {sim}");
        assert!(sim < 1.0);
    }

    #[test]
    fn unrelated_vendors_score_low() {
        let m = GermanVendorMatcher;
        assert!(similarity(&m, "Hetzner", "Allianz") < 0.5);
    }

    #[test]
    fn empty_side_is_zero() {
        let m = GermanVendorMatcher;
        assert_eq!(similarity(&m, "", "Telekom"), 0.0);
        assert_eq!(similarity(&m, "Telekom", ""), 0.0);
        assert_eq!(similarity(&m, "", ""), 0.0);
        // Suffix-only names normalize to empty as well.
        assert_eq!(similarity(&m, "GmbH", "Telekom"), 0.0);
    }

    #[test]
    fn never_negative() {
        let m = GermanVendorMatcher;
        let sim = similarity(&m, "ab", "wxyzwxyzwxyz");
        assert!((0.0..=1.0).contains(&sim));
    }
}
