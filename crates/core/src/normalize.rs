use std::sync::OnceLock;

use regex::Regex;

fn re_legal_suffix() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| {
        Regex::new(
            r"(?x)\b(
                gmbh\s*&\s*co\.?\s*kg
              | gmbh | mbh | ag | kg | ug | gbr | ohg | se
              | e\.\s*k\.? | e\.\s*v\.?
              | inc\.? | ltd\.? | llc | corp\.? | co\.?
            )\b",
        )
        .expect("invalid regex")
    })
}

/// Canonicalizes a vendor display name so different spellings of the same
/// business compare as equal or near-equal: lowercase, German diacritics
/// folded (ä→ae, ö→oe, ü→ue, ß→ss), legal-entity suffixes stripped, all
/// punctuation collapsed to single spaces.
///
/// `"Deutsche Telekom GmbH"` → `"deutsche telekom"`,
/// `"Müller & Söhne OHG"` → `"mueller soehne"`.
pub fn normalize_vendor(vendor: &str) -> String {
    let mut folded = String::with_capacity(vendor.len());
    for c in vendor.to_lowercase().chars() {
        match c {
            'ä' => folded.push_str("ae"),
            'ö' => folded.push_str("oe"),
            'ü' => folded.push_str("ue"),
            'ß' => folded.push_str("ss"),
            _ => folded.push(c),
        }
    }

    let stripped = re_legal_suffix().replace_all(&folded, " ");

    stripped
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Levenshtein edit distance using the two-row O(min(m,n)) space algorithm,
/// counted in chars so umlauts and other multi-byte input cost one edit.
pub fn levenshtein(s1: &str, s2: &str) -> usize {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();
    let (m, n) = (a.len(), b.len());

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Keep the shorter string in the inner loop to minimise allocation.
    let (a, b, m, n) = if m <= n { (a, b, m, n) } else { (b, a, n, m) };

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}
