use std::collections::HashSet;
use std::sync::OnceLock;

/// Words that carry no categorization signal in German or English expense
/// descriptions: articles, prepositions, auxiliary verbs, month names, and
/// the bare years that show up in billing-period texts.
const STOP_WORDS: &[&str] = &[
    // German function words
    "aber", "alle", "als", "auch", "auf", "aus", "bei", "beim", "bis", "das", "dass", "dem",
    "den", "der", "des", "die", "durch", "ein", "eine", "einem", "einen", "einer", "eines",
    "für", "gegen", "hat", "hatte", "hatten", "haben", "ihr", "ihre", "ist", "kein", "keine",
    "mit", "nach", "nicht", "noch", "nur", "ohne", "oder", "schon", "sein", "seine", "seit",
    "sich", "sind", "über", "und", "unter", "vom", "von", "vor", "war", "waren", "was", "wenn",
    "werden", "wie", "wird", "wurde", "wurden", "zum", "zur",
    // English function words
    "about", "all", "and", "any", "are", "been", "being", "but", "can", "for", "from", "had",
    "has", "have", "into", "its", "not", "off", "our", "out", "over", "per", "pro", "that",
    "the", "their", "them", "they", "this", "via", "were", "will", "with", "would",
    "you", "your",
    // Month names (German / English; identical spellings listed once)
    "januar", "january", "februar", "february", "märz", "march", "april", "mai", "may", "juni",
    "june", "juli", "july", "august", "september", "oktober", "october", "november", "dezember",
    "december",
    // Billing-period years
    "2023", "2024", "2025", "2026",
];

fn stop_words() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOP_WORDS.iter().copied().collect())
}

/// Tokenizes free text into normalized keywords: lowercase, everything
/// outside `[a-zäöüß0-9]` treated as a separator, tokens shorter than three
/// chars and stop words dropped. Duplicates are preserved; callers decide
/// whether to de-duplicate.
pub fn extract_keywords(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | 'ä' | 'ö' | 'ü' | 'ß' => c,
            _ => ' ',
        })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|t| t.chars().count() >= 3)
        .filter(|t| !stop_words().contains(t))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_splits_on_punctuation() {
        assert_eq!(
            extract_keywords("Adobe-Lizenz: Photoshop/Illustrator"),
            vec!["adobe", "lizenz", "photoshop", "illustrator"]
        );
    }

    #[test]
    fn keeps_german_special_chars() {
        assert_eq!(
            extract_keywords("Büromöbel für Geschäftsräume"),
            vec!["büromöbel", "geschäftsräume"]
        );
    }

    #[test]
    fn drops_short_tokens() {
        assert_eq!(extract_keywords("AWS EC2 m5 xl"), vec!["aws", "ec2"]);
    }

    #[test]
    fn drops_stop_words_and_years() {
        assert_eq!(
            extract_keywords("Rechnung für die Domain vom Dezember 2024"),
            vec!["rechnung", "domain"]
        );
    }

    #[test]
    fn drops_month_names_in_both_languages() {
        assert_eq!(
            extract_keywords("Hosting Januar invoice January"),
            vec!["hosting", "invoice"]
        );
    }

    #[test]
    fn empty_input_yields_empty() {
        assert_eq!(extract_keywords(""), Vec::<String>::new());
        assert_eq!(extract_keywords("   ,;- "), Vec::<String>::new());
    }

    #[test]
    fn duplicates_are_preserved() {
        assert_eq!(
            extract_keywords("server server hosting"),
            vec!["server", "server", "hosting"]
        );
    }
}
