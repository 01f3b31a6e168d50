use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One static vendor rule: `pattern` is a lowercase substring tested against
/// the raw vendor text, `label` is the human-readable name cited in the
/// suggestion reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorRule {
    pub pattern: String,
    pub category: String,
    pub label: String,
}

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("failed to parse rule table: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Deserialize)]
struct RuleFile {
    rules: Vec<VendorRule>,
}

/// Ordered, read-only vendor → category lookup. First matching rule wins, so
/// the table author puts specific patterns before generic ones.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<VendorRule>,
}

impl RuleTable {
    pub fn new(rules: Vec<VendorRule>) -> Self {
        Self { rules }
    }

    pub fn from_toml(content: &str) -> Result<Self, RuleError> {
        let file: RuleFile = toml::from_str(content)?;
        Ok(Self::new(file.rules))
    }

    /// The rule set shipped with the application, covering common German
    /// solo-business vendors.
    pub fn builtin() -> Self {
        Self::from_toml(include_str!("../rules/vendor_rules.toml"))
            .expect("built-in rule table is valid")
    }

    /// Case-insensitive substring lookup against the raw vendor text.
    pub fn match_rule(&self, vendor_text: &str) -> Option<&VendorRule> {
        let text = vendor_text.to_lowercase();
        if text.trim().is_empty() {
            return None;
        }
        self.rules.iter().find(|r| text.contains(&r.pattern))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(pattern: &str, category: &str, label: &str) -> VendorRule {
        VendorRule {
            pattern: pattern.to_string(),
            category: category.to_string(),
            label: label.to_string(),
        }
    }

    #[test]
    fn contains_match_is_case_insensitive() {
        let table = RuleTable::new(vec![rule("telekom", "telecom", "Telekommunikation")]);
        let hit = table.match_rule("TELEKOM DEUTSCHLAND GMBH").unwrap();
        assert_eq!(hit.category, "telecom");
    }

    #[test]
    fn no_match_returns_none() {
        let table = RuleTable::new(vec![rule("telekom", "telecom", "Telekommunikation")]);
        assert!(table.match_rule("Hetzner Online").is_none());
    }

    #[test]
    fn empty_vendor_never_matches() {
        let table = RuleTable::builtin();
        assert!(table.match_rule("").is_none());
        assert!(table.match_rule("   ").is_none());
    }

    #[test]
    fn first_rule_wins() {
        let table = RuleTable::new(vec![
            rule("google ads", "marketing", "Werbung & Marketing"),
            rule("google", "software", "Software & Lizenzen"),
        ]);
        assert_eq!(table.match_rule("Google Ads Konto").unwrap().category, "marketing");
        assert_eq!(table.match_rule("Google Cloud").unwrap().category, "software");
    }

    #[test]
    fn builtin_table_loads_and_covers_common_vendors() {
        let table = RuleTable::builtin();
        assert!(!table.is_empty());
        assert_eq!(table.match_rule("AWS").unwrap().category, "hosting");
        assert_eq!(table.match_rule("Telekom").unwrap().category, "telecom");
        // Specific before generic: the AWS marketplace entry must not fall
        // through to the plain "amazon" office-supplies rule.
        assert_eq!(
            table.match_rule("Amazon Web Services EMEA").unwrap().category,
            "hosting"
        );
    }

    #[test]
    fn from_toml_rejects_garbage() {
        assert!(RuleTable::from_toml("rules = 3").is_err());
    }
}
