use std::collections::HashSet;

pub const ADDRESS_KEYWORDS: &[&str] = &[
    "st", "street", "ave", "avenue", "rd", "road", "blvd", "boulevard", "dr", "drive", "lane",
    "suite", "floor", "box", "po box", "plaza", "circle",
];

pub const TITLE_KEYWORDS: &[&str] = &[
    "manager",
    "director",
    "president",
    "vp",
    "ceo",
    "cfo",
    "cto",
    "chief",
    "engineer",
    "developer",
    "consultant",
    "specialist",
    "coordinator",
    "administrator",
    "assistant",
    "associate",
    "founder",
    "owner",
    "partner",
    "lead",
    "head",
];

pub const COMPANY_SUFFIXES: &[&str] = &[
    "inc",
    "llc",
    "ltd",
    "corp",
    "corporation",
    "group",
    "holdings",
    "solutions",
    "systems",
    "services",
    "technologies",
    "company",
    "co.",
];

/// Bare hosts (no scheme, no `www.`) only count as websites with one of these
pub const WEB_TLDS: &[&str] = &[
    "com", "net", "org", "io", "biz", "us", "co", "info", "edu", "gov", "ca", "uk", "de", "ai",
    "dev", "app",
];

/// Title lines with this many tokens or more read as sentences
pub const MAX_TITLE_TOKENS: usize = 7;
pub const MAX_NAME_TOKENS: usize = 4;
pub const MIN_NAME_LEN: usize = 3;

/// Lowercase keyword tables for a single extractor instance
pub struct Keywords {
    address: HashSet<&'static str>,
    company: HashSet<&'static str>,
    tlds: HashSet<&'static str>,
    titles: &'static [&'static str],
}

impl Keywords {
    pub fn new() -> Self {
        Self {
            address: ADDRESS_KEYWORDS.iter().copied().collect(),
            company: COMPANY_SUFFIXES.iter().copied().collect(),
            tlds: WEB_TLDS.iter().copied().collect(),
            titles: TITLE_KEYWORDS,
        }
    }

    /// Whole-token match against the address keywords. Two-word keywords
    /// match as adjacent tokens.
    pub fn has_address_keyword(&self, line: &str) -> bool {
        let tokens = address_tokens(line);
        tokens.iter().any(|t| self.address.contains(t.as_str()))
            || tokens
                .windows(2)
                .any(|pair| self.address.contains(format!("{} {}", pair[0], pair[1]).as_str()))
    }

    /// Exact token match, no punctuation stripping (so `co.` only matches `Co.`)
    pub fn has_company_suffix(&self, line: &str) -> bool {
        line.to_lowercase()
            .split_whitespace()
            .any(|token| self.company.contains(token))
    }

    /// Case-sensitive, so `St.Louis` does not read as a host
    pub fn is_web_tld(&self, label: &str) -> bool {
        self.tlds.contains(label)
    }

    /// Substring match so compound titles like "VP Sales" or "Co-Founder" hit
    pub fn has_title_keyword(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        self.titles.iter().any(|keyword| lower.contains(keyword))
    }
}

impl Default for Keywords {
    fn default() -> Self {
        Self::new()
    }
}

fn address_tokens(line: &str) -> Vec<String> {
    line.to_lowercase()
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| c == ',' || c == '.' || c == '#'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn has_digit(line: &str) -> bool {
    line.chars().any(|c| c.is_ascii_digit())
}

pub fn token_count(line: &str) -> usize {
    line.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_keyword_whole_token() {
        let keywords = Keywords::new();
        assert!(keywords.has_address_keyword("123 Main St."));
        assert!(keywords.has_address_keyword("Suite 400"));
        assert!(keywords.has_address_keyword("P.O. Box 12"));
        assert!(keywords.has_address_keyword("PO Box 12"));
        // "st" inside a word is not a token
        assert!(!keywords.has_address_keyword("Strategist"));
        assert!(!keywords.has_address_keyword("Droid Works"));
    }

    #[test]
    fn test_company_suffix_exact_token() {
        let keywords = Keywords::new();
        assert!(keywords.has_company_suffix("Acme Corp"));
        assert!(keywords.has_company_suffix("Widget Co."));
        assert!(keywords.has_company_suffix("Initech LLC"));
        assert!(!keywords.has_company_suffix("Widget Co"));
        assert!(!keywords.has_company_suffix("Acme Corp."));
    }

    #[test]
    fn test_title_keyword_substring() {
        let keywords = Keywords::new();
        assert!(keywords.has_title_keyword("Senior Engineer"));
        assert!(keywords.has_title_keyword("Co-Founder & CEO"));
        assert!(keywords.has_title_keyword("SVP, Operations"));
        assert!(!keywords.has_title_keyword("Jane Doe"));
    }

    #[test]
    fn test_web_tld_is_lowercase_only() {
        let keywords = Keywords::new();
        assert!(keywords.is_web_tld("com"));
        assert!(keywords.is_web_tld("io"));
        assert!(!keywords.is_web_tld("COM"));
        assert!(!keywords.is_web_tld("Louis"));
        assert!(!keywords.is_web_tld("inc"));
    }

    #[test]
    fn test_token_helpers() {
        assert!(has_digit("Floor 3"));
        assert!(!has_digit("Main Street"));
        assert_eq!(token_count("  the   quick fox "), 3);
    }
}
