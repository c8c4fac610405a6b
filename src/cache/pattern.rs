//! Key patterns used by bulk invalidation.

use regex::Regex;

/// Selects keys for `invalidate`.
#[derive(Debug, Clone)]
pub enum KeyPattern {
    /// Key contains the substring
    Substring(String),
    /// Key matches the regular expression
    Regex(Regex),
}

impl KeyPattern {
    pub fn matches(&self, key: &str) -> bool {
        match self {
            KeyPattern::Substring(needle) => key.contains(needle.as_str()),
            KeyPattern::Regex(re) => re.is_match(key),
        }
    }
}

impl From<&str> for KeyPattern {
    fn from(value: &str) -> Self {
        KeyPattern::Substring(value.to_string())
    }
}

impl From<String> for KeyPattern {
    fn from(value: String) -> Self {
        KeyPattern::Substring(value)
    }
}

impl From<Regex> for KeyPattern {
    fn from(value: Regex) -> Self {
        KeyPattern::Regex(value)
    }
}
