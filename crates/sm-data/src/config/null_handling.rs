//! Which cell values count as missing

use serde::{Deserialize, Serialize};

/// Null value configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NullConfig {
    /// Patterns to treat as null
    pub patterns: Vec<String>,

    /// Whether to trim whitespace before checking
    pub trim_whitespace: bool,

    /// Case sensitive matching
    pub case_sensitive: bool,
}

/// pandas' default `na_values`, matched exactly
const DEFAULT_NULL_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

impl Default for NullConfig {
    /// The token list and case rules of `pandas.read_csv`. Unlike pandas, the
    /// cell is trimmed first, so a blank cell is missing too.
    fn default() -> Self {
        Self {
            patterns: DEFAULT_NULL_TOKENS.iter().map(|token| token.to_string()).collect(),
            trim_whitespace: true,
            case_sensitive: true,
        }
    }
}

impl NullConfig {
    /// Check if a value should be treated as null
    pub fn is_null(&self, value: &str) -> bool {
        let test_value = if self.trim_whitespace { value.trim() } else { value };

        self.patterns.iter().any(|pattern| {
            if self.case_sensitive {
                test_value == pattern
            } else {
                test_value.eq_ignore_ascii_case(pattern)
            }
        })
    }

    /// The cell as present text, or `None` when it counts as missing
    pub fn clean<'a>(&self, value: &'a str) -> Option<&'a str> {
        if self.is_null(value) {
            None
        } else {
            Some(value.trim())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_patterns() {
        let config = NullConfig::default();
        for value in ["", "  ", "NA", "n/a", "N/A", "NaN", "nan", "NULL", "null", "None", "#N/A", "<NA>"] {
            assert!(config.is_null(value), "{:?} should be null", value);
        }
        for value in ["-", "NONE", "Na", "Nancy", "none"] {
            assert!(!config.is_null(value), "{:?} should be kept", value);
        }
        assert_eq!(config.clean("  Lyon "), Some("Lyon"));
        assert_eq!(config.clean(" nan "), None);
        assert_eq!(config.clean("-"), Some("-"));
    }

    #[test]
    fn test_case_insensitive() {
        let config = NullConfig {
            case_sensitive: false,
            ..NullConfig::default()
        };
        assert!(config.is_null("NONE"));
        assert!(config.is_null("none"));
        assert!(!config.is_null("-"));
    }
}
