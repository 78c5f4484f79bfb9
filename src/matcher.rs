use crate::error::Result;
use regex::Regex;
use std::collections::HashSet;

/// Loose RFC 5322-like address syntax: local part, `@`, domain, alphabetic TLD.
pub const EMAIL_PATTERN: &str = r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b";

/// Finds email-shaped substrings in extracted document text.
#[derive(Debug, Clone)]
pub struct EmailMatcher {
    pattern: Regex,
}

impl EmailMatcher {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(EMAIL_PATTERN)?,
        })
    }

    /// All non-overlapping matches in the order they appear.
    pub fn find_all<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.pattern.find_iter(text).map(|m| m.as_str()).collect()
    }

    /// Distinct matches, case preserved.
    pub fn extract(&self, text: &str) -> HashSet<String> {
        if text.is_empty() {
            return HashSet::new();
        }

        self.find_all(text).into_iter().map(String::from).collect()
    }
}
