//! Early Decision Engine Component
//!
//! Exact-match list lookups consulted before any feature analysis. A hit
//! fixes the verdict; a miss lets the URL continue to the rule engine and
//! the classifier. Blocklist takes precedence over allowlist.

use crate::components::decision_engine::Label;
use std::collections::HashSet;
use url::Url;

/// Verdict fixed by a lookup hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedVerdict {
    pub label: Label,
    pub probability: f64,
}

impl FixedVerdict {
    pub fn blocked() -> Self {
        Self {
            label: Label::Phishing,
            probability: 1.0,
        }
    }

    pub fn allowed() -> Self {
        Self {
            label: Label::Safe,
            probability: 0.0,
        }
    }
}

/// Known-URL lookup injected into the decision engine
pub trait UrlLookup: Send + Sync {
    fn lookup(&self, url: &str) -> Option<FixedVerdict>;
}

#[derive(Debug, Default)]
pub struct ListLookup {
    blocked: HashSet<String>,
    allowed: HashSet<String>,
}

impl ListLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lists<B, A>(blocklist: B, allowlist: A) -> Self
    where
        B: IntoIterator,
        B::Item: AsRef<str>,
        A: IntoIterator,
        A::Item: AsRef<str>,
    {
        let mut lookup = Self::new();
        for entry in blocklist {
            lookup.add_blocked(entry.as_ref());
        }
        for entry in allowlist {
            lookup.add_allowed(entry.as_ref());
        }
        lookup
    }

    /// Add blocklist entry
    pub fn add_blocked(&mut self, url: &str) {
        if let Some(key) = canonicalize(url) {
            self.blocked.insert(key);
        }
    }

    /// Add allowlist entry
    pub fn add_allowed(&mut self, url: &str) {
        if let Some(key) = canonicalize(url) {
            self.allowed.insert(key);
        }
    }

    pub fn len(&self) -> usize {
        self.blocked.len() + self.allowed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty() && self.allowed.is_empty()
    }
}

impl UrlLookup for ListLookup {
    fn lookup(&self, url: &str) -> Option<FixedVerdict> {
        let key = canonicalize(url)?;

        if self.blocked.contains(&key) {
            log::debug!("Blocklist hit: {}", key);
            return Some(FixedVerdict::blocked());
        }

        if self.allowed.contains(&key) {
            log::debug!("Allowlist hit: {}", key);
            return Some(FixedVerdict::allowed());
        }

        None
    }
}

/// Absolute URLs compare in their normalized form (lowercased host, default
/// path); anything else compares as trimmed text. Blank entries are dropped.
fn canonicalize(url: &str) -> Option<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return None;
    }

    match Url::parse(trimmed) {
        Ok(parsed) if parsed.has_host() => Some(parsed.to_string()),
        _ => Some(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_forms_match() {
        let lookup = ListLookup::from_lists(["http://Evil.Example.com"], Vec::<String>::new());
        assert_eq!(
            lookup.lookup("http://evil.example.com/"),
            Some(FixedVerdict::blocked())
        );
        assert_eq!(
            lookup.lookup("  http://EVIL.example.com  "),
            Some(FixedVerdict::blocked())
        );
        assert_eq!(lookup.lookup("http://evil.example.com/other"), None);
    }

    #[test]
    fn test_non_url_entries_compare_trimmed() {
        let lookup = ListLookup::from_lists(Vec::<&str>::new(), [" example.org/home "]);
        assert_eq!(lookup.lookup("example.org/home"), Some(FixedVerdict::allowed()));
        assert_eq!(lookup.lookup("Example.org/home"), None);
    }

    #[test]
    fn test_blocklist_beats_allowlist() {
        let lookup = ListLookup::from_lists(["https://both.example"], ["https://both.example"]);
        let verdict = lookup.lookup("https://both.example").unwrap();
        assert_eq!(verdict.label, Label::Phishing);
        assert_eq!(verdict.probability, 1.0);
    }

    #[test]
    fn test_blank_entries_are_ignored() {
        let lookup = ListLookup::from_lists(["", "   "], [""]);
        assert!(lookup.is_empty());
        assert_eq!(lookup.lookup(""), None);
    }
}
