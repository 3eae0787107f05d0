use serde::{Deserialize, Serialize};

/// Suffixes with very high phishing abuse rates, mostly free or
/// near-free registrations
pub const RISKY_TLDS: [&str; 19] = [
    "tk", "ml", "ga", "cf", "gq", "xyz", "top", "club", "fun", "rest", "pw", "click", "link",
    "kim", "work", "live", "fit", "host", "icu",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TldRisk {
    Unknown,  // no public suffix (IP literals, intranet names)
    Standard, // anything not on the abuse list
    HighRisk, // free/cheap TLDs with very high abuse rates
}

/// Classify an already-lowercased public suffix
pub fn classify_tld(tld: &str) -> TldRisk {
    if tld.is_empty() {
        TldRisk::Unknown
    } else if RISKY_TLDS.contains(&tld) {
        TldRisk::HighRisk
    } else {
        TldRisk::Standard
    }
}

pub fn is_risky_tld(tld: &str) -> bool {
    classify_tld(tld) == TldRisk::HighRisk
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tld_risk_assessment() {
        assert_eq!(classify_tld("tk"), TldRisk::HighRisk);
        assert_eq!(classify_tld("xyz"), TldRisk::HighRisk);
        assert_eq!(classify_tld("com"), TldRisk::Standard);
        assert_eq!(classify_tld("co.uk"), TldRisk::Standard);
        assert_eq!(classify_tld(""), TldRisk::Unknown);
    }

    #[test]
    fn test_compound_suffix_is_not_split() {
        // Only the whole suffix is compared, never its last label
        assert!(!is_risky_tld("tk.example"));
        assert!(is_risky_tld("icu"));
    }
}
