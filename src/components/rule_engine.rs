//! Rule Engine Component ("paranoia mode")
//!
//! Cheap lexical tripwires evaluated before the classifier. Any hit
//! short-circuits the decision to a fixed Critical verdict.

use crate::features::FeatureVector;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const ENTROPY_LIMIT: f64 = 4.2;
pub const URL_LENGTH_LIMIT: usize = 120;
pub const SUBDOMAIN_LIMIT: usize = 3;
pub const DIGIT_RATIO_LIMIT: f64 = 0.35;

/// Matched against the lowercased raw URL
pub const PHISHING_KEYWORDS: [&str; 9] = [
    "login", "signin", "secure", "verify", "wallet", "reset", "update", "confirm", "checkout",
];

/// Which check fired, in evaluation order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RuleTrigger {
    RiskyTld { tld: String },
    HighEntropy { entropy: f64 },
    LongUrl { length: usize },
    DeepSubdomains { count: usize },
    UnicodeCharacters,
    AtSymbol,
    DigitHeavy { ratio: f64 },
    PhishingKeyword { keyword: String },
}

impl fmt::Display for RuleTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleTrigger::RiskyTld { tld } => write!(f, "Risky TLD .{}", tld),
            RuleTrigger::HighEntropy { entropy } => {
                write!(f, "Entropy {:.2} > {}", entropy, ENTROPY_LIMIT)
            }
            RuleTrigger::LongUrl { length } => {
                write!(f, "URL length {} > {}", length, URL_LENGTH_LIMIT)
            }
            RuleTrigger::DeepSubdomains { count } => {
                write!(f, "{} subdomain levels (>= {})", count, SUBDOMAIN_LIMIT)
            }
            RuleTrigger::UnicodeCharacters => f.write_str("Non-ASCII characters in URL"),
            RuleTrigger::AtSymbol => f.write_str("'@' in URL"),
            RuleTrigger::DigitHeavy { ratio } => {
                write!(f, "Digit ratio {:.2} > {}", ratio, DIGIT_RATIO_LIMIT)
            }
            RuleTrigger::PhishingKeyword { keyword } => {
                write!(f, "Phishing keyword '{}'", keyword)
            }
        }
    }
}

/// First rule that fires for this URL, if any
pub fn first_trigger(url: &str, feats: &FeatureVector) -> Option<RuleTrigger> {
    if feats.is_risky_tld != 0 {
        return Some(RuleTrigger::RiskyTld {
            tld: feats.tld.clone(),
        });
    }

    if feats.entropy > ENTROPY_LIMIT {
        return Some(RuleTrigger::HighEntropy {
            entropy: feats.entropy,
        });
    }

    if feats.url_length > URL_LENGTH_LIMIT {
        return Some(RuleTrigger::LongUrl {
            length: feats.url_length,
        });
    }

    if feats.subdomain_count >= SUBDOMAIN_LIMIT {
        return Some(RuleTrigger::DeepSubdomains {
            count: feats.subdomain_count,
        });
    }

    if feats.contains_unicode != 0 {
        return Some(RuleTrigger::UnicodeCharacters);
    }

    if feats.has_at_symbol != 0 {
        return Some(RuleTrigger::AtSymbol);
    }

    if feats.digit_ratio > DIGIT_RATIO_LIMIT {
        return Some(RuleTrigger::DigitHeavy {
            ratio: feats.digit_ratio,
        });
    }

    let url_lower = url.to_lowercase();
    PHISHING_KEYWORDS
        .iter()
        .find(|k| url_lower.contains(*k))
        .map(|k| RuleTrigger::PhishingKeyword {
            keyword: k.to_string(),
        })
}

/// True if any rule fires
pub fn triggers(url: &str, feats: &FeatureVector) -> bool {
    first_trigger(url, feats).is_some()
}
