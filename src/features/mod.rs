//! Lexical URL features.
//!
//! `FeatureVector` is the single source of truth for the feature schema a
//! classifier artifact is trained against. Field order below is the column
//! order; any change to it must bump `SCHEMA_VERSION`, which changes
//! `schema_hash()` and makes older model artifacts fail to load.

pub mod extractor;
pub mod tld_risk;
pub mod url_parts;

pub use extractor::{extract_features, shannon_entropy};
pub use url_parts::UrlParts;

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Current feature schema version
pub const SCHEMA_VERSION: u8 = 1;

/// Total number of features, categorical included
pub const FEATURE_COUNT: usize = 35;

/// The only non-numeric feature; consumed by the classifier's encoder
pub const CATEGORICAL_FEATURE: &str = "TLD";

/// Feature names in column order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "URLLength",
    "DomainLength",
    "TLD",
    "IsRiskyTLD",
    "IsDomainIP",
    "SubdomainCount",
    "LetterCount",
    "DigitCount",
    "SpecialCharCount",
    "LetterRatio",
    "DigitRatio",
    "SpecialCharRatio",
    "DotCount",
    "HyphenCount",
    "AtCount",
    "ParamCount",
    "EqCount",
    "AmpCount",
    "HasHTTPS",
    "HasWWW",
    "HasAtSymbol",
    "ContainsUnicode",
    "HasEncoded",
    "PathDepth",
    "QueryLength",
    "Entropy",
    "ContainsLogin",
    "ContainsVerify",
    "ContainsSecure",
    "ContainsUpdate",
    "ContainsAccount",
    "ContainsFree",
    "ContainsPromo",
    "ContainsClick",
    "ContainsWallet",
];

/// CRC32 over the schema version and the ordered feature names
pub fn schema_hash() -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[SCHEMA_VERSION]);
    for name in FEATURE_NAMES {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }
    hasher.finalize()
}

/// Schema description embedded in model artifacts and printed by `--schema`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaInfo {
    pub version: u8,
    pub hash: u32,
    pub features: Vec<String>,
}

impl SchemaInfo {
    pub fn current() -> Self {
        Self {
            version: SCHEMA_VERSION,
            hash: schema_hash(),
            features: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Describe how `self` differs from the live schema, if it does
    pub fn mismatch(&self) -> Option<String> {
        let current = Self::current();
        if self.version != current.version {
            return Some(format!(
                "artifact schema v{} but extractor is v{}",
                self.version, current.version
            ));
        }
        if self.features != current.features {
            let first_diff = self
                .features
                .iter()
                .zip(current.features.iter())
                .position(|(a, b)| a != b)
                .unwrap_or_else(|| self.features.len().min(current.features.len()));
            return Some(format!(
                "feature lists differ at column {} ({} artifact features, {} live)",
                first_diff,
                self.features.len(),
                current.features.len()
            ));
        }
        if self.hash != current.hash {
            return Some(format!(
                "layout hash {:08x} does not match live {:08x}",
                self.hash, current.hash
            ));
        }
        None
    }
}

/// A single feature value as seen by a classifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue<'a> {
    Int(u64),
    Float(f64),
    Category(&'a str),
}

impl FeatureValue<'_> {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Int(v) => Some(*v as f64),
            FeatureValue::Float(v) => Some(*v),
            FeatureValue::Category(_) => None,
        }
    }
}

impl fmt::Display for FeatureValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Int(v) => write!(f, "{}", v),
            FeatureValue::Float(v) => write!(f, "{:.4}", v),
            FeatureValue::Category(v) => write!(f, "{:?}", v),
        }
    }
}

/// Fixed-shape lexical feature vector for one URL
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    #[serde(rename = "URLLength")]
    pub url_length: usize,
    #[serde(rename = "DomainLength")]
    pub domain_length: usize,
    #[serde(rename = "TLD")]
    pub tld: String,
    #[serde(rename = "IsRiskyTLD")]
    pub is_risky_tld: u8,
    #[serde(rename = "IsDomainIP")]
    pub is_domain_ip: u8,
    #[serde(rename = "SubdomainCount")]
    pub subdomain_count: usize,

    #[serde(rename = "LetterCount")]
    pub letter_count: usize,
    #[serde(rename = "DigitCount")]
    pub digit_count: usize,
    #[serde(rename = "SpecialCharCount")]
    pub special_char_count: usize,
    #[serde(rename = "LetterRatio")]
    pub letter_ratio: f64,
    #[serde(rename = "DigitRatio")]
    pub digit_ratio: f64,
    #[serde(rename = "SpecialCharRatio")]
    pub special_char_ratio: f64,

    #[serde(rename = "DotCount")]
    pub dot_count: usize,
    #[serde(rename = "HyphenCount")]
    pub hyphen_count: usize,
    #[serde(rename = "AtCount")]
    pub at_count: usize,
    #[serde(rename = "ParamCount")]
    pub param_count: usize,
    #[serde(rename = "EqCount")]
    pub eq_count: usize,
    #[serde(rename = "AmpCount")]
    pub amp_count: usize,

    #[serde(rename = "HasHTTPS")]
    pub has_https: u8,
    #[serde(rename = "HasWWW")]
    pub has_www: u8,
    #[serde(rename = "HasAtSymbol")]
    pub has_at_symbol: u8,
    #[serde(rename = "ContainsUnicode")]
    pub contains_unicode: u8,
    #[serde(rename = "HasEncoded")]
    pub has_encoded: u8,

    #[serde(rename = "PathDepth")]
    pub path_depth: usize,
    #[serde(rename = "QueryLength")]
    pub query_length: usize,

    #[serde(rename = "Entropy")]
    pub entropy: f64,

    #[serde(rename = "ContainsLogin")]
    pub contains_login: u8,
    #[serde(rename = "ContainsVerify")]
    pub contains_verify: u8,
    #[serde(rename = "ContainsSecure")]
    pub contains_secure: u8,
    #[serde(rename = "ContainsUpdate")]
    pub contains_update: u8,
    #[serde(rename = "ContainsAccount")]
    pub contains_account: u8,
    #[serde(rename = "ContainsFree")]
    pub contains_free: u8,
    #[serde(rename = "ContainsPromo")]
    pub contains_promo: u8,
    #[serde(rename = "ContainsClick")]
    pub contains_click: u8,
    #[serde(rename = "ContainsWallet")]
    pub contains_wallet: u8,
}

impl FeatureVector {
    /// All features as `(name, value)` pairs in column order
    pub fn values(&self) -> [(&'static str, FeatureValue<'_>); FEATURE_COUNT] {
        use FeatureValue::{Category, Float, Int};

        let count = |v: usize| Int(v as u64);
        let flag = |v: u8| Int(u64::from(v));

        [
            (FEATURE_NAMES[0], count(self.url_length)),
            (FEATURE_NAMES[1], count(self.domain_length)),
            (FEATURE_NAMES[2], Category(self.tld.as_str())),
            (FEATURE_NAMES[3], flag(self.is_risky_tld)),
            (FEATURE_NAMES[4], flag(self.is_domain_ip)),
            (FEATURE_NAMES[5], count(self.subdomain_count)),
            (FEATURE_NAMES[6], count(self.letter_count)),
            (FEATURE_NAMES[7], count(self.digit_count)),
            (FEATURE_NAMES[8], count(self.special_char_count)),
            (FEATURE_NAMES[9], Float(self.letter_ratio)),
            (FEATURE_NAMES[10], Float(self.digit_ratio)),
            (FEATURE_NAMES[11], Float(self.special_char_ratio)),
            (FEATURE_NAMES[12], count(self.dot_count)),
            (FEATURE_NAMES[13], count(self.hyphen_count)),
            (FEATURE_NAMES[14], count(self.at_count)),
            (FEATURE_NAMES[15], count(self.param_count)),
            (FEATURE_NAMES[16], count(self.eq_count)),
            (FEATURE_NAMES[17], count(self.amp_count)),
            (FEATURE_NAMES[18], flag(self.has_https)),
            (FEATURE_NAMES[19], flag(self.has_www)),
            (FEATURE_NAMES[20], flag(self.has_at_symbol)),
            (FEATURE_NAMES[21], flag(self.contains_unicode)),
            (FEATURE_NAMES[22], flag(self.has_encoded)),
            (FEATURE_NAMES[23], count(self.path_depth)),
            (FEATURE_NAMES[24], count(self.query_length)),
            (FEATURE_NAMES[25], Float(self.entropy)),
            (FEATURE_NAMES[26], flag(self.contains_login)),
            (FEATURE_NAMES[27], flag(self.contains_verify)),
            (FEATURE_NAMES[28], flag(self.contains_secure)),
            (FEATURE_NAMES[29], flag(self.contains_update)),
            (FEATURE_NAMES[30], flag(self.contains_account)),
            (FEATURE_NAMES[31], flag(self.contains_free)),
            (FEATURE_NAMES[32], flag(self.contains_promo)),
            (FEATURE_NAMES[33], flag(self.contains_click)),
            (FEATURE_NAMES[34], flag(self.contains_wallet)),
        ]
    }

    /// Get feature by name
    pub fn get(&self, name: &str) -> Option<FeatureValue<'_>> {
        self.values()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    /// Numeric value of a feature; `None` for unknown names and the TLD
    pub fn numeric(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(|v| v.as_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_count() {
        assert_eq!(FEATURE_NAMES.len(), FEATURE_COUNT);
        assert_eq!(FeatureVector::default().values().len(), FEATURE_COUNT);
    }

    #[test]
    fn test_values_follow_schema_order() {
        let fv = FeatureVector::default();
        let names: Vec<&str> = fv.values().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, FEATURE_NAMES.to_vec());
    }

    #[test]
    fn test_serialized_keys_follow_schema_order() {
        let json = serde_json::to_string(&FeatureVector::default()).unwrap();
        let positions: Vec<usize> = FEATURE_NAMES
            .iter()
            .map(|name| json.find(&format!("\"{}\":", name)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_only_tld_is_categorical() {
        let fv = FeatureVector::default();
        for (name, value) in fv.values() {
            if name == CATEGORICAL_FEATURE {
                assert!(value.as_f64().is_none());
            } else {
                assert!(value.as_f64().is_some(), "{} should be numeric", name);
            }
        }
    }

    #[test]
    fn test_schema_hash_is_stable() {
        assert_eq!(schema_hash(), schema_hash());
        assert!(SchemaInfo::current().mismatch().is_none());
    }

    #[test]
    fn test_schema_mismatch_detection() {
        let mut reordered = SchemaInfo::current();
        reordered.features.swap(0, 1);
        assert!(reordered.mismatch().unwrap().contains("column 0"));

        let mut truncated = SchemaInfo::current();
        truncated.features.pop();
        assert!(truncated.mismatch().is_some());

        let mut bumped = SchemaInfo::current();
        bumped.version += 1;
        assert!(bumped.mismatch().unwrap().contains("schema v"));

        let mut rehashed = SchemaInfo::current();
        rehashed.hash ^= 1;
        assert!(rehashed.mismatch().unwrap().contains("layout hash"));
    }

    #[test]
    fn test_named_lookup() {
        let fv = FeatureVector {
            url_length: 19,
            tld: "com".to_string(),
            ..Default::default()
        };
        assert_eq!(fv.numeric("URLLength"), Some(19.0));
        assert_eq!(fv.get("TLD"), Some(FeatureValue::Category("com")));
        assert_eq!(fv.numeric("TLD"), None);
        assert_eq!(fv.numeric("NoSuchFeature"), None);
    }
}
