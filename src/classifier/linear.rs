//! Linear classifier artifact.
//!
//! A logistic model over the numeric feature columns, a one-hot TLD term and
//! optional char_wb n-gram TF-IDF terms computed from the raw URL. The
//! artifact is JSON and carries the `SchemaInfo` it was trained against;
//! loading refuses artifacts whose schema differs from the live extractor.

use super::{Classifier, FeatureRow};
use crate::error::ClassifierError;
use crate::features::{SchemaInfo, CATEGORICAL_FEATURE, FEATURE_NAMES};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NgramWeights {
    pub min_n: usize,
    pub max_n: usize,
    /// Inverse document frequencies; when empty every weighted gram has idf 1
    #[serde(default)]
    pub idf: HashMap<String, f64>,
    pub weights: HashMap<String, f64>,
}

impl NgramWeights {
    /// Dot product of the weights with the L2-normalized TF-IDF vector
    pub fn score(&self, url: &str) -> f64 {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for gram in char_wb_ngrams(&url.to_lowercase(), self.min_n, self.max_n) {
            *counts.entry(gram).or_insert(0) += 1;
        }

        let mut norm = 0.0;
        let mut dot = 0.0;
        for (gram, count) in &counts {
            let idf = if self.idf.is_empty() {
                if !self.weights.contains_key(gram) {
                    continue;
                }
                1.0
            } else {
                match self.idf.get(gram) {
                    Some(idf) => *idf,
                    None => continue,
                }
            };

            let value = *count as f64 * idf;
            norm += value * value;
            if let Some(weight) = self.weights.get(gram) {
                dot += weight * value;
            }
        }

        if norm > 0.0 {
            dot / norm.sqrt()
        } else {
            0.0
        }
    }
}

/// Character n-grams inside word boundaries, each word padded with one
/// space on both sides. Words shorter than `n` are emitted once.
pub fn char_wb_ngrams(text: &str, min_n: usize, max_n: usize) -> Vec<String> {
    let mut grams = Vec::new();
    if min_n == 0 {
        return grams;
    }

    for word in text.split_whitespace() {
        let padded: Vec<char> = std::iter::once(' ')
            .chain(word.chars())
            .chain(std::iter::once(' '))
            .collect();
        let len = padded.len();

        for n in min_n..=max_n {
            let mut offset = 0;
            grams.push(padded[offset..(offset + n).min(len)].iter().collect());
            while offset + n < len {
                offset += 1;
                grams.push(padded[offset..offset + n].iter().collect());
            }
            if offset == 0 {
                break;
            }
        }
    }

    grams
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub schema: SchemaInfo,
    #[serde(default)]
    pub intercept: f64,
    /// Keyed by numeric feature name
    #[serde(default)]
    pub weights: HashMap<String, f64>,
    /// One-hot TLD weights; unseen TLDs contribute nothing
    #[serde(default)]
    pub tld_weights: HashMap<String, f64>,
    #[serde(default)]
    pub ngrams: Option<NgramWeights>,
}

impl LinearModel {
    /// Empty model stamped with the live schema
    pub fn new(intercept: f64) -> Self {
        Self {
            schema: SchemaInfo::current(),
            intercept,
            weights: HashMap::new(),
            tld_weights: HashMap::new(),
            ngrams: None,
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        let unavailable = |reason: String| ClassifierError::Unavailable {
            path: path.to_path_buf(),
            reason,
        };

        let content = fs::read_to_string(path).map_err(|e| unavailable(e.to_string()))?;
        let model: LinearModel = serde_json::from_str(&content)
            .map_err(|e| unavailable(format!("invalid model JSON: {}", e)))?;

        if let Some(ngrams) = &model.ngrams {
            if ngrams.min_n == 0 || ngrams.min_n > ngrams.max_n {
                return Err(unavailable(format!(
                    "invalid n-gram range {}..={}",
                    ngrams.min_n, ngrams.max_n
                )));
            }
        }

        model.validate()?;

        log::info!(
            "Loaded linear model from {} (schema v{}, hash {:08x}, {} numeric weights, {} TLD weights)",
            path.display(),
            model.schema.version,
            model.schema.hash,
            model.weights.len(),
            model.tld_weights.len()
        );
        Ok(model)
    }

    /// Check the artifact against the live feature schema
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if let Some(reason) = self.schema.mismatch() {
            return Err(ClassifierError::SchemaMismatch(reason));
        }

        for name in self.weights.keys() {
            if name == CATEGORICAL_FEATURE || !FEATURE_NAMES.contains(&name.as_str()) {
                return Err(ClassifierError::SchemaMismatch(format!(
                    "weight given for unknown numeric feature '{}'",
                    name
                )));
            }
        }

        Ok(())
    }

    pub fn logit(&self, row: &FeatureRow<'_>) -> f64 {
        let mut z = self.intercept;

        for (name, value) in row.features.values() {
            if let (Some(weight), Some(x)) = (self.weights.get(name), value.as_f64()) {
                z += weight * x;
            }
        }

        if let Some(weight) = self.tld_weights.get(row.features.tld.as_str()) {
            z += weight;
        }

        if let Some(ngrams) = &self.ngrams {
            z += ngrams.score(row.url);
        }

        z
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl Classifier for LinearModel {
    fn predict_proba(&self, row: &FeatureRow<'_>) -> Result<[f64; 2], ClassifierError> {
        let z = self.logit(row);
        let p = sigmoid(z);
        if !p.is_finite() {
            return Err(ClassifierError::Inference(format!(
                "non-finite probability from logit {}",
                z
            )));
        }
        Ok([1.0 - p, p])
    }

    fn name(&self) -> &str {
        "linear"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::extract_features;
    use std::io::Write;

    fn write_model(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    fn proba(model: &LinearModel, url: &str) -> f64 {
        let features = extract_features(url);
        model.predict_proba(&FeatureRow::new(url, &features)).unwrap()[1]
    }

    #[test]
    fn test_char_wb_ngrams() {
        assert_eq!(
            char_wb_ngrams("ab", 3, 5),
            vec![" ab".to_string(), "ab ".to_string(), " ab ".to_string()]
        );
        assert_eq!(char_wb_ngrams("a b", 3, 3), vec![" a ", " b "]);
        assert!(char_wb_ngrams("", 3, 5).is_empty());
    }

    #[test]
    fn test_intercept_only_model() {
        let model = LinearModel::new(0.0);
        assert!((proba(&model, "https://example.com") - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_numeric_and_tld_weights() {
        let mut model = LinearModel::new(-2.0);
        model.weights.insert("URLLength".to_string(), 0.1);
        let p = proba(&model, "https://example.com");
        assert!((p - sigmoid(-0.1)).abs() < 1e-12);

        model.tld_weights.insert("com".to_string(), -3.0);
        let p = proba(&model, "https://example.com");
        assert!((p - sigmoid(-3.1)).abs() < 1e-12);
        let p = proba(&model, "https://example.org");
        assert!((p - sigmoid(-0.1)).abs() < 1e-12);
    }

    #[test]
    fn test_ngram_score() {
        let mut weights = HashMap::new();
        weights.insert("exa".to_string(), 1.0);
        let ngrams = NgramWeights {
            min_n: 3,
            max_n: 3,
            idf: HashMap::new(),
            weights,
        };
        assert!((ngrams.score("EXAMPLE") - 1.0).abs() < 1e-12);
        assert_eq!(ngrams.score("nothing"), 0.0);
    }

    #[test]
    fn test_load_round_trip() {
        let mut model = LinearModel::new(0.25);
        model.weights.insert("DigitRatio".to_string(), 2.0);
        let file = write_model(&serde_json::to_string(&model).unwrap());

        let loaded = LinearModel::load(file.path()).unwrap();
        assert_eq!(loaded.intercept, 0.25);
        assert_eq!(loaded.weights.get("DigitRatio"), Some(&2.0));
    }

    #[test]
    fn test_bundled_artifact_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/model/phishguard-model.json");
        let model = LinearModel::load(path).unwrap();
        assert_eq!(model.schema, SchemaInfo::current());

        let benign = proba(&model, "https://www.wikipedia.org");
        let shady = proba(&model, "http://free-promo-click.info/claim?id=88&ref=991");
        assert!(benign < shady);
    }

    #[test]
    fn test_missing_artifact_is_unavailable() {
        let err = LinearModel::load("/nonexistent/phishguard/model.json").unwrap_err();
        assert!(matches!(err, ClassifierError::Unavailable { .. }));
    }

    #[test]
    fn test_corrupt_artifact_is_unavailable() {
        let file = write_model("{ not json");
        let err = LinearModel::load(file.path()).unwrap_err();
        assert!(matches!(err, ClassifierError::Unavailable { .. }));
    }

    #[test]
    fn test_reordered_schema_is_rejected() {
        let mut model = LinearModel::new(0.0);
        model.schema.features.swap(3, 4);
        let file = write_model(&serde_json::to_string(&model).unwrap());

        let err = LinearModel::load(file.path()).unwrap_err();
        assert!(matches!(err, ClassifierError::SchemaMismatch(_)));
    }

    #[test]
    fn test_stale_hash_is_rejected() {
        let mut model = LinearModel::new(0.0);
        model.schema.hash = model.schema.hash.wrapping_add(1);
        let file = write_model(&serde_json::to_string(&model).unwrap());

        let err = LinearModel::load(file.path()).unwrap_err();
        assert!(matches!(err, ClassifierError::SchemaMismatch(_)));
    }

    #[test]
    fn test_weight_on_categorical_column_is_rejected() {
        let mut model = LinearModel::new(0.0);
        model.weights.insert("TLD".to_string(), 1.0);
        assert!(matches!(
            model.validate(),
            Err(ClassifierError::SchemaMismatch(_))
        ));

        let mut model = LinearModel::new(0.0);
        model.weights.insert("PageRank".to_string(), 1.0);
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_invalid_ngram_range_is_unavailable() {
        let mut model = LinearModel::new(0.0);
        model.ngrams = Some(NgramWeights {
            min_n: 5,
            max_n: 3,
            idf: HashMap::new(),
            weights: HashMap::new(),
        });
        let file = write_model(&serde_json::to_string(&model).unwrap());
        assert!(matches!(
            LinearModel::load(file.path()),
            Err(ClassifierError::Unavailable { .. })
        ));
    }
}
