//! Decision Engine Component
//!
//! Orchestrates a single URL analysis: optional list lookup, feature
//! extraction, the rule engine short-circuit, classifier inference, threshold
//! evaluation and risk categorization.

use crate::classifier::{Classifier, FeatureRow};
use crate::components::early_decision_engine::{FixedVerdict, UrlLookup};
use crate::components::risk::{categorize, RiskCategory};
use crate::components::rule_engine::{self, RuleTrigger};
use crate::error::{DecisionError, DecisionResult};
use crate::features::{extract_features, FeatureVector};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Probabilities strictly above this are labeled phishing
pub const DECISION_THRESHOLD: f64 = 0.45;

/// Probability reported for rule short-circuits
pub const RULE_PROBABILITY: f64 = 0.99;

pub const DEFAULT_INFERENCE_TIMEOUT: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    Safe,
    Phishing,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Safe => f.write_str("SAFE"),
            Label::Phishing => f.write_str("PHISHING"),
        }
    }
}

/// Which stage produced the verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reason {
    Rule,
    Model,
    Lookup,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::Rule => f.write_str("rule"),
            Reason::Model => f.write_str("model"),
            Reason::Lookup => f.write_str("lookup"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub url: String,
    pub label: Label,
    pub reason: Reason,
    pub probability: f64,
    pub category: RiskCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<RuleTrigger>,
    pub features: FeatureVector,
}

impl Verdict {
    fn from_rule(url: &str, features: FeatureVector, trigger: RuleTrigger) -> Self {
        Self {
            url: url.to_string(),
            label: Label::Phishing,
            reason: Reason::Rule,
            probability: RULE_PROBABILITY,
            category: RiskCategory::Critical,
            trigger: Some(trigger),
            features,
        }
    }

    fn from_model(url: &str, features: FeatureVector, probability: f64) -> Self {
        let label = if probability > DECISION_THRESHOLD {
            Label::Phishing
        } else {
            Label::Safe
        };

        Self {
            url: url.to_string(),
            label,
            reason: Reason::Model,
            probability,
            category: categorize(probability),
            trigger: None,
            features,
        }
    }

    fn from_lookup(url: &str, features: FeatureVector, fixed: FixedVerdict) -> Self {
        Self {
            url: url.to_string(),
            label: fixed.label,
            reason: Reason::Lookup,
            probability: fixed.probability,
            category: categorize(fixed.probability),
            trigger: None,
            features,
        }
    }

    pub fn is_phishing(&self) -> bool {
        self.label == Label::Phishing
    }
}

/// Outcome of the steps that run before any inference
enum Screening {
    RuleHit(Verdict),
    NeedsModel(FeatureVector),
}

/// Extract features and apply the rule engine
fn screen(url: &str) -> Screening {
    let features = extract_features(url);

    match rule_engine::first_trigger(url, &features) {
        Some(trigger) => {
            log::debug!("Rule short-circuit for {}: {}", url, trigger);
            Screening::RuleHit(Verdict::from_rule(url, features, trigger))
        }
        None => Screening::NeedsModel(features),
    }
}

/// Turn classifier output into a model verdict
fn score(
    url: &str,
    features: FeatureVector,
    proba: [f64; 2],
    classifier_name: &str,
) -> DecisionResult<Verdict> {
    let probability = check_probability(proba[1])?;
    log::debug!(
        "{} scored {:.4} by {} classifier",
        url,
        probability,
        classifier_name
    );
    Ok(Verdict::from_model(url, features, probability))
}

/// Classify a URL with the rule engine and, if no rule fires, the classifier.
///
/// The caller is expected to have rejected empty input. Classifier errors and
/// probabilities outside `[0, 1]` are returned as `InferenceFailure`.
pub fn decide(url: &str, classifier: &dyn Classifier) -> DecisionResult<Verdict> {
    let features = match screen(url) {
        Screening::RuleHit(verdict) => return Ok(verdict),
        Screening::NeedsModel(features) => features,
    };

    let proba = classifier.predict_proba(&FeatureRow::new(url, &features))?;
    score(url, features, proba, classifier.name())
}

fn check_probability(p: f64) -> DecisionResult<f64> {
    if p.is_finite() && (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(DecisionError::InferenceFailure(format!(
            "classifier returned probability {} outside [0, 1]",
            p
        )))
    }
}

pub struct DecisionEngine {
    classifier: Arc<dyn Classifier>,
    lookup: Option<Box<dyn UrlLookup>>,
    inference_timeout: Duration,
}

impl DecisionEngine {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            lookup: None,
            inference_timeout: DEFAULT_INFERENCE_TIMEOUT,
        }
    }

    pub fn with_lookup(mut self, lookup: Box<dyn UrlLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    pub fn with_inference_timeout(mut self, timeout: Duration) -> Self {
        self.inference_timeout = timeout;
        self
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    pub fn inference_timeout(&self) -> Duration {
        self.inference_timeout
    }

    fn check_lookup(&self, url: &str) -> Option<Verdict> {
        let fixed = self.lookup.as_ref()?.lookup(url)?;
        // Features are still computed so lookup verdicts can be inspected
        Some(Verdict::from_lookup(url, extract_features(url), fixed))
    }

    /// Lookup first, then rule engine and classifier
    pub fn analyze(&self, url: &str) -> DecisionResult<Verdict> {
        if let Some(verdict) = self.check_lookup(url) {
            return Ok(verdict);
        }
        decide(url, self.classifier.as_ref())
    }

    /// Same as `analyze`, with classifier inference moved to the blocking
    /// pool and bounded by the configured timeout
    pub async fn analyze_with_timeout(&self, url: &str) -> DecisionResult<Verdict> {
        if let Some(verdict) = self.check_lookup(url) {
            return Ok(verdict);
        }

        let features = match screen(url) {
            Screening::RuleHit(verdict) => return Ok(verdict),
            Screening::NeedsModel(features) => features,
        };

        let classifier = Arc::clone(&self.classifier);
        let row_url = url.to_string();
        let row_features = features.clone();
        let task = tokio::task::spawn_blocking(move || {
            classifier.predict_proba(&FeatureRow::new(&row_url, &row_features))
        });

        let proba = match tokio::time::timeout(self.inference_timeout, task).await {
            Ok(Ok(result)) => result?,
            Ok(Err(e)) => {
                return Err(DecisionError::InferenceFailure(format!(
                    "inference task failed: {}",
                    e
                )))
            }
            Err(_) => {
                log::warn!(
                    "Inference for {} exceeded {:?}",
                    url,
                    self.inference_timeout
                );
                return Err(DecisionError::InferenceTimeout(self.inference_timeout));
            }
        };

        score(url, features, proba, self.classifier_name())
    }
}
