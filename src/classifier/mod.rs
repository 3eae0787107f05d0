//! Classifier boundary.
//!
//! The decision engine only knows the `Classifier` trait. A classifier
//! receives the feature vector together with the raw URL (its encoder may
//! build text features of its own) and returns class probabilities.

pub mod linear;

pub use linear::LinearModel;

use crate::error::ClassifierError;
use crate::features::FeatureVector;
use serde::Serialize;

/// Input row for a classifier: every feature column plus `url`
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FeatureRow<'a> {
    #[serde(flatten)]
    pub features: &'a FeatureVector,
    pub url: &'a str,
}

impl<'a> FeatureRow<'a> {
    pub fn new(url: &'a str, features: &'a FeatureVector) -> Self {
        Self { features, url }
    }
}

pub trait Classifier: Send + Sync {
    /// `[p_negative, p_positive]` where positive means phishing
    fn predict_proba(&self, row: &FeatureRow<'_>) -> Result<[f64; 2], ClassifierError>;

    fn name(&self) -> &str;
}
