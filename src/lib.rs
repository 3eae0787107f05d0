pub mod classifier;
pub mod components;
pub mod config;
pub mod domain_utils;
pub mod error;
pub mod features;

pub use classifier::{Classifier, FeatureRow, LinearModel};
pub use components::{
    categorize, decide, DecisionEngine, Label, ListLookup, Reason, RiskCategory, RuleTrigger,
    UrlLookup, Verdict,
};
pub use config::Config;
pub use error::{ClassifierError, ConfigError, DecisionError};
pub use features::{extract_features, FeatureVector, SchemaInfo};
