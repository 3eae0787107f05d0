//! Decision pipeline components
//!
//! Each URL flows through the early decision (list lookup), the rule engine,
//! the classifier and finally the risk categorizer. The decision engine owns
//! the ordering.

pub mod decision_engine;
pub mod early_decision_engine;
pub mod risk;
pub mod rule_engine;

pub use decision_engine::{decide, DecisionEngine, Label, Reason, Verdict};
pub use early_decision_engine::{FixedVerdict, ListLookup, UrlLookup};
pub use risk::{categorize, RiskCategory};
pub use rule_engine::RuleTrigger;
