//! Scoring rules for the advice engine.
//!
//! Each rule is a stateless scorer over one asset/indicator snapshot pair:
//! `evaluate(asset, indicators, news_context) -> RuleResult`. Rules are
//! dispatched through [`RuleKind`] and carried in a weighted list; weights
//! are only ever read by the aggregator, never inside a rule.

pub mod bias;
pub mod risk;
pub mod support;
pub mod trend;
pub mod volume;

use crate::domain::advice::{AdviceType, ConfidenceLevel};
use crate::domain::error::StockpilotError;
use crate::domain::indicators::{AssetSnapshot, IndicatorSnapshot};
use std::collections::HashMap;

pub const DEFAULT_RULE_WEIGHT: f64 = 1.0;

/// Outcome of a single rule evaluation. Ephemeral: produced per invocation
/// and consumed immediately by the aggregator.
#[derive(Debug, Clone)]
pub struct RuleResult {
    pub rule_name: String,
    pub advice_type: AdviceType,
    pub confidence: ConfidenceLevel,
    pub score: u32,
    pub reasons: Vec<String>,
    pub risk_factors: Vec<String>,
    pub metadata: HashMap<String, String>,
}

/// The built-in scoring rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Trend,
    Bias,
    Volume,
    Support,
    Risk,
}

impl RuleKind {
    pub const fn name(self) -> &'static str {
        match self {
            RuleKind::Trend => "trend",
            RuleKind::Bias => "bias",
            RuleKind::Volume => "volume",
            RuleKind::Support => "support",
            RuleKind::Risk => "risk",
        }
    }

    pub fn evaluate(
        self,
        asset: &AssetSnapshot,
        indicators: &IndicatorSnapshot,
        news_context: Option<&str>,
    ) -> Result<RuleResult, StockpilotError> {
        match self {
            RuleKind::Trend => Ok(trend::evaluate(asset, indicators)),
            RuleKind::Bias => Ok(bias::evaluate(asset, indicators)),
            RuleKind::Volume => Ok(volume::evaluate(asset, indicators)),
            RuleKind::Support => Ok(support::evaluate(asset, indicators)),
            RuleKind::Risk => Ok(risk::evaluate(asset, indicators, news_context)),
        }
    }
}

/// A rule plus the weight the aggregator applies to its output.
#[derive(Debug, Clone, Copy)]
pub struct WeightedRule {
    pub kind: RuleKind,
    pub weight: f64,
}

impl WeightedRule {
    pub fn new(kind: RuleKind) -> Self {
        WeightedRule {
            kind,
            weight: DEFAULT_RULE_WEIGHT,
        }
    }

    pub fn with_weight(kind: RuleKind, weight: f64) -> Self {
        WeightedRule { kind, weight }
    }
}

/// The default rule set, in canonical evaluation order. The aggregator's
/// vote tie-break resolves to the first-seen category, so this order is
/// part of the engine's contract.
pub fn default_rules() -> Vec<WeightedRule> {
    vec![
        WeightedRule::new(RuleKind::Trend),
        WeightedRule::new(RuleKind::Bias),
        WeightedRule::new(RuleKind::Volume),
        WeightedRule::new(RuleKind::Support),
        WeightedRule::new(RuleKind::Risk),
    ]
}
