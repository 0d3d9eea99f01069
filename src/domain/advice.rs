//! Investment advice entity and its classification enums.

use chrono::NaiveDate;
use serde::Serialize;

/// Advice category emitted by rules and by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceType {
    StrongBuy,
    Buy,
    Hold,
    Reduce,
    Sell,
    StrongSell,
    Wait,
}

impl AdviceType {
    pub fn label(&self) -> &'static str {
        match self {
            AdviceType::StrongBuy => "strong buy",
            AdviceType::Buy => "buy",
            AdviceType::Hold => "hold",
            AdviceType::Reduce => "reduce",
            AdviceType::Sell => "sell",
            AdviceType::StrongSell => "strong sell",
            AdviceType::Wait => "wait",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "high",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::Low => "low",
        }
    }
}

/// Final advice for one asset. Created once per analysis run, immutable
/// thereafter; serialized for reporting, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct InvestmentAdvice {
    pub code: String,
    pub name: String,
    pub advice_type: AdviceType,
    pub confidence: ConfidenceLevel,
    pub current_price: f64,
    pub target_price: Option<f64>,
    pub stop_loss_price: Option<f64>,
    pub reasons: Vec<String>,
    pub risk_factors: Vec<String>,
    pub suggested_position: Option<String>,
    pub advice_date: NaiveDate,
    pub score: u32,
    pub source: String,
    pub rule_sources: Vec<String>,
}

impl InvestmentAdvice {
    pub fn is_buy_advice(&self) -> bool {
        matches!(self.advice_type, AdviceType::StrongBuy | AdviceType::Buy)
    }

    pub fn is_sell_advice(&self) -> bool {
        matches!(
            self.advice_type,
            AdviceType::StrongSell | AdviceType::Sell | AdviceType::Reduce
        )
    }

    pub fn is_wait_advice(&self) -> bool {
        self.advice_type == AdviceType::Wait
    }

    /// One-line digest used by report rendering.
    pub fn summary(&self) -> String {
        format!(
            "{} ({}): {} | score {} | confidence {}",
            self.name,
            self.code,
            self.advice_type.label(),
            self.score,
            self.confidence.label()
        )
    }
}
