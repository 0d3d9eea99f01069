//! Backtest strategies: advice → signal policies beyond the plain
//! signal-generator mapping.

use crate::domain::advice::{AdviceType, InvestmentAdvice};
use crate::domain::indicators::{AssetSnapshot, IndicatorSnapshot};
use crate::domain::signal::{SignalSource, SignalType, TradingSignal};
use std::collections::HashMap;

pub trait Strategy {
    fn name(&self) -> &str;

    fn generate_signals(
        &self,
        advice: &InvestmentAdvice,
        asset: &AssetSnapshot,
        indicators: &IndicatorSnapshot,
    ) -> Vec<TradingSignal>;
}

/// Buys on strong-buy/buy advice, sells on sell/strong-sell, ignores the
/// rest. Signal strength is the raw advice score.
pub struct TrendFollowingStrategy;

impl TrendFollowingStrategy {
    pub fn new() -> Self {
        TrendFollowingStrategy
    }

    fn build_signal(&self, advice: &InvestmentAdvice, signal_type: SignalType) -> TradingSignal {
        let timestamp = advice.advice_date.and_hms_opt(0, 0, 0).unwrap_or_default();
        let mut signal = TradingSignal::new(
            advice.code.clone(),
            advice.name.clone(),
            signal_type,
            SignalSource::System,
            advice.current_price,
            timestamp,
            Some(advice.advice_date),
        );
        signal.rule_name = Some(self.name().to_string());
        signal.rule_params = HashMap::from([
            (
                "advice_type".to_string(),
                advice.advice_type.label().to_string(),
            ),
            ("score".to_string(), advice.score.to_string()),
        ]);
        signal.strength = (advice.score as f64 / 100.0).min(1.0);
        signal.note = Some(format!("trend following: {}", advice.advice_type.label()));
        signal
    }
}

impl Default for TrendFollowingStrategy {
    fn default() -> Self {
        TrendFollowingStrategy::new()
    }
}

impl Strategy for TrendFollowingStrategy {
    fn name(&self) -> &str {
        "trend-following"
    }

    fn generate_signals(
        &self,
        advice: &InvestmentAdvice,
        _asset: &AssetSnapshot,
        _indicators: &IndicatorSnapshot,
    ) -> Vec<TradingSignal> {
        match advice.advice_type {
            AdviceType::StrongBuy | AdviceType::Buy => {
                vec![self.build_signal(advice, SignalType::Buy)]
            }
            AdviceType::Sell | AdviceType::StrongSell => {
                vec![self.build_signal(advice, SignalType::Sell)]
            }
            _ => vec![],
        }
    }
}
