//! Signal generation: maps investment advice onto trading signals.

use crate::domain::advice::{AdviceType, ConfidenceLevel, InvestmentAdvice};
use crate::domain::signal::{SignalSource, SignalType, TradingSignal};
use chrono::NaiveDateTime;
use std::collections::HashMap;

/// Strength multipliers per confidence level.
pub fn confidence_factor(confidence: ConfidenceLevel) -> f64 {
    match confidence {
        ConfidenceLevel::High => 1.0,
        ConfidenceLevel::Medium => 0.7,
        ConfidenceLevel::Low => 0.4,
    }
}

/// Signal strength: `min(score/100, 1.0) × confidence_factor`.
pub fn signal_strength(advice: &InvestmentAdvice) -> f64 {
    let score_factor = (advice.score as f64 / 100.0).min(1.0);
    score_factor * confidence_factor(advice.confidence)
}

fn map_advice_to_signal(advice_type: AdviceType) -> Option<SignalType> {
    match advice_type {
        AdviceType::StrongBuy | AdviceType::Buy => Some(SignalType::Buy),
        AdviceType::Reduce | AdviceType::Sell | AdviceType::StrongSell => Some(SignalType::Sell),
        AdviceType::Hold | AdviceType::Wait => None,
    }
}

/// Builds a trading signal from an advice, or None when the advice calls
/// for no action (hold/wait). The signal is dated on the advice date; the
/// caller supplies the wall-clock timestamp.
pub fn generate_from_advice(
    advice: &InvestmentAdvice,
    source: SignalSource,
    timestamp: NaiveDateTime,
) -> Option<TradingSignal> {
    let signal_type = map_advice_to_signal(advice.advice_type)?;

    let mut signal = TradingSignal::new(
        advice.code.clone(),
        advice.name.clone(),
        signal_type,
        source,
        advice.current_price,
        timestamp,
        Some(advice.advice_date),
    );
    signal.rule_name = Some(advice.source.clone());
    signal.rule_params = HashMap::from([
        (
            "advice_type".to_string(),
            advice.advice_type.label().to_string(),
        ),
        (
            "confidence".to_string(),
            advice.confidence.label().to_string(),
        ),
        ("score".to_string(), advice.score.to_string()),
    ]);
    signal.strength = signal_strength(advice);
    signal.note = Some(format!("generated from advice, score {}", advice.score));

    Some(signal)
}

/// Batch variant: maps a list of advices to the signals they produce,
/// dropping the no-action entries.
pub fn generate_batch(
    advices: &[InvestmentAdvice],
    source: SignalSource,
    timestamp: NaiveDateTime,
) -> Vec<TradingSignal> {
    advices
        .iter()
        .filter_map(|advice| generate_from_advice(advice, source, timestamp))
        .collect()
}
