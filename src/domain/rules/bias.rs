//! Bias rule: deviation of price from MA5.
//!
//! Strict-entry policy: a bias above [`BIAS_CHASE_LIMIT`] percent is never
//! a buy, whatever the other rules say about the trend.

use crate::domain::advice::{AdviceType, ConfidenceLevel};
use crate::domain::indicators::{AssetSnapshot, IndicatorSnapshot};
use crate::domain::rules::{RuleKind, RuleResult};
use std::collections::HashMap;

/// Bias (%) above which buying is forbidden.
pub const BIAS_CHASE_LIMIT: f64 = 5.0;

/// Negative bias (%) still counted as a shallow pullback.
pub const SHALLOW_PULLBACK_PCT: f64 = -3.0;

/// Negative bias (%) below which the pullback risks breaking support.
pub const DEEP_PULLBACK_PCT: f64 = -5.0;

/// Positive bias (%) under which price counts as hugging MA5.
pub const NEAR_MA5_PCT: f64 = 2.0;

pub(crate) fn evaluate(asset: &AssetSnapshot, indicators: &IndicatorSnapshot) -> RuleResult {
    let bias = indicators.bias_ma5;

    let mut reasons = Vec::new();
    let mut risk_factors = Vec::new();
    let score;
    let advice_type;
    let confidence;

    if bias < 0.0 {
        if bias > SHALLOW_PULLBACK_PCT {
            score = 30;
            advice_type = AdviceType::Buy;
            confidence = ConfidenceLevel::High;
            reasons.push(format!("price slightly below MA5 ({bias:.1}%), pullback buy point"));
        } else if bias > DEEP_PULLBACK_PCT {
            score = 25;
            advice_type = AdviceType::Buy;
            confidence = ConfidenceLevel::Medium;
            reasons.push(format!("price pulling back to MA5 ({bias:.1}%), watch support"));
        } else {
            score = 10;
            advice_type = AdviceType::Wait;
            confidence = ConfidenceLevel::Medium;
            risk_factors.push(format!("bias too large ({bias:.1}%), may break support"));
        }
    } else if bias < NEAR_MA5_PCT {
        score = 28;
        advice_type = AdviceType::Buy;
        confidence = ConfidenceLevel::High;
        reasons.push(format!("price hugging MA5 ({bias:.1}%), good entry window"));
    } else if bias < BIAS_CHASE_LIMIT {
        score = 20;
        advice_type = AdviceType::Buy;
        confidence = ConfidenceLevel::Medium;
        reasons.push(format!("price slightly above MA5 ({bias:.1}%), small entry only"));
    } else {
        score = 5;
        advice_type = AdviceType::Wait;
        confidence = ConfidenceLevel::High;
        risk_factors.push(format!(
            "bias exceeds {BIAS_CHASE_LIMIT:.0}% ({bias:.1}%), chasing forbidden"
        ));
    }

    let metadata = HashMap::from([
        ("bias_ma5".to_string(), format!("{bias:.4}")),
        (
            "current_price".to_string(),
            format!("{:.4}", asset.current_price),
        ),
        ("ma5".to_string(), format!("{:.4}", indicators.ma5)),
    ]);

    RuleResult {
        rule_name: RuleKind::Bias.name().to_string(),
        advice_type,
        confidence,
        score,
        reasons,
        risk_factors,
        metadata,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_bias(bias: f64) -> RuleResult {
        let asset = AssetSnapshot {
            current_price: 10.0,
            price_change_pct: 0.0,
        };
        let ind = IndicatorSnapshot {
            bias_ma5: bias,
            ..IndicatorSnapshot::default()
        };
        evaluate(&asset, &ind)
    }

    #[test]
    fn shallow_pullback_is_high_confidence_buy() {
        let result = eval_bias(-2.0);
        assert_eq!(result.score, 30);
        assert_eq!(result.advice_type, AdviceType::Buy);
        assert_eq!(result.confidence, ConfidenceLevel::High);
    }

    #[test]
    fn moderate_pullback_is_medium_buy() {
        let result = eval_bias(-4.0);
        assert_eq!(result.score, 25);
        assert_eq!(result.advice_type, AdviceType::Buy);
        assert_eq!(result.confidence, ConfidenceLevel::Medium);
    }

    #[test]
    fn deep_pullback_is_wait() {
        let result = eval_bias(-6.0);
        assert_eq!(result.score, 10);
        assert_eq!(result.advice_type, AdviceType::Wait);
        assert_eq!(result.confidence, ConfidenceLevel::Medium);
        assert!(!result.risk_factors.is_empty());
    }

    #[test]
    fn near_ma5_is_high_confidence_buy() {
        let result = eval_bias(0.0);
        assert_eq!(result.score, 28);
        assert_eq!(result.advice_type, AdviceType::Buy);
        assert_eq!(result.confidence, ConfidenceLevel::High);

        let result = eval_bias(1.9);
        assert_eq!(result.score, 28);
    }

    #[test]
    fn moderately_extended_is_small_entry() {
        let result = eval_bias(3.0);
        assert_eq!(result.score, 20);
        assert_eq!(result.advice_type, AdviceType::Buy);
        assert_eq!(result.confidence, ConfidenceLevel::Medium);
    }

    #[test]
    fn chasing_forbidden_at_limit() {
        let result = eval_bias(5.0);
        assert_eq!(result.score, 5);
        assert_eq!(result.advice_type, AdviceType::Wait);
        assert_eq!(result.confidence, ConfidenceLevel::High);
        assert!(!result.risk_factors.is_empty());
    }

    #[test]
    fn never_a_buy_at_or_above_limit() {
        for bias in [5.0, 5.1, 8.0, 20.0, 100.0] {
            let result = eval_bias(bias);
            assert_ne!(result.advice_type, AdviceType::Buy, "bias {bias}");
            assert_ne!(result.advice_type, AdviceType::StrongBuy, "bias {bias}");
        }
    }

    #[test]
    fn boundary_between_shallow_and_moderate() {
        // Exactly -3 falls into the moderate bucket (strictly greater wins).
        let result = eval_bias(-3.0);
        assert_eq!(result.score, 25);
    }

    #[test]
    fn boundary_between_moderate_and_deep() {
        let result = eval_bias(-5.0);
        assert_eq!(result.score, 10);
    }
}
