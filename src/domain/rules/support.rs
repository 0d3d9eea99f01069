//! Support rule: price holding at MA5/MA10, losing MA20.

use crate::domain::advice::{AdviceType, ConfidenceLevel};
use crate::domain::indicators::{AssetSnapshot, IndicatorSnapshot};
use crate::domain::rules::{RuleKind, RuleResult};
use std::collections::HashMap;

/// Relative distance within which price counts as sitting on an average.
pub const SUPPORT_TOLERANCE: f64 = 0.02;

pub(crate) fn evaluate(asset: &AssetSnapshot, indicators: &IndicatorSnapshot) -> RuleResult {
    let price = asset.current_price;
    let ma5 = indicators.ma5;
    let ma10 = indicators.ma10;
    let ma20 = indicators.ma20;

    let mut reasons = Vec::new();
    let mut risk_factors = Vec::new();
    let mut score: u32 = 0;
    let advice_type;
    let confidence;

    let mut support_ma5 = false;
    let mut support_ma10 = false;

    if ma5 > 0.0 {
        let distance = (price - ma5).abs() / ma5;
        if distance <= SUPPORT_TOLERANCE && price >= ma5 {
            support_ma5 = true;
            score += 5;
            reasons.push("MA5 support holding".to_string());
        }
    }

    if ma10 > 0.0 {
        let distance = (price - ma10).abs() / ma10;
        if distance <= SUPPORT_TOLERANCE && price >= ma10 {
            support_ma10 = true;
            score += 5;
            reasons.push("MA10 support holding".to_string());
        }
    }

    if support_ma5 || support_ma10 {
        advice_type = AdviceType::Buy;
        confidence = ConfidenceLevel::High;
    } else if ma20 > 0.0 && price < ma20 {
        score = 0;
        advice_type = AdviceType::Sell;
        confidence = ConfidenceLevel::Medium;
        risk_factors.push("broke MA20, trend weakening".to_string());
    } else {
        advice_type = AdviceType::Hold;
        confidence = ConfidenceLevel::Medium;
    }

    let metadata = HashMap::from([
        ("current_price".to_string(), format!("{price:.4}")),
        ("ma5".to_string(), format!("{ma5:.4}")),
        ("ma10".to_string(), format!("{ma10:.4}")),
        ("ma20".to_string(), format!("{ma20:.4}")),
        ("support_ma5".to_string(), support_ma5.to_string()),
        ("support_ma10".to_string(), support_ma10.to_string()),
    ]);

    RuleResult {
        rule_name: RuleKind::Support.name().to_string(),
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

    fn eval_support(price: f64, ma5: f64, ma10: f64, ma20: f64) -> RuleResult {
        let asset = AssetSnapshot {
            current_price: price,
            price_change_pct: 0.0,
        };
        let ind = IndicatorSnapshot {
            ma5,
            ma10,
            ma20,
            ..IndicatorSnapshot::default()
        };
        evaluate(&asset, &ind)
    }

    #[test]
    fn support_at_ma5_only() {
        // price within 2% of MA5 and above it; far above MA10.
        let result = eval_support(10.1, 10.0, 9.0, 8.0);
        assert_eq!(result.score, 5);
        assert_eq!(result.advice_type, AdviceType::Buy);
        assert_eq!(result.confidence, ConfidenceLevel::High);
        assert_eq!(result.metadata["support_ma5"], "true");
        assert_eq!(result.metadata["support_ma10"], "false");
    }

    #[test]
    fn support_at_both_averages_is_additive() {
        // price within 2% of both MA5 and MA10, above both.
        let result = eval_support(10.1, 10.0, 9.95, 9.0);
        assert_eq!(result.score, 10);
        assert_eq!(result.advice_type, AdviceType::Buy);
        assert_eq!(result.reasons.len(), 2);
    }

    #[test]
    fn below_average_is_not_support() {
        // price within 2% of MA5 but below it.
        let result = eval_support(9.9, 10.0, 8.0, 8.0);
        assert_eq!(result.score, 0);
        assert_eq!(result.advice_type, AdviceType::Hold);
    }

    #[test]
    fn broke_ma20_is_sell() {
        let result = eval_support(8.0, 10.0, 10.5, 11.0);
        assert_eq!(result.score, 0);
        assert_eq!(result.advice_type, AdviceType::Sell);
        assert_eq!(result.confidence, ConfidenceLevel::Medium);
        assert!(!result.risk_factors.is_empty());
    }

    #[test]
    fn no_support_above_ma20_is_hold() {
        // price well above every average: no support, no breakdown.
        let result = eval_support(15.0, 10.0, 9.0, 8.0);
        assert_eq!(result.score, 0);
        assert_eq!(result.advice_type, AdviceType::Hold);
        assert_eq!(result.confidence, ConfidenceLevel::Medium);
    }

    #[test]
    fn zero_averages_never_count_as_support() {
        let result = eval_support(10.0, 0.0, 0.0, 0.0);
        assert_eq!(result.score, 0);
        assert_eq!(result.advice_type, AdviceType::Hold);
    }

    #[test]
    fn tolerance_boundary_is_inclusive() {
        // distance exactly 2% of MA5.
        let result = eval_support(10.2, 10.0, 8.0, 8.0);
        assert_eq!(result.score, 5);
        assert_eq!(result.advice_type, AdviceType::Buy);
    }
}
