//! Trend rule: moving-average alignment.
//!
//! MA5>MA10>MA20 is a bullish alignment, the reverse a bearish one; the
//! MA5↔MA20 spread separates strong alignments from ordinary ones.

use crate::domain::advice::{AdviceType, ConfidenceLevel};
use crate::domain::indicators::{AssetSnapshot, IndicatorSnapshot};
use crate::domain::rules::{RuleKind, RuleResult};
use std::collections::HashMap;

/// Spread (%) between MA5 and MA20 beyond which an alignment counts as strong.
pub const STRONG_SPREAD_PCT: f64 = 5.0;

pub(crate) fn evaluate(asset: &AssetSnapshot, indicators: &IndicatorSnapshot) -> RuleResult {
    let ma5 = indicators.ma5;
    let ma10 = indicators.ma10;
    let ma20 = indicators.ma20;

    let mut reasons = Vec::new();
    let mut risk_factors = Vec::new();
    let score;
    let advice_type;
    let confidence;

    if ma5 > ma10 && ma10 > ma20 && ma20 > 0.0 {
        // Bullish alignment; widening spread marks strength.
        let spread = (ma5 - ma20) / ma20 * 100.0;
        if spread > STRONG_SPREAD_PCT {
            score = 40;
            advice_type = AdviceType::Buy;
            confidence = ConfidenceLevel::High;
            reasons.push("strong bullish alignment, averages fanning upward".to_string());
        } else {
            score = 35;
            advice_type = AdviceType::Buy;
            confidence = ConfidenceLevel::Medium;
            reasons.push("bullish alignment MA5>MA10>MA20".to_string());
        }
    } else if ma5 > ma10 && ma10 <= ma20 {
        score = 25;
        advice_type = AdviceType::Hold;
        confidence = ConfidenceLevel::Medium;
        reasons.push("weak bullish setup, MA5>MA10 but MA10 at or below MA20".to_string());
    } else if ma5 < ma10 && ma10 < ma20 && ma5 > 0.0 {
        // Bearish alignment; widening spread marks strength.
        let spread = (ma20 - ma5) / ma5 * 100.0;
        if spread > STRONG_SPREAD_PCT {
            score = 0;
            advice_type = AdviceType::StrongSell;
            confidence = ConfidenceLevel::High;
            risk_factors.push("strong bearish alignment, averages fanning downward".to_string());
        } else {
            score = 5;
            advice_type = AdviceType::Sell;
            confidence = ConfidenceLevel::Medium;
            risk_factors.push("bearish alignment MA5<MA10<MA20".to_string());
        }
    } else if ma5 < ma10 && ma10 >= ma20 {
        score = 10;
        advice_type = AdviceType::Hold;
        confidence = ConfidenceLevel::Medium;
        risk_factors.push("weak bearish setup, MA5<MA10 but MA10 at or above MA20".to_string());
    } else {
        score = 15;
        advice_type = AdviceType::Wait;
        confidence = ConfidenceLevel::Low;
        reasons.push("averages entangled, no clear trend".to_string());
    }

    let metadata = HashMap::from([
        ("ma5".to_string(), format!("{ma5:.4}")),
        ("ma10".to_string(), format!("{ma10:.4}")),
        ("ma20".to_string(), format!("{ma20:.4}")),
        (
            "current_price".to_string(),
            format!("{:.4}", asset.current_price),
        ),
    ]);

    RuleResult {
        rule_name: RuleKind::Trend.name().to_string(),
        advice_type,
        confidence,
        score,
        reasons,
        risk_factors,
        metadata,
    }
}
