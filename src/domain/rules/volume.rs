//! Volume rule: trading activity against the trailing baseline.
//!
//! Preference order: shrinking-volume pullback > heavy-volume advance >
//! shrinking-volume advance > heavy-volume decline.

use crate::domain::advice::{AdviceType, ConfidenceLevel};
use crate::domain::indicators::{AssetSnapshot, IndicatorSnapshot};
use crate::domain::rules::{RuleKind, RuleResult};
use std::collections::HashMap;

/// Volume ratio at or above which a session counts as heavy.
pub const HEAVY_VOLUME_RATIO: f64 = 1.5;

/// Volume ratio at or below which a session counts as light.
pub const LIGHT_VOLUME_RATIO: f64 = 0.7;

pub(crate) fn evaluate(asset: &AssetSnapshot, indicators: &IndicatorSnapshot) -> RuleResult {
    let volume_ratio = indicators.volume_ratio;
    let price_change_pct = asset.price_change_pct;

    let mut reasons = Vec::new();
    let mut risk_factors = Vec::new();
    let score;
    let advice_type;
    let confidence;

    if volume_ratio >= HEAVY_VOLUME_RATIO {
        if price_change_pct > 0.0 {
            score = 15;
            advice_type = AdviceType::Buy;
            confidence = ConfidenceLevel::Medium;
            reasons.push("heavy-volume advance, buyers in control".to_string());
        } else {
            score = 0;
            advice_type = AdviceType::Sell;
            confidence = ConfidenceLevel::High;
            risk_factors.push("heavy-volume decline, distribution risk".to_string());
        }
    } else if volume_ratio <= LIGHT_VOLUME_RATIO {
        if price_change_pct > 0.0 {
            score = 8;
            advice_type = AdviceType::Hold;
            confidence = ConfidenceLevel::Low;
            reasons.push("advance on shrinking volume, momentum fading".to_string());
        } else {
            score = 20;
            advice_type = AdviceType::Buy;
            confidence = ConfidenceLevel::High;
            reasons.push("shrinking-volume pullback, healthy washout".to_string());
        }
    } else {
        score = 12;
        advice_type = AdviceType::Hold;
        confidence = ConfidenceLevel::Medium;
        reasons.push("normal volume".to_string());
    }

    let metadata = HashMap::from([
        ("volume_ratio".to_string(), format!("{volume_ratio:.4}")),
        (
            "price_change_pct".to_string(),
            format!("{price_change_pct:.4}"),
        ),
    ]);

    RuleResult {
        rule_name: RuleKind::Volume.name().to_string(),
        advice_type,
        confidence,
        score,
        reasons,
        risk_factors,
        metadata,
    }
}
