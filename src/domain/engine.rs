//! Advice engine: runs the scoring rules and aggregates their results.

use crate::domain::advice::{AdviceType, ConfidenceLevel, InvestmentAdvice};
use crate::domain::aggregator::{self, ADVICE_SOURCE};
use crate::domain::indicators::{AssetSnapshot, IndicatorSnapshot};
use crate::domain::rules::{default_rules, RuleResult, WeightedRule};
use crate::ports::asset_port::{AssetPort, IndicatorData};
use chrono::{Local, NaiveDate};
use std::collections::HashMap;
use tracing::warn;

pub struct AdviceEngine {
    rules: Vec<WeightedRule>,
}

impl AdviceEngine {
    /// Engine with the default rule set (Trend, Bias, Volume, Support,
    /// Risk), each at weight 1.0.
    pub fn new() -> Self {
        AdviceEngine {
            rules: default_rules(),
        }
    }

    /// Engine with a caller-supplied rule list. The list order is the vote
    /// tie-break order.
    pub fn with_rules(rules: Vec<WeightedRule>) -> Self {
        AdviceEngine { rules }
    }

    pub fn rules(&self) -> &[WeightedRule] {
        &self.rules
    }

    /// Generates advice for an asset exposed through [`AssetPort`].
    ///
    /// Missing price or indicator data short-circuits to a low-confidence
    /// wait advice.
    pub fn generate_advice(
        &self,
        asset: &dyn AssetPort,
        news_context: Option<&str>,
    ) -> InvestmentAdvice {
        let (Some(price), Some(indicators)) = (asset.latest_price(), asset.latest_indicators())
        else {
            return insufficient_data_advice(asset.code(), asset.name());
        };

        let snapshot = AssetSnapshot {
            current_price: price.close,
            price_change_pct: price.pct_chg,
        };
        let indicator_snapshot = resolve_indicators(&indicators);

        self.generate_advice_from_data(
            asset.code(),
            asset.name(),
            &snapshot,
            &indicator_snapshot,
            news_context,
        )
    }

    /// Generates advice from pre-built snapshots, dated today. Used by the
    /// live analysis path.
    pub fn generate_advice_from_data(
        &self,
        code: &str,
        name: &str,
        asset: &AssetSnapshot,
        indicators: &IndicatorSnapshot,
        news_context: Option<&str>,
    ) -> InvestmentAdvice {
        self.generate_advice_from_data_at(code, name, asset, indicators, news_context, None)
    }

    /// Same as [`generate_advice_from_data`](Self::generate_advice_from_data)
    /// with an explicit advice date; the backtest replay passes the
    /// historical session date.
    pub fn generate_advice_from_data_at(
        &self,
        code: &str,
        name: &str,
        asset: &AssetSnapshot,
        indicators: &IndicatorSnapshot,
        news_context: Option<&str>,
        advice_date: Option<NaiveDate>,
    ) -> InvestmentAdvice {
        let results = self.run_rules(asset, indicators, news_context);
        let weights = self.weight_map();
        aggregator::aggregate(
            &results,
            code,
            name,
            asset.current_price,
            Some(&weights),
            advice_date,
        )
    }

    /// Runs every configured rule; a failing rule is logged and skipped,
    /// its result omitted rather than treated as zero.
    fn run_rules(
        &self,
        asset: &AssetSnapshot,
        indicators: &IndicatorSnapshot,
        news_context: Option<&str>,
    ) -> Vec<RuleResult> {
        let mut results = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            match rule.kind.evaluate(asset, indicators, news_context) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!(rule = rule.kind.name(), error = %e, "rule evaluation failed, skipping");
                }
            }
        }
        results
    }

    fn weight_map(&self) -> HashMap<String, f64> {
        self.rules
            .iter()
            .map(|r| (r.kind.name().to_string(), r.weight))
            .collect()
    }
}

impl Default for AdviceEngine {
    fn default() -> Self {
        AdviceEngine::new()
    }
}

/// Maps the optional upstream indicator fields onto the snapshot the rules
/// consume: absent values become 0.0, except the volume ratio, whose
/// neutral value is 1.0.
pub fn resolve_indicators(data: &IndicatorData) -> IndicatorSnapshot {
    IndicatorSnapshot {
        ma5: data.ma5.unwrap_or(0.0),
        ma10: data.ma10.unwrap_or(0.0),
        ma20: data.ma20.unwrap_or(0.0),
        bias_ma5: data.bias_ma5.unwrap_or(0.0),
        volume_ratio: data.volume_ratio.unwrap_or(1.0),
    }
}

fn insufficient_data_advice(code: &str, name: &str) -> InvestmentAdvice {
    InvestmentAdvice {
        code: code.to_string(),
        name: name.to_string(),
        advice_type: AdviceType::Wait,
        confidence: ConfidenceLevel::Low,
        current_price: 0.0,
        target_price: None,
        stop_loss_price: None,
        reasons: vec!["insufficient data to generate advice".to_string()],
        risk_factors: vec![],
        suggested_position: None,
        advice_date: Local::now().date_naive(),
        score: 0,
        source: ADVICE_SOURCE.to_string(),
        rule_sources: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rules::RuleKind;
    use crate::ports::asset_port::PriceData;

    struct FakeAsset {
        code: String,
        name: String,
        price: Option<PriceData>,
        indicators: Option<IndicatorData>,
    }

    impl AssetPort for FakeAsset {
        fn code(&self) -> &str {
            &self.code
        }
        fn name(&self) -> &str {
            &self.name
        }
        fn latest_price(&self) -> Option<PriceData> {
            self.price.clone()
        }
        fn latest_indicators(&self) -> Option<IndicatorData> {
            self.indicators.clone()
        }
    }

    fn bullish_indicators() -> IndicatorData {
        IndicatorData {
            ma5: Some(11.0),
            ma10: Some(10.0),
            ma20: Some(9.0),
            bias_ma5: Some(0.0),
            volume_ratio: Some(1.0),
        }
    }

    #[test]
    fn missing_price_short_circuits_to_wait() {
        let asset = FakeAsset {
            code: "600519".into(),
            name: "Moutai".into(),
            price: None,
            indicators: Some(bullish_indicators()),
        };
        let advice = AdviceEngine::new().generate_advice(&asset, None);
        assert_eq!(advice.advice_type, AdviceType::Wait);
        assert_eq!(advice.confidence, ConfidenceLevel::Low);
        assert_eq!(advice.current_price, 0.0);
        assert!(advice.rule_sources.is_empty());
    }

    #[test]
    fn missing_indicators_short_circuits_to_wait() {
        let asset = FakeAsset {
            code: "600519".into(),
            name: "Moutai".into(),
            price: Some(PriceData {
                close: 11.0,
                pct_chg: 0.5,
            }),
            indicators: None,
        };
        let advice = AdviceEngine::new().generate_advice(&asset, None);
        assert_eq!(advice.advice_type, AdviceType::Wait);
        assert_eq!(
            advice.reasons,
            vec!["insufficient data to generate advice".to_string()]
        );
    }

    #[test]
    fn full_rule_set_contributes() {
        let asset = FakeAsset {
            code: "600519".into(),
            name: "Moutai".into(),
            price: Some(PriceData {
                close: 11.0,
                pct_chg: 0.5,
            }),
            indicators: Some(bullish_indicators()),
        };
        let advice = AdviceEngine::new().generate_advice(&asset, None);
        assert_eq!(advice.rule_sources.len(), 5);
        assert_eq!(advice.source, ADVICE_SOURCE);
    }

    #[test]
    fn regression_bullish_votes_low_average_score_overridden() {
        // MA5=11 > MA10=10 > MA20=9, spread 22.2% → trend 40 buy.
        // bias 0 → bias 28 buy. volume_ratio 1.0 → volume 12 hold.
        // price 11 on MA5 → support 5 buy (MA10 out of tolerance).
        // no news → risk 10 hold.
        // Average (40+28+12+5+10)/5 = 19: the buy majority is overridden
        // by the low aggregate score.
        let engine = AdviceEngine::new();
        let asset = AssetSnapshot {
            current_price: 11.0,
            price_change_pct: 0.5,
        };
        let indicators = IndicatorSnapshot {
            ma5: 11.0,
            ma10: 10.0,
            ma20: 9.0,
            bias_ma5: 0.0,
            volume_ratio: 1.0,
        };
        let advice = engine.generate_advice_from_data("600519", "Moutai", &asset, &indicators, None);
        assert_eq!(advice.score, 19);
        assert_eq!(advice.advice_type, AdviceType::Sell);
    }

    #[test]
    fn custom_rule_list_restricts_sources() {
        let engine = AdviceEngine::with_rules(vec![
            WeightedRule::new(RuleKind::Trend),
            WeightedRule::new(RuleKind::Bias),
        ]);
        let asset = AssetSnapshot {
            current_price: 11.0,
            price_change_pct: 0.5,
        };
        let indicators = IndicatorSnapshot {
            ma5: 11.0,
            ma10: 10.0,
            ma20: 9.0,
            bias_ma5: 0.0,
            volume_ratio: 1.0,
        };
        let advice = engine.generate_advice_from_data("600519", "Moutai", &asset, &indicators, None);
        assert_eq!(
            advice.rule_sources,
            vec!["trend".to_string(), "bias".to_string()]
        );
        // (40 + 28) / 2 = 34 → force-sell band, votes are all buy.
        assert_eq!(advice.score, 34);
        assert_eq!(advice.advice_type, AdviceType::Sell);
    }

    #[test]
    fn custom_weights_shift_the_average() {
        let engine = AdviceEngine::with_rules(vec![
            WeightedRule::with_weight(RuleKind::Trend, 4.0),
            WeightedRule::with_weight(RuleKind::Bias, 1.0),
        ]);
        let asset = AssetSnapshot {
            current_price: 11.0,
            price_change_pct: 0.5,
        };
        let indicators = IndicatorSnapshot {
            ma5: 11.0,
            ma10: 10.0,
            ma20: 9.0,
            bias_ma5: 0.0,
            volume_ratio: 1.0,
        };
        let advice = engine.generate_advice_from_data("600519", "Moutai", &asset, &indicators, None);
        // (40*4 + 28*1) / 5 = 37.6 → 38 → wait band.
        assert_eq!(advice.score, 38);
        assert_eq!(advice.advice_type, AdviceType::Wait);
    }

    #[test]
    fn explicit_advice_date_is_carried() {
        let engine = AdviceEngine::new();
        let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
        let asset = AssetSnapshot {
            current_price: 10.0,
            price_change_pct: 0.0,
        };
        let advice = engine.generate_advice_from_data_at(
            "000001",
            "Ping An Bank",
            &asset,
            &IndicatorSnapshot::default(),
            None,
            Some(date),
        );
        assert_eq!(advice.advice_date, date);
    }

    #[test]
    fn resolve_indicators_defaults() {
        let resolved = resolve_indicators(&IndicatorData {
            ma5: None,
            ma10: None,
            ma20: None,
            bias_ma5: None,
            volume_ratio: None,
        });
        assert_eq!(resolved.ma5, 0.0);
        assert_eq!(resolved.ma10, 0.0);
        assert_eq!(resolved.ma20, 0.0);
        assert_eq!(resolved.bias_ma5, 0.0);
        assert_eq!(resolved.volume_ratio, 1.0);
    }
}
