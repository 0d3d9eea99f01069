//! Risk rule: keyword scan over the news context.
//!
//! Matching is case-insensitive substring containment. Keywords may contain
//! each other ("penalty" inside "regulatory penalty"), in which case a
//! single headline counts once per matching keyword.

use crate::domain::advice::{AdviceType, ConfidenceLevel};
use crate::domain::indicators::{AssetSnapshot, IndicatorSnapshot};
use crate::domain::rules::{RuleKind, RuleResult};
use std::collections::HashMap;

/// Score with no news or a clean scan.
pub const BASE_SCORE: u32 = 10;

/// Score deduction per matched risk keyword.
pub const RISK_PENALTY: u32 = 3;

/// Score when the scan finds only positive keywords.
pub const POSITIVE_SCORE: u32 = 15;

/// Matched risk count at which the rule turns into a sell.
pub const SELL_RISK_COUNT: usize = 2;

/// Stored lowercase; the haystack is lowercased before scanning.
pub const RISK_KEYWORDS: &[&str] = &[
    "holdings reduction",
    "stake reduction",
    "insider selling",
    "penalty",
    "regulatory penalty",
    "under investigation",
    "profit warning",
    "earnings miss",
    "guidance cut",
    "lockup expiry",
    "delisting risk",
    "st designation",
    "*st",
    "major negative news",
];

pub const POSITIVE_KEYWORDS: &[&str] = &[
    "earnings beat",
    "profit forecast raised",
    "stake increase",
    "buyback",
    "share repurchase",
    "contract win",
    "new orders",
    "major positive news",
];

pub(crate) fn evaluate(
    _asset: &AssetSnapshot,
    _indicators: &IndicatorSnapshot,
    news_context: Option<&str>,
) -> RuleResult {
    let mut reasons = Vec::new();
    let mut risk_factors = Vec::new();

    let Some(news) = news_context.filter(|s| !s.is_empty()) else {
        return RuleResult {
            rule_name: RuleKind::Risk.name().to_string(),
            advice_type: AdviceType::Hold,
            confidence: ConfidenceLevel::Medium,
            score: BASE_SCORE,
            reasons,
            risk_factors,
            metadata: HashMap::from([("news_analyzed".to_string(), "false".to_string())]),
        };
    };

    let news_lower = news.to_lowercase();

    let mut risk_count = 0usize;
    for keyword in RISK_KEYWORDS {
        if news_lower.contains(keyword) {
            risk_count += 1;
            risk_factors.push(format!("risk keyword found: {keyword}"));
        }
    }

    let mut positive_count = 0usize;
    for keyword in POSITIVE_KEYWORDS {
        if news_lower.contains(keyword) {
            positive_count += 1;
            reasons.push(format!("positive keyword found: {keyword}"));
        }
    }

    let mut score = BASE_SCORE;
    let mut advice_type = AdviceType::Hold;
    let mut confidence = ConfidenceLevel::Medium;

    if risk_count > 0 {
        score = BASE_SCORE.saturating_sub(risk_count as u32 * RISK_PENALTY);
        if risk_count >= SELL_RISK_COUNT {
            advice_type = AdviceType::Sell;
            confidence = ConfidenceLevel::High;
        } else {
            advice_type = AdviceType::Wait;
            confidence = ConfidenceLevel::Medium;
        }
    } else if positive_count > 0 {
        score = POSITIVE_SCORE;
        advice_type = AdviceType::Buy;
        confidence = ConfidenceLevel::Medium;
    }

    let metadata = HashMap::from([
        ("news_analyzed".to_string(), "true".to_string()),
        ("risk_count".to_string(), risk_count.to_string()),
        ("positive_count".to_string(), positive_count.to_string()),
    ]);

    RuleResult {
        rule_name: RuleKind::Risk.name().to_string(),
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

    fn eval_news(news: Option<&str>) -> RuleResult {
        let asset = AssetSnapshot::default();
        let ind = IndicatorSnapshot::default();
        evaluate(&asset, &ind, news)
    }

    #[test]
    fn no_news_is_neutral_hold() {
        let result = eval_news(None);
        assert_eq!(result.score, BASE_SCORE);
        assert_eq!(result.advice_type, AdviceType::Hold);
        assert_eq!(result.confidence, ConfidenceLevel::Medium);
        assert_eq!(result.metadata["news_analyzed"], "false");
    }

    #[test]
    fn empty_news_is_treated_as_absent() {
        let result = eval_news(Some(""));
        assert_eq!(result.metadata["news_analyzed"], "false");
    }

    #[test]
    fn clean_news_stays_neutral() {
        let result = eval_news(Some("the company opened a new office"));
        assert_eq!(result.score, BASE_SCORE);
        assert_eq!(result.advice_type, AdviceType::Hold);
        assert_eq!(result.metadata["risk_count"], "0");
    }

    #[test]
    fn single_risk_keyword_is_wait() {
        let result = eval_news(Some("Major shareholder filed a holdings reduction plan"));
        assert_eq!(result.metadata["risk_count"], "1");
        assert_eq!(result.score, 7);
        assert_eq!(result.advice_type, AdviceType::Wait);
        assert_eq!(result.confidence, ConfidenceLevel::Medium);
    }

    #[test]
    fn two_risk_keywords_is_high_confidence_sell() {
        let result = eval_news(Some("profit warning issued while under investigation"));
        assert_eq!(result.metadata["risk_count"], "2");
        assert_eq!(result.score, 4);
        assert_eq!(result.advice_type, AdviceType::Sell);
        assert_eq!(result.confidence, ConfidenceLevel::High);
    }

    #[test]
    fn score_floors_at_zero() {
        let news = "holdings reduction, regulatory penalty, profit warning, \
                    earnings miss, delisting risk";
        let result = eval_news(Some(news));
        assert!(result.metadata["risk_count"].parse::<usize>().unwrap() >= 4);
        assert_eq!(result.score, 0);
        assert_eq!(result.advice_type, AdviceType::Sell);
    }

    #[test]
    fn contained_keywords_each_count() {
        // "regulatory penalty" also contains "penalty".
        let result = eval_news(Some("hit with a regulatory penalty"));
        assert_eq!(result.metadata["risk_count"], "2");
        assert_eq!(result.advice_type, AdviceType::Sell);
    }

    #[test]
    fn positive_news_is_buy() {
        let result = eval_news(Some("board approved a share repurchase"));
        assert_eq!(result.metadata["positive_count"], "1");
        assert_eq!(result.score, POSITIVE_SCORE);
        assert_eq!(result.advice_type, AdviceType::Buy);
        assert_eq!(result.confidence, ConfidenceLevel::Medium);
    }

    #[test]
    fn risk_outweighs_positive() {
        let result = eval_news(Some("earnings beat, but insider selling reported"));
        assert_eq!(result.metadata["risk_count"], "1");
        assert_eq!(result.metadata["positive_count"], "1");
        assert_eq!(result.score, 7);
        assert_eq!(result.advice_type, AdviceType::Wait);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let result = eval_news(Some("PROFIT WARNING"));
        assert_eq!(result.metadata["risk_count"], "1");
        assert_eq!(result.advice_type, AdviceType::Wait);
    }
}
