//! Weighted-vote aggregation of rule results into one advice.
//!
//! Votes are tallied in rule-result order and an exact tie keeps the
//! first-seen entry, so the caller's rule ordering is part of the contract.
//! After the vote, the weighted-average score can override the voted
//! category (the override ladder below).

use crate::domain::advice::{AdviceType, ConfidenceLevel, InvestmentAdvice};
use crate::domain::rules::{RuleResult, DEFAULT_RULE_WEIGHT};
use chrono::{Local, NaiveDate};
use std::collections::HashMap;

/// Source label stamped on every aggregated advice.
pub const ADVICE_SOURCE: &str = "investment-advice-engine";

/// Score at or above which the advice is forced to strong buy.
pub const STRONG_BUY_SCORE: u32 = 80;

/// Score at or above which the advice is forced to at least buy.
pub const BUY_SCORE: u32 = 65;

/// Score at or above which a voted sell is softened to hold.
pub const HOLD_FLOOR_SCORE: u32 = 50;

/// Score at or above which the advice is forced to wait.
pub const WAIT_SCORE: u32 = 35;

/// Combines weighted rule results into a single [`InvestmentAdvice`].
///
/// `rule_weights` maps rule names to weights; absent rules weigh
/// [`DEFAULT_RULE_WEIGHT`]. `advice_date` of None means today.
pub fn aggregate(
    rule_results: &[RuleResult],
    code: &str,
    name: &str,
    current_price: f64,
    rule_weights: Option<&HashMap<String, f64>>,
    advice_date: Option<NaiveDate>,
) -> InvestmentAdvice {
    let advice_date = advice_date.unwrap_or_else(|| Local::now().date_naive());

    if rule_results.is_empty() {
        return InvestmentAdvice {
            code: code.to_string(),
            name: name.to_string(),
            advice_type: AdviceType::Wait,
            confidence: ConfidenceLevel::Low,
            current_price,
            target_price: None,
            stop_loss_price: None,
            reasons: vec!["no rule results".to_string()],
            risk_factors: vec![],
            suggested_position: None,
            advice_date,
            score: 0,
            source: ADVICE_SOURCE.to_string(),
            rule_sources: vec![],
        };
    }

    let mut total_score = 0.0;
    let mut total_weight = 0.0;
    let mut all_reasons = Vec::new();
    let mut all_risk_factors = Vec::new();
    let mut rule_sources = Vec::new();

    let mut advice_votes: Vec<(AdviceType, f64)> = Vec::new();
    let mut confidence_votes: Vec<(ConfidenceLevel, f64)> = Vec::new();

    for result in rule_results {
        let weight = rule_weights
            .and_then(|w| w.get(&result.rule_name).copied())
            .unwrap_or(DEFAULT_RULE_WEIGHT);

        total_score += result.score as f64 * weight;
        total_weight += weight;

        all_reasons.extend(result.reasons.iter().cloned());
        all_risk_factors.extend(result.risk_factors.iter().cloned());
        rule_sources.push(result.rule_name.clone());

        bump_vote(&mut advice_votes, result.advice_type, weight);
        bump_vote(&mut confidence_votes, result.confidence, weight);
    }

    let final_score = if total_weight > 0.0 {
        (total_score / total_weight).round() as u32
    } else {
        0
    };

    let voted_advice = leading_vote(&advice_votes).unwrap_or(AdviceType::Wait);
    let final_confidence = leading_vote(&confidence_votes).unwrap_or(ConfidenceLevel::Medium);
    let final_advice = apply_score_override(final_score, voted_advice);

    InvestmentAdvice {
        code: code.to_string(),
        name: name.to_string(),
        advice_type: final_advice,
        confidence: final_confidence,
        current_price,
        target_price: None,
        stop_loss_price: None,
        reasons: all_reasons,
        risk_factors: all_risk_factors,
        suggested_position: None,
        advice_date,
        score: final_score,
        source: ADVICE_SOURCE.to_string(),
        rule_sources,
    }
}

fn bump_vote<K: PartialEq + Copy>(votes: &mut Vec<(K, f64)>, key: K, weight: f64) {
    if let Some(entry) = votes.iter_mut().find(|(k, _)| *k == key) {
        entry.1 += weight;
    } else {
        votes.push((key, weight));
    }
}

/// Highest accumulated weight; a strictly-greater comparison keeps the
/// first-seen entry on an exact tie.
fn leading_vote<K: Copy>(votes: &[(K, f64)]) -> Option<K> {
    let mut best: Option<(K, f64)> = None;
    for &(key, weight) in votes {
        match best {
            Some((_, best_weight)) if weight <= best_weight => {}
            _ => best = Some((key, weight)),
        }
    }
    best.map(|(k, _)| k)
}

/// The score override ladder, applied after the vote and taking precedence.
fn apply_score_override(score: u32, voted: AdviceType) -> AdviceType {
    if score >= STRONG_BUY_SCORE {
        AdviceType::StrongBuy
    } else if score >= BUY_SCORE {
        match voted {
            AdviceType::StrongBuy | AdviceType::Buy => voted,
            _ => AdviceType::Buy,
        }
    } else if score >= HOLD_FLOOR_SCORE {
        match voted {
            AdviceType::Sell | AdviceType::StrongSell => AdviceType::Hold,
            _ => voted,
        }
    } else if score >= WAIT_SCORE {
        AdviceType::Wait
    } else {
        match voted {
            AdviceType::Sell | AdviceType::StrongSell => voted,
            _ => AdviceType::Sell,
        }
    }
}
