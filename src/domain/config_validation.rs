//! Configuration validation for the advise and backtest commands.

use crate::domain::error::StockpilotError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const RULE_WEIGHT_KEYS: &[&str] = &[
    "trend_weight",
    "bias_weight",
    "volume_weight",
    "support_weight",
    "risk_weight",
];

fn parse_date(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<NaiveDate, StockpilotError> {
    let value = config
        .get_string(section, key)
        .ok_or_else(|| StockpilotError::ConfigMissing {
            section: section.into(),
            key: key.into(),
        })?;
    NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| StockpilotError::ConfigInvalid {
        section: section.into(),
        key: key.into(),
        reason: "invalid date format (expected YYYY-MM-DD)".into(),
    })
}

/// Checks the `[backtest]` section: parsable, ordered dates and positive
/// initial capital.
pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), StockpilotError> {
    let start_date = parse_date(config, "backtest", "start_date")?;
    let end_date = parse_date(config, "backtest", "end_date")?;

    if end_date < start_date {
        return Err(StockpilotError::ConfigInvalid {
            section: "backtest".into(),
            key: "end_date".into(),
            reason: "end_date is before start_date".into(),
        });
    }

    let initial_capital = config.get_double("backtest", "initial_capital", 100_000.0);
    if initial_capital <= 0.0 {
        return Err(StockpilotError::ConfigInvalid {
            section: "backtest".into(),
            key: "initial_capital".into(),
            reason: "must be positive".into(),
        });
    }

    Ok(())
}

/// Checks the `[advice]` section: rule weights must not be negative.
pub fn validate_advice_config(config: &dyn ConfigPort) -> Result<(), StockpilotError> {
    for key in RULE_WEIGHT_KEYS {
        let weight = config.get_double("advice", key, 1.0);
        if weight < 0.0 {
            return Err(StockpilotError::ConfigInvalid {
                section: "advice".into(),
                key: (*key).into(),
                reason: "weight must not be negative".into(),
            });
        }
    }
    Ok(())
}
