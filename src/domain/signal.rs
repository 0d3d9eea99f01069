//! Trading signal entity consumed by the backtest executor.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalType {
    Buy,
    Sell,
    Hold,
    Close,
}

impl SignalType {
    pub fn label(&self) -> &'static str {
        match self {
            SignalType::Buy => "buy",
            SignalType::Sell => "sell",
            SignalType::Hold => "hold",
            SignalType::Close => "close",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSource {
    AdviceEngine,
    AiAnalysis,
    Manual,
    System,
}

/// A concrete trade instruction. Created per advice, consumed exactly once
/// by the executor during replay; not mutated after creation.
#[derive(Debug, Clone, Serialize)]
pub struct TradingSignal {
    pub code: String,
    pub name: String,
    pub signal_type: SignalType,
    pub source: SignalSource,
    pub price: f64,
    pub timestamp: NaiveDateTime,
    pub date: NaiveDate,
    pub quantity: Option<i64>,
    pub amount: Option<f64>,
    pub rule_name: Option<String>,
    pub rule_params: HashMap<String, String>,
    pub strength: f64,
    pub note: Option<String>,
}

impl TradingSignal {
    /// Builds a signal with empty optional fields. `date` falls back to the
    /// timestamp's date when not supplied explicitly.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        signal_type: SignalType,
        source: SignalSource,
        price: f64,
        timestamp: NaiveDateTime,
        date: Option<NaiveDate>,
    ) -> Self {
        TradingSignal {
            code: code.into(),
            name: name.into(),
            signal_type,
            source,
            price,
            timestamp,
            date: date.unwrap_or_else(|| timestamp.date()),
            quantity: None,
            amount: None,
            rule_name: None,
            rule_params: HashMap::new(),
            strength: 1.0,
            note: None,
        }
    }

    pub fn is_buy_signal(&self) -> bool {
        self.signal_type == SignalType::Buy
    }

    pub fn is_sell_signal(&self) -> bool {
        matches!(self.signal_type, SignalType::Sell | SignalType::Close)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} {} ({}) @ {:.2} | strength {:.2}",
            self.signal_type.label(),
            self.name,
            self.code,
            self.price,
            self.strength
        )
    }
}
