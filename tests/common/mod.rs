#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use stockpilot::domain::bar::DailyBar;
use stockpilot::domain::error::StockpilotError;
use stockpilot::domain::indicators::{AssetSnapshot, IndicatorSnapshot};
use stockpilot::domain::signal::{SignalSource, SignalType, TradingSignal};
use stockpilot::ports::data_port::DataPort;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn ts(y: i32, m: u32, d: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(15, 0, 0).unwrap()
}

pub fn make_bar(code: &str, date_str: &str, close: f64) -> DailyBar {
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap();
    DailyBar {
        code: code.to_string(),
        date,
        open: close,
        high: close * 1.01,
        low: close * 0.99,
        close,
        volume: 10_000,
    }
}

/// `count` consecutive daily bars starting at `start`, closes stepping by
/// `step` per bar.
pub fn generate_bars(code: &str, start: NaiveDate, count: usize, first_close: f64, step: f64) -> Vec<DailyBar> {
    (0..count)
        .map(|i| {
            let close = first_close + step * i as f64;
            DailyBar {
                code: code.to_string(),
                date: start + chrono::Duration::days(i as i64),
                open: close,
                high: close * 1.01,
                low: close * 0.99,
                close,
                volume: 10_000,
            }
        })
        .collect()
}

pub fn make_signal(code: &str, signal_type: SignalType, price: f64, day: NaiveDate) -> TradingSignal {
    TradingSignal::new(
        code,
        code,
        signal_type,
        SignalSource::AdviceEngine,
        price,
        day.and_hms_opt(15, 0, 0).unwrap(),
        None,
    )
}

pub fn bullish_snapshot() -> (AssetSnapshot, IndicatorSnapshot) {
    (
        AssetSnapshot {
            current_price: 11.0,
            price_change_pct: 0.5,
        },
        IndicatorSnapshot {
            ma5: 11.0,
            ma10: 10.0,
            ma20: 9.0,
            bias_ma5: 0.0,
            volume_ratio: 1.0,
        },
    )
}

pub struct MockDataPort {
    pub data: HashMap<String, Vec<DailyBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, code: &str, bars: Vec<DailyBar>) -> Self {
        self.data.insert(code.to_string(), bars);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_daily(
        &self,
        code: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<DailyBar>, StockpilotError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(StockpilotError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(code)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_codes(&self) -> Result<Vec<String>, StockpilotError> {
        let mut codes: Vec<String> = self.data.keys().cloned().collect();
        codes.sort();
        Ok(codes)
    }
}
