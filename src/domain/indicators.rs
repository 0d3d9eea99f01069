//! Indicator snapshot derivation from daily bars.
//!
//! The scoring rules consume one [`AssetSnapshot`] + [`IndicatorSnapshot`]
//! pair per evaluation. Upstream data sources may supply the indicator
//! fields pre-computed; this module derives them from raw bars when they
//! are not supplied.

use crate::domain::bar::DailyBar;
use serde::Serialize;

/// Trailing sessions used for the volume-ratio baseline.
pub const VOLUME_LOOKBACK: usize = 5;

/// Bars of history required before a snapshot can be built (MA20).
pub const MIN_BARS_FOR_SNAPSHOT: usize = 20;

/// Per-asset price state handed to the rules.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct AssetSnapshot {
    pub current_price: f64,
    pub price_change_pct: f64,
}

/// Per-asset indicator state handed to the rules. `volume_ratio` defaults
/// to 1.0 (neutral); the remaining fields default to 0.0.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct IndicatorSnapshot {
    pub ma5: f64,
    pub ma10: f64,
    pub ma20: f64,
    pub bias_ma5: f64,
    pub volume_ratio: f64,
}

impl Default for IndicatorSnapshot {
    fn default() -> Self {
        IndicatorSnapshot {
            ma5: 0.0,
            ma10: 0.0,
            ma20: 0.0,
            bias_ma5: 0.0,
            volume_ratio: 1.0,
        }
    }
}

/// Arithmetic mean of the last `period` values, or None when there are
/// fewer than `period` values.
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let tail = &values[values.len() - period..];
    Some(tail.iter().sum::<f64>() / period as f64)
}

/// Percent deviation of `price` from `ma`, 0 when the average is not positive.
pub fn bias_pct(price: f64, ma: f64) -> f64 {
    if ma > 0.0 {
        (price - ma) / ma * 100.0
    } else {
        0.0
    }
}

/// Today's volume against the mean of the preceding [`VOLUME_LOOKBACK`]
/// sessions. 1.0 (neutral) when history is too short or the baseline is 0.
pub fn volume_ratio(bars: &[DailyBar]) -> f64 {
    if bars.len() < VOLUME_LOOKBACK + 1 {
        return 1.0;
    }
    let current = bars[bars.len() - 1].volume as f64;
    let window = &bars[bars.len() - 1 - VOLUME_LOOKBACK..bars.len() - 1];
    let baseline = window.iter().map(|b| b.volume as f64).sum::<f64>() / VOLUME_LOOKBACK as f64;
    if baseline > 0.0 {
        current / baseline
    } else {
        1.0
    }
}

/// Builds the snapshot pair as of `bars[index]`, using only bars up to and
/// including that index. None when fewer than [`MIN_BARS_FOR_SNAPSHOT`]
/// bars are available at that point.
pub fn snapshot_at(bars: &[DailyBar], index: usize) -> Option<(AssetSnapshot, IndicatorSnapshot)> {
    if index >= bars.len() || index + 1 < MIN_BARS_FOR_SNAPSHOT {
        return None;
    }
    let visible = &bars[..=index];
    let closes: Vec<f64> = visible.iter().map(|b| b.close).collect();

    let ma5 = sma(&closes, 5)?;
    let ma10 = sma(&closes, 10)?;
    let ma20 = sma(&closes, 20)?;

    let bar = &visible[visible.len() - 1];
    let prev_close = visible[visible.len() - 2].close;

    let asset = AssetSnapshot {
        current_price: bar.close,
        price_change_pct: bar.change_pct_from(prev_close),
    };
    let indicators = IndicatorSnapshot {
        ma5,
        ma10,
        ma20,
        bias_ma5: bias_pct(bar.close, ma5),
        volume_ratio: volume_ratio(visible),
    };
    Some((asset, indicators))
}

/// Snapshot as of the most recent bar.
pub fn latest_snapshot(bars: &[DailyBar]) -> Option<(AssetSnapshot, IndicatorSnapshot)> {
    if bars.is_empty() {
        return None;
    }
    snapshot_at(bars, bars.len() - 1)
}
