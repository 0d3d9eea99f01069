//! Asset view port trait: the data collaborator the advice engine reads.

/// Latest close and day-over-day percent change.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceData {
    pub close: f64,
    pub pct_chg: f64,
}

/// Latest indicator snapshot as the upstream source supplies it. Fields
/// the source could not compute are None; the engine maps them to the
/// rule-facing defaults.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IndicatorData {
    pub ma5: Option<f64>,
    pub ma10: Option<f64>,
    pub ma20: Option<f64>,
    pub bias_ma5: Option<f64>,
    pub volume_ratio: Option<f64>,
}

pub trait AssetPort {
    fn code(&self) -> &str;
    fn name(&self) -> &str;
    fn latest_price(&self) -> Option<PriceData>;
    fn latest_indicators(&self) -> Option<IndicatorData>;
}
