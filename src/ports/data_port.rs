//! Daily bar data access port trait.

use crate::domain::bar::DailyBar;
use crate::domain::error::StockpilotError;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily bars for a code within the inclusive date range, sorted
    /// ascending by date.
    fn fetch_daily(
        &self,
        code: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<DailyBar>, StockpilotError>;

    fn list_codes(&self) -> Result<Vec<String>, StockpilotError>;
}
