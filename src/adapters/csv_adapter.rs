//! CSV file data adapter.
//!
//! One file per code at `{base}/{code}.csv` with a
//! `date,open,high,low,close,volume` header row.

use crate::domain::bar::DailyBar;
use crate::domain::error::StockpilotError;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, code: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", code))
    }

    fn parse_field<T: std::str::FromStr>(
        record: &csv::StringRecord,
        index: usize,
        column: &str,
    ) -> Result<T, StockpilotError>
    where
        T::Err: std::fmt::Display,
    {
        record
            .get(index)
            .ok_or_else(|| StockpilotError::Data {
                reason: format!("missing {} column", column),
            })?
            .trim()
            .parse()
            .map_err(|e| StockpilotError::Data {
                reason: format!("invalid {} value: {}", column, e),
            })
    }
}

impl DataPort for CsvAdapter {
    fn fetch_daily(
        &self,
        code: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<DailyBar>, StockpilotError> {
        let path = self.csv_path(code);
        let content = fs::read_to_string(&path).map_err(|e| StockpilotError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| StockpilotError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(0).ok_or_else(|| StockpilotError::Data {
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                StockpilotError::Data {
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            if date < start_date || date > end_date {
                continue;
            }

            bars.push(DailyBar {
                code: code.to_string(),
                date,
                open: Self::parse_field(&record, 1, "open")?,
                high: Self::parse_field(&record, 2, "high")?,
                low: Self::parse_field(&record, 3, "low")?,
                close: Self::parse_field(&record, 4, "close")?,
                volume: Self::parse_field(&record, 5, "volume")?,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn list_codes(&self) -> Result<Vec<String>, StockpilotError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| StockpilotError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut codes = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StockpilotError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(code) = name_str.strip_suffix(".csv") {
                codes.push(code.to_string());
            }
        }

        codes.sort();
        Ok(codes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "date,open,high,low,close,volume\n\
            2024-01-15,100.0,110.0,90.0,105.0,50000\n\
            2024-01-16,105.0,115.0,100.0,110.0,60000\n\
            2024-01-17,110.0,120.0,105.0,115.0,55000\n";

        fs::write(path.join("600519.csv"), csv_content).unwrap();
        fs::write(path.join("000001.csv"), "date,open,high,low,close,volume\n").unwrap();

        (dir, path)
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn fetch_daily_returns_parsed_bars() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let bars = adapter.fetch_daily("600519", date(15), date(17)).unwrap();

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].code, "600519");
        assert_eq!(bars[0].date, date(15));
        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[0].high, 110.0);
        assert_eq!(bars[0].low, 90.0);
        assert_eq!(bars[0].close, 105.0);
        assert_eq!(bars[0].volume, 50000);
    }

    #[test]
    fn fetch_daily_filters_by_date_range() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let bars = adapter.fetch_daily("600519", date(16), date(16)).unwrap();

        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].date, date(16));
    }

    #[test]
    fn fetch_daily_errors_for_missing_file() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        assert!(adapter.fetch_daily("999999", date(1), date(31)).is_err());
    }

    #[test]
    fn fetch_daily_errors_on_malformed_row() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();
        fs::write(
            path.join("600519.csv"),
            "date,open,high,low,close,volume\n2024-01-15,abc,110.0,90.0,105.0,50000\n",
        )
        .unwrap();

        let adapter = CsvAdapter::new(path);
        let result = adapter.fetch_daily("600519", date(1), date(31));
        assert!(matches!(result, Err(StockpilotError::Data { .. })));
    }

    #[test]
    fn bars_are_sorted_by_date() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();
        fs::write(
            path.join("600519.csv"),
            "date,open,high,low,close,volume\n\
             2024-01-17,110.0,120.0,105.0,115.0,55000\n\
             2024-01-15,100.0,110.0,90.0,105.0,50000\n",
        )
        .unwrap();

        let adapter = CsvAdapter::new(path);
        let bars = adapter.fetch_daily("600519", date(1), date(31)).unwrap();
        assert_eq!(bars[0].date, date(15));
        assert_eq!(bars[1].date, date(17));
    }

    #[test]
    fn list_codes_strips_extension_and_sorts() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let codes = adapter.list_codes().unwrap();
        assert_eq!(codes, vec!["000001", "600519"]);
    }
}
