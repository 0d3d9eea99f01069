//! File-based news adapter: `{dir}/{code}.txt` per code.

use crate::domain::error::StockpilotError;
use crate::ports::news_port::NewsPort;
use std::fs;
use std::path::PathBuf;

pub struct FileNewsAdapter {
    base_path: PathBuf,
}

impl FileNewsAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }
}

impl NewsPort for FileNewsAdapter {
    fn fetch_news(&self, code: &str, _name: &str) -> Result<Option<String>, StockpilotError> {
        let path = self.base_path.join(format!("{}.txt", code));
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(|e| StockpilotError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        let trimmed = content.trim();
        if trimmed.is_empty() {
            Ok(None)
        } else {
            Ok(Some(trimmed.to_string()))
        }
    }
}
