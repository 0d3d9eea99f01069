//! News context port trait: the search collaborator feeding the risk rule.

use crate::domain::error::StockpilotError;

pub trait NewsPort {
    /// Free-text news context for a code, or None when there is nothing
    /// to report. Absence of news is not an error.
    fn fetch_news(&self, code: &str, name: &str) -> Result<Option<String>, StockpilotError>;
}
