//! Notification channel port trait.

use crate::domain::error::StockpilotError;

pub trait NotifyPort {
    /// Delivers a rendered report through the channel.
    fn send(&self, subject: &str, body: &str) -> Result<(), StockpilotError>;
}
