//! Console notification adapter: prints the report to stdout.

use crate::domain::error::StockpilotError;
use crate::ports::notify_port::NotifyPort;

pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        ConsoleNotifier
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        ConsoleNotifier::new()
    }
}

impl NotifyPort for ConsoleNotifier {
    fn send(&self, subject: &str, body: &str) -> Result<(), StockpilotError> {
        println!("=== {} ===\n", subject);
        println!("{}", body);
        Ok(())
    }
}
