//! Clock port for obtaining the current time.

use chrono::{DateTime, NaiveDate, Utc};

/// Provides the current time.
///
/// The resolver asks the clock which UTC day is "today"; substituting a
/// fixed or recorded clock keeps cache partitioning deterministic.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current UTC calendar day.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}
