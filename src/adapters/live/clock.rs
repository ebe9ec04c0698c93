//! Live clock backed by the system time.

use chrono::{DateTime, Utc};

use crate::ports::clock::Clock;

/// Reads the system clock; today is the current UTC date.
pub struct LiveClock;

impl Clock for LiveClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
