//! Server clock for resolving timestamp sentinels

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

/// Issues strictly increasing UTC timestamps at microsecond precision
///
/// Two writes in the same microsecond still get distinct, ordered
/// timestamps, so a refreshed `timestamp` field always sorts after the
/// value it replaces.
#[derive(Debug, Default)]
pub struct ServerClock {
    last: Mutex<Option<DateTime<Utc>>>,
}

impl ServerClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next timestamp, never equal to or earlier than a previous one
    pub fn now(&self) -> DateTime<Utc> {
        let wall = truncate_to_micros(Utc::now());
        let mut last = match self.last.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let next = match *last {
            Some(prev) if wall <= prev => prev + Duration::microseconds(1),
            _ => wall,
        };
        *last = Some(next);
        next
    }
}

fn truncate_to_micros(ts: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_micros(ts.timestamp_micros()).unwrap_or(ts)
}
