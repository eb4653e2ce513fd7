use time::{Date, OffsetDateTime};

/// Source of "today" for creation and signing dates.
pub trait Clock: Send + Sync {
    fn today(&self) -> Date;
}

/// The host's local calendar date, falling back to UTC when the local
/// offset cannot be determined.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Date {
        OffsetDateTime::now_local()
            .unwrap_or_else(|_| OffsetDateTime::now_utc())
            .date()
    }
}

/// Always reports the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Date);

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.0
    }
}
