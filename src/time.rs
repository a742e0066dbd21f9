use chrono::{DateTime, Local, NaiveDate, Utc};

/// Clock abstracts access to the current timestamp so queries that depend on
/// "now" stay deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current calendar date. Defaults to `now().date_naive()`.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Real-time clock backed by the system time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    /// Calendar months are judged in the user's local timezone.
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}
