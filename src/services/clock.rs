use chrono::{NaiveDate, NaiveDateTime, Utc};

/// Source of "now" for everything date-dependent (reminders, default log
/// dates, join timestamps). Swapped for [`FixedClock`] in tests.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> NaiveDateTime;

    /// Calendar date of [`Clock::now`] in UTC.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().naive_utc()
    }
}

#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

#[cfg(test)]
impl FixedClock {
    /// Noon on the given day.
    pub fn on(date: NaiveDate) -> Self {
        FixedClock(date.and_hms_opt(12, 0, 0).expect("noon is a valid time of day"))
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_reports_its_day() {
        let day = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let clock = FixedClock::on(day);
        assert_eq!(clock.today(), day);
        assert_eq!(clock.now().date(), day);
    }
}
