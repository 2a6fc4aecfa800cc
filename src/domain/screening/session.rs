use chrono::{DateTime, Datelike, FixedOffset, NaiveTime, Utc, Weekday};
use std::fmt;

/// India Standard Time, UTC+05:30. No daylight saving.
pub const IST_OFFSET_SECONDS: i32 = 5 * 3600 + 30 * 60;

pub fn ist() -> FixedOffset {
    FixedOffset::east_opt(IST_OFFSET_SECONDS).expect("IST offset is within a day")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Open,
    Closed,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Open => write!(f, "OPEN"),
            SessionStatus::Closed => write!(f, "CLOSED"),
        }
    }
}

/// Weekday trading window in a fixed timezone. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradingSession {
    offset: FixedOffset,
    open: NaiveTime,
    close: NaiveTime,
}

impl TradingSession {
    pub fn new(offset: FixedOffset, open: NaiveTime, close: NaiveTime) -> Self {
        Self {
            offset,
            open,
            close,
        }
    }

    /// NSE cash session: 09:15 to 15:30 IST, Monday to Friday.
    pub fn nse() -> Self {
        Self::new(
            ist(),
            NaiveTime::from_hms_opt(9, 15, 0).expect("valid session open"),
            NaiveTime::from_hms_opt(15, 30, 0).expect("valid session close"),
        )
    }

    pub fn status_at(&self, instant: DateTime<Utc>) -> SessionStatus {
        let local = instant.with_timezone(&self.offset);

        if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
            return SessionStatus::Closed;
        }

        let time = local.time();
        if time >= self.open && time <= self.close {
            SessionStatus::Open
        } else {
            SessionStatus::Closed
        }
    }

    pub fn is_open_at(&self, instant: DateTime<Utc>) -> bool {
        self.status_at(instant) == SessionStatus::Open
    }

    pub fn status_now(&self) -> SessionStatus {
        self.status_at(Utc::now())
    }
}

impl Default for TradingSession {
    fn default() -> Self {
        Self::nse()
    }
}
