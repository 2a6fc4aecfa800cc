use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use rustscreen::domain::screening::session::ist;
use rustscreen::domain::screening::{SessionStatus, TradingSession};

fn at_ist(day: u32, hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    ist()
        .with_ymd_and_hms(2024, 3, day, hour, minute, second)
        .unwrap()
        .with_timezone(&Utc)
}

#[test]
fn test_every_weekday_minute_in_window_is_open() {
    let session = TradingSession::nse();

    // 2024-03-11 (Mon) .. 2024-03-15 (Fri)
    for day in 11..=15 {
        let mut instant = at_ist(day, 9, 15, 0);
        let close = at_ist(day, 15, 30, 0);
        while instant <= close {
            assert_eq!(session.status_at(instant), SessionStatus::Open, "{}", instant);
            instant += Duration::minutes(1);
        }
    }
}

#[test]
fn test_one_second_outside_window_is_closed() {
    let session = TradingSession::nse();

    for day in 11..=15 {
        assert!(!session.is_open_at(at_ist(day, 9, 14, 59)));
        assert!(!session.is_open_at(at_ist(day, 15, 30, 1)));
        assert!(!session.is_open_at(at_ist(day, 0, 0, 0)));
        assert!(!session.is_open_at(at_ist(day, 23, 59, 59)));
    }
}

#[test]
fn test_weekend_is_closed_all_day() {
    let session = TradingSession::nse();

    // 2024-03-16 (Sat), 2024-03-17 (Sun)
    for day in [16, 17] {
        for hour in 0..24 {
            assert_eq!(session.status_at(at_ist(day, hour, 0, 0)), SessionStatus::Closed);
        }
    }
}

#[test]
fn test_weekday_is_taken_in_ist_not_utc() {
    let session = TradingSession::nse();

    // Friday 22:00 UTC is already Saturday 03:30 IST
    let friday_night_utc = Utc.with_ymd_and_hms(2024, 3, 15, 22, 0, 0).unwrap();
    assert!(!session.is_open_at(friday_night_utc));

    // Monday 04:00 UTC is 09:30 IST on the same Monday
    let monday_morning_utc = Utc.with_ymd_and_hms(2024, 3, 11, 4, 0, 0).unwrap();
    assert!(session.is_open_at(monday_morning_utc));
}

#[test]
fn test_custom_window() {
    let session = TradingSession::new(
        ist(),
        NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
    );

    assert!(!session.is_open_at(at_ist(13, 9, 30, 0)));
    assert!(session.is_open_at(at_ist(13, 10, 30, 0)));
    assert_eq!(SessionStatus::Closed.to_string(), "CLOSED");
}
