use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};

use super::domain::League;

/// Number of trailing days the league window looks at, today inclusive.
pub const LEAGUE_WINDOW_DAYS: u32 = 14;

/// Gold requires this completion rate over the league window.
pub const GOLD_RATE: f32 = 0.85;

/// Silver requires this completion rate over the league window.
pub const SILVER_RATE: f32 = 0.70;

/// Backstop for the backward streak walk on corrupted data.
const STREAK_SCAN_CAP: u32 = 365;

/// Canonical `YYYY-MM-DD` key used everywhere a date identifies a day log.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_date_key(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

pub fn previous_day(date: NaiveDate) -> NaiveDate {
    date - Duration::days(1)
}

/// The `count` dates ending at `end` inclusive, most recent first.
pub fn trailing_window(end: NaiveDate, count: u32) -> impl Iterator<Item = NaiveDate> {
    (0..count).map(move |offset| end - Duration::days(i64::from(offset)))
}

/// Consecutive complete days ending at `end`: walk backward one day at a
/// time until the first gap. Derived on every transition, never trusted
/// from storage.
pub fn compute_streak(completed_days: &BTreeSet<NaiveDate>, end: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut cursor = end;
    while completed_days.contains(&cursor) {
        streak += 1;
        cursor = previous_day(cursor);
        if streak > STREAK_SCAN_CAP {
            break;
        }
    }
    streak
}

/// League tier from the completion rate over the trailing 14-day window.
pub fn compute_league(completed_days: &BTreeSet<NaiveDate>, end: NaiveDate) -> League {
    let complete = trailing_window(end, LEAGUE_WINDOW_DAYS)
        .filter(|day| completed_days.contains(day))
        .count();
    let rate = complete as f32 / LEAGUE_WINDOW_DAYS as f32;
    if rate >= GOLD_RATE {
        League::Gold
    } else if rate >= SILVER_RATE {
        League::Silver
    } else {
        League::Bronze
    }
}
