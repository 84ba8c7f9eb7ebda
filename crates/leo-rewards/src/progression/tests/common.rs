use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

use crate::progression::domain::{ChildId, ChildProfile, DayLog, StateDocument};
use crate::progression::engine::{EngineConfig, ProgressionEngine};
use crate::progression::legacy::LegacyEngine;

pub(super) fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Fixed reference date used as "today" across the fixtures.
pub(super) fn today() -> NaiveDate {
    day(2024, 5, 1)
}

/// Child squarely inside the eligible band (8 years old at `today`).
pub(super) fn eligible_child() -> ChildProfile {
    ChildProfile {
        id: ChildId::new("c1"),
        date_of_birth: Some(day(2016, 5, 1)),
    }
}

pub(super) fn child_aged_months(months: i32) -> ChildProfile {
    let anchor = today();
    let total = anchor.year() * 12 + anchor.month0() as i32 - months;
    let dob = NaiveDate::from_ymd_opt(total.div_euclid(12), total.rem_euclid(12) as u32 + 1, 1)
        .expect("valid dob");
    ChildProfile {
        id: ChildId::new("c1"),
        date_of_birth: Some(dob),
    }
}

pub(super) fn engine() -> ProgressionEngine {
    ProgressionEngine::new(EngineConfig::default())
}

pub(super) fn legacy_engine() -> LegacyEngine {
    LegacyEngine::new()
}

pub(super) fn empty_state() -> StateDocument {
    StateDocument::default()
}

pub(super) fn both() -> DayLog {
    DayLog { am: true, pm: true }
}

pub(super) fn am_only() -> DayLog {
    DayLog {
        am: true,
        pm: false,
    }
}

/// Mark `count` consecutive complete days ending at `end` inclusive.
pub(super) fn completed_run(end: NaiveDate, count: u32) -> BTreeSet<NaiveDate> {
    (0..count)
        .map(|offset| end - chrono::Duration::days(i64::from(offset)))
        .collect()
}
