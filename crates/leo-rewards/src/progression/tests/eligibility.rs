use super::common::*;
use crate::progression::domain::{ChildId, ChildProfile, SkipReason, Transition};
use crate::progression::eligibility::{age_in_months, is_eligible};

#[test]
fn age_in_months_adjusts_for_day_of_month() {
    let dob = Some(day(2020, 5, 15));
    assert_eq!(age_in_months(dob, day(2024, 5, 14)), Some(47));
    assert_eq!(age_in_months(dob, day(2024, 5, 15)), Some(48));
    assert_eq!(age_in_months(None, today()), None);
}

#[test]
fn band_boundaries_are_inclusive_exclusive() {
    assert!(!is_eligible(&child_aged_months(35), today()));
    assert!(is_eligible(&child_aged_months(36), today()));
    assert!(is_eligible(&child_aged_months(143), today()));
    assert!(!is_eligible(&child_aged_months(144), today()));
}

#[test]
fn missing_date_of_birth_is_ineligible() {
    let child = ChildProfile {
        id: ChildId::new("c1"),
        date_of_birth: None,
    };
    assert!(!is_eligible(&child, today()));
}

#[test]
fn ineligible_child_gets_no_mutations_anywhere() {
    let engine = engine();
    let legacy = legacy_engine();
    let child = child_aged_months(35);
    let state = empty_state();

    let (after, outcome) = engine.apply_log_transition(&state, &child, today(), both(), today());
    assert_eq!(outcome, Transition::skipped(SkipReason::Ineligible));
    assert_eq!(after, state);

    let (after, outcome) =
        engine.apply_timer_complete(&state, &child, today(), 120, None, today());
    assert_eq!(outcome, Transition::skipped(SkipReason::Ineligible));
    assert_eq!(after, state);

    let (after, _) = legacy.apply_log_transition(&state, &child, today(), both(), today());
    assert_eq!(after, state);
}

#[test]
fn blank_identifier_is_a_silent_skip() {
    let engine = engine();
    let child = ChildProfile {
        id: ChildId::new("  "),
        date_of_birth: Some(day(2016, 5, 1)),
    };
    let state = empty_state();

    let (after, outcome) = engine.apply_log_transition(&state, &child, today(), both(), today());
    assert_eq!(outcome, Transition::skipped(SkipReason::MissingIdentifier));
    assert_eq!(after, state);
}
