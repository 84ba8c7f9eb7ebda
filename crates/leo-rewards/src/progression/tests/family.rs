use chrono::{TimeZone, Utc};

use super::common::*;
use crate::progression::catalog::family_milestone_for_key;
use crate::progression::domain::{SkipReason, Transition};

#[test]
fn claim_records_the_choice() {
    let engine = engine();
    let child = eligible_child();
    let claimed_at = Utc.with_ymd_and_hms(2024, 5, 1, 19, 30, 0).unwrap();

    let (state, outcome) = engine.claim_family_reward(
        &empty_state(),
        &child,
        "family_story_l1",
        "story_2",
        "Pick the short story",
        claimed_at,
        today(),
    );

    assert!(outcome.is_applied());
    let claim = state.record_for(&child.id).family_claims["family_story_l1"].clone();
    assert_eq!(claim.option_id, "story_2");
    assert_eq!(claim.option_label, "Pick the short story");
    assert_eq!(claim.claimed_at, claimed_at);
}

#[test]
fn reclaiming_overwrites_the_previous_choice() {
    let engine = engine();
    let child = eligible_child();
    let first_at = Utc.with_ymd_and_hms(2024, 5, 1, 19, 0, 0).unwrap();
    let second_at = Utc.with_ymd_and_hms(2024, 5, 1, 19, 5, 0).unwrap();

    let (state, _) = engine.claim_family_reward(
        &empty_state(),
        &child,
        "family_story_l1",
        "story_1",
        "Pick a book (at home)",
        first_at,
        today(),
    );
    let (state, outcome) = engine.claim_family_reward(
        &state,
        &child,
        "family_story_l1",
        "story_3",
        "Pick the long story",
        second_at,
        today(),
    );

    assert!(outcome.is_applied());
    let record = state.record_for(&child.id);
    assert_eq!(record.family_claims.len(), 1, "edit, not a second claim");
    let claim = &record.family_claims["family_story_l1"];
    assert_eq!(claim.option_id, "story_3");
    assert_eq!(claim.claimed_at, second_at);
}

#[test]
fn options_are_validated_against_the_milestone_category() {
    let engine = engine();
    let child = eligible_child();
    let claimed_at = Utc.with_ymd_and_hms(2024, 5, 1, 19, 0, 0).unwrap();

    // "act_1" belongs to the activity category, not story.
    let (state, outcome) = engine.claim_family_reward(
        &empty_state(),
        &child,
        "family_story_l1",
        "act_1",
        "10 min cartoon",
        claimed_at,
        today(),
    );

    assert_eq!(outcome, Transition::skipped(SkipReason::UnknownChoice));
    assert!(state.record_for(&child.id).family_claims.is_empty());
}

#[test]
fn unconfigured_milestone_keys_are_accepted_as_is() {
    let engine = engine();
    let child = eligible_child();
    let claimed_at = Utc.with_ymd_and_hms(2024, 5, 1, 19, 0, 0).unwrap();

    let (state, outcome) = engine.claim_family_reward(
        &empty_state(),
        &child,
        "family_custom_l2",
        "custom_1",
        "",
        claimed_at,
        today(),
    );

    assert!(outcome.is_applied());
    let claim = &state.record_for(&child.id).family_claims["family_custom_l2"];
    assert_eq!(claim.option_label, "custom_1", "label falls back to the id");
}

#[test]
fn blank_keys_and_options_are_skips() {
    let engine = engine();
    let child = eligible_child();
    let claimed_at = Utc.with_ymd_and_hms(2024, 5, 1, 19, 0, 0).unwrap();

    let (_, outcome) = engine.claim_family_reward(
        &empty_state(),
        &child,
        "",
        "story_1",
        "",
        claimed_at,
        today(),
    );
    assert_eq!(outcome, Transition::skipped(SkipReason::MissingIdentifier));

    let (_, outcome) = engine.claim_family_reward(
        &empty_state(),
        &child,
        "family_story_l1",
        " ",
        "",
        claimed_at,
        today(),
    );
    assert_eq!(outcome, Transition::skipped(SkipReason::MissingIdentifier));
}

#[test]
fn milestone_keys_resolve_by_stripping_the_level_suffix() {
    assert_eq!(
        family_milestone_for_key("family_story_l1").map(|m| m.id),
        Some("family_story")
    );
    assert_eq!(
        family_milestone_for_key("family_snack_l12").map(|m| m.at),
        Some(600)
    );
    assert!(family_milestone_for_key("family_story").is_none());
    assert!(family_milestone_for_key("family_story_lx").is_none());
}
