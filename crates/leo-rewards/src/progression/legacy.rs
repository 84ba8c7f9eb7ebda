//! Legacy token engine, kept so state persisted before the points redesign
//! stays readable and keeps accruing. Tokens and the shop ledger are a
//! separate currency from points; the two ledgers are never merged.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::calendar::compute_streak;
use super::catalog::{pin_pool, shop_item, streak_milestone};
use super::chest::{hash_string, pick_one};
use super::domain::{uniq_push, ChildProfile, DayLog, SkipReason, StateDocument};
use super::eligibility::is_eligible;

/// Per-slot flags that gate token awards, mirroring the shape persisted by
/// the original app (`awarded[dateKey] = { am, pm, day }`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyDayFlags {
    pub am: bool,
    pub pm: bool,
    pub day: bool,
}

/// Immutable record of a shop redemption, most recent first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Redemption {
    pub id: String,
    pub date: DateTime<Utc>,
    pub item_id: String,
    pub title: String,
    pub cost: u32,
}

/// Per-child ledger for the token system.
///
/// Unlike the current engine, `completed_days` here only ever grows: the
/// legacy system never retro-removed a complete day when a slot was
/// unchecked, and migrated history must keep reading the same way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyRewards {
    pub tokens: u32,
    pub badges: Vec<String>,
    pub unlocked: Vec<String>,
    pub redemptions: Vec<Redemption>,
    pub awarded: BTreeMap<NaiveDate, LegacyDayFlags>,
    pub streak: u32,
    /// Streak lengths whose milestone bonus was already granted. Keyed by
    /// length, once ever: re-reaching a broken 7-day streak does not
    /// re-grant. Observed product behavior, preserved as-is.
    pub milestones_awarded: BTreeSet<u32>,
    #[serde(with = "super::domain::completed_days_map")]
    pub completed_days: BTreeSet<NaiveDate>,
}

/// Outcome of a legacy transition; tokens, not points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum LegacyTransition {
    Applied { tokens_awarded: u32 },
    Skipped { reason: SkipReason },
}

impl LegacyTransition {
    pub fn skipped(reason: SkipReason) -> Self {
        Self::Skipped { reason }
    }

    pub fn is_applied(self) -> bool {
        matches!(self, LegacyTransition::Applied { .. })
    }
}

static REDEMPTION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_redemption_id() -> String {
    let id = REDEMPTION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("redeem-{id:06}")
}

/// Stateless transition engine over the legacy ledger.
#[derive(Debug, Default)]
pub struct LegacyEngine;

impl LegacyEngine {
    pub fn new() -> Self {
        Self
    }

    fn gate(&self, profile: &ChildProfile, today: NaiveDate) -> Option<SkipReason> {
        if profile.id.is_blank() {
            return Some(SkipReason::MissingIdentifier);
        }
        if !is_eligible(profile, today) {
            return Some(SkipReason::Ineligible);
        }
        None
    }

    /// One token per newly-validated slot, plus one for a complete day, plus
    /// streak milestone bonuses at 3/7/14 consecutive days.
    pub fn apply_log_transition(
        &self,
        state: &StateDocument,
        profile: &ChildProfile,
        date: NaiveDate,
        next: DayLog,
        today: NaiveDate,
    ) -> (StateDocument, LegacyTransition) {
        if let Some(reason) = self.gate(profile, today) {
            return (state.clone(), LegacyTransition::skipped(reason));
        }

        let mut record = state.legacy_for(&profile.id);
        let mut flags = record.awarded.get(&date).copied().unwrap_or_default();
        let mut tokens_awarded = 0;

        if next.am && !flags.am {
            tokens_awarded += 1;
            flags.am = true;
        }
        if next.pm && !flags.pm {
            tokens_awarded += 1;
            flags.pm = true;
        }

        let complete = next.is_complete();
        if complete && !flags.day {
            tokens_awarded += 1;
            flags.day = true;
        }

        record.awarded.insert(date, flags);
        if complete {
            record.completed_days.insert(date);
        }

        record.streak = compute_streak(&record.completed_days, today);

        if let Some(milestone) = streak_milestone(record.streak) {
            if record.milestones_awarded.insert(milestone.days) {
                tokens_awarded += milestone.bonus_tokens;
                uniq_push(&mut record.badges, milestone.badge);
            }
        }

        record.tokens += tokens_awarded;

        let mut next_state = state.clone();
        next_state.rewards.insert(profile.id.clone(), record);
        (next_state, LegacyTransition::Applied { tokens_awarded })
    }

    /// Spend tokens on a shop tier. Silent no-op on unknown item or short
    /// balance. The redemption ledger is append-only, newest first; the
    /// entry tier also grants one pin, picked deterministically so a
    /// replayed ledger grants the same cosmetics.
    pub fn redeem_shop_item(
        &self,
        state: &StateDocument,
        profile: &ChildProfile,
        item_id: &str,
        redeemed_at: DateTime<Utc>,
        today: NaiveDate,
    ) -> (StateDocument, LegacyTransition) {
        if let Some(reason) = self.gate(profile, today) {
            return (state.clone(), LegacyTransition::skipped(reason));
        }

        let Some(item) = shop_item(item_id) else {
            return (
                state.clone(),
                LegacyTransition::skipped(SkipReason::UnknownItem),
            );
        };

        let mut record = state.legacy_for(&profile.id);
        if record.tokens < item.cost {
            return (
                state.clone(),
                LegacyTransition::skipped(SkipReason::InsufficientTokens),
            );
        }

        record.tokens -= item.cost;
        record.redemptions.insert(
            0,
            Redemption {
                id: next_redemption_id(),
                date: redeemed_at,
                item_id: item.id.to_string(),
                title: item.title.to_string(),
                cost: item.cost,
            },
        );

        if item.grants_pin {
            let seed = hash_string(&format!(
                "{}:{}:{}:shop",
                profile.id.0,
                item.id,
                record.redemptions.len()
            ));
            let pins = pin_pool();
            if let Some(pin) = pick_one(&pins, seed) {
                uniq_push(&mut record.unlocked, pin);
            }
        }

        let mut next_state = state.clone();
        next_state.rewards.insert(profile.id.clone(), record);
        (next_state, LegacyTransition::Applied { tokens_awarded: 0 })
    }
}
