//! Current progression engine: points (kept as `xp` in state), level,
//! league, streak, daily mission flags, chest resolution, and family-reward
//! claims. Every method is a pure transition: it takes the whole state
//! snapshot plus an event and returns a fresh snapshot with one child's
//! record rewritten. Invalid inputs return the snapshot unchanged.

use chrono::{DateTime, NaiveDate, Utc};

use super::calendar::{compute_league, compute_streak};
use super::catalog::{family_milestone_for_key, family_options};
use super::chest::{chest_choices, ChestPrize};
use super::domain::{
    ChildProfile, DayLog, FamilyClaim, SkipReason, StateDocument, Transition,
};
use super::eligibility::is_eligible;

/// Award sizes and timer rules. Defaults match the shipped product values;
/// only the timer target is deployment-tunable.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub slot_points: u32,
    pub day_bonus_points: u32,
    pub timer_base_points: u32,
    pub timer_accuracy_bonus: u32,
    pub timer_tolerance_seconds: u32,
    pub timer_target_seconds: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            slot_points: 10,
            day_bonus_points: 15,
            timer_base_points: 12,
            timer_accuracy_bonus: 8,
            timer_tolerance_seconds: 5,
            timer_target_seconds: 120,
        }
    }
}

/// Stateless transition engine over [`StateDocument`] snapshots.
pub struct ProgressionEngine {
    config: EngineConfig,
}

impl ProgressionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
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

    /// Apply a brushing-log edit for `date`. The per-day award flags, not a
    /// prev/next diff, decide what is newly awarded, which keeps awards
    /// idempotent across out-of-order edits. Unchecking a slot removes the
    /// day from `completed_days` (breaking any streak through it) but never
    /// claws back points.
    pub fn apply_log_transition(
        &self,
        state: &StateDocument,
        profile: &ChildProfile,
        date: NaiveDate,
        next: DayLog,
        today: NaiveDate,
    ) -> (StateDocument, Transition) {
        if let Some(reason) = self.gate(profile, today) {
            return (state.clone(), Transition::skipped(reason));
        }

        let mut record = state.record_for(&profile.id);
        let mut flags = record.flags_for(date);
        let mut awarded = 0;

        if next.am && !flags.am_awarded {
            awarded += self.config.slot_points;
            flags.am_awarded = true;
        }
        if next.pm && !flags.pm_awarded {
            awarded += self.config.slot_points;
            flags.pm_awarded = true;
        }

        let complete = next.is_complete();
        if complete && !flags.day_awarded {
            awarded += self.config.day_bonus_points;
            flags.day_awarded = true;
        }

        // Completion tracks the current slot state, not award history.
        if complete {
            record.completed_days.insert(date);
        } else {
            record.completed_days.remove(&date);
        }

        record.streak = compute_streak(&record.completed_days, today);
        record.league = compute_league(&record.completed_days, today);
        flags.chest_unlocked = complete;

        record.xp += u64::from(awarded);
        record.daily.insert(date, flags);

        let mut next_state = state.clone();
        next_state.gami.insert(profile.id.clone(), record);
        (
            next_state,
            Transition::Applied {
                points_awarded: awarded,
            },
        )
    }

    /// Award the brushing-timer completion, once per day. Finishing close to
    /// the target earns an accuracy bonus on top of the base award.
    pub fn apply_timer_complete(
        &self,
        state: &StateDocument,
        profile: &ChildProfile,
        date: NaiveDate,
        seconds: u32,
        target_seconds: Option<u32>,
        today: NaiveDate,
    ) -> (StateDocument, Transition) {
        if let Some(reason) = self.gate(profile, today) {
            return (state.clone(), Transition::skipped(reason));
        }

        let mut record = state.record_for(&profile.id);
        let mut flags = record.flags_for(date);
        if flags.timer_done {
            return (state.clone(), Transition::skipped(SkipReason::AlreadyDone));
        }

        let target = target_seconds.unwrap_or(self.config.timer_target_seconds);
        let accurate = seconds.abs_diff(target) <= self.config.timer_tolerance_seconds;
        let awarded = self.config.timer_base_points
            + if accurate {
                self.config.timer_accuracy_bonus
            } else {
                0
            };

        flags.timer_done = true;
        flags.timer_seconds = seconds;
        record.xp += u64::from(awarded);
        record.daily.insert(date, flags);

        let mut next_state = state.clone();
        next_state.gami.insert(profile.id.clone(), record);
        (
            next_state,
            Transition::Applied {
                points_awarded: awarded,
            },
        )
    }

    /// Resolve a chest pick. No-op unless the day's chest is unlocked, still
    /// closed, and `choice_id` matches one of the regenerated options. Once
    /// opened, every retry is a no-op regardless of the choice id.
    pub fn open_chest(
        &self,
        state: &StateDocument,
        profile: &ChildProfile,
        date: NaiveDate,
        choice_id: &str,
        today: NaiveDate,
    ) -> (StateDocument, Transition) {
        if let Some(reason) = self.gate(profile, today) {
            return (state.clone(), Transition::skipped(reason));
        }

        let mut record = state.record_for(&profile.id);
        let mut flags = record.flags_for(date);
        if !flags.chest_unlocked {
            return (state.clone(), Transition::skipped(SkipReason::ChestLocked));
        }
        if flags.chest_opened {
            return (state.clone(), Transition::skipped(SkipReason::AlreadyDone));
        }

        let choices = chest_choices(&profile.id, date);
        let Some(picked) = choices.into_iter().find(|choice| choice.id == choice_id) else {
            return (state.clone(), Transition::skipped(SkipReason::UnknownChoice));
        };

        let mut awarded = 0;
        match &picked.prize {
            ChestPrize::Pin { pin_id } => record.inventory.add_pin(pin_id),
            ChestPrize::Sticker { sticker_id } => record.inventory.add_sticker(sticker_id),
            ChestPrize::Points { points } => {
                awarded = *points;
                record.xp += u64::from(*points);
            }
        }

        flags.chest_opened = true;
        flags.chest_choice_id = Some(picked.id);
        record.daily.insert(date, flags);

        let mut next_state = state.clone();
        next_state.gami.insert(profile.id.clone(), record);
        (
            next_state,
            Transition::Applied {
                points_awarded: awarded,
            },
        )
    }

    /// Record the family-reward choice for a milestone key. Overwrite
    /// semantics: re-claiming the same key replaces the stored choice so a
    /// parent can correct it. When the key resolves to a configured
    /// milestone, the option must belong to that milestone's category;
    /// unknown keys are accepted as the caller owns key construction.
    pub fn claim_family_reward(
        &self,
        state: &StateDocument,
        profile: &ChildProfile,
        milestone_key: &str,
        option_id: &str,
        option_label: &str,
        claimed_at: DateTime<Utc>,
        today: NaiveDate,
    ) -> (StateDocument, Transition) {
        if let Some(reason) = self.gate(profile, today) {
            return (state.clone(), Transition::skipped(reason));
        }
        if milestone_key.trim().is_empty() || option_id.trim().is_empty() {
            return (
                state.clone(),
                Transition::skipped(SkipReason::MissingIdentifier),
            );
        }

        if let Some(milestone) = family_milestone_for_key(milestone_key) {
            let known = family_options(milestone.category)
                .iter()
                .any(|option| option.id == option_id);
            if !known {
                return (state.clone(), Transition::skipped(SkipReason::UnknownChoice));
            }
        }

        let mut record = state.record_for(&profile.id);
        let label = if option_label.trim().is_empty() {
            option_id
        } else {
            option_label
        };
        record.family_claims.insert(
            milestone_key.to_string(),
            FamilyClaim {
                option_id: option_id.to_string(),
                option_label: label.to_string(),
                claimed_at,
            },
        );

        let mut next_state = state.clone();
        next_state.gami.insert(profile.id.clone(), record);
        (next_state, Transition::Applied { points_awarded: 0 })
    }
}
