use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::debug;

use super::chest::{chest_choices, ChestChoice};
use super::domain::{
    ChildId, ChildProfile, DayLog, LevelInfo, ProgressionRecord, SkipReason, StateDocument,
    Transition,
};
use super::engine::{EngineConfig, ProgressionEngine};
use super::legacy::{LegacyEngine, LegacyRewards, LegacyTransition};
use super::migrate::normalize_document;
use super::repository::{StateStore, StoreError};

/// Facade composing the state store with both engines. Each call holds one
/// lock across load, transition, and save, matching the single-writer
/// contract of the state document.
pub struct ProgressionService<S> {
    store: Arc<S>,
    engine: ProgressionEngine,
    legacy: LegacyEngine,
    write_lock: Mutex<()>,
}

impl<S> ProgressionService<S>
where
    S: StateStore + 'static,
{
    pub fn new(store: Arc<S>, config: EngineConfig) -> Self {
        Self {
            store,
            engine: ProgressionEngine::new(config),
            legacy: LegacyEngine::new(),
            write_lock: Mutex::new(()),
        }
    }

    fn load_document(&self) -> Result<StateDocument, ProgressionServiceError> {
        let raw = self.store.load()?;
        Ok(raw
            .map(|value| normalize_document(&value))
            .unwrap_or_default())
    }

    /// Register or update a child profile. The engines never mutate
    /// profiles; this is the one write path the profile layer owns.
    pub fn upsert_child(&self, profile: ChildProfile) -> Result<(), ProgressionServiceError> {
        let _guard = self.write_lock.lock().expect("state mutex poisoned");
        let mut document = self.load_document()?;
        document.children.insert(profile.id.clone(), profile);
        self.store.save(&document)?;
        Ok(())
    }

    /// Read-only snapshot of a child's progression, including the chest
    /// state for `today`.
    pub fn progression(
        &self,
        child_id: &ChildId,
        today: NaiveDate,
    ) -> Result<ProgressionView, ProgressionServiceError> {
        let document = self.load_document()?;
        let record = document.record_for(child_id);
        Ok(ProgressionView::build(child_id.clone(), record, today))
    }

    pub fn legacy_rewards(
        &self,
        child_id: &ChildId,
    ) -> Result<LegacyRewards, ProgressionServiceError> {
        let document = self.load_document()?;
        Ok(document.legacy_for(child_id))
    }

    /// Apply a brushing-log edit. Both engines see the same event so the
    /// legacy ledger keeps accruing alongside the current one.
    pub fn log_brushing(
        &self,
        child_id: &ChildId,
        date: NaiveDate,
        log: DayLog,
        today: NaiveDate,
    ) -> Result<TransitionView, ProgressionServiceError> {
        let _guard = self.write_lock.lock().expect("state mutex poisoned");
        let document = self.load_document()?;
        let Some(profile) = document.children.get(child_id).cloned() else {
            return Ok(TransitionView::skipped(child_id.clone(), &document, today));
        };

        let (document, _legacy) = self
            .legacy
            .apply_log_transition(&document, &profile, date, log, today);
        let (document, outcome) = self
            .engine
            .apply_log_transition(&document, &profile, date, log, today);

        self.save_and_view(document, child_id, outcome, today)
    }

    pub fn timer_complete(
        &self,
        child_id: &ChildId,
        date: NaiveDate,
        seconds: u32,
        target_seconds: Option<u32>,
        today: NaiveDate,
    ) -> Result<TransitionView, ProgressionServiceError> {
        let _guard = self.write_lock.lock().expect("state mutex poisoned");
        let document = self.load_document()?;
        let Some(profile) = document.children.get(child_id).cloned() else {
            return Ok(TransitionView::skipped(child_id.clone(), &document, today));
        };

        let (document, outcome) = self.engine.apply_timer_complete(
            &document, &profile, date, seconds, target_seconds, today,
        );
        self.save_and_view(document, child_id, outcome, today)
    }

    pub fn open_chest(
        &self,
        child_id: &ChildId,
        date: NaiveDate,
        choice_id: &str,
        today: NaiveDate,
    ) -> Result<TransitionView, ProgressionServiceError> {
        let _guard = self.write_lock.lock().expect("state mutex poisoned");
        let document = self.load_document()?;
        let Some(profile) = document.children.get(child_id).cloned() else {
            return Ok(TransitionView::skipped(child_id.clone(), &document, today));
        };

        let (document, outcome) = self
            .engine
            .open_chest(&document, &profile, date, choice_id, today);
        self.save_and_view(document, child_id, outcome, today)
    }

    pub fn claim_family_reward(
        &self,
        child_id: &ChildId,
        milestone_key: &str,
        option_id: &str,
        option_label: &str,
        today: NaiveDate,
    ) -> Result<TransitionView, ProgressionServiceError> {
        let _guard = self.write_lock.lock().expect("state mutex poisoned");
        let document = self.load_document()?;
        let Some(profile) = document.children.get(child_id).cloned() else {
            return Ok(TransitionView::skipped(child_id.clone(), &document, today));
        };

        let (document, outcome) = self.engine.claim_family_reward(
            &document,
            &profile,
            milestone_key,
            option_id,
            option_label,
            Utc::now(),
            today,
        );
        self.save_and_view(document, child_id, outcome, today)
    }

    pub fn redeem_shop_item(
        &self,
        child_id: &ChildId,
        item_id: &str,
        today: NaiveDate,
    ) -> Result<LegacyTransitionView, ProgressionServiceError> {
        let _guard = self.write_lock.lock().expect("state mutex poisoned");
        let document = self.load_document()?;
        let Some(profile) = document.children.get(child_id).cloned() else {
            return Ok(LegacyTransitionView {
                child_id: child_id.clone(),
                outcome: LegacyTransition::skipped(SkipReason::MissingIdentifier),
                rewards: document.legacy_for(child_id),
            });
        };

        let (document, outcome) =
            self.legacy
                .redeem_shop_item(&document, &profile, item_id, Utc::now(), today);
        if outcome.is_applied() {
            self.store.save(&document)?;
        } else {
            debug!(child = %child_id.0, item = item_id, "shop redemption skipped");
        }

        Ok(LegacyTransitionView {
            child_id: child_id.clone(),
            rewards: document.legacy_for(child_id),
            outcome,
        })
    }

    fn save_and_view(
        &self,
        document: StateDocument,
        child_id: &ChildId,
        outcome: Transition,
        today: NaiveDate,
    ) -> Result<TransitionView, ProgressionServiceError> {
        if outcome.is_applied() {
            self.store.save(&document)?;
        } else {
            debug!(child = %child_id.0, ?outcome, "transition skipped");
        }

        let record = document.record_for(child_id);
        Ok(TransitionView {
            child_id: child_id.clone(),
            outcome,
            progression: ProgressionView::build(child_id.clone(), record, today),
        })
    }
}

/// Error raised by the service facade; engine-level skips are not errors.
#[derive(Debug, thiserror::Error)]
pub enum ProgressionServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Read model for a child's progression, shaped for API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionView {
    pub child_id: ChildId,
    pub level: LevelInfo,
    pub record: ProgressionRecord,
    pub chest: ChestStatusView,
}

impl ProgressionView {
    pub fn build(child_id: ChildId, record: ProgressionRecord, today: NaiveDate) -> Self {
        let flags = record.flags_for(today);
        let chest = ChestStatusView {
            date: today,
            unlocked: flags.chest_unlocked,
            opened: flags.chest_opened,
            choice_id: flags.chest_choice_id,
            choices: chest_choices(&child_id, today),
        };
        Self {
            level: record.level_info(),
            child_id,
            record,
            chest,
        }
    }
}

/// Today's chest, with the (regenerated, deterministic) option set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChestStatusView {
    pub date: NaiveDate,
    pub unlocked: bool,
    pub opened: bool,
    pub choice_id: Option<String>,
    pub choices: Vec<ChestChoice>,
}

/// Result of one mutation: the outcome plus the post-transition snapshot.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionView {
    pub child_id: ChildId,
    #[serde(flatten)]
    pub outcome: Transition,
    pub progression: ProgressionView,
}

impl TransitionView {
    fn skipped(child_id: ChildId, document: &StateDocument, today: NaiveDate) -> Self {
        let record = document.record_for(&child_id);
        Self {
            child_id: child_id.clone(),
            outcome: Transition::skipped(SkipReason::MissingIdentifier),
            progression: ProgressionView::build(child_id, record, today),
        }
    }
}

/// Result of a legacy-shop mutation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyTransitionView {
    pub child_id: ChildId,
    #[serde(flatten)]
    pub outcome: LegacyTransition,
    pub rewards: LegacyRewards,
}
