use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::LEVEL_POINTS;
use super::legacy::LegacyRewards;

/// Identifier wrapper for child profiles.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ChildId(pub String);

impl ChildId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub(crate) fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

/// The slice of a child profile the engine is allowed to see: identity and
/// the date of birth used for eligibility banding. Owned by the profile
/// layer; never mutated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildProfile {
    pub id: ChildId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
}

/// One logged day: two independent brushing slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayLog {
    #[serde(default)]
    pub am: bool,
    #[serde(default)]
    pub pm: bool,
}

impl DayLog {
    pub fn is_complete(self) -> bool {
        self.am && self.pm
    }
}

/// 14-day regularity tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum League {
    #[default]
    Bronze,
    Silver,
    Gold,
}

impl League {
    pub const fn label(self) -> &'static str {
        match self {
            League::Bronze => "bronze",
            League::Silver => "silver",
            League::Gold => "gold",
        }
    }
}

/// Per-day one-time gates. Award flags are sticky: unchecking a slot never
/// clears them, so points already granted are not clawed back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyFlags {
    pub am_awarded: bool,
    pub pm_awarded: bool,
    pub day_awarded: bool,
    pub timer_done: bool,
    pub timer_seconds: u32,
    pub chest_unlocked: bool,
    pub chest_opened: bool,
    pub chest_choice_id: Option<String>,
}

/// Collected cosmetics. Unique, append-only, insertion order preserved so
/// the UI can show the most recent grants first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Inventory {
    pub pins: Vec<String>,
    pub stickers: Vec<String>,
}

impl Inventory {
    pub fn add_pin(&mut self, pin_id: &str) {
        uniq_push(&mut self.pins, pin_id);
    }

    pub fn add_sticker(&mut self, sticker_id: &str) {
        uniq_push(&mut self.stickers, sticker_id);
    }
}

pub(crate) fn uniq_push(items: &mut Vec<String>, value: &str) {
    if !items.iter().any(|existing| existing == value) {
        items.push(value.to_string());
    }
}

/// Recorded child choice for a family milestone at a given level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyClaim {
    pub option_id: String,
    pub option_label: String,
    pub claimed_at: DateTime<Utc>,
}

/// Per-child progression ledger for the current points/level engine.
///
/// `streak` and `league` are derived caches: both are recomputed from
/// `completed_days` on every transition and never treated as sources of
/// truth. Level is not stored at all; see [`LevelInfo::from_points`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressionRecord {
    /// Total accumulated points. Kept under the historical `xp` name for
    /// state compatibility; the UI calls these "points".
    pub xp: u64,
    #[serde(with = "completed_days_map")]
    pub completed_days: BTreeSet<NaiveDate>,
    pub streak: u32,
    pub league: League,
    pub daily: BTreeMap<NaiveDate, DailyFlags>,
    pub inventory: Inventory,
    pub family_claims: BTreeMap<String, FamilyClaim>,
}

impl ProgressionRecord {
    pub fn flags_for(&self, date: NaiveDate) -> DailyFlags {
        self.daily.get(&date).cloned().unwrap_or_default()
    }

    pub fn level_info(&self) -> LevelInfo {
        LevelInfo::from_points(self.xp)
    }
}

/// Level curve: one level per 1000 points, pure function of the total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelInfo {
    pub level: u32,
    pub cur_in_level: u32,
    pub next_cost: u32,
    pub pct: f32,
}

impl LevelInfo {
    pub fn from_points(points: u64) -> Self {
        let level = (points / LEVEL_POINTS + 1) as u32;
        let cur_in_level = (points % LEVEL_POINTS) as u32;
        let next_cost = LEVEL_POINTS as u32;
        Self {
            level,
            cur_in_level,
            next_cost,
            pct: cur_in_level as f32 / next_cost as f32,
        }
    }
}

/// The whole persisted application snapshot the engines read and rewrite.
/// `gami` (current engine) and `rewards` (legacy token engine) are parallel
/// ledgers that are never merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateDocument {
    pub children: BTreeMap<ChildId, ChildProfile>,
    pub gami: BTreeMap<ChildId, ProgressionRecord>,
    pub rewards: BTreeMap<ChildId, LegacyRewards>,
}

impl StateDocument {
    /// Lazily-defaulted lookup: a child without a record gets an empty one.
    pub fn record_for(&self, child_id: &ChildId) -> ProgressionRecord {
        self.gami.get(child_id).cloned().unwrap_or_default()
    }

    pub fn legacy_for(&self, child_id: &ChildId) -> LegacyRewards {
        self.rewards.get(child_id).cloned().unwrap_or_default()
    }
}

/// Outcome of a transition. Expected edge cases surface as `Skipped` with a
/// reason instead of an error; callers treat both arms as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Transition {
    Applied { points_awarded: u32 },
    Skipped { reason: SkipReason },
}

impl Transition {
    pub fn skipped(reason: SkipReason) -> Self {
        Self::Skipped { reason }
    }

    pub fn points_awarded(self) -> u32 {
        match self {
            Transition::Applied { points_awarded } => points_awarded,
            Transition::Skipped { .. } => 0,
        }
    }

    pub fn is_applied(self) -> bool {
        matches!(self, Transition::Applied { .. })
    }
}

/// Why a transition left the state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingIdentifier,
    Ineligible,
    AlreadyDone,
    ChestLocked,
    UnknownChoice,
    InsufficientTokens,
    UnknownItem,
}

impl SkipReason {
    pub const fn label(self) -> &'static str {
        match self {
            SkipReason::MissingIdentifier => "missing_identifier",
            SkipReason::Ineligible => "ineligible",
            SkipReason::AlreadyDone => "already_done",
            SkipReason::ChestLocked => "chest_locked",
            SkipReason::UnknownChoice => "unknown_choice",
            SkipReason::InsufficientTokens => "insufficient_tokens",
            SkipReason::UnknownItem => "unknown_item",
        }
    }
}

/// Serialize `completed_days` in the historical `{ "YYYY-MM-DD": true }`
/// shape; falsy or unparseable entries are dropped on read.
pub(crate) mod completed_days_map {
    use std::collections::{BTreeMap, BTreeSet};

    use chrono::NaiveDate;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::progression::calendar::{date_key, parse_date_key};

    pub fn serialize<S>(days: &BTreeSet<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(days.len()))?;
        for day in days {
            map.serialize_entry(&date_key(*day), &true)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeSet<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, bool>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .filter(|(_, complete)| *complete)
            .filter_map(|(key, _)| parse_date_key(&key))
            .collect())
    }
}
