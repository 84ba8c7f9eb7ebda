//! Brushing progression and rewards.
//!
//! Two engines live here and share only the eligibility gate and the badge
//! catalog: the current points/level engine (`engine`) and the legacy
//! token/shop engine (`legacy`) retained so older persisted state stays
//! readable. Both operate as pure transitions over one state document:
//! snapshot in, snapshot out, with silent no-ops for expected edge cases.

pub mod calendar;
pub mod catalog;
pub(crate) mod chest;
pub mod domain;
pub mod eligibility;
pub mod engine;
pub mod legacy;
pub mod migrate;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use calendar::{compute_league, compute_streak, date_key, parse_date_key};
pub use chest::{chest_choices, ChestChoice, ChestPrize};
pub use domain::{
    ChildId, ChildProfile, DailyFlags, DayLog, FamilyClaim, Inventory, League, LevelInfo,
    ProgressionRecord, SkipReason, StateDocument, Transition,
};
pub use eligibility::is_eligible;
pub use engine::{EngineConfig, ProgressionEngine};
pub use legacy::{LegacyEngine, LegacyRewards, LegacyTransition, Redemption};
pub use migrate::normalize_document;
pub use repository::{StateStore, StoreError};
pub use router::progression_router;
pub use service::{
    ChestStatusView, LegacyTransitionView, ProgressionService, ProgressionServiceError,
    ProgressionView, TransitionView,
};
