//! Static reward configuration: badge/pin catalog, chest pools, the legacy
//! shop, streak milestones, and family milestone definitions. Everything in
//! this module is data; the engines own the rules that consume it.

use serde::Serialize;

/// Points required to advance one level.
pub const LEVEL_POINTS: u64 = 1000;

/// Intra-level milestone thresholds shown on the progression track.
pub const LEVEL_MILESTONES: &[u32] = &[200, 400, 600, 800, 1000];

/// Cosmetic pin metadata. Chest and shop grants reference these ids; the
/// label is display-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub id: &'static str,
    pub label: &'static str,
}

const BADGES: &[Badge] = &[
    Badge { id: "pin_gem", label: "Gem" },
    Badge { id: "pin_planet", label: "Planet" },
    Badge { id: "pin_star", label: "Star" },
    Badge { id: "pin_rocket", label: "Rocket" },
    Badge { id: "pin_shield", label: "Shield" },
    Badge { id: "pin_crown", label: "Crown" },
];

pub fn badge_label(id: &str) -> Option<&'static str> {
    BADGES
        .iter()
        .find(|badge| badge.id == id)
        .map(|badge| badge.label)
}

const PIN_POOL: &[&str] = &[
    "pin_gem",
    "pin_planet",
    "pin_star",
    "pin_rocket",
    "pin_shield",
    "pin_crown",
];

/// Pins eligible for chest/shop draws; pool entries without catalog metadata
/// are skipped so the UI can always render what was granted.
pub fn pin_pool() -> Vec<&'static str> {
    PIN_POOL
        .iter()
        .copied()
        .filter(|id| badge_label(id).is_some())
        .collect()
}

pub const STICKER_POOL: &[&str] = &[
    "st_cosmo_01",
    "st_cosmo_02",
    "st_cosmo_03",
    "st_lab_01",
    "st_lab_02",
    "st_neo_01",
];

/// Legacy shop tier redeemed with tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShopItem {
    pub id: &'static str,
    pub cost: u32,
    pub title: &'static str,
    pub subtitle: &'static str,
    /// The entry tier also hands out one cosmetic pin.
    pub grants_pin: bool,
}

pub const SHOP_ITEMS: &[ShopItem] = &[
    ShopItem {
        id: "item_5",
        cost: 5,
        title: "Badge / small item",
        subtitle: "Unlocks a badge or a small avatar item",
        grants_pin: true,
    },
    ShopItem {
        id: "power_15",
        cost: 15,
        title: "Power reward",
        subtitle: "Pick an activity, a story, or a small privilege",
        grants_pin: false,
    },
    ShopItem {
        id: "family_50",
        cost: 50,
        title: "Family reward",
        subtitle: "Movie night, outing... decided together",
        grants_pin: false,
    },
];

pub fn shop_item(id: &str) -> Option<&'static ShopItem> {
    SHOP_ITEMS.iter().find(|item| item.id == id)
}

/// Legacy streak milestone: bonus tokens plus a named badge, granted once
/// ever per streak length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakMilestone {
    pub days: u32,
    pub bonus_tokens: u32,
    pub badge: &'static str,
}

pub const STREAK_MILESTONES: &[StreakMilestone] = &[
    StreakMilestone { days: 3, bonus_tokens: 2, badge: "3-day streak" },
    StreakMilestone { days: 7, bonus_tokens: 5, badge: "7-day streak" },
    StreakMilestone { days: 14, bonus_tokens: 10, badge: "14-day streak" },
];

pub fn streak_milestone(days: u32) -> Option<&'static StreakMilestone> {
    STREAK_MILESTONES
        .iter()
        .find(|milestone| milestone.days == days)
}

/// Category of parent-curated options attached to a family milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FamilyCategory {
    Story,
    Snack,
    Activity,
}

/// Family milestone re-offered every level at a fixed intra-level threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FamilyMilestone {
    pub id: &'static str,
    pub at: u32,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub category: FamilyCategory,
}

pub const FAMILY_MILESTONES: &[FamilyMilestone] = &[
    FamilyMilestone {
        id: "family_story",
        at: 400,
        title: "Pick the bedtime story",
        subtitle: "The parent approves a list. The child picks.",
        category: FamilyCategory::Story,
    },
    FamilyMilestone {
        id: "family_snack",
        at: 600,
        title: "Pick the dessert / snack",
        subtitle: "Only from an approved list.",
        category: FamilyCategory::Snack,
    },
    FamilyMilestone {
        id: "family_activity",
        at: 800,
        title: "Pick an activity",
        subtitle: "Board game, building blocks, 10 min cartoon...",
        category: FamilyCategory::Activity,
    },
];

/// Parent-approved option inside a family category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FamilyOption {
    pub id: &'static str,
    pub label: &'static str,
}

const STORY_OPTIONS: &[FamilyOption] = &[
    FamilyOption { id: "story_1", label: "Pick a book (at home)" },
    FamilyOption { id: "story_2", label: "Pick the short story" },
    FamilyOption { id: "story_3", label: "Pick the long story" },
];

const SNACK_OPTIONS: &[FamilyOption] = &[
    FamilyOption { id: "snack_1", label: "Dessert (approved list)" },
    FamilyOption { id: "snack_2", label: "Snack (approved list)" },
    FamilyOption { id: "snack_3", label: "Fruit + one extra" },
];

const ACTIVITY_OPTIONS: &[FamilyOption] = &[
    FamilyOption { id: "act_1", label: "10 min cartoon" },
    FamilyOption { id: "act_2", label: "Building blocks" },
    FamilyOption { id: "act_3", label: "Board game" },
    FamilyOption { id: "act_4", label: "Drawing (10-15 min)" },
];

pub fn family_options(category: FamilyCategory) -> &'static [FamilyOption] {
    match category {
        FamilyCategory::Story => STORY_OPTIONS,
        FamilyCategory::Snack => SNACK_OPTIONS,
        FamilyCategory::Activity => ACTIVITY_OPTIONS,
    }
}

/// Resolve a claim key of the form `{milestoneId}_l{level}` back to its
/// milestone definition. Milestones re-trigger every level, so the level
/// suffix is part of the key but not of the definition.
pub fn family_milestone_for_key(key: &str) -> Option<&'static FamilyMilestone> {
    let (base, level) = key.rsplit_once("_l")?;
    if level.is_empty() || !level.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    FAMILY_MILESTONES
        .iter()
        .find(|milestone| milestone.id == base)
}
