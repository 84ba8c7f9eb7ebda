//! Deterministic daily chest. "Random" contents are a hard lie here: the
//! three choices are a pure function of child id + date + purpose salt, so
//! a reload before the chest is opened always shows the same options
//! without persisting the choice set. The child picks one of three known
//! options, never a gambling-style lootbox.

use chrono::NaiveDate;
use serde::Serialize;

use super::calendar::date_key;
use super::catalog::{badge_label, pin_pool, STICKER_POOL};
use super::domain::ChildId;

/// 32-bit FNV-1a. Only determinism and spread matter; the exact algorithm
/// is not a state-compatibility requirement.
pub(crate) fn hash_string(input: &str) -> u32 {
    let mut hash: u32 = 2166136261;
    for byte in input.bytes() {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(16777619);
    }
    hash
}

/// Minimal linear-congruential step seeded from the stable hash.
pub(crate) struct Lcg(pub(crate) u32);

impl Lcg {
    pub(crate) fn next(&mut self) -> u32 {
        self.0 = self.0.wrapping_mul(1664525).wrapping_add(1013904223);
        self.0
    }
}

pub(crate) fn pick_one<'a>(pool: &[&'a str], seed: u32) -> Option<&'a str> {
    if pool.is_empty() {
        return None;
    }
    let mut lcg = Lcg(seed);
    Some(pool[lcg.next() as usize % pool.len()])
}

/// What a chest option grants when picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChestPrize {
    #[serde(rename_all = "camelCase")]
    Pin { pin_id: String },
    #[serde(rename_all = "camelCase")]
    Sticker { sticker_id: String },
    Points { points: u32 },
}

/// One of the three options offered by a day's chest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChestChoice {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    #[serde(flatten)]
    pub prize: ChestPrize,
}

/// The fixed option kinds: one pin, one sticker, one bounded points bundle
/// (20/30/40). Byte-identical across calls for the same child and date.
pub fn chest_choices(child_id: &ChildId, date: NaiveDate) -> Vec<ChestChoice> {
    let seed = hash_string(&format!("{}:{}:chest", child_id.0, date_key(date)));
    let mut choices = Vec::with_capacity(3);

    let pins = pin_pool();
    if let Some(pin) = pick_one(&pins, seed) {
        choices.push(ChestChoice {
            id: format!("pin:{pin}"),
            title: "New pin".to_string(),
            subtitle: badge_label(pin).unwrap_or("Pin").to_string(),
            prize: ChestPrize::Pin {
                pin_id: pin.to_string(),
            },
        });
    }

    if let Some(sticker) = pick_one(STICKER_POOL, seed ^ 0x9e37_79b9) {
        choices.push(ChestChoice {
            id: format!("sticker:{sticker}"),
            title: "Sticker".to_string(),
            subtitle: "For the collection".to_string(),
            prize: ChestPrize::Sticker {
                sticker_id: sticker.to_string(),
            },
        });
    }

    let points = 20 + (seed % 3) * 10;
    choices.push(ChestChoice {
        id: format!("points:{points}"),
        title: "+Points".to_string(),
        subtitle: format!("{points} points"),
        prize: ChestPrize::Points { points },
    });

    choices
}
