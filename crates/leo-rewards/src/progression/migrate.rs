//! One-shot normalization of the raw persisted document. Historical state
//! was written by a duck-typed client over several schema generations, so
//! everything here is tolerant: unknown shapes coerce to safe defaults and
//! the engines only ever see the normalized `StateDocument`.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde_json::Value;

use super::calendar::parse_date_key;
use super::domain::{
    ChildId, ChildProfile, DailyFlags, FamilyClaim, Inventory, League, ProgressionRecord,
    StateDocument,
};
use super::legacy::{LegacyDayFlags, LegacyRewards, Redemption};

/// Spellings of the date-of-birth field: the current `dateOfBirth` (what
/// [`ChildProfile`] serializes under) first, then the historical ones.
const DOB_FIELDS: &[&str] = &[
    "dateOfBirth",
    "dob",
    "birthDate",
    "birthdate",
    "birth_date",
    "birthDateISO",
];

pub fn normalize_document(raw: &Value) -> StateDocument {
    let mut document = StateDocument::default();

    match raw.get("children") {
        // Current shape: map keyed by child id.
        Some(Value::Object(children)) => {
            for (id, child) in children {
                let child_id = ChildId::new(id.clone());
                document
                    .children
                    .insert(child_id.clone(), normalize_child(child_id, child));
            }
        }
        // Oldest shape: array of child objects carrying their own id.
        Some(Value::Array(children)) => {
            for child in children {
                if let Some(id) = child.get("id").and_then(Value::as_str) {
                    let child_id = ChildId::new(id);
                    document
                        .children
                        .insert(child_id.clone(), normalize_child(child_id, child));
                }
            }
        }
        _ => {}
    }

    if let Some(Value::Object(records)) = raw.get("gami") {
        for (id, record) in records {
            document
                .gami
                .insert(ChildId::new(id.clone()), normalize_record(record));
        }
    }

    if let Some(Value::Object(records)) = raw.get("rewards") {
        for (id, record) in records {
            document
                .rewards
                .insert(ChildId::new(id.clone()), normalize_legacy(record));
        }
    }

    document
}

pub fn normalize_child(id: ChildId, raw: &Value) -> ChildProfile {
    let date_of_birth = DOB_FIELDS
        .iter()
        .filter_map(|field| raw.get(*field))
        .filter_map(Value::as_str)
        .find_map(parse_dob);

    ChildProfile { id, date_of_birth }
}

/// Accept `YYYY-MM-DD` or a full ISO-8601 timestamp.
fn parse_dob(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Some(date) = parse_date_key(trimmed) {
        return Some(date);
    }
    trimmed
        .get(..10)
        .and_then(parse_date_key)
        .filter(|_| trimmed.as_bytes().get(10) == Some(&b'T'))
}

pub fn normalize_record(raw: &Value) -> ProgressionRecord {
    let mut record = ProgressionRecord {
        xp: coerce_u64(raw.get("xp")),
        completed_days: coerce_day_set(raw.get("completedDays")),
        streak: coerce_u64(raw.get("streak")) as u32,
        league: coerce_league(raw.get("league")),
        ..ProgressionRecord::default()
    };

    if let Some(Value::Object(daily)) = raw.get("daily") {
        for (key, flags) in daily {
            // Non-object daily entries are corrupt; drop them.
            let (Some(date), Value::Object(_)) = (parse_date_key(key), flags) else {
                continue;
            };
            record.daily.insert(
                date,
                DailyFlags {
                    am_awarded: is_truthy(flags.get("amAwarded")),
                    pm_awarded: is_truthy(flags.get("pmAwarded")),
                    day_awarded: is_truthy(flags.get("dayAwarded")),
                    timer_done: is_truthy(flags.get("timerDone")),
                    timer_seconds: coerce_u64(flags.get("timerSeconds")) as u32,
                    chest_unlocked: is_truthy(flags.get("chestUnlocked")),
                    chest_opened: is_truthy(flags.get("chestOpened")),
                    chest_choice_id: flags
                        .get("chestChoiceId")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                },
            );
        }
    }

    if let Some(inventory) = raw.get("inventory") {
        record.inventory = Inventory {
            pins: coerce_string_list(inventory.get("pins")),
            stickers: coerce_string_list(inventory.get("stickers")),
        };
    }

    if let Some(Value::Object(claims)) = raw.get("familyClaims") {
        for (key, claim) in claims {
            let option_id = claim
                .get("optionId")
                .and_then(Value::as_str)
                .unwrap_or_default();
            if option_id.is_empty() {
                continue;
            }
            // Older clients wrote the timestamp under `claimedAtISO`.
            let claimed_at = ["claimedAt", "claimedAtISO"]
                .iter()
                .filter_map(|field| claim.get(*field))
                .filter_map(Value::as_str)
                .find_map(|value| value.parse().ok());
            let Some(claimed_at) = claimed_at else {
                continue;
            };
            record.family_claims.insert(
                key.clone(),
                FamilyClaim {
                    option_id: option_id.to_string(),
                    option_label: claim
                        .get("optionLabel")
                        .and_then(Value::as_str)
                        .unwrap_or(option_id)
                        .to_string(),
                    claimed_at,
                },
            );
        }
    }

    record
}

pub fn normalize_legacy(raw: &Value) -> LegacyRewards {
    let mut record = LegacyRewards {
        tokens: coerce_u64(raw.get("tokens")) as u32,
        badges: coerce_string_list(raw.get("badges")),
        unlocked: coerce_string_list(raw.get("unlocked")),
        streak: coerce_u64(raw.get("streak")) as u32,
        completed_days: coerce_day_set(raw.get("completedDays")),
        ..LegacyRewards::default()
    };

    if let Some(Value::Object(awarded)) = raw.get("awarded") {
        for (key, flags) in awarded {
            let (Some(date), Value::Object(_)) = (parse_date_key(key), flags) else {
                continue;
            };
            record.awarded.insert(
                date,
                LegacyDayFlags {
                    am: is_truthy(flags.get("am")),
                    pm: is_truthy(flags.get("pm")),
                    day: is_truthy(flags.get("day")),
                },
            );
        }
    }

    // Historically keyed by stringified streak length with a boolean value.
    if let Some(Value::Object(milestones)) = raw.get("milestonesAwarded") {
        for (key, value) in milestones {
            if let (Ok(days), true) = (key.parse::<u32>(), is_truthy(Some(value))) {
                record.milestones_awarded.insert(days);
            }
        }
    }

    if let Some(Value::Array(redemptions)) = raw.get("redemptions") {
        for entry in redemptions {
            let Some(date) = entry
                .get("date")
                .and_then(Value::as_str)
                .and_then(|value| value.parse().ok())
            else {
                continue;
            };
            record.redemptions.push(Redemption {
                id: entry
                    .get("id")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                date,
                item_id: entry
                    .get("itemId")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                title: entry
                    .get("title")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                cost: coerce_u64(entry.get("cost")) as u32,
            });
        }
    }

    record
}

/// Non-negative integer from a number, a numeric string, or garbage (0).
fn coerce_u64(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(number)) => number
            .as_u64()
            .or_else(|| number.as_f64().map(|f| f.max(0.0) as u64))
            .unwrap_or(0),
        Some(Value::String(text)) => text.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// JS-style truthiness for flag fields written by older clients.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(text)) => !text.is_empty(),
        _ => false,
    }
}

fn coerce_day_set(value: Option<&Value>) -> BTreeSet<NaiveDate> {
    let Some(Value::Object(days)) = value else {
        return BTreeSet::new();
    };
    days.iter()
        .filter(|(_, complete)| is_truthy(Some(complete)))
        .filter_map(|(key, _)| parse_date_key(key))
        .collect()
}

fn coerce_string_list(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

fn coerce_league(value: Option<&Value>) -> League {
    let Some(name) = value.and_then(Value::as_str) else {
        return League::Bronze;
    };
    // Pre-redesign clients persisted the French tier names.
    match name.trim().to_ascii_lowercase().as_str() {
        "gold" | "or" => League::Gold,
        "silver" | "argent" => League::Silver,
        _ => League::Bronze,
    }
}
