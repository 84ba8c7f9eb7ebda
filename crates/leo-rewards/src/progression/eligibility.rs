use chrono::{Datelike, NaiveDate};

use super::domain::ChildProfile;

/// Inclusive lower bound of the eligible band: 3 years.
pub const MIN_ELIGIBLE_MONTHS: u32 = 36;

/// Exclusive upper bound of the eligible band: 12 years.
pub const MAX_ELIGIBLE_MONTHS: u32 = 144;

/// Age in whole months, adjusted down when the day of month has not been
/// reached yet. `None` when the date of birth is missing.
pub fn age_in_months(date_of_birth: Option<NaiveDate>, today: NaiveDate) -> Option<u32> {
    let dob = date_of_birth?;
    let mut months = (today.year() - dob.year()) * 12 + (today.month() as i32 - dob.month() as i32);
    if today.day() < dob.day() {
        months -= 1;
    }
    Some(months.max(0) as u32)
}

/// Age gate shared by both reward engines. A child outside the band, or
/// with no parseable date of birth, is silently excluded from every
/// progression mutation.
pub fn is_eligible(profile: &ChildProfile, today: NaiveDate) -> bool {
    match age_in_months(profile.date_of_birth, today) {
        Some(months) => (MIN_ELIGIBLE_MONTHS..MAX_ELIGIBLE_MONTHS).contains(&months),
        None => false,
    }
}
