use std::collections::HashSet;

use serde::Serialize;
use time::Date;

pub const BADGE_MILESTONES: [u32; 4] = [10, 20, 30, 40];

/// Count of consecutive check-in days ending at `today`. The walk starts at
/// today, so a run that ended yesterday scores zero. Duplicate dates are
/// harmless; the set dedupes them.
pub fn streak_days(dates: &[Date], today: Date) -> u32 {
    let unique: HashSet<Date> = dates.iter().copied().collect();
    let mut streak = 0;
    let mut cursor = today;
    while unique.contains(&cursor) {
        streak += 1;
        match cursor.previous_day() {
            Some(prev) => cursor = prev,
            None => break,
        }
    }
    streak
}

/// Milestone badge, derived from the streak on every read, never persisted.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Badge {
    pub milestone: u32,
    pub earned: bool,
}

pub fn badges(streak: u32) -> Vec<Badge> {
    BADGE_MILESTONES
        .iter()
        .map(|&milestone| Badge {
            milestone,
            earned: streak >= milestone,
        })
        .collect()
}
