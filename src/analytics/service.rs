use std::collections::HashSet;

use serde::Serialize;
use time::{Date, Duration, Weekday};

/// One bar of the five-day attendance chart, oldest day first.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DailyProgress {
    pub label: &'static str,
    pub percent: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AnalyticsSnapshot {
    pub active_users: usize,
    pub previous_active_users: usize,
    pub completion_rate: i64,
    pub momentum: i64,
    pub daily_progress: Vec<DailyProgress>,
}

fn percent(part: usize, whole: usize) -> i64 {
    if whole == 0 {
        0
    } else {
        ((part as f64 / whole as f64) * 100.0).round() as i64
    }
}

fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Monday => "Mon",
        Weekday::Tuesday => "Tue",
        Weekday::Wednesday => "Wed",
        Weekday::Thursday => "Thu",
        Weekday::Friday => "Fri",
        Weekday::Saturday => "Sat",
        Weekday::Sunday => "Sun",
    }
}

/// Derives the admin analytics from two trailing 7-day windows of check-ins
/// plus the recent submitters. `recent_checkins` covers days 0–6 before
/// `today`; `previous_checkins` covers days 0–13 and is filtered here to the
/// portion strictly before the current window, so boundary days are never
/// double counted.
pub fn compute(
    today: Date,
    total_profiles: usize,
    recent_checkins: &[(String, Date)],
    previous_checkins: &[(String, Date)],
    recent_submitters: &[String],
) -> AnalyticsSnapshot {
    let window_start = today - Duration::days(6);

    let active_users = recent_checkins
        .iter()
        .map(|(email, _)| email.as_str())
        .collect::<HashSet<_>>()
        .len();

    let previous_active_users = previous_checkins
        .iter()
        .filter(|(_, date)| *date < window_start)
        .map(|(email, _)| email.as_str())
        .collect::<HashSet<_>>()
        .len();

    let distinct_submitters = recent_submitters
        .iter()
        .map(String::as_str)
        .collect::<HashSet<_>>()
        .len();
    let completion_rate = percent(distinct_submitters, total_profiles);

    let momentum = if previous_active_users > 0 {
        let delta = active_users as f64 - previous_active_users as f64;
        // Halves round toward +infinity so a -12.5% dip reads as -12, not -13.
        ((delta / previous_active_users as f64) * 100.0 + 0.5).floor() as i64
    } else if active_users > 0 {
        100
    } else {
        0
    };

    let daily_progress = (0..5)
        .map(|index| {
            let day = today - Duration::days(4 - index);
            let count = recent_checkins
                .iter()
                .filter(|(_, date)| *date == day)
                .count();
            DailyProgress {
                label: weekday_label(day.weekday()),
                percent: percent(count, total_profiles),
            }
        })
        .collect();

    AnalyticsSnapshot {
        active_users,
        previous_active_users,
        completion_rate,
        momentum,
        daily_progress,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    const TODAY: Date = date!(2026 - 08 - 30);

    fn checkin(email: &str, days_ago: i64) -> (String, Date) {
        (email.to_string(), TODAY - Duration::days(days_ago))
    }

    #[test]
    fn completion_rate_is_zero_without_profiles() {
        let snap = compute(TODAY, 0, &[], &[], &["a@x.com".into()]);
        assert_eq!(snap.completion_rate, 0);
    }

    #[test]
    fn completion_rate_counts_distinct_submitters() {
        let submitters = vec![
            "a@x.com".to_string(),
            "b@x.com".to_string(),
            "a@x.com".to_string(),
        ];
        let snap = compute(TODAY, 4, &[], &[], &submitters);
        assert_eq!(snap.completion_rate, 50);
    }

    #[test]
    fn momentum_division_by_zero_policy() {
        // No previous actives, some current: 100.
        let recent = vec![checkin("a@x.com", 0), checkin("b@x.com", 1), checkin("c@x.com", 2)];
        let snap = compute(TODAY, 3, &recent, &recent, &[]);
        assert_eq!(snap.previous_active_users, 0);
        assert_eq!(snap.momentum, 100);

        // Nobody anywhere: 0.
        let snap = compute(TODAY, 3, &[], &[], &[]);
        assert_eq!(snap.momentum, 0);
    }

    #[test]
    fn momentum_week_over_week_growth() {
        let recent: Vec<_> = ["a", "b", "c", "d", "e", "f"]
            .iter()
            .map(|e| checkin(&format!("{e}@x.com"), 0))
            .collect();
        let previous: Vec<_> = ["a", "b", "c", "d"]
            .iter()
            .map(|e| checkin(&format!("{e}@x.com"), 8))
            .collect();
        let snap = compute(TODAY, 10, &recent, &previous, &[]);
        assert_eq!(snap.active_users, 6);
        assert_eq!(snap.previous_active_users, 4);
        assert_eq!(snap.momentum, 50);
    }

    #[test]
    fn momentum_negative_half_rounds_up() {
        // 7 actives down from 8 is -12.5%; halves go toward +infinity, so -12.
        let recent: Vec<_> = ["a", "b", "c", "d", "e", "f", "g"]
            .iter()
            .map(|e| checkin(&format!("{e}@x.com"), 0))
            .collect();
        let previous: Vec<_> = ["a", "b", "c", "d", "e", "f", "g", "h"]
            .iter()
            .map(|e| checkin(&format!("{e}@x.com"), 8))
            .collect();
        let snap = compute(TODAY, 10, &recent, &previous, &[]);
        assert_eq!(snap.active_users, 7);
        assert_eq!(snap.previous_active_users, 8);
        assert_eq!(snap.momentum, -12);
    }

    #[test]
    fn boundary_day_is_not_counted_as_previous() {
        // Day 6 is inside the current window; a previous-window scan that
        // includes it must not count it toward previousActiveUsers.
        let previous = vec![checkin("a@x.com", 6), checkin("b@x.com", 7)];
        let snap = compute(TODAY, 2, &[], &previous, &[]);
        assert_eq!(snap.previous_active_users, 1);
    }

    #[test]
    fn daily_progress_scenario() {
        // profiles = [A, B, C, D]; A and B checked in today, A yesterday.
        let recent = vec![
            checkin("a@x.com", 0),
            checkin("b@x.com", 0),
            checkin("a@x.com", 1),
        ];
        let snap = compute(TODAY, 4, &recent, &[], &[]);
        assert_eq!(snap.daily_progress.len(), 5);
        // Oldest first: day-4 .. day0.
        assert_eq!(snap.daily_progress[4].percent, 50);
        assert_eq!(snap.daily_progress[3].percent, 25);
        assert_eq!(snap.daily_progress[2].percent, 0);
    }

    #[test]
    fn daily_progress_labels_are_weekdays_oldest_first() {
        let snap = compute(TODAY, 1, &[], &[], &[]);
        // 2026-08-30 is a Sunday.
        let labels: Vec<_> = snap.daily_progress.iter().map(|d| d.label).collect();
        assert_eq!(labels, vec!["Wed", "Thu", "Fri", "Sat", "Sun"]);
    }

    #[test]
    fn percent_rounds_to_nearest() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 8), 13);
    }
}
