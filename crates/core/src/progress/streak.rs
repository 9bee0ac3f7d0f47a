use std::collections::BTreeSet;

use crate::model::EntryDay;

/// Length of the unbroken run of active days ending at `today`.
///
/// The walk starts at `today` and steps back one calendar day at a time,
/// stopping at the first day missing from `days`. A run that ended yesterday
/// counts as zero: the streak measures practice that is still going.
#[must_use]
pub fn current_streak(days: &BTreeSet<EntryDay>, today: EntryDay) -> u32 {
    let mut streak = 0_u32;
    let mut cursor = Some(today);
    while let Some(day) = cursor {
        if !days.contains(&day) {
            break;
        }
        streak = streak.saturating_add(1);
        cursor = day.pred();
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::test_support::day;

    fn set(days: &[&str]) -> BTreeSet<EntryDay> {
        days.iter().map(|d| day(d)).collect()
    }

    #[test]
    fn no_days_means_no_streak() {
        assert_eq!(current_streak(&BTreeSet::new(), day("2024-01-03")), 0);
    }

    #[test]
    fn today_alone_counts_one() {
        assert_eq!(current_streak(&set(&["2024-01-03"]), day("2024-01-03")), 1);
    }

    #[test]
    fn consecutive_run_ending_today() {
        let days = set(&["2024-01-01", "2024-01-02", "2024-01-03"]);
        assert_eq!(current_streak(&days, day("2024-01-03")), 3);
    }

    #[test]
    fn missing_today_breaks_immediately() {
        let days = set(&["2024-01-01", "2024-01-02"]);
        assert_eq!(current_streak(&days, day("2024-01-03")), 0);
    }

    #[test]
    fn days_past_a_gap_are_ignored() {
        let days = set(&["2024-01-01", "2024-01-03"]);
        assert_eq!(current_streak(&days, day("2024-01-03")), 1);
    }

    #[test]
    fn future_days_do_not_extend_the_run() {
        let days = set(&["2024-01-03", "2024-01-04", "2024-01-05"]);
        assert_eq!(current_streak(&days, day("2024-01-03")), 1);
    }

    #[test]
    fn run_spans_month_and_leap_day() {
        let days = set(&["2024-02-28", "2024-02-29", "2024-03-01", "2024-03-02"]);
        assert_eq!(current_streak(&days, day("2024-03-02")), 4);
    }

    #[test]
    fn stops_at_earliest_representable_day() {
        let first = EntryDay::new(chrono::NaiveDate::MIN);
        let second = first.succ().unwrap();
        let days: BTreeSet<_> = [first, second].into_iter().collect();
        assert_eq!(current_streak(&days, second), 2);
    }
}
