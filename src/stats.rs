use chrono::NaiveDate;

use crate::models::{AggregateStats, ProgressRecord};

pub const PLAN_DAYS: u32 = 365;

/// Length of the run of consecutive days ending at the latest completed date.
pub fn calculate_streak(dates: &[&str]) -> u32 {
    let mut days: Vec<NaiveDate> = dates
        .iter()
        .filter_map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .collect();
    days.sort_unstable();
    days.dedup();

    let Some(mut current) = days.pop() else {
        return 0;
    };

    let mut streak = 1;
    while let Some(prev) = days.pop() {
        if current.pred_opt() != Some(prev) {
            break;
        }
        streak += 1;
        current = prev;
    }
    streak
}

pub fn aggregate(records: &[ProgressRecord]) -> AggregateStats {
    let dates: Vec<&str> = records
        .iter()
        .filter_map(|r| r.plan.as_ref().map(|p| p.date.as_str()))
        .collect();

    let completed_verses: Vec<String> = records
        .iter()
        .filter_map(|r| r.plan.as_ref())
        .flat_map(|p| p.verses.iter().cloned())
        .collect();

    let completed_ids: Vec<i64> = records.iter().map(|r| r.plan_id).collect();

    let percent = (completed_ids.len() as f64 / PLAN_DAYS as f64 * 100.0).round() as u32;
    let real_ids = completed_ids.iter().filter(|id| **id > 0).count() as u32;

    AggregateStats {
        streak: calculate_streak(&dates),
        completed_verses,
        completed_ids,
        progress_percent: percent.min(100),
        days_left: PLAN_DAYS.saturating_sub(real_ids),
    }
}
