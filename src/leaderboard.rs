use std::cmp::Ordering;

use chrono::{DateTime, Duration, Utc};

use crate::aggregate::AssigneeGroup;
use crate::classify::record_is_success;
use crate::config::NoDataPlacement;
use crate::models::{ActiveRoster, AggregateResult, LeaderboardEntry, RatioValue, Record};

fn compare_last_values(a: RatioValue, b: RatioValue, placement: NoDataPlacement) -> Ordering {
    match (a, b) {
        (RatioValue::Numeric(a), RatioValue::Numeric(b)) => b.total_cmp(&a),
        (RatioValue::NoData, RatioValue::NoData) => Ordering::Equal,
        (RatioValue::NoData, RatioValue::Numeric(_)) => match placement {
            NoDataPlacement::First => Ordering::Less,
            NoDataPlacement::Last => Ordering::Greater,
        },
        (RatioValue::Numeric(_), RatioValue::NoData) => match placement {
            NoDataPlacement::First => Ordering::Greater,
            NoDataPlacement::Last => Ordering::Less,
        },
    }
}

/// Orders subjects by their latest rolling ratio, highest first. Ties keep input order.
pub fn sort_by_last_ratio(
    results: &[AggregateResult],
    placement: NoDataPlacement,
) -> Vec<&AggregateResult> {
    let mut sorted: Vec<&AggregateResult> = results.iter().collect();
    sorted.sort_by(|a, b| compare_last_values(a.last_value(), b.last_value(), placement));
    sorted
}

pub fn ratio_leaders(
    results: &[AggregateResult],
    placement: NoDataPlacement,
    size: usize,
) -> Vec<LeaderboardEntry<RatioValue>> {
    sort_by_last_ratio(results, placement)
        .into_iter()
        .take(size)
        .map(|result| LeaderboardEntry {
            assignee: result.assignee.clone(),
            score: result.last_value(),
        })
        .collect()
}

/// Whether the estimate falls after the trailing grace cutoff. No estimate never qualifies.
pub fn estimated_within(record: &Record, now: DateTime<Utc>, grace_period: Duration) -> bool {
    let cutoff = now - grace_period;
    record
        .estimated_complete_date
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc() > cutoff)
        .unwrap_or(false)
}

/// Points from hits whose estimate lies within the grace period.
pub fn runs_batted_in(records: &[&Record], now: DateTime<Utc>, grace_period: Duration) -> f64 {
    records
        .iter()
        .filter(|record| record_is_success(record) && estimated_within(record, now, grace_period))
        .map(|record| record.point_value)
        .sum()
}

pub fn point_leaders(
    groups: &[AssigneeGroup<'_>],
    roster: &ActiveRoster,
    now: DateTime<Utc>,
    grace_period: Duration,
    size: usize,
) -> Vec<LeaderboardEntry<f64>> {
    let mut scores: Vec<LeaderboardEntry<f64>> = groups
        .iter()
        .filter(|group| roster.contains(group.assignee))
        .map(|group| LeaderboardEntry {
            assignee: group.assignee.to_string(),
            score: runs_batted_in(&group.records, now, grace_period),
        })
        .collect();

    scores.sort_by(|a, b| b.score.total_cmp(&a.score));
    scores.truncate(size);
    scores
}
