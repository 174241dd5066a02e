use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::classify::record_is_success;
use crate::models::{ActiveRoster, AggregatePoint, AggregateResult, RatioValue, Record, Window};
use crate::windows::filter_by_date_range;

pub const TEAM_LABEL: &str = "Team Average";

/// Records belonging to one assignee, in input order.
#[derive(Debug, Clone)]
pub struct AssigneeGroup<'a> {
    pub assignee: &'a str,
    pub records: Vec<&'a Record>,
}

/// Groups records by assignee, keeping first-seen order. Unassigned records are dropped.
pub fn group_by_assignee(records: &[Record]) -> Vec<AssigneeGroup<'_>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<AssigneeGroup<'_>> = Vec::new();

    for record in records {
        let Some(assignee) = record.assignee.as_deref() else {
            continue;
        };
        match index.get(assignee) {
            Some(&position) => groups[position].records.push(record),
            None => {
                index.insert(assignee, groups.len());
                groups.push(AssigneeGroup {
                    assignee,
                    records: vec![record],
                });
            }
        }
    }

    groups
}

/// Hits over total, rounded to three decimals. An empty slice scores `0`.
pub fn success_ratio(records: &[&Record]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let hits = records.iter().filter(|record| record_is_success(record)).count();
    round_ratio(hits as f64 / records.len() as f64)
}

pub fn ratio<'a, I>(records: I, start: DateTime<Utc>, end: DateTime<Utc>) -> f64
where
    I: IntoIterator<Item = &'a Record>,
{
    success_ratio(&filter_by_date_range(start, end, records))
}

fn round_ratio(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// True when the latest resolution is no more than `recency_days` calendar days ago.
pub fn is_current(records: &[&Record], now: DateTime<Utc>, recency_days: i64) -> bool {
    records
        .iter()
        .map(|record| record.resolution_date)
        .max()
        .map(|latest| (now.date_naive() - latest.date_naive()).num_days() <= recency_days)
        .unwrap_or(false)
}

/// Rolling averages for each active, current assignee.
///
/// Rolling points with no records for the assignee carry [`RatioValue::NoData`].
pub fn person_averages(
    groups: &[AssigneeGroup<'_>],
    roster: &ActiveRoster,
    rolling: &[Window],
    now: DateTime<Utc>,
    recency_days: i64,
) -> Vec<AggregateResult> {
    let mut results = Vec::new();

    for group in groups {
        if !roster.contains(group.assignee) {
            debug!(assignee = group.assignee, "skipping assignee outside roster");
            continue;
        }
        if !is_current(&group.records, now, recency_days) {
            debug!(assignee = group.assignee, recency_days, "skipping assignee with no recent work");
            continue;
        }

        let averages = rolling
            .iter()
            .map(|window| {
                let in_range =
                    filter_by_date_range(window.start, window.end, group.records.iter().copied());
                let ratio = if in_range.is_empty() {
                    RatioValue::NoData
                } else {
                    RatioValue::Numeric(success_ratio(&in_range))
                };
                AggregatePoint {
                    start: window.start,
                    end: window.end,
                    ratio,
                }
            })
            .collect();

        results.push(AggregateResult {
            assignee: group.assignee.to_string(),
            averages,
        });
    }

    results
}

/// Pooled rolling averages over every active-roster record. Empty points score `0`.
pub fn team_average(records: &[Record], roster: &ActiveRoster, rolling: &[Window]) -> AggregateResult {
    let active: Vec<&Record> = records
        .iter()
        .filter(|record| {
            record
                .assignee
                .as_deref()
                .map(|assignee| roster.contains(assignee))
                .unwrap_or(false)
        })
        .collect();

    let averages = rolling
        .iter()
        .map(|window| AggregatePoint {
            start: window.start,
            end: window.end,
            ratio: RatioValue::Numeric(ratio(active.iter().copied(), window.start, window.end)),
        })
        .collect();

    AggregateResult {
        assignee: TEAM_LABEL.to_string(),
        averages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::windows::{past_weeks, rolling_windows};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn record(assignee: Option<&str>, days_ago: i64, deviation_days: Option<i64>) -> Record {
        Record {
            key: format!("KPI-{days_ago}"),
            assignee: assignee.map(str::to_string),
            resolution_date: now() - Duration::days(days_ago),
            estimated_complete_date: None,
            deviation_days,
            point_value: 2.0,
        }
    }

    #[test]
    fn grouping_keeps_first_seen_order_and_drops_unassigned() {
        let records = vec![
            record(Some("Jules"), 1, Some(0)),
            record(None, 2, Some(0)),
            record(Some("Avery"), 3, Some(0)),
            record(Some("Jules"), 4, Some(0)),
        ];
        let groups = group_by_assignee(&records);
        let names: Vec<&str> = groups.iter().map(|group| group.assignee).collect();
        assert_eq!(names, vec!["Jules", "Avery"]);
        assert_eq!(groups[0].records.len(), 2);
    }

    #[test]
    fn ratio_rounds_to_three_decimals() {
        let records = vec![
            record(Some("Avery"), 1, Some(0)),
            record(Some("Avery"), 2, Some(1)),
            record(Some("Avery"), 3, Some(5)),
        ];
        let value = ratio(&records, now() - Duration::days(7), now());
        assert_eq!(value, 0.667);
    }

    #[test]
    fn ratio_of_empty_range_is_zero() {
        let records = vec![record(Some("Avery"), 30, Some(0))];
        assert_eq!(ratio(&records, now() - Duration::days(7), now()), 0.0);
        assert_eq!(success_ratio(&[]), 0.0);
    }

    #[test]
    fn missing_estimates_count_against_the_ratio() {
        let records = vec![record(Some("Avery"), 1, Some(0)), record(Some("Avery"), 2, None)];
        assert_eq!(ratio(&records, now() - Duration::days(7), now()), 0.5);
    }

    #[test]
    fn recency_boundary_is_thirty_days() {
        let thirty = vec![record(Some("Avery"), 30, Some(0))];
        let thirty_one = vec![record(Some("Avery"), 31, Some(0))];
        let refs: Vec<&Record> = thirty.iter().collect();
        assert!(is_current(&refs, now(), 30));
        let refs: Vec<&Record> = thirty_one.iter().collect();
        assert!(!is_current(&refs, now(), 30));
    }

    #[test]
    fn recency_uses_latest_resolution_not_list_order() {
        let records = vec![record(Some("Avery"), 2, Some(0)), record(Some("Avery"), 90, Some(0))];
        let refs: Vec<&Record> = records.iter().collect();
        assert!(is_current(&refs, now(), 30));
    }

    #[test]
    fn person_averages_filter_by_roster_and_recency() {
        let records = vec![
            record(Some("Avery"), 3, Some(0)),
            record(Some("Jules"), 3, Some(0)),
            record(Some("Kiara"), 45, Some(0)),
        ];
        let roster = ActiveRoster::from_names(["Avery", "Kiara"]);
        let rolling = rolling_windows(&past_weeks(20, now()), 8);
        let groups = group_by_assignee(&records);

        let results = person_averages(&groups, &roster, &rolling, now(), 30);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].assignee, "Avery");
        assert_eq!(results[0].averages.len(), 12);
    }

    #[test]
    fn empty_person_points_are_no_data() {
        // Resolved inside the final rolling point only.
        let records = vec![record(Some("Avery"), 10, Some(1))];
        let roster = ActiveRoster::from_names(["Avery"]);
        let rolling = rolling_windows(&past_weeks(20, now()), 8);
        let groups = group_by_assignee(&records);

        let results = person_averages(&groups, &roster, &rolling, now(), 30);
        let averages = &results[0].averages;
        assert_eq!(averages[0].ratio, RatioValue::NoData);
        assert_eq!(averages[11].ratio, RatioValue::Numeric(1.0));
    }

    #[test]
    fn team_average_pools_roster_records_and_zero_fills() {
        let records = vec![
            record(Some("Avery"), 10, Some(0)),
            record(Some("Jules"), 10, Some(9)),
            record(Some("Kiara"), 11, Some(9)),
            record(None, 10, Some(9)),
        ];
        let roster = ActiveRoster::from_names(["Avery", "Jules"]);
        let rolling = rolling_windows(&past_weeks(20, now()), 8);

        let team = team_average(&records, &roster, &rolling);
        assert_eq!(team.assignee, TEAM_LABEL);
        assert_eq!(team.averages.len(), 12);
        assert_eq!(team.averages[0].ratio, RatioValue::Numeric(0.0));
        assert_eq!(team.last_value(), RatioValue::Numeric(0.5));
    }

    #[test]
    fn stale_member_still_feeds_the_team_pool() {
        let records = vec![
            record(Some("Avery"), 3, Some(0)),
            record(Some("Kiara"), 40, Some(1)),
            record(Some("Kiara"), 50, Some(-2)),
        ];
        let roster = ActiveRoster::from_names(["Avery", "Kiara"]);
        let rolling = rolling_windows(&past_weeks(20, now()), 8);
        let groups = group_by_assignee(&records);

        let people = person_averages(&groups, &roster, &rolling, now(), 30);
        let names: Vec<&str> = people.iter().map(|result| result.assignee.as_str()).collect();
        assert_eq!(names, vec!["Avery"]);

        // The final rolling point spans 63 to 7 days ago.
        let team = team_average(&records, &roster, &rolling);
        assert_eq!(team.last_value(), RatioValue::Numeric(1.0));
    }
}
