use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::aggregate::{group_by_assignee, person_averages, team_average};
use crate::chart;
use crate::config::MetricsConfig;
use crate::error::MetricsError;
use crate::leaderboard::{point_leaders, ratio_leaders};
use crate::models::{ActiveRoster, Record, StatsOutput, Window};
use crate::windows::rolling_windows;

fn validate_records(records: &[Record]) -> Result<(), MetricsError> {
    if !records.iter().any(|record| record.assignee.is_some()) {
        return Err(MetricsError::EmptyRecords);
    }
    for record in records {
        if !record.point_value.is_finite() || record.point_value < 0.0 {
            return Err(MetricsError::InvalidPoints {
                key: record.key.clone(),
                value: record.point_value,
            });
        }
    }
    Ok(())
}

/// Chart series and both leaderboards for one record set.
///
/// `windows` must hold `config.number_of_windows` base windows in either order.
pub fn build_stats(
    records: &[Record],
    roster: &ActiveRoster,
    windows: &[Window],
    config: &MetricsConfig,
    now: DateTime<Utc>,
) -> Result<StatsOutput, MetricsError> {
    config.validate()?;
    validate_records(records)?;
    if windows.len() != config.number_of_windows {
        return Err(MetricsError::WindowCount {
            expected: config.number_of_windows,
            actual: windows.len(),
        });
    }

    let mut chronological = windows.to_vec();
    chronological.sort_by_key(|window| window.start);
    let rolling = rolling_windows(&chronological, config.rolling_span);
    debug_assert_eq!(rolling.len(), config.rolling_points());
    let groups = group_by_assignee(records);
    debug!(assignees = groups.len(), points = rolling.len(), "grouped records");

    let mut averages = person_averages(&groups, roster, &rolling, now, config.recency_days);
    averages.push(team_average(records, roster, &rolling));

    let chart_data = chart::project(&averages, &rolling);
    let leaderboard_by_ratio =
        ratio_leaders(&averages, config.no_data_placement, config.leaderboard_size);
    let leaderboard_by_points = point_leaders(
        &groups,
        roster,
        now,
        config.grace_period(),
        config.leaderboard_size,
    );

    info!(
        subjects = averages.len(),
        ratio_leaders = leaderboard_by_ratio.len(),
        point_leaders = leaderboard_by_points.len(),
        "built stats"
    );

    Ok(StatsOutput {
        chart_data,
        leaderboard_by_ratio,
        leaderboard_by_points,
        generated_at: now,
    })
}
