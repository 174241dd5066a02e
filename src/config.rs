use chrono::Duration;
use clap::{Args, ValueEnum};

use crate::error::MetricsError;
use crate::windows::WEEK_DAYS;

pub const DEFAULT_NUMBER_OF_WINDOWS: usize = 20;
pub const DEFAULT_ROLLING_SPAN: usize = 8;
pub const DEFAULT_RECENCY_DAYS: i64 = 30;
pub const DEFAULT_GRACE_PERIOD_WEEKS: i64 = 8;
pub const DEFAULT_LEADERBOARD_SIZE: usize = 3;

/// Ten years; keeps window and cutoff arithmetic inside chrono's range.
pub const MAX_NUMBER_OF_WINDOWS: i64 = 520;
pub const MAX_GRACE_PERIOD_WEEKS: i64 = 520;
pub const MAX_RECENCY_DAYS: i64 = 3650;

fn check_range(field: &'static str, value: i64, max: i64) -> Result<(), MetricsError> {
    if (0..=max).contains(&value) {
        Ok(())
    } else {
        Err(MetricsError::OutOfRange { field, value, max })
    }
}

/// Where subjects without data in their latest rolling point rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NoDataPlacement {
    First,
    Last,
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct MetricsConfig {
    /// Number of weekly base windows to generate
    #[arg(long, default_value_t = DEFAULT_NUMBER_OF_WINDOWS)]
    pub number_of_windows: usize,
    /// Base windows covered by each rolling point
    #[arg(long, default_value_t = DEFAULT_ROLLING_SPAN)]
    pub rolling_span: usize,
    /// Drop assignees whose last resolution is older than this
    #[arg(long, default_value_t = DEFAULT_RECENCY_DAYS)]
    pub recency_days: i64,
    /// Trailing weeks counted towards RBI
    #[arg(long, default_value_t = DEFAULT_GRACE_PERIOD_WEEKS)]
    pub grace_period_weeks: i64,
    #[arg(long, default_value_t = DEFAULT_LEADERBOARD_SIZE)]
    pub leaderboard_size: usize,
    #[arg(long, value_enum, default_value_t = NoDataPlacement::Last)]
    pub no_data_placement: NoDataPlacement,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            number_of_windows: DEFAULT_NUMBER_OF_WINDOWS,
            rolling_span: DEFAULT_ROLLING_SPAN,
            recency_days: DEFAULT_RECENCY_DAYS,
            grace_period_weeks: DEFAULT_GRACE_PERIOD_WEEKS,
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
            no_data_placement: NoDataPlacement::Last,
        }
    }
}

impl MetricsConfig {
    pub fn validate(&self) -> Result<(), MetricsError> {
        let windows = i64::try_from(self.number_of_windows).unwrap_or(i64::MAX);
        check_range("number_of_windows", windows, MAX_NUMBER_OF_WINDOWS)?;
        check_range("grace_period_weeks", self.grace_period_weeks, MAX_GRACE_PERIOD_WEEKS)?;
        check_range("recency_days", self.recency_days, MAX_RECENCY_DAYS)?;
        if self.rolling_span == 0 || self.rolling_span >= self.number_of_windows {
            return Err(MetricsError::RollingSpan {
                span: self.rolling_span,
                windows: self.number_of_windows,
            });
        }
        Ok(())
    }

    pub fn rolling_points(&self) -> usize {
        self.number_of_windows.saturating_sub(self.rolling_span)
    }

    pub fn grace_period(&self) -> Duration {
        Duration::days(self.grace_period_weeks * WEEK_DAYS)
    }
}
