use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Serialize, Serializer};

/// One resolved unit of work, enriched with its estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub key: String,
    pub assignee: Option<String>,
    pub resolution_date: DateTime<Utc>,
    /// `None` when no estimate could be read from the summary.
    pub estimated_complete_date: Option<NaiveDate>,
    /// Days late (positive) or early (negative); `None` without an estimate.
    pub deviation_days: Option<i64>,
    pub point_value: f64,
}

/// Calendar interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// A point in a batting-average series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RatioValue {
    Numeric(f64),
    NoData,
}

impl fmt::Display for RatioValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatioValue::Numeric(value) => write!(f, "{value:.3}"),
            RatioValue::NoData => f.write_str("-"),
        }
    }
}

// Chart consumers treat `null` as a gap in the line.
impl Serialize for RatioValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RatioValue::Numeric(value) => serializer.serialize_f64(*value),
            RatioValue::NoData => serializer.serialize_none(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatePoint {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub ratio: RatioValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub assignee: String,
    pub averages: Vec<AggregatePoint>,
}

impl AggregateResult {
    /// Ratio of the most recent rolling point.
    pub fn last_value(&self) -> RatioValue {
        self.averages
            .last()
            .map(|point| point.ratio)
            .unwrap_or(RatioValue::NoData)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry<S> {
    pub assignee: String,
    pub score: S,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<RatioValue>,
    pub border_color: String,
    pub border_width: u32,
    pub fill: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsOutput {
    pub chart_data: ChartData,
    pub leaderboard_by_ratio: Vec<LeaderboardEntry<RatioValue>>,
    pub leaderboard_by_points: Vec<LeaderboardEntry<f64>>,
    pub generated_at: DateTime<Utc>,
}

/// Names of the team members currently tracked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveRoster {
    members: BTreeSet<String>,
}

impl ActiveRoster {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let members = names
            .into_iter()
            .map(Into::into)
            .map(|name: String| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        Self { members }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.contains(name)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
