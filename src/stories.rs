use anyhow::Context;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::models::Record;

pub const STORY_TYPE: &str = "Story";

/// An issue as exported from the tracker.
#[derive(Debug, Clone, Deserialize)]
pub struct RawIssue {
    pub key: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub issuetype: String,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub resolutiondate: Option<String>,
    #[serde(default)]
    pub storypoints: Option<f64>,
}

fn parse_resolution_date(raw: &str) -> anyhow::Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .with_context(|| format!("unrecognised resolution date {raw:?}"))
}

/// Reads the first `M/D` token in a summary as the estimated completion date.
///
/// The year follows the resolution date, shifted when the estimate and the
/// resolution straddle a new year.
pub fn estimated_date(pattern: &Regex, summary: &str, resolved_on: NaiveDate) -> Option<NaiveDate> {
    let captures = pattern.captures(summary)?;
    let month: u32 = captures.get(1)?.as_str().parse().ok()?;
    let day: u32 = captures.get(2)?.as_str().parse().ok()?;

    let year = match (resolved_on.month(), month) {
        (1, 12) => resolved_on.year() - 1,
        (12, 1) => resolved_on.year() + 1,
        _ => resolved_on.year(),
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn estimate_pattern() -> anyhow::Result<Regex> {
    Regex::new(r"\b(\d{1,2})/(\d{1,2})\b").context("invalid estimate pattern")
}

pub fn enrich(pattern: &Regex, issue: &RawIssue) -> anyhow::Result<Record> {
    let raw_date = issue
        .resolutiondate
        .as_deref()
        .with_context(|| format!("issue {} is unresolved", issue.key))?;
    let resolved = parse_resolution_date(raw_date).with_context(|| format!("issue {}", issue.key))?;
    let resolved_on = resolved.date_naive();
    let estimated_complete_date = estimated_date(pattern, &issue.summary, resolved_on);
    let deviation_days = estimated_complete_date.map(|estimate| (resolved_on - estimate).num_days());

    Ok(Record {
        key: issue.key.clone(),
        assignee: issue
            .assignee
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string),
        resolution_date: resolved.with_timezone(&Utc),
        estimated_complete_date,
        deviation_days,
        point_value: issue.storypoints.unwrap_or(0.0),
    })
}

/// Enriched records for every resolved story in the export.
pub fn stories_with_estimates(issues: &[RawIssue]) -> anyhow::Result<Vec<Record>> {
    let pattern = estimate_pattern()?;
    issues
        .iter()
        .filter(|issue| issue.issuetype == STORY_TYPE)
        .filter(|issue| {
            let resolved = issue.resolutiondate.is_some();
            if !resolved {
                debug!(key = %issue.key, "skipping unresolved story");
            }
            resolved
        })
        .map(|issue| enrich(&pattern, issue))
        .collect()
}
