use std::path::Path;

use anyhow::Context;
use tracing::info;

use crate::models::ActiveRoster;
use crate::stories::RawIssue;

/// Loads a tracker export. `.csv` files are read as CSV, anything else as a JSON array.
pub async fn load_issues(path: &Path) -> anyhow::Result<Vec<RawIssue>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read issues from {}", path.display()))?;

    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    let issues = if is_csv {
        parse_csv_issues(&content)
    } else {
        serde_json::from_str(&content).map_err(anyhow::Error::from)
    }
    .with_context(|| format!("malformed issue export {}", path.display()))?;

    info!(count = issues.len(), path = %path.display(), "loaded issues");
    Ok(issues)
}

fn parse_csv_issues(content: &str) -> anyhow::Result<Vec<RawIssue>> {
    let mut reader = csv::Reader::from_reader(content.as_bytes());
    let mut issues = Vec::new();
    for row in reader.deserialize::<RawIssue>() {
        issues.push(row?);
    }
    Ok(issues)
}

/// Parses a roster file: a JSON array of names, or one name per line (`#` starts a comment).
pub fn parse_roster(content: &str) -> anyhow::Result<ActiveRoster> {
    let trimmed = content.trim_start();
    if trimmed.starts_with('[') {
        let names: Vec<String> =
            serde_json::from_str(trimmed).context("roster JSON must be an array of names")?;
        return Ok(ActiveRoster::from_names(names));
    }

    Ok(ActiveRoster::from_names(
        content
            .lines()
            .map(|line| line.split('#').next().unwrap_or_default()),
    ))
}

/// Roster from a file when given, otherwise from names passed inline.
pub async fn load_roster(path: Option<&Path>, inline: &[String]) -> anyhow::Result<ActiveRoster> {
    let roster = match path {
        Some(path) => {
            let content = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read roster from {}", path.display()))?;
            parse_roster(&content)?
        }
        None => ActiveRoster::from_names(inline.iter().cloned()),
    };

    anyhow::ensure!(
        !roster.is_empty(),
        "active roster is empty; pass --roster or set TEAM_ROSTER"
    );
    info!(members = roster.len(), "loaded active roster");
    Ok(roster)
}
