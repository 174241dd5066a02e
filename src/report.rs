use std::fmt::Write;

use crate::models::{ChartDataset, RatioValue, StatsOutput};

fn latest_value(dataset: &ChartDataset) -> RatioValue {
    dataset.data.last().copied().unwrap_or(RatioValue::NoData)
}

pub fn build_report(stats: &StatsOutput) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Team Batting Average Report");
    let _ = writeln!(
        output,
        "Generated {}",
        stats.generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Batting Average Leaders");

    if stats.leaderboard_by_ratio.is_empty() {
        let _ = writeln!(output, "No batting averages for this period.");
    } else {
        for (rank, entry) in stats.leaderboard_by_ratio.iter().enumerate() {
            let _ = writeln!(output, "{}. {} {}", rank + 1, entry.assignee, entry.score);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## RBI Leaders");

    if stats.leaderboard_by_points.is_empty() {
        let _ = writeln!(output, "No active players with completed stories.");
    } else {
        for (rank, entry) in stats.leaderboard_by_points.iter().enumerate() {
            let _ = writeln!(output, "{}. {} {} points", rank + 1, entry.assignee, entry.score);
        }
    }

    let _ = writeln!(output);
    match stats.chart_data.labels.last() {
        Some(label) => {
            let _ = writeln!(output, "## Rolling Averages (period ending {label})");
        }
        None => {
            let _ = writeln!(output, "## Rolling Averages");
        }
    }

    for dataset in stats.chart_data.datasets.iter() {
        let _ = writeln!(output, "- {}: {}", dataset.label, latest_value(dataset));
    }

    output
}
