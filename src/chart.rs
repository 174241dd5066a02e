use crate::models::{AggregateResult, ChartData, ChartDataset, Window};

const BORDER_WIDTH: u32 = 3;

/// Stable `#rrggbb` colour for a name. Distinct names may collide.
pub fn color_for(name: &str) -> String {
    let hash = name.chars().fold(0i32, |hash, c| {
        (c as i32).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash))
    });
    (0..3).fold(String::from("#"), |mut color, byte| {
        let value = (hash >> (byte * 8)) & 0xFF;
        color.push_str(&format!("{value:02x}"));
        color
    })
}

/// Label for a rolling point, taken from its end date.
pub fn label_for(window: &Window) -> String {
    window.end.format("%-m/%-d/%Y").to_string()
}

pub fn project(results: &[AggregateResult], rolling: &[Window]) -> ChartData {
    let labels = rolling.iter().map(label_for).collect();
    let datasets = results
        .iter()
        .map(|result| ChartDataset {
            label: result.assignee.clone(),
            data: result.averages.iter().map(|point| point.ratio).collect(),
            border_color: color_for(&result.assignee),
            border_width: BORDER_WIDTH,
            fill: false,
        })
        .collect();

    ChartData { labels, datasets }
}
