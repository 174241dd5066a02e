use chrono::{DateTime, Duration, Utc};

use crate::models::{Record, Window};

pub const WEEK_DAYS: i64 = 7;

/// `count` consecutive weeks, oldest first, the last one ending at `now`.
pub fn past_weeks(count: usize, now: DateTime<Utc>) -> Vec<Window> {
    (0..count)
        .rev()
        .map(|weeks_back| {
            let end = now - Duration::days(WEEK_DAYS * weeks_back as i64);
            Window {
                start: end - Duration::days(WEEK_DAYS),
                end,
            }
        })
        .collect()
}

/// Records resolved within `[start, end)`.
pub fn filter_by_date_range<'a, I>(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    records: I,
) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    let window = Window { start, end };
    records
        .into_iter()
        .filter(|record| window.contains(record.resolution_date))
        .collect()
}

/// Sliding spans of `span` base windows; yields `windows.len() - span` points.
///
/// Point `i` runs from the start of base window `i` to the end of base
/// window `span - 1 + i`.
pub fn rolling_windows(windows: &[Window], span: usize) -> Vec<Window> {
    if span == 0 {
        return Vec::new();
    }
    let points = windows.len().saturating_sub(span);
    (0..points)
        .map(|i| Window {
            start: windows[i].start,
            end: windows[span - 1 + i].end,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn record_at(resolution_date: DateTime<Utc>) -> Record {
        Record {
            key: "KPI-1".to_string(),
            assignee: Some("Avery".to_string()),
            resolution_date,
            estimated_complete_date: None,
            deviation_days: None,
            point_value: 1.0,
        }
    }

    #[test]
    fn past_weeks_are_chronological_and_contiguous() {
        let weeks = past_weeks(20, now());
        assert_eq!(weeks.len(), 20);
        assert_eq!(weeks.last().unwrap().end, now());
        assert_eq!(weeks[0].start, now() - Duration::days(140));
        for pair in weeks.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn rolling_point_count_is_windows_minus_span() {
        let weeks = past_weeks(20, now());
        let rolling = rolling_windows(&weeks, 8);
        assert_eq!(rolling.len(), 12);
        assert_eq!(rolling[0].start, weeks[0].start);
        assert_eq!(rolling[0].end, weeks[7].end);
        assert_eq!(rolling[11].start, weeks[11].start);
        assert_eq!(rolling[11].end, weeks[18].end);
    }

    #[test]
    fn rolling_with_oversized_span_is_empty() {
        let weeks = past_weeks(4, now());
        assert!(rolling_windows(&weeks, 4).is_empty());
        assert!(rolling_windows(&weeks, 9).is_empty());
        assert!(rolling_windows(&weeks, 0).is_empty());
    }

    #[test]
    fn date_filter_excludes_end_boundary() {
        let start = now() - Duration::days(7);
        let records = vec![
            record_at(start),
            record_at(now() - Duration::days(1)),
            record_at(now()),
            record_at(start - Duration::seconds(1)),
        ];
        let found = filter_by_date_range(start, now(), &records);
        assert_eq!(found.len(), 2);
    }
}
