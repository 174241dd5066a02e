use crate::models::Record;

/// Records finishing this many days late or more are misses.
pub const LATE_LIMIT_DAYS: i64 = 3;
/// Records finishing this many days early or more are misses.
pub const EARLY_LIMIT_DAYS: i64 = -10;

/// A "hit" lands strictly between the early and late limits.
pub fn is_success(deviation_days: Option<i64>) -> bool {
    match deviation_days {
        Some(days) => EARLY_LIMIT_DAYS < days && days < LATE_LIMIT_DAYS,
        None => false,
    }
}

pub fn record_is_success(record: &Record) -> bool {
    is_success(record.deviation_days)
}
