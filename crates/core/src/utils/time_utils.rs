use chrono::{NaiveDateTime, Utc};

/// Current UTC wall-clock time, the timestamp stored on every record.
pub fn now_utc() -> NaiveDateTime {
    Utc::now().naive_utc()
}
