use chrono::{NaiveDateTime, Utc};
use chrono_tz::Asia::Tokyo;

/// Wall-clock time in Asia/Tokyo, the zone every stored timestamp is written in.
pub fn now_local() -> NaiveDateTime {
    Utc::now().with_timezone(&Tokyo).naive_local()
}
