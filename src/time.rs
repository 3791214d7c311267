//! Clock helpers.

use chrono::Utc;

/// Milliseconds elapsed since Unix epoch.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
