//! Timestamp utilities
//!
//! Session timestamps are persisted as fractional Unix seconds with millisecond
//! precision. These helpers convert between that form and `DateTime<Utc>`.

use chrono::{DateTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// 1970-01-01T00:00:00Z
pub fn epoch() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

/// Convert a timestamp to fractional Unix seconds
pub fn to_unix_seconds(timestamp: &DateTime<Utc>) -> f64 {
    timestamp.timestamp_millis() as f64 / 1000.0
}

/// Convert fractional Unix seconds back to a timestamp
///
/// Returns None for values that are not finite or fall outside chrono's range.
pub fn from_unix_seconds(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }

    let millis = (seconds * 1000.0).round();
    if millis < i64::MIN as f64 || millis > i64::MAX as f64 {
        return None;
    }

    DateTime::from_timestamp_millis(millis as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800);
    }

    #[tokio::test]
    async fn test_now_successive_calls_advance() {
        let time1 = now();
        tokio::time::sleep(Duration::from_millis(10)).await;
        let time2 = now();
        assert!(time2 > time1);
    }

    #[test]
    fn test_epoch_is_zero_seconds() {
        assert_eq!(to_unix_seconds(&epoch()), 0.0);
    }

    #[test]
    fn test_unix_seconds_keep_milliseconds() {
        let timestamp = from_unix_seconds(1_735_689_600.125).unwrap();
        assert_eq!(timestamp.timestamp_millis(), 1_735_689_600_125);
        assert_eq!(to_unix_seconds(&timestamp), 1_735_689_600.125);
    }

    #[test]
    fn test_whole_seconds() {
        let timestamp = from_unix_seconds(1000.0).unwrap();
        assert_eq!(timestamp.timestamp(), 1000);
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(from_unix_seconds(f64::NAN).is_none());
        assert!(from_unix_seconds(f64::INFINITY).is_none());
        assert!(from_unix_seconds(1e30).is_none());
    }
}
