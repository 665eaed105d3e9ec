use chrono::{DateTime, Utc};

/// Microseconds to fractional milliseconds, the unit every calculator
/// reports in.
pub fn us_to_ms(us: u64) -> f64 {
    us as f64 / 1000.0
}

pub fn us_to_datetime(us: u64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_micros(i64::try_from(us).ok()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_ms() {
        assert_eq!(us_to_ms(0), 0.0);
        assert_eq!(us_to_ms(1500), 1.5);
    }

    #[test]
    fn converts_to_datetime() {
        let dt = us_to_datetime(1_700_000_000_000_000).unwrap();
        assert_eq!(dt.timestamp(), 1_700_000_000);
        assert!(us_to_datetime(u64::MAX).is_none());
    }
}
