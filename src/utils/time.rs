//! Time parsing and formatting utilities

use crate::domain::model::Timestamp;

/// Convert a probe duration in fractional seconds to a whole-second timestamp
pub fn timestamp_from_secs_f64(seconds: f64) -> Option<Timestamp> {
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    Some(Timestamp::from_seconds(seconds.floor() as u64))
}

/// Parse a probe duration field such as `"123.456000"`
pub fn parse_probe_duration(raw: &str) -> Option<Timestamp> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .and_then(timestamp_from_secs_f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_duration_rounds_down() {
        assert_eq!(parse_probe_duration("95.999").unwrap().to_string(), "00:01:35");
        assert_eq!(parse_probe_duration("3600").unwrap().to_string(), "01:00:00");
    }

    #[test]
    fn test_probe_duration_rejects_garbage() {
        assert!(parse_probe_duration("N/A").is_none());
        assert!(parse_probe_duration("-1").is_none());
        assert!(timestamp_from_secs_f64(f64::NAN).is_none());
    }
}
