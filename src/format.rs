use std::time::Duration;

/// Placeholder shown before any time has been recorded
pub const ZERO_TIME: &str = "00.000";

/// Format a reaction time as `SS.mmm`, rounded to the nearest millisecond.
///
/// Seconds are zero padded to two digits so the readout keeps a constant width
/// for everything under 100 seconds.
pub fn format_reaction_time(time: Duration) -> String {
    let millis = (time.as_secs_f64() * 1000.0).round() as u64;
    format!("{:02}.{:03}", millis / 1000, millis % 1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pads_sub_ten_seconds() {
        assert_eq!(format_reaction_time(Duration::from_millis(345)), "00.345");
        assert_eq!(format_reaction_time(Duration::from_millis(9_001)), "09.001");
    }

    #[test]
    fn test_two_digit_seconds_unpadded() {
        assert_eq!(format_reaction_time(Duration::from_millis(12_010)), "12.010");
    }

    #[test]
    fn test_three_digit_seconds() {
        assert_eq!(format_reaction_time(Duration::from_millis(123_456)), "123.456");
    }

    #[test]
    fn test_zero() {
        assert_eq!(format_reaction_time(Duration::ZERO), ZERO_TIME);
    }

    #[test]
    fn test_rounds_to_nearest_millisecond() {
        assert_eq!(format_reaction_time(Duration::from_micros(344_600)), "00.345");
        assert_eq!(format_reaction_time(Duration::from_micros(344_400)), "00.344");
    }

    #[test]
    fn test_rounding_carries_into_seconds() {
        assert_eq!(format_reaction_time(Duration::from_micros(9_999_600)), "10.000");
    }
}
