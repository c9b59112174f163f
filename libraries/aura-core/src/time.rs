//! Transport time formatting
//!
//! Helpers for the seek bar and time labels.

/// Format seconds as `M:SS`
///
/// Negative and non-finite inputs format as `0:00`.
pub fn format_time(seconds: f64) -> String {
    let seconds = sanitize(seconds);
    let minutes = (seconds / 60.0).floor() as u64;
    let remaining = (seconds % 60.0).floor() as u64;
    format!("{}:{:02}", minutes, remaining)
}

/// Parse `M:SS` into seconds
///
/// Returns `None` if either part is missing or not a number.
pub fn time_to_seconds(time: &str) -> Option<f64> {
    let (minutes, seconds) = time.trim().split_once(':')?;
    let minutes: f64 = minutes.trim().parse().ok()?;
    let seconds: f64 = seconds.trim().parse().ok()?;
    Some(minutes * 60.0 + seconds)
}

/// Percentage (0-100) of `current` within `duration`; 0 for a zero duration
pub fn calculate_progress(current: f64, duration: f64) -> f64 {
    if duration <= 0.0 || !duration.is_finite() {
        return 0.0;
    }
    (current / duration) * 100.0
}

/// Convert a percentage (0-100) of `duration` back to seconds
pub fn percentage_to_time(percentage: f64, duration: f64) -> f64 {
    (percentage / 100.0) * duration
}

/// Format a duration with units that fit its size
///
/// - under a minute: `42s`
/// - under an hour: `M:SS`
/// - otherwise: `H:M:SS`
pub fn format_duration(seconds: f64) -> String {
    let seconds = sanitize(seconds);
    if seconds < 60.0 {
        format!("{}s", seconds.floor() as u64)
    } else if seconds < 3600.0 {
        format_time(seconds)
    } else {
        let hours = (seconds / 3600.0).floor() as u64;
        format!("{}:{}", hours, format_time(seconds % 3600.0))
    }
}

fn sanitize(seconds: f64) -> f64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(65.9), "1:05");
        assert_eq!(format_time(600.0), "10:00");
        assert_eq!(format_time(-3.0), "0:00");
        assert_eq!(format_time(f64::NAN), "0:00");
    }

    #[test]
    fn parses_minutes_and_seconds() {
        assert_eq!(time_to_seconds("1:05"), Some(65.0));
        assert_eq!(time_to_seconds(" 10:00 "), Some(600.0));
        assert_eq!(time_to_seconds("105"), None);
        assert_eq!(time_to_seconds("a:05"), None);
    }

    #[test]
    fn progress_handles_zero_duration() {
        assert_eq!(calculate_progress(10.0, 0.0), 0.0);
        assert_eq!(calculate_progress(15.0, 60.0), 25.0);
        assert_eq!(percentage_to_time(25.0, 60.0), 15.0);
    }

    #[test]
    fn duration_units() {
        assert_eq!(format_duration(42.7), "42s");
        assert_eq!(format_duration(185.0), "3:05");
        assert_eq!(format_duration(3600.0 + 125.0), "1:2:05");
    }

    proptest! {
        /// Property: labels for whole seconds parse back to the same time
        #[test]
        fn whole_seconds_survive_formatting(seconds in 0u32..1_000_000) {
            let label = format_time(f64::from(seconds));
            prop_assert_eq!(time_to_seconds(&label), Some(f64::from(seconds)));
        }

        /// Property: progress and its inverse agree within a track
        #[test]
        fn progress_inverts(duration in 1.0f64..36_000.0, fraction in 0.0f64..=1.0) {
            let current = duration * fraction;
            let back = percentage_to_time(calculate_progress(current, duration), duration);
            prop_assert!((back - current).abs() < 1e-6);
        }
    }
}
