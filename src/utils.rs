/// Formats time (in seconds) the way the overlay shows it: `h:mm:ss` once
/// there is an hour, `m:ss` once there is a minute, `0:ss` otherwise.
pub fn format_time(seconds: f64) -> String {
    let total_seconds = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}:{:02}", minutes, seconds)
    } else {
        format!("0:{:02}", seconds)
    }
}

/// Clamps a value into `[0, 1]`, rejecting NaN and infinities.
pub fn unit_interval(value: f64) -> Option<f64> {
    if value.is_finite() {
        Some(value.clamp(0.0, 1.0))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_seconds_only() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(9.9), "0:09");
        assert_eq!(format_time(59.0), "0:59");
    }

    #[test]
    fn formats_minutes_without_leading_zero() {
        assert_eq!(format_time(60.0), "1:00");
        assert_eq!(format_time(754.2), "12:34");
    }

    #[test]
    fn formats_hours() {
        assert_eq!(format_time(3600.0), "1:00:00");
        assert_eq!(format_time(7384.0), "2:03:04");
    }

    #[test]
    fn garbage_formats_as_zero() {
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(-12.0), "0:00");
    }

    #[test]
    fn unit_interval_clamps_and_rejects() {
        assert_eq!(unit_interval(1.7), Some(1.0));
        assert_eq!(unit_interval(-0.2), Some(0.0));
        assert_eq!(unit_interval(0.25), Some(0.25));
        assert_eq!(unit_interval(f64::NAN), None);
        assert_eq!(unit_interval(f64::INFINITY), None);
    }
}
