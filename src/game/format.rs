//! Elapsed-time formatting.

/// Format seconds as `MM:SS`.
///
/// Minutes are not wrapped into hours, so an hour reads `60:00`.
///
/// ```
/// use memory_match::format_elapsed;
///
/// assert_eq!(format_elapsed(0), "00:00");
/// assert_eq!(format_elapsed(65), "01:05");
/// assert_eq!(format_elapsed(3600), "60:00");
/// ```
#[must_use]
pub fn format_elapsed(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        assert_eq!(format_elapsed(0), "00:00");
    }

    #[test]
    fn test_seconds_padded() {
        assert_eq!(format_elapsed(7), "00:07");
        assert_eq!(format_elapsed(59), "00:59");
    }

    #[test]
    fn test_minutes() {
        assert_eq!(format_elapsed(60), "01:00");
        assert_eq!(format_elapsed(65), "01:05");
        assert_eq!(format_elapsed(125), "02:05");
    }

    #[test]
    fn test_no_hour_rollover() {
        assert_eq!(format_elapsed(3600), "60:00");
        assert_eq!(format_elapsed(3599), "59:59");
        assert_eq!(format_elapsed(6001), "100:01");
    }
}
