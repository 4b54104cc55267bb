/// Playback timestamps are integer ticks: 1 tick = 1 microsecond.
pub const TICKS_PER_SECOND: i64 = 1_000_000;

/// Converts seconds into playback ticks with nearest rounding.
///
/// Negative and non-finite inputs map to `0`; a scrub timeline has no
/// meaningful timestamps before the start of the asset.
///
/// # Example
/// ```
/// use scrub::time::seconds_to_ticks;
///
/// assert_eq!(seconds_to_ticks(1.5), 1_500_000);
/// assert_eq!(seconds_to_ticks(-0.5), 0);
/// ```
pub fn seconds_to_ticks(seconds: f64) -> i64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }

    (seconds * TICKS_PER_SECOND as f64).round() as i64
}

/// Converts playback ticks into seconds.
///
/// # Example
/// ```
/// use scrub::time::ticks_to_seconds;
///
/// assert_eq!(ticks_to_seconds(500_000), 0.5);
/// ```
pub fn ticks_to_seconds(ticks: i64) -> f64 {
    ticks as f64 / TICKS_PER_SECOND as f64
}
