/// Converts a centered scroll offset into normalized timeline progress.
///
/// `scroll_x` is how far the strip has scrolled past its center marker;
/// the visible strip width is `thumbnail_count * thumb_width`. An empty or
/// zero-width strip maps everything to `0.0` instead of dividing by zero,
/// and the output is always inside `[0, 1]` for any real input (NaN
/// included).
///
/// # Example
/// ```
/// use scrub::mapper::offset_to_progress;
///
/// assert_eq!(offset_to_progress(600.0, 20, 60.0), 0.5);
/// assert_eq!(offset_to_progress(-40.0, 20, 60.0), 0.0);
/// assert_eq!(offset_to_progress(100.0, 0, 60.0), 0.0);
/// ```
pub fn offset_to_progress(scroll_x: f64, thumbnail_count: usize, thumb_width: f64) -> f64 {
    let visible_width = thumbnail_count as f64 * thumb_width;
    if !(visible_width > 0.0) {
        return 0.0;
    }

    // max/min rather than clamp: NaN falls through to 0.0.
    (scroll_x / visible_width).max(0.0).min(1.0)
}

/// Converts normalized progress into a playback timestamp in ticks.
///
/// Monotonic in `progress`; `0.0` maps to the start and `1.0` to the full
/// duration.
///
/// # Example
/// ```
/// use scrub::mapper::progress_to_ticks;
///
/// assert_eq!(progress_to_ticks(0.0, 40_000_000), 0);
/// assert_eq!(progress_to_ticks(1.0, 40_000_000), 40_000_000);
/// ```
pub fn progress_to_ticks(progress: f64, duration_tl: i64) -> i64 {
    if duration_tl <= 0 {
        return 0;
    }

    let bounded = progress.max(0.0).min(1.0);
    let ticks = (bounded * duration_tl as f64).round() as i64;
    ticks.clamp(0, duration_tl)
}

#[cfg(test)]
mod tests {
    use super::{offset_to_progress, progress_to_ticks};

    #[test]
    fn progress_stays_inside_unit_interval() {
        assert_eq!(offset_to_progress(-500.0, 20, 60.0), 0.0);
        assert_eq!(offset_to_progress(5_000.0, 20, 60.0), 1.0);
        assert_eq!(offset_to_progress(600.0, 20, 60.0), 0.5);
    }

    #[test]
    fn zero_visible_width_maps_to_zero_not_nan() {
        assert_eq!(offset_to_progress(100.0, 0, 60.0), 0.0);
        assert_eq!(offset_to_progress(100.0, 20, 0.0), 0.0);
        assert_eq!(offset_to_progress(0.0, 0, 0.0), 0.0);
    }

    #[test]
    fn nan_scroll_offset_maps_to_zero() {
        assert_eq!(offset_to_progress(f64::NAN, 20, 60.0), 0.0);
    }

    #[test]
    fn progress_endpoints_map_to_timeline_endpoints() {
        assert_eq!(progress_to_ticks(0.0, 40_000_000), 0);
        assert_eq!(progress_to_ticks(1.0, 40_000_000), 40_000_000);
    }

    #[test]
    fn out_of_range_progress_is_clamped() {
        assert_eq!(progress_to_ticks(-0.5, 40_000_000), 0);
        assert_eq!(progress_to_ticks(1.5, 40_000_000), 40_000_000);
    }

    #[test]
    fn zero_duration_maps_everything_to_zero() {
        assert_eq!(progress_to_ticks(0.7, 0), 0);
        assert_eq!(progress_to_ticks(0.7, -10), 0);
    }

    #[test]
    fn composition_is_monotonic_in_scroll_offset() {
        let duration_tl = 40_000_000;
        let offsets = [-100.0, 0.0, 55.5, 300.0, 599.9, 600.0, 1_200.0, 9_999.0];

        let mut previous = i64::MIN;
        for x in offsets {
            let ticks = progress_to_ticks(offset_to_progress(x, 20, 60.0), duration_tl);
            assert!(
                ticks >= previous,
                "mapping reversed at scroll_x={x}: {ticks} < {previous}"
            );
            previous = ticks;
        }
    }
}
