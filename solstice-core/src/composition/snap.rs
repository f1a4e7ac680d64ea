//! Beat-snap arithmetic for pointer placement.
//!
//! Times are snapped onto the grid defined by the map's primary timing point:
//! lines sit at `offset + k * (beat / snap)` for integer `k`. Keyboard
//! placement bypasses snapping entirely and uses the raw playback time.

/// Which neighboring snap line to pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapDirection {
    Forward,
    Backward,
}

/// Milliseconds between adjacent snap lines for a beat divisor.
pub fn snap_interval_ms(snap: u32, bpm: f32) -> f64 {
    60_000.0 / f64::from(bpm) / f64::from(snap.max(1))
}

/// The snap line at or beyond `time` in the given direction. A time already
/// on a line maps to itself in both directions.
pub fn snap_time(direction: SnapDirection, snap: u32, bpm: f32, offset_ms: f64, time: f64) -> f64 {
    let interval = snap_interval_ms(snap, bpm);
    let steps = (time - offset_ms) / interval;
    let steps = match direction {
        SnapDirection::Forward => steps.ceil(),
        SnapDirection::Backward => steps.floor(),
    };
    offset_ms + steps * interval
}

/// Snap `time` to whichever neighboring line is strictly closer. On an exact
/// tie the raw time is kept unchanged.
pub fn snap_to_nearest(snap: u32, bpm: f32, offset_ms: f64, time: f64) -> f64 {
    let forward = snap_time(SnapDirection::Forward, snap, bpm, offset_ms, time);
    let backward = snap_time(SnapDirection::Backward, snap, bpm, offset_ms, time);

    let forward_diff = (forward - time).abs();
    let backward_diff = (backward - time).abs();
    if forward_diff < backward_diff {
        forward
    } else if backward_diff < forward_diff {
        backward
    } else {
        time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 120 BPM quarter notes: lines every 500ms from the offset.

    #[test]
    fn interval_scales_with_divisor() {
        assert_eq!(snap_interval_ms(1, 120.0), 500.0);
        assert_eq!(snap_interval_ms(2, 120.0), 250.0);
        assert_eq!(snap_interval_ms(4, 120.0), 125.0);
    }

    #[test]
    fn zero_divisor_is_treated_as_one() {
        assert_eq!(snap_interval_ms(0, 120.0), 500.0);
    }

    #[test]
    fn directional_snap_picks_neighboring_lines() {
        assert_eq!(snap_time(SnapDirection::Backward, 1, 120.0, 0.0, 620.0), 500.0);
        assert_eq!(snap_time(SnapDirection::Forward, 1, 120.0, 0.0, 620.0), 1000.0);
    }

    #[test]
    fn on_grid_time_maps_to_itself() {
        assert_eq!(snap_time(SnapDirection::Backward, 1, 120.0, 0.0, 1000.0), 1000.0);
        assert_eq!(snap_time(SnapDirection::Forward, 1, 120.0, 0.0, 1000.0), 1000.0);
    }

    #[test]
    fn offset_shifts_the_grid() {
        // Lines at 37, 537, 1037, ...
        assert_eq!(snap_time(SnapDirection::Backward, 1, 120.0, 37.0, 600.0), 537.0);
        assert_eq!(snap_time(SnapDirection::Forward, 1, 120.0, 37.0, 600.0), 1037.0);
    }

    #[test]
    fn negative_time_snaps_onto_extrapolated_lines() {
        assert_eq!(snap_time(SnapDirection::Backward, 1, 120.0, 0.0, -120.0), -500.0);
        assert_eq!(snap_time(SnapDirection::Forward, 1, 120.0, 0.0, -120.0), 0.0);
    }

    #[test]
    fn nearest_picks_the_closer_line() {
        assert_eq!(snap_to_nearest(1, 120.0, 0.0, 620.0), 500.0);
        assert_eq!(snap_to_nearest(1, 120.0, 0.0, 880.0), 1000.0);
    }

    #[test]
    fn nearest_keeps_raw_time_on_exact_tie() {
        assert_eq!(snap_to_nearest(1, 120.0, 0.0, 750.0), 750.0);
    }

    #[test]
    fn finer_divisor_tightens_the_grid() {
        // Sixteenths at 120 BPM: lines every 125ms.
        assert_eq!(snap_to_nearest(4, 120.0, 0.0, 130.0), 125.0);
        assert_eq!(snap_to_nearest(4, 120.0, 0.0, 190.0), 250.0);
    }
}
