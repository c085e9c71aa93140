use crate::core::snapshot::SessionContext;
use helpers::general::lap_frac;

/// Conversion factor from the lap fraction unit used by the telemetry source to metres (per metre
/// of track length).
pub const METRES_PER_PERCENT_FACTOR: f64 = 10.0;

/// (m/s) Nominal closing speed used to turn a distance gap into seconds. This is a display scale
/// (90 mph), not a measured speed.
pub const DEFAULT_REFERENCE_SPEED: f64 = 90.0 / 2.23693629;

/// Track holds the session constant geometry that is required to compare car positions.
#[derive(Debug, Clone, Copy)]
pub struct Track {
    pub metres_per_percent: f64,
}

impl Track {
    /// The method returns None if the track length does not allow any distance calculations.
    pub fn new(session: &SessionContext) -> Option<Track> {
        let length = session.track_length_metres;
        if !length.is_finite() || length <= 0.0 {
            return None;
        }

        Some(Track {
            metres_per_percent: length * METRES_PER_PERCENT_FACTOR,
        })
    }

    /// The method converts a normalized lap fraction difference into a gap in seconds on the
    /// basis of the given nominal speed. Positive gaps mean the car is ahead.
    pub fn calc_gap_seconds(&self, delta_lap_frac: f64, reference_speed: f64) -> f64 {
        delta_lap_frac * self.metres_per_percent / reference_speed
    }
}

/// normalize_lap_diff maps a lap fraction difference into [-0.5, 0.5] such that cars on either
/// side of the finish line are compared by their actual distance on track.
pub fn normalize_lap_diff(diff: f64) -> f64 {
    if diff < -0.5 {
        diff + 1.0
    } else if diff > 0.5 {
        diff - 1.0
    } else {
        diff
    }
}

/// calc_delta_lap_frac returns the normalized difference of the positions within the lap of two
/// cars. Completed laps are ignored.
pub fn calc_delta_lap_frac(overall_distance: f64, reference_distance: f64) -> f64 {
    normalize_lap_diff(lap_frac(overall_distance) - lap_frac(reference_distance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::snapshot::RacePhase;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn session(length: f64) -> SessionContext {
        SessionContext {
            track_length_metres: length,
            total_session_laps: 10,
            drivers_on_lead_lap: 0,
            reference_car_index: 0,
            race_phase: RacePhase::Race,
            elapsed_race_time: 0.0,
        }
    }

    #[test]
    fn wraps_across_the_finish_line() {
        assert_abs_diff_eq!(calc_delta_lap_frac(0.02, 0.95), 0.07, epsilon = 1e-9);
        assert_abs_diff_eq!(calc_delta_lap_frac(0.95, 0.02), -0.07, epsilon = 1e-9);
        assert_abs_diff_eq!(calc_delta_lap_frac(0.60, 0.50), 0.10, epsilon = 1e-9);
    }

    #[test]
    fn ignores_completed_laps() {
        assert_abs_diff_eq!(calc_delta_lap_frac(7.02, 6.95), 0.07, epsilon = 1e-9);
        assert_abs_diff_eq!(calc_delta_lap_frac(3.40, 9.50), -0.10, epsilon = 1e-9);
    }

    #[test]
    fn half_lap_is_not_wrapped() {
        assert_abs_diff_eq!(normalize_lap_diff(0.5), 0.5);
        assert_abs_diff_eq!(normalize_lap_diff(-0.5), -0.5);
    }

    #[test]
    fn rejects_invalid_track_length() {
        assert!(Track::new(&session(0.0)).is_none());
        assert!(Track::new(&session(-100.0)).is_none());
        assert!(Track::new(&session(f64::NAN)).is_none());
    }

    #[test]
    fn gap_scales_with_track_length() {
        let track = Track::new(&session(4000.0)).unwrap();
        assert_relative_eq!(track.metres_per_percent, 40000.0);
        assert_relative_eq!(
            track.calc_gap_seconds(0.1, DEFAULT_REFERENCE_SPEED),
            4000.0 / DEFAULT_REFERENCE_SPEED
        );
        assert_relative_eq!(DEFAULT_REFERENCE_SPEED, 40.2336, epsilon = 1e-4);
    }
}
