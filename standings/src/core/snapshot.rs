use serde::{Deserialize, Serialize};

/// TrackLocation is the categorical track surface information the telemetry source reports for
/// every car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackLocation {
    NotInWorld,
    OffTrack,
    InPitStall,
    ApproachingPits,
    OnTrack,
}

impl Default for TrackLocation {
    fn default() -> Self {
        TrackLocation::NotInWorld
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RacePhase {
    Practice,
    Qualifying,
    Race,
    Results,
}

impl Default for RacePhase {
    fn default() -> Self {
        RacePhase::Race
    }
}

impl RacePhase {
    /// The method returns true if the session is a race, i.e. lap counts are compared against the
    /// scheduled race distance.
    pub fn is_race(&self) -> bool {
        matches!(self, RacePhase::Race | RacePhase::Results)
    }
}

/// * `position` - Official finishing position (1-based, 0 if not assigned yet)
/// * `time` - (s) Finishing time, negative while the result is still a placeholder
/// * `lap_deficit` - Laps behind the winner, 0 if the driver finished on the lead lap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinishRecord {
    pub position: u32,
    pub time: f64,
    #[serde(default)]
    pub lap_deficit: u32,
}

/// FinishOutcome is the usable part of a finish record. Lead lap finishers can be compared by
/// time, lapped finishers only by their lap deficit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FinishOutcome {
    LeadLap { time: f64 },
    LapsDown { laps: u32 },
}

impl FinishRecord {
    /// The method classifies the record. None is returned for placeholder records that do not
    /// contain a valid time and no lap deficit either.
    pub fn outcome(&self) -> Option<FinishOutcome> {
        if self.lap_deficit > 0 {
            Some(FinishOutcome::LapsDown {
                laps: self.lap_deficit,
            })
        } else if self.time.is_finite() && self.time >= 0.0 {
            Some(FinishOutcome::LeadLap { time: self.time })
        } else {
            None
        }
    }
}

/// DriverProgress separates drivers that are still running from drivers with an official result
/// such that finish fields are only accessible once they are valid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DriverProgress {
    Running,
    Finished(FinishRecord),
}

impl Default for DriverProgress {
    fn default() -> Self {
        DriverProgress::Running
    }
}

impl DriverProgress {
    /// The method returns the usable finish outcome, if there is one.
    pub fn finish_outcome(&self) -> Option<FinishOutcome> {
        match self {
            DriverProgress::Running => None,
            DriverProgress::Finished(record) => record.outcome(),
        }
    }

    pub fn finish_record(&self) -> Option<&FinishRecord> {
        match self {
            DriverProgress::Running => None,
            DriverProgress::Finished(record) => Some(record),
        }
    }
}

/// * `car_index` - Stable identity of the car within the session
/// * `car_number` - Car number as shown on the car (pass-through)
/// * `display_name` - Driver name (pass-through)
/// * `is_on_track` - False for cars in the garage or without valid track position
/// * `overall_distance` - Completed laps plus the fraction of the current lap
/// * `lap_number` - Lap counter reported by the telemetry source
/// * `track_location` - Surface the car currently is on
/// * `progress` - Running or finished including the official result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverSample {
    pub car_index: u32,
    pub car_number: String,
    pub display_name: String,
    pub is_on_track: bool,
    pub overall_distance: f64,
    pub lap_number: u32,
    #[serde(default)]
    pub track_location: TrackLocation,
    #[serde(default)]
    pub progress: DriverProgress,
}

impl DriverSample {
    /// The method returns a running on-track sample. It is mostly used to set up scenarios.
    pub fn on_track(car_index: u32, overall_distance: f64) -> DriverSample {
        DriverSample {
            car_index,
            car_number: car_index.to_string(),
            display_name: format!("Driver {}", car_index),
            is_on_track: true,
            overall_distance,
            lap_number: overall_distance.max(0.0).floor() as u32,
            track_location: TrackLocation::OnTrack,
            progress: DriverProgress::Running,
        }
    }

    /// The method returns a copy of the sample that carries the given official result.
    pub fn finished(mut self, position: u32, time: f64, lap_deficit: u32) -> DriverSample {
        self.progress = DriverProgress::Finished(FinishRecord {
            position,
            time,
            lap_deficit,
        });
        self
    }
}

/// * `track_length_metres` - (m) Length of the track
/// * `total_session_laps` - Scheduled race distance in laps (0 for timed or open sessions)
/// * `drivers_on_lead_lap` - Number of cars that will be classified on the lead lap
/// * `reference_car_index` - Car the relative standings are centered on
/// * `race_phase` - Current phase of the session
/// * `elapsed_race_time` - (s) Elapsed race time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    pub track_length_metres: f64,
    pub total_session_laps: u32,
    #[serde(default)]
    pub drivers_on_lead_lap: u32,
    pub reference_car_index: u32,
    #[serde(default)]
    pub race_phase: RacePhase,
    #[serde(default)]
    pub elapsed_race_time: f64,
}

/// Snapshot is the immutable record of all drivers for one telemetry tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub session: SessionContext,
    pub drivers: Vec<DriverSample>,
}

impl Snapshot {
    pub fn driver(&self, car_index: u32) -> Option<&DriverSample> {
        self.drivers.iter().find(|d| d.car_index == car_index)
    }

    pub fn reference(&self) -> Option<&DriverSample> {
        self.driver(self.session.reference_car_index)
    }

    /// The method returns true if at least one driver holds a usable official result.
    pub fn has_results(&self) -> bool {
        self.drivers
            .iter()
            .any(|d| d.progress.finish_outcome().is_some())
    }
}
