use crate::core::snapshot::{DriverSample, SessionContext, TrackLocation};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LapStatus {
    NotStarted,
    Running,
    FinalLap,
    RaceOver,
}

/// DriverStatus contains the advisory flags of a driver. They are used for coloring and labeling
/// only and never influence the order of the standings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DriverStatus {
    pub lap: LapStatus,
    pub location: TrackLocation,
}

impl DriverStatus {
    pub fn classify(sample: &DriverSample, session: &SessionContext) -> DriverStatus {
        DriverStatus {
            lap: classify_lap(sample.lap_number, session),
            location: sample.track_location,
        }
    }

    pub fn about_to_finish(&self) -> bool {
        self.lap == LapStatus::FinalLap
    }

    pub fn race_over(&self) -> bool {
        self.lap == LapStatus::RaceOver
    }

    pub fn in_pit(&self) -> bool {
        self.location == TrackLocation::InPitStall
    }

    pub fn approaching_pit(&self) -> bool {
        self.location == TrackLocation::ApproachingPits
    }

    /// Short label for the status column.
    pub fn label(&self) -> &'static str {
        if self.in_pit() {
            "PIT"
        } else if self.approaching_pit() {
            "IN"
        } else {
            match self.lap {
                LapStatus::FinalLap => "FINAL",
                LapStatus::RaceOver => "FIN",
                LapStatus::NotStarted | LapStatus::Running => "",
            }
        }
    }
}

fn classify_lap(lap: u32, session: &SessionContext) -> LapStatus {
    let tot_no_laps = session.total_session_laps;

    if !session.race_phase.is_race() || tot_no_laps == 0 {
        return LapStatus::Running;
    }

    if lap == 0 {
        LapStatus::NotStarted
    } else if lap == tot_no_laps {
        LapStatus::FinalLap
    } else if lap > tot_no_laps {
        LapStatus::RaceOver
    } else {
        LapStatus::Running
    }
}

/// lap_banner returns the lap counter text shown for the reference car.
pub fn lap_banner(lap: u32, tot_no_laps: u32) -> String {
    if lap == tot_no_laps {
        String::from("FINAL LAP")
    } else if lap > tot_no_laps {
        String::from("RACE OVER")
    } else {
        format!("LAP {}/{}", lap, tot_no_laps)
    }
}
