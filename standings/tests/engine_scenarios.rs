//! End-to-end scenarios for the standings engine: live racing, the approach to the finish and the
//! final classification.

use approx::assert_relative_eq;
use standings::core::engine::{compute_standings, StandingsError, StandingsOptions, ViewWindow};
use standings::core::snapshot::{DriverSample, RacePhase, SessionContext, Snapshot};
use standings::core::track::DEFAULT_REFERENCE_SPEED;
use standings::post::standings_result::{Gap, StandingsMode};
use standings::post::time_format::{format_time, parse_time};

fn session(reference_car_index: u32, drivers_on_lead_lap: u32) -> SessionContext {
    SessionContext {
        track_length_metres: 4000.0,
        total_session_laps: 20,
        drivers_on_lead_lap,
        reference_car_index,
        race_phase: RacePhase::Race,
        elapsed_race_time: 2400.0,
    }
}

#[test]
fn reference_in_the_middle_of_three_cars() {
    let snapshot = Snapshot {
        session: session(0, 0),
        drivers: vec![
            DriverSample::on_track(0, 0.50),
            DriverSample::on_track(1, 0.60),
            DriverSample::on_track(2, 0.40),
        ],
    };

    let standings = compute_standings(&snapshot, &StandingsOptions::default()).unwrap();
    let ranks: Vec<(u32, u32)> = standings.iter().map(|e| (e.car_index, e.rank)).collect();
    assert_eq!(ranks, vec![(1, 1), (0, 2), (2, 3)]);

    let metres = 0.10 * 4000.0 * 10.0;
    match standings.entry(1).unwrap().gap {
        Gap::Live { seconds } => {
            assert_relative_eq!(seconds, metres / DEFAULT_REFERENCE_SPEED, max_relative = 1e-9)
        }
        other => panic!("unexpected gap {:?}", other),
    }
    match standings.entry(2).unwrap().gap {
        Gap::Live { seconds } => {
            assert_relative_eq!(seconds, -metres / DEFAULT_REFERENCE_SPEED, max_relative = 1e-9)
        }
        other => panic!("unexpected gap {:?}", other),
    }
    assert_eq!(standings.reference_entry().unwrap().gap_text(), "");
}

#[test]
fn tunable_reference_speed_scales_gaps() {
    let snapshot = Snapshot {
        session: session(0, 0),
        drivers: vec![
            DriverSample::on_track(0, 3.50),
            DriverSample::on_track(1, 3.51),
        ],
    };
    let opts = StandingsOptions {
        reference_speed: 100.0,
        ..StandingsOptions::default()
    };

    let standings = compute_standings(&snapshot, &opts).unwrap();
    // 0.01 laps of 4000m scaled by 10 at 100 m/s
    assert_eq!(standings.entry(1).unwrap().gap_text(), "4.0");
}

#[test]
fn mode_is_decided_per_call() {
    let running = Snapshot {
        session: session(0, 2),
        drivers: vec![
            DriverSample::on_track(0, 19.95),
            DriverSample::on_track(1, 19.97),
        ],
    };

    // same session, one tick later the leader has taken the flag
    let mut finished = running.clone();
    finished.drivers[1] = finished.drivers[1].clone().finished(1, 2400.0, 0);
    finished.drivers[0] = finished.drivers[0].clone().finished(2, 2401.5, 0);

    let opts = StandingsOptions::default();
    assert_eq!(
        compute_standings(&running, &opts).unwrap().mode,
        StandingsMode::Live
    );
    assert_eq!(
        compute_standings(&finished, &opts).unwrap().mode,
        StandingsMode::Results
    );
    assert_eq!(
        compute_standings(&running, &opts).unwrap().mode,
        StandingsMode::Live
    );
}

fn finishing_field(no_finished: usize) -> Snapshot {
    let times = [2400.0, 2403.2, 2404.0, 2410.9, 2411.0];
    let drivers = (0..5)
        .map(|i| {
            let sample = DriverSample::on_track(i as u32, 19.9 + 0.01 * i as f64);
            if i < no_finished {
                sample.finished(0, times[i], 0)
            } else {
                sample
            }
        })
        .collect();

    Snapshot {
        session: session(3, 5),
        drivers,
    }
}

#[test]
fn results_wait_for_all_lead_lap_finishers() {
    let err = compute_standings(&finishing_field(3), &StandingsOptions::default()).unwrap_err();
    assert_eq!(
        err,
        StandingsError::ResultsIncomplete {
            available: 3,
            expected: 5
        }
    );

    let standings = compute_standings(&finishing_field(5), &StandingsOptions::default()).unwrap();
    assert_eq!(standings.mode, StandingsMode::Results);
    let order: Vec<u32> = standings.iter().map(|e| e.car_index).collect();
    assert_eq!(order, vec![0, 1, 2, 3, 4]);

    let gaps: Vec<String> = standings.iter().map(|e| e.gap_text()).collect();
    assert_eq!(gaps, vec!["40:00.000", "-3.200", "-4.000", "-10.900", "-11.000"]);
}

#[test]
fn windowed_results_center_on_reference() {
    let opts = StandingsOptions {
        window: ViewWindow::Centered { size: 3 },
        ..StandingsOptions::default()
    };

    let standings = compute_standings(&finishing_field(5), &opts).unwrap();
    let ranks: Vec<u32> = standings.iter().map(|e| e.rank).collect();
    assert_eq!(ranks, vec![3, 4, 5]);
    assert!(standings.reference_entry().unwrap().is_reference);
    assert_eq!(standings.total_ranked, 5);
}

#[test]
fn final_lap_status_is_advisory() {
    let mut leader = DriverSample::on_track(1, 19.8);
    leader.lap_number = 20;
    let mut reference = DriverSample::on_track(0, 19.6);
    reference.lap_number = 19;

    let snapshot = Snapshot {
        session: session(0, 0),
        drivers: vec![reference, leader],
    };

    let standings = compute_standings(&snapshot, &StandingsOptions::default()).unwrap();
    assert_eq!(standings.entries[0].car_index, 1);
    assert!(standings.entries[0].status.about_to_finish());
    assert!(!standings.entries[1].status.about_to_finish());
}

#[test]
fn time_formatting_contract() {
    assert_eq!(format_time(83.456, 3), "1:23.456");
    assert_eq!(format_time(9.5, 2), "9.50");
    assert_relative_eq!(
        parse_time(&format_time(83.456, 3)).unwrap(),
        83.456,
        epsilon = 1e-9
    );
    assert!(parse_time("one minute").is_err());
}
