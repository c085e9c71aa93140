use crate::core::snapshot::{DriverSample, FinishOutcome, FinishRecord, Snapshot, TrackLocation};
use crate::core::status::DriverStatus;
use crate::core::track::{calc_delta_lap_frac, Track, DEFAULT_REFERENCE_SPEED};
use crate::post::standings_result::{Gap, RankedStandings, StandingEntry, StandingsMode};
use helpers::general::{argsort, window_bounds, SortOrder};
use log::{debug, warn};
use std::cmp::Ordering;
use std::collections::HashSet;
use thiserror::Error;

/// Number of decimal places of the time gaps shown in the results.
pub const DEFAULT_RESULT_DECIMALS: usize = 3;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StandingsError {
    #[error("Reference car {car_index} is not available for ranking")]
    ReferenceNotFound { car_index: u32 },
    #[error("Track length must be positive, but is {length}m")]
    InvalidTrackLength { length: f64 },
    #[error("Reference speed must be positive and finite, but is {speed}m/s")]
    InvalidReferenceSpeed { speed: f64 },
    #[error("Results incomplete: {available} of {expected} lead lap finishers available")]
    ResultsIncomplete { available: usize, expected: usize },
}

impl StandingsError {
    /// The method returns true for conditions that are expected to resolve on a later tick.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StandingsError::ReferenceNotFound { .. } | StandingsError::ResultsIncomplete { .. }
        )
    }
}

/// ViewWindow selects which part of the ranked field is returned. A centered window keeps the
/// reference car in the middle where possible. A size of 0 returns the full field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewWindow {
    Full,
    Centered { size: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeSelection {
    /// Results mode as soon as any driver holds a usable official result.
    Auto,
    LiveOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveFilter {
    /// Every car with a valid track position.
    OnTrack,
    /// Only cars that are on the racing surface, i.e. cars in the pits are dropped as well.
    RacingSurface,
}

/// * `window` - Part of the field that is returned
/// * `mode` - Live/results mode selection
/// * `live_filter` - Which cars take part in the live ranking
/// * `reference_speed` - (m/s) Nominal speed used to convert distance gaps into seconds
/// * `result_decimals` - Decimal places of the result time gaps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandingsOptions {
    pub window: ViewWindow,
    pub mode: ModeSelection,
    pub live_filter: LiveFilter,
    pub reference_speed: f64,
    pub result_decimals: usize,
}

impl Default for StandingsOptions {
    fn default() -> Self {
        StandingsOptions {
            window: ViewWindow::Full,
            mode: ModeSelection::Auto,
            live_filter: LiveFilter::OnTrack,
            reference_speed: DEFAULT_REFERENCE_SPEED,
            result_decimals: DEFAULT_RESULT_DECIMALS,
        }
    }
}

impl StandingsOptions {
    pub fn live_only(&self) -> StandingsOptions {
        StandingsOptions {
            mode: ModeSelection::LiveOnly,
            ..*self
        }
    }
}

struct RankedDriver<'a> {
    sample: &'a DriverSample,
    gap: Gap,
}

// -------------------------------------------------------------------------------------------------
// MAIN METHOD -------------------------------------------------------------------------------------
// -------------------------------------------------------------------------------------------------

/// compute_standings ranks all drivers of the snapshot and calculates their gaps. The function
/// is pure, i.e. the same snapshot always results in the same standings.
pub fn compute_standings(
    snapshot: &Snapshot,
    opts: &StandingsOptions,
) -> Result<RankedStandings, StandingsError> {
    let session = &snapshot.session;
    if !opts.reference_speed.is_finite() || opts.reference_speed <= 0.0 {
        return Err(StandingsError::InvalidReferenceSpeed {
            speed: opts.reference_speed,
        });
    }
    let track = Track::new(session).ok_or(StandingsError::InvalidTrackLength {
        length: session.track_length_metres,
    })?;

    let mode = select_mode(snapshot, opts.mode);

    let (ranked, ref_pos) = match mode {
        StandingsMode::Live => rank_live(snapshot, &track, opts)?,
        StandingsMode::Results => rank_results(snapshot, opts)?,
    };

    let range = match opts.window {
        ViewWindow::Full | ViewWindow::Centered { size: 0 } => 0..ranked.len(),
        ViewWindow::Centered { size } => {
            window_bounds(ranked.len(), ref_pos, size).unwrap_or(0..ranked.len())
        }
    };

    let entries = ranked[range.clone()]
        .iter()
        .zip(range)
        .map(|(driver, idx)| StandingEntry {
            rank: idx as u32 + 1,
            car_index: driver.sample.car_index,
            car_number: driver.sample.car_number.to_owned(),
            display_name: driver.sample.display_name.to_owned(),
            gap: driver.gap,
            status: DriverStatus::classify(driver.sample, session),
            is_reference: driver.sample.car_index == session.reference_car_index,
        })
        .collect();

    Ok(RankedStandings {
        mode,
        reference_car_index: session.reference_car_index,
        total_ranked: ranked.len(),
        entries,
    })
}

// -------------------------------------------------------------------------------------------------
// RANKING -----------------------------------------------------------------------------------------
// -------------------------------------------------------------------------------------------------

/// select_mode decides the mode for this call only. Once any driver holds an official result the
/// live track positions are stale, so the finishing order takes over.
fn select_mode(snapshot: &Snapshot, selection: ModeSelection) -> StandingsMode {
    match selection {
        ModeSelection::LiveOnly => StandingsMode::Live,
        ModeSelection::Auto if snapshot.has_results() => StandingsMode::Results,
        ModeSelection::Auto => StandingsMode::Live,
    }
}

fn keep_live(sample: &DriverSample, filter: LiveFilter) -> bool {
    if !sample.is_on_track || !sample.overall_distance.is_finite() {
        return false;
    }
    match filter {
        LiveFilter::OnTrack => true,
        LiveFilter::RacingSurface => sample.track_location == TrackLocation::OnTrack,
    }
}

/// dedup_by_car_index sorts the drivers by car index and drops repeated car indices, keeping the
/// first sample of every car.
fn dedup_by_car_index<'a>(mut drivers: Vec<&'a DriverSample>) -> Vec<&'a DriverSample> {
    let no_drivers = drivers.len();
    drivers.sort_by_key(|d| d.car_index);
    drivers.dedup_by_key(|d| d.car_index);

    if drivers.len() < no_drivers {
        warn!(
            "Dropped {} samples with duplicate car index",
            no_drivers - drivers.len()
        );
    }
    drivers
}

/// rank_live orders the cars by their circular distance to the reference car, the car furthest
/// ahead first. Equal distances are ordered by car index.
fn rank_live<'a>(
    snapshot: &'a Snapshot,
    track: &Track,
    opts: &StandingsOptions,
) -> Result<(Vec<RankedDriver<'a>>, usize), StandingsError> {
    let ref_idx = snapshot.session.reference_car_index;

    let candidates = dedup_by_car_index(
        snapshot
            .drivers
            .iter()
            .filter(|d| keep_live(d, opts.live_filter))
            .collect(),
    );

    let reference = candidates
        .iter()
        .find(|d| d.car_index == ref_idx)
        .ok_or(StandingsError::ReferenceNotFound { car_index: ref_idx })?;

    let delta_lap_fracs: Vec<f64> = candidates
        .iter()
        .map(|d| calc_delta_lap_frac(d.overall_distance, reference.overall_distance))
        .collect();

    // candidates are sorted by car index, the stable sort keeps that order for ties
    let order = argsort(&delta_lap_fracs, SortOrder::Descending);

    let ranked: Vec<RankedDriver> = order
        .into_iter()
        .map(|i| {
            let sample = candidates[i];
            let gap = if sample.car_index == ref_idx {
                Gap::Reference
            } else {
                Gap::Live {
                    seconds: track.calc_gap_seconds(delta_lap_fracs[i], opts.reference_speed),
                }
            };
            RankedDriver { sample, gap }
        })
        .collect();

    let ref_pos = reference_position(&ranked, ref_idx)?;
    Ok((ranked, ref_pos))
}

fn reference_position(ranked: &[RankedDriver], ref_idx: u32) -> Result<usize, StandingsError> {
    ranked
        .iter()
        .position(|d| d.sample.car_index == ref_idx)
        .ok_or(StandingsError::ReferenceNotFound { car_index: ref_idx })
}

struct Finisher<'a> {
    sample: &'a DriverSample,
    record: &'a FinishRecord,
    outcome: FinishOutcome,
}

impl Finisher<'_> {
    fn on_lead_lap(&self) -> bool {
        matches!(self.outcome, FinishOutcome::LeadLap { .. })
    }
}

/// has_official_order checks if the finishing positions can be used directly as ranking key.
fn has_official_order(finishers: &[Finisher]) -> bool {
    let mut positions = HashSet::with_capacity(finishers.len());
    finishers
        .iter()
        .all(|f| f.record.position > 0 && positions.insert(f.record.position))
}

fn cmp_outcomes(a: &Finisher, b: &Finisher) -> Ordering {
    match (a.outcome, b.outcome) {
        (FinishOutcome::LeadLap { time: t_a }, FinishOutcome::LeadLap { time: t_b }) => {
            t_a.total_cmp(&t_b)
        }
        (FinishOutcome::LapsDown { laps: l_a }, FinishOutcome::LapsDown { laps: l_b }) => {
            l_a.cmp(&l_b)
        }
        (FinishOutcome::LeadLap { .. }, FinishOutcome::LapsDown { .. }) => Ordering::Less,
        (FinishOutcome::LapsDown { .. }, FinishOutcome::LeadLap { .. }) => Ordering::Greater,
    }
}

/// rank_results orders the finishers by their official result. Lead lap finishers are always
/// ranked above lapped finishers. The reference car must hold a usable result itself.
fn rank_results<'a>(
    snapshot: &'a Snapshot,
    opts: &StandingsOptions,
) -> Result<(Vec<RankedDriver<'a>>, usize), StandingsError> {
    let session = &snapshot.session;
    let ref_idx = session.reference_car_index;

    let mut finishers: Vec<Finisher> = dedup_by_car_index(snapshot.drivers.iter().collect())
        .into_iter()
        .filter_map(|sample| {
            let record = sample.progress.finish_record()?;
            let outcome = record.outcome()?;
            Some(Finisher {
                sample,
                record,
                outcome,
            })
        })
        .collect();

    let available = finishers.iter().filter(|f| f.on_lead_lap()).count();
    let expected = session.drivers_on_lead_lap as usize;
    if available < expected {
        debug!(
            "Waiting for lead lap finishers: {} of {} available",
            available, expected
        );
        return Err(StandingsError::ResultsIncomplete {
            available,
            expected,
        });
    }

    if has_official_order(&finishers) {
        finishers.sort_by(|a, b| {
            b.on_lead_lap()
                .cmp(&a.on_lead_lap())
                .then(a.record.position.cmp(&b.record.position))
        });
    } else {
        finishers.sort_by(|a, b| {
            cmp_outcomes(a, b)
                .then(a.record.position.cmp(&b.record.position))
                .then(a.sample.car_index.cmp(&b.sample.car_index))
        });
    }

    let leader_time = match finishers.first().map(|f| f.outcome) {
        Some(FinishOutcome::LeadLap { time }) => time,
        _ => 0.0,
    };
    let race_time = if session.elapsed_race_time > 0.0 {
        session.elapsed_race_time
    } else {
        leader_time
    };

    let ranked: Vec<RankedDriver> = finishers
        .iter()
        .enumerate()
        .map(|(i, f)| {
            let gap = match f.outcome {
                // a lapped leader keeps its lap deficit
                _ if i == 0 && f.on_lead_lap() => Gap::RaceTime {
                    seconds: race_time,
                    decimals: opts.result_decimals,
                },
                FinishOutcome::LeadLap { time } => Gap::BehindLeader {
                    seconds: (time - leader_time).max(0.0),
                    decimals: opts.result_decimals,
                },
                FinishOutcome::LapsDown { laps } => Gap::LapsDown { laps },
            };
            RankedDriver {
                sample: f.sample,
                gap,
            }
        })
        .collect();

    let ref_pos = reference_position(&ranked, ref_idx)?;
    Ok((ranked, ref_pos))
}
