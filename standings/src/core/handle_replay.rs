use crate::core::engine::{compute_standings, StandingsError, StandingsOptions};
use crate::core::snapshot::Snapshot;
use crate::interfaces::display_interface::{StandingsFrame, MAX_DISPLAY_UPDATE_FREQUENCY};
use crate::post::standings_result::{RankedStandings, StandingsMode};
use anyhow::Context;
use flume::Sender;
use log::{debug, error, info, warn};
use std::thread::sleep;
use std::time::{Duration, Instant};

/// ReplaySummary counts how the frames of a replay were handled.
#[derive(Debug, Clone, Default)]
pub struct ReplaySummary {
    pub frames: usize,
    pub computed: usize,
    pub live_fallbacks: usize,
    pub held_over: usize,
    pub skipped: usize,
    pub last: Option<RankedStandings>,
}

/// StandingsTracker applies the caller side retry policy on top of the pure engine: incomplete
/// results fall back to the live standings, a missing reference car holds the last valid
/// standings and invalid session data is never displayed.
#[derive(Debug)]
pub struct StandingsTracker {
    opts: StandingsOptions,
    last_good: Option<RankedStandings>,
    summary: ReplaySummary,
}

impl StandingsTracker {
    pub fn new(opts: StandingsOptions) -> StandingsTracker {
        StandingsTracker {
            opts,
            last_good: None,
            summary: ReplaySummary::default(),
        }
    }

    /// The method computes the standings of a single tick.
    pub fn process(&mut self, tick: usize, snapshot: &Snapshot) -> StandingsFrame {
        let result = compute_standings(snapshot, &self.opts);
        self.resolve(tick, snapshot, result)
    }

    /// The method handles an engine result that was already computed for the given snapshot, e.g.
    /// on a worker thread.
    pub fn resolve(
        &mut self,
        tick: usize,
        snapshot: &Snapshot,
        result: Result<RankedStandings, StandingsError>,
    ) -> StandingsFrame {
        self.summary.frames += 1;

        let result = match result {
            Err(StandingsError::ResultsIncomplete {
                available,
                expected,
            }) => {
                debug!(
                    "Tick {}: {} of {} lead lap finishers, using live standings",
                    tick, available, expected
                );
                self.summary.live_fallbacks += 1;
                compute_standings(snapshot, &self.opts.live_only())
            }
            other => other,
        };

        match result {
            Ok(standings) => {
                let prev_mode = self.last_good.as_ref().map(|s| s.mode);
                if prev_mode != Some(standings.mode) {
                    info!("Tick {}: standings switched to {:?} mode", tick, standings.mode);
                }
                self.summary.computed += 1;
                self.last_good = Some(standings.clone());
                StandingsFrame {
                    tick,
                    standings: Some(standings),
                    held_over: false,
                }
            }
            Err(err) if err.is_transient() => {
                warn!("Tick {}: {}, holding last standings", tick, err);
                self.summary.held_over += 1;
                StandingsFrame {
                    tick,
                    standings: self.last_good.clone(),
                    held_over: true,
                }
            }
            Err(err) => {
                error!("Tick {}: {}, frame skipped", tick, err);
                self.summary.skipped += 1;
                StandingsFrame {
                    tick,
                    standings: None,
                    held_over: false,
                }
            }
        }
    }

    pub fn last_good(&self) -> Option<&RankedStandings> {
        self.last_good.as_ref()
    }

    pub fn finish(mut self) -> ReplaySummary {
        self.summary.last = self.last_good.take();
        self.summary
    }
}

/// handle_replay feeds the recorded frames through the standings engine and returns a summary of
/// the replay. If a sender is inserted, every frame is sent to the display and the replay is
/// paced in real-time.
pub fn handle_replay(
    frames: &[Snapshot],
    opts: &StandingsOptions,
    tx: Option<&Sender<StandingsFrame>>,
    realtime_factor: f64,
) -> anyhow::Result<ReplaySummary> {
    let mut tracker = StandingsTracker::new(*opts);
    let tick_interval_ms = 1000.0 / MAX_DISPLAY_UPDATE_FREQUENCY / realtime_factor;
    let mut cur_mode: Option<StandingsMode> = None;

    for (tick, snapshot) in frames.iter().enumerate() {
        let t_start = Instant::now();
        let frame = tracker.process(tick, snapshot);

        if let Some(standings) = &frame.standings {
            if cur_mode != Some(standings.mode) && standings.mode == StandingsMode::Results {
                info!("Results available after {} ticks", tick + 1);
            }
            cur_mode = Some(standings.mode);
        }

        if let Some(tx) = tx {
            tx.send(frame)
                .context("Failed to send standings frame to display!")?;

            // sleep until the tick is finished in real-time as well (calculation in ms)
            let t_sleep = tick_interval_ms as i64 - t_start.elapsed().as_millis() as i64;
            if t_sleep > 0 {
                sleep(Duration::from_millis(t_sleep as u64));
            } else {
                warn!("Could not keep up with real-time!")
            }
        }
    }

    let summary = tracker.finish();
    info!(
        "Replayed {} frames: {} computed, {} live fallbacks, {} held over, {} skipped",
        summary.frames,
        summary.computed,
        summary.live_fallbacks,
        summary.held_over,
        summary.skipped
    );
    Ok(summary)
}
