use clap::Parser;
use log::{info, warn};
use rayon::prelude::*;
use standings::core::engine::{compute_standings, StandingsOptions};
use standings::core::handle_replay::{handle_replay, ReplaySummary, StandingsTracker};
use standings::core::snapshot::Snapshot;
use standings::core::status::lap_banner;
use standings::pre::read_snapshot::{read_replay, read_snapshot};
use standings::pre::replay_opts::ReplayOpts;
use std::thread;
use std::time::Instant;

/// run_batch evaluates all frames in parallel. Every frame is an immutable snapshot of its own, only
/// the fallback handling has to run in tick order afterwards.
fn run_batch(frames: &[Snapshot], opts: StandingsOptions) -> ReplaySummary {
    let results: Vec<_> = frames
        .par_iter()
        .map(|snapshot| compute_standings(snapshot, &opts))
        .collect();

    let mut tracker = StandingsTracker::new(opts);
    for (tick, (snapshot, result)) in frames.iter().zip(results).enumerate() {
        tracker.resolve(tick, snapshot, result);
    }
    tracker.finish()
}

fn print_lap_banner(snapshot: &Snapshot) {
    let session = &snapshot.session;
    if !session.race_phase.is_race() || session.total_session_laps == 0 {
        return;
    }
    if let Some(reference) = snapshot.reference() {
        println!(
            "{}",
            lap_banner(reference.lap_number, session.total_session_laps)
        );
    }
}

fn main() -> anyhow::Result<()> {
    // PRE-PROCESSING ------------------------------------------------------------------------------
    // get replay options from the command line arguments
    let replay_opts: ReplayOpts = ReplayOpts::parse();

    env_logger::Builder::new()
        .filter_level(if replay_opts.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .parse_default_env()
        .init();

    replay_opts.validate()?;

    info!("Reading replay from {:?}", replay_opts.replay_path);
    let frames = match replay_opts.replay_path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => vec![read_snapshot(&replay_opts.replay_path)?],
        _ => read_replay(&replay_opts.replay_path)?,
    };
    if frames.is_empty() {
        anyhow::bail!("Replay file {:?} contains no snapshots!", replay_opts.replay_path);
    }

    let standings_opts = replay_opts.standings_options();
    info!(
        "Replaying {} ticks with {:?} view",
        frames.len(),
        standings_opts.window
    );

    // EXECUTION -----------------------------------------------------------------------------------
    let t_start = Instant::now();

    let summary = if replay_opts.batch {
        run_batch(&frames, standings_opts)
    } else if !replay_opts.realtime {
        handle_replay(&frames, &standings_opts, None, 1.0)?
    } else {
        // stream the frames from a replay thread, the display loop stays on the main thread
        let (tx, rx) = flume::unbounded();
        let frames_thread = frames.clone();
        let realtime_factor = replay_opts.realtime_factor;

        let replay_thread = thread::spawn(move || {
            handle_replay(&frames_thread, &standings_opts, Some(&tx), realtime_factor)
        });

        for frame in rx.iter() {
            match &frame.standings {
                Some(standings) => {
                    println!(
                        "Tick {}{}",
                        frame.tick,
                        if frame.held_over { " (held over)" } else { "" }
                    );
                    print_lap_banner(&frames[frame.tick]);
                    standings.print_standings();
                }
                None => warn!("Tick {}: nothing to display", frame.tick),
            }
        }

        replay_thread
            .join()
            .map_err(|_| anyhow::anyhow!("Replay thread panicked!"))??
    };

    info!("Execution time: {}ms", t_start.elapsed().as_millis());

    // POST-PROCESSING -----------------------------------------------------------------------------
    let last = match &summary.last {
        Some(last) => last,
        None => anyhow::bail!("No valid standings were computed for the replay!"),
    };

    if let Some(snapshot) = frames.last() {
        print_lap_banner(snapshot);
    }
    last.print_standings();

    if let Some(export_path) = &replay_opts.export {
        let path = last.write_standings_to_csv(export_path)?;
        info!("Standings written to {}", path);
    }

    Ok(())
}
