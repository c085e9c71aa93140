use crate::core::engine::{LiveFilter, ModeSelection, StandingsOptions, ViewWindow};
use crate::core::track::DEFAULT_REFERENCE_SPEED;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[clap(
    version = "0.1.0",
    author = "Alexander Heilmeier <alexander.heilmeier@tum.de>",
    name = "standings-cli",
    about = "Replays recorded race telemetry through the live standings engine"
)]
pub struct ReplayOpts {
    // FLAGS ---------------------------------------------------------------------------------------
    /// Activate debug logging
    #[clap(short, long)]
    pub debug: bool,

    /// Stream the replay in real-time through a separate replay thread
    #[clap(short = 'g', long)]
    pub realtime: bool,

    /// Evaluate all frames in parallel and print the final standings only
    #[clap(short, long, conflicts_with = "realtime")]
    pub batch: bool,

    /// Rank only cars on the racing surface (cars in the pits are dropped)
    #[clap(long)]
    pub racing_surface: bool,

    // OPTIONS -------------------------------------------------------------------------------------
    /// Set path to the replay file (JSON lines, one snapshot per tick, or a single .json snapshot)
    #[clap(short, long)]
    pub replay_path: PathBuf,

    /// Set number of rows of a window centered on the reference car (0 shows the full field)
    #[clap(short, long, default_value = "0")]
    pub window: usize,

    /// Set nominal speed in m/s used to convert distance gaps into seconds
    #[clap(short = 's', long, default_value_t = DEFAULT_REFERENCE_SPEED)]
    pub reference_speed: f64,

    /// Set real-time factor (only relevant in real-time mode)
    #[clap(short = 'f', long, default_value = "1.0")]
    pub realtime_factor: f64,

    /// Set path of a CSV file the final standings are exported to
    #[clap(short, long)]
    pub export: Option<PathBuf>,
}

impl ReplayOpts {
    /// The method checks the numeric options that clap cannot restrict by itself.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.reference_speed.is_finite() || self.reference_speed <= 0.0 {
            anyhow::bail!(
                "Reference speed must be positive, but is {}m/s!",
                self.reference_speed
            );
        }
        if self.realtime && (!self.realtime_factor.is_finite() || self.realtime_factor <= 0.0) {
            anyhow::bail!(
                "Real-time factor must be positive, but is {}!",
                self.realtime_factor
            );
        }
        Ok(())
    }

    /// The method returns the engine options for the given command line options.
    pub fn standings_options(&self) -> StandingsOptions {
        StandingsOptions {
            window: if self.window == 0 {
                ViewWindow::Full
            } else {
                ViewWindow::Centered { size: self.window }
            },
            mode: ModeSelection::Auto,
            live_filter: if self.racing_surface {
                LiveFilter::RacingSurface
            } else {
                LiveFilter::OnTrack
            },
            reference_speed: self.reference_speed,
            ..StandingsOptions::default()
        }
    }
}
