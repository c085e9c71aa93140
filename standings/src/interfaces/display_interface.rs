use crate::post::standings_result::RankedStandings;

/// (Hz) Highest rate at which standings frames are handed to the display.
pub const MAX_DISPLAY_UPDATE_FREQUENCY: f64 = 20.0;

/// StandingsFrame is the message a display receives once per processed telemetry tick.
///
/// * `tick` - Index of the telemetry tick the frame belongs to
/// * `standings` - Standings to display, None if nothing valid was computed yet
/// * `held_over` - True if the standings were carried over from an earlier tick
#[derive(Debug, Clone, Default)]
pub struct StandingsFrame {
    pub tick: usize,
    pub standings: Option<RankedStandings>,
    pub held_over: bool,
}
