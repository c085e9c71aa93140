use crate::core::status::DriverStatus;
use crate::post::time_format::format_time;
use anyhow::Context;
use serde::Serialize;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StandingsMode {
    Live,
    Results,
}

/// Gap is the derived gap value of one entry. Live gaps are relative to the reference car, result
/// gaps are relative to the winner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Gap {
    /// The entry is the reference car itself.
    Reference,
    /// (s) Estimated gap to the reference car, positive if ahead.
    Live { seconds: f64 },
    /// (s) Elapsed race time, shown for the winner.
    RaceTime { seconds: f64, decimals: usize },
    /// (s) Time behind the winner of a lead lap finisher.
    BehindLeader { seconds: f64, decimals: usize },
    LapsDown { laps: u32 },
}

impl fmt::Display for Gap {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Gap::Reference => Ok(()),
            Gap::Live { seconds } => write!(f, "{:.1}", seconds),
            Gap::RaceTime { seconds, decimals } => write!(f, "{}", format_time(seconds, decimals)),
            Gap::BehindLeader { seconds, decimals } => {
                write!(f, "-{}", format_time(seconds, decimals))
            }
            Gap::LapsDown { laps } => write!(f, "-{} L", laps),
        }
    }
}

/// StandingEntry is the output record of a single driver. It is created fresh on every call of
/// the engine and never fed back into the telemetry samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingEntry {
    pub rank: u32,
    pub car_index: u32,
    pub car_number: String,
    pub display_name: String,
    pub gap: Gap,
    pub status: DriverStatus,
    pub is_reference: bool,
}

impl StandingEntry {
    pub fn gap_text(&self) -> String {
        self.gap.to_string()
    }
}

/// RankedStandings contains the (possibly windowed) standings of one tick. Ranks always refer to
/// the full field, total_ranked is the number of drivers that were ranked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedStandings {
    pub mode: StandingsMode,
    pub reference_car_index: u32,
    pub total_ranked: usize,
    pub entries: Vec<StandingEntry>,
}

impl RankedStandings {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StandingEntry> {
        self.entries.iter()
    }

    pub fn reference_entry(&self) -> Option<&StandingEntry> {
        self.entries.iter().find(|e| e.is_reference)
    }

    pub fn entry(&self, car_index: u32) -> Option<&StandingEntry> {
        self.entries.iter().find(|e| e.car_index == car_index)
    }

    /// print_standings prints the standings table to the console output.
    pub fn print_standings(&self) {
        let title = match self.mode {
            StandingsMode::Live => "Live standings",
            StandingsMode::Results => "Results",
        };
        println!(
            "RESULT: {} ({} of {} drivers)",
            title,
            self.entries.len(),
            self.total_ranked
        );

        for entry in self.entries.iter() {
            println!(
                "{} {:3} #{:<4} {:<24} {:>10} {}",
                if entry.is_reference { '>' } else { ' ' },
                entry.rank,
                entry.car_number,
                entry.display_name,
                entry.gap_text(),
                entry.status.label()
            );
        }
    }

    /// write_standings_to_csv writes the standings table to a CSV file. Returns the path to the
    /// written file.
    pub fn write_standings_to_csv(&self, path: &Path) -> anyhow::Result<String> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory {}!", parent.display())
                })?;
            }
        }

        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to open export file {}!", path.display()))?;

        writer.write_record(&["rank", "car_number", "driver", "gap", "status", "reference"])?;
        for entry in self.entries.iter() {
            writer.write_record(&[
                entry.rank.to_string(),
                entry.car_number.to_owned(),
                entry.display_name.to_owned(),
                entry.gap_text(),
                entry.status.label().to_owned(),
                entry.is_reference.to_string(),
            ])?;
        }
        writer
            .flush()
            .with_context(|| format!("Failed to write export file {}!", path.display()))?;

        Ok(path.to_string_lossy().into_owned())
    }
}
