use crate::core::snapshot::Snapshot;
use anyhow::Context;
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// read_snapshot reads a JSON file containing a single snapshot.
pub fn read_snapshot(filepath: &Path) -> anyhow::Result<Snapshot> {
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .with_context(|| format!("Failed to open snapshot file {}!", filepath.display()))?;
    let snapshot = serde_json::from_reader(BufReader::new(fh))
        .with_context(|| format!("Failed to parse snapshot file {}!", filepath.display()))?;
    Ok(snapshot)
}

/// read_replay reads a recorded session, i.e. a JSON lines file with one snapshot per tick.
pub fn read_replay(filepath: &Path) -> anyhow::Result<Vec<Snapshot>> {
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .with_context(|| format!("Failed to open replay file {}!", filepath.display()))?;
    parse_replay(fh).with_context(|| format!("Failed to parse replay file {}!", filepath.display()))
}

/// parse_replay decodes snapshots from JSON lines. Empty lines are skipped.
pub fn parse_replay<R: Read>(reader: R) -> anyhow::Result<Vec<Snapshot>> {
    let mut frames = Vec::new();

    for (i, line) in BufReader::new(reader).lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", i + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let snapshot: Snapshot = serde_json::from_str(&line)
            .with_context(|| format!("Invalid snapshot in line {}", i + 1))?;
        frames.push(snapshot);
    }

    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: &str = r#"{"session":{"track_length_metres":3000.0,"total_session_laps":5,"reference_car_index":0},"drivers":[{"car_index":0,"car_number":"7","display_name":"A","is_on_track":true,"overall_distance":0.25,"lap_number":0}]}"#;

    #[test]
    fn parses_json_lines() {
        let input = format!("{}\n\n{}\n", FRAME, FRAME);
        let frames = parse_replay(input.as_bytes()).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].drivers[0].car_number, "7");
    }

    #[test]
    fn reports_line_of_broken_frame() {
        let input = format!("{}\n{{\"session\": 1}}\n", FRAME);
        let err = parse_replay(input.as_bytes()).unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
    }

    #[test]
    fn reads_files() {
        let dir = std::env::temp_dir();
        let snapshot_path = dir.join(format!("standings_snapshot_{}.json", std::process::id()));
        std::fs::write(&snapshot_path, FRAME).unwrap();

        let snapshot = read_snapshot(&snapshot_path).unwrap();
        std::fs::remove_file(&snapshot_path).unwrap();
        assert_eq!(snapshot.session.reference_car_index, 0);

        let missing = dir.join("standings_does_not_exist.jsonl");
        let err = read_replay(&missing).unwrap_err();
        assert!(err.to_string().contains("Failed to open replay file"));
    }
}
