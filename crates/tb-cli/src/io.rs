//! JSON Lines event input.

use anyhow::{Context, Result};
use std::io::BufRead;
use std::path::Path;
use tb_analysis::RawEvent;

/// Read one raw event per non-blank line.
pub fn read_events(path: &Path) -> Result<Vec<RawEvent>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open events file {}", path.display()))?;
    parse_events(std::io::BufReader::new(file))
        .with_context(|| format!("failed to read events from {}", path.display()))
}

pub fn parse_events<R: BufRead>(reader: R) -> Result<Vec<RawEvent>> {
    let mut events = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event: RawEvent =
            serde_json::from_str(&line).with_context(|| format!("line {}: invalid event", idx + 1))?;
        events.push(event);
    }
    Ok(events)
}
