//! Session record line format
//!
//! One session per line:
//!
//! ```text
//! <unix seconds>;<note>:<octave>:<correct>:<wrong>,<note>:<octave>:<correct>:<wrong>,...
//! ```
//!
//! Notes are written in their canonical lowercase sharp spelling and entries
//! are sorted by note name. Reading is lenient: a bad entry is dropped on its
//! own, a bad timestamp reads as the epoch, and a line with the wrong field
//! count or no valid entry is dropped whole.

use solfege_common::music::{Note, NoteName};
use solfege_common::practice::{Score, Session};
use solfege_common::time;
use std::collections::BTreeMap;
use tracing::warn;

/// Most recent records returned by a load
pub const MAX_LOADED_SESSIONS: usize = 100;

const FIELD_SEPARATOR: char = ';';
const ENTRY_SEPARATOR: char = ',';
const VALUE_SEPARATOR: char = ':';

/// Serialize a session to a single line (without trailing newline)
pub fn format_record(session: &Session) -> String {
    let mut entries: Vec<(&Note, &Score)> = session.score.iter().collect();
    entries.sort_by_key(|(note, _)| (note.name, note.octave));

    let entries = entries
        .into_iter()
        .map(|(note, score)| {
            format!(
                "{}{sep}{}{sep}{}{sep}{}",
                note.name.canonical_name(),
                note.octave,
                score.correct,
                score.wrong,
                sep = VALUE_SEPARATOR
            )
        })
        .collect::<Vec<_>>()
        .join(&ENTRY_SEPARATOR.to_string());

    format!(
        "{}{}{}",
        time::to_unix_seconds(&session.timestamp),
        FIELD_SEPARATOR,
        entries
    )
}

/// Parse one line, returning None when nothing usable remains
pub fn parse_record(line: &str) -> Option<Session> {
    let mut fields = line.split(FIELD_SEPARATOR);
    let (timestamp, entries) = match (fields.next(), fields.next(), fields.next()) {
        (Some(timestamp), Some(entries), None) => (timestamp, entries),
        _ => {
            warn!("Skipping session record with wrong field count: {:?}", line);
            return None;
        }
    };

    let timestamp = match timestamp
        .trim()
        .parse::<f64>()
        .ok()
        .and_then(time::from_unix_seconds)
    {
        Some(timestamp) => timestamp,
        None => {
            warn!("Bad session timestamp {:?}, reading it as the epoch", timestamp);
            time::epoch()
        }
    };

    let mut score = BTreeMap::new();
    for entry in entries.split(ENTRY_SEPARATOR) {
        match parse_entry(entry) {
            Some((note, entry_score)) => {
                score.insert(note, entry_score);
            }
            None => warn!("Skipping malformed score entry: {:?}", entry),
        }
    }

    if score.is_empty() {
        return None;
    }

    Some(Session::with_score(timestamp, score))
}

/// Parse a whole file, keeping the most recent [`MAX_LOADED_SESSIONS`] records
pub fn parse_records(content: &str) -> Vec<Session> {
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let start = lines.len().saturating_sub(MAX_LOADED_SESSIONS);

    lines[start..].iter().filter_map(|line| parse_record(line)).collect()
}

fn parse_entry(entry: &str) -> Option<(Note, Score)> {
    let values: Vec<&str> = entry.trim().split(VALUE_SEPARATOR).collect();
    if values.len() != 4 {
        return None;
    }

    let name = values[0].parse::<NoteName>().ok()?;
    let octave = values[1].parse::<u8>().ok()?;
    let correct = values[2].parse::<u32>().ok()?;
    let wrong = values[3].parse::<u32>().ok()?;

    Some((Note::new(name, octave), Score::new(correct, wrong)))
}
